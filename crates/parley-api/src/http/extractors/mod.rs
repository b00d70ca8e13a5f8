//! Custom request extractors.

pub mod lenient;
