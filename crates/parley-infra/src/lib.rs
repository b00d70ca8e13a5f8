//! Infrastructure layer for Parley.
//!
//! Contains implementations of the ports defined in `parley-core`: the
//! JSON-file document store and the reqwest-backed upstream client, plus
//! the `parley.toml` settings loader.

pub mod config;
pub mod filesystem;
pub mod upstream;
