//! HTTP request handlers.

pub mod config;
pub mod legacy;
pub mod relay;
pub mod session;
