//! Parley application layer: CLI options, service wiring, and the REST API.

pub mod cli;
pub mod http;
pub mod state;
