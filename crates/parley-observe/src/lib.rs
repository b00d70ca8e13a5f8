//! Observability for Parley: tracing subscriber setup and optional
//! OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{default_directive, init_tracing, shutdown_tracing};
