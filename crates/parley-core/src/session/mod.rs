//! Session and conversation persistence.

pub mod service;

pub use service::{SessionService, RETENTION_DAYS};
