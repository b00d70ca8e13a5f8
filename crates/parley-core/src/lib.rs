//! Business logic and port definitions for Parley.
//!
//! This crate defines the "ports" (`DocumentStore`, `UpstreamClient`) that
//! the infrastructure layer implements, plus the services built on them:
//! session/conversation persistence and the completion relay. It depends
//! only on `parley-types` -- never on `parley-infra` or any IO crate.

pub mod config;
pub mod relay;
pub mod session;
pub mod storage;
