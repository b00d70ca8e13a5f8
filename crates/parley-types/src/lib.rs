//! Shared domain types for Parley.
//!
//! Sessions, opaque conversation messages, the persisted document keys,
//! relay configuration, and the error enums shared by the service and
//! infrastructure layers.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod document;
pub mod error;
pub mod relay;
pub mod session;
