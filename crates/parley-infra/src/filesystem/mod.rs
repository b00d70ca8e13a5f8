//! Filesystem adapters for Parley.
//!
//! Implements the `DocumentStore` trait from `parley-core` as one JSON file
//! per document inside a data directory.

pub mod json_store;

pub use json_store::JsonFileStore;

/// Data directory used when none is configured.
pub const DEFAULT_DATA_DIR: &str = "data";
