//! Storage abstractions for Parley.
//!
//! Defines the document store port and an in-memory implementation.
//! The file-backed implementation lives in parley-infra.

pub mod document_store;
pub mod memory;

pub use document_store::{load_or_default, save, DocumentStore};
pub use memory::MemoryDocumentStore;
