//! HTTP/REST API layer for Parley.
//!
//! Axum-based JSON API under `/api/` with permissive CORS and an optional
//! static web UI fallback.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
