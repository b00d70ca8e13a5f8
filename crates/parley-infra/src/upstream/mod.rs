//! Upstream provider clients.

pub mod http;

pub use http::HttpUpstreamClient;
