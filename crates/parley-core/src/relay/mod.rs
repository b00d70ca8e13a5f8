//! Chat-completion relay: credential resolution and upstream forwarding.

pub mod credentials;
pub mod service;
pub mod upstream;

pub use credentials::{mask_token, normalize_base_url, Credentials, MISSING_CREDENTIALS};
pub use service::RelayService;
pub use upstream::{UpstreamClient, UpstreamReply};
