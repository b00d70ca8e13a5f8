//! Application state wiring all services together.
//!
//! Services are generic over store/upstream traits; AppState pins them to
//! the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parley_core::config::ConfigService;
use parley_core::relay::RelayService;
use parley_core::session::SessionService;
use parley_infra::config::load_server_settings;
use parley_infra::filesystem::JsonFileStore;
use parley_infra::upstream::HttpUpstreamClient;
use parley_types::config::ServerSettings;
use secrecy::SecretString;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteSessionService = SessionService<JsonFileStore>;
pub type ConcreteConfigService = ConfigService<JsonFileStore>;
pub type ConcreteRelayService = RelayService<HttpUpstreamClient>;

/// Inputs read once at process start.
#[derive(Debug)]
pub struct StartupOptions {
    pub data_dir: PathBuf,
    pub clear_on_start: bool,
    pub fallback_token: Option<SecretString>,
}

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<ConcreteSessionService>,
    pub config_service: Arc<ConcreteConfigService>,
    pub relay_service: Arc<ConcreteRelayService>,
    pub settings: Arc<ServerSettings>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Prepare the data directory, wire services, and run the one-time
    /// legacy migration. Must complete before the server accepts requests.
    pub async fn init(options: StartupOptions) -> anyhow::Result<Self> {
        let StartupOptions {
            data_dir,
            clear_on_start,
            fallback_token,
        } = options;

        let store = Arc::new(JsonFileStore::new(&data_dir));
        store.initialize(clear_on_start).await?;

        let settings = load_server_settings(&data_dir).await;
        let upstream = HttpUpstreamClient::new(Duration::from_secs(settings.upstream_timeout_secs))?;

        let session_service = Arc::new(SessionService::new(Arc::clone(&store)));
        session_service.migrate_legacy_if_needed().await?;

        tracing::info!(
            data_dir = %data_dir.display(),
            fallback_token = fallback_token.is_some(),
            upstream_timeout_secs = settings.upstream_timeout_secs,
            "Application state ready"
        );

        Ok(Self {
            session_service,
            config_service: Arc::new(ConfigService::new(store)),
            relay_service: Arc::new(RelayService::new(upstream, fallback_token)),
            settings: Arc::new(settings),
            data_dir,
        })
    }
}
