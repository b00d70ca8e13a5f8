//! Command-line and environment options.

use std::path::PathBuf;

use clap::Parser;
use parley_infra::filesystem::DEFAULT_DATA_DIR;
use secrecy::SecretString;

use crate::state::StartupOptions;

/// Chat session store and OpenAI-compatible completion relay.
#[derive(Debug, Parser)]
#[command(name = "parley", version, about, long_about = None)]
pub struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Address to bind.
    #[arg(long, env = "PARLEY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Directory holding the JSON documents and `parley.toml`.
    #[arg(long, env = "PARLEY_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Bearer token used when a request carries none.
    #[arg(long, env = "DASHSCOPE_API_KEY", hide_env_values = true)]
    pub fallback_token: Option<String>,

    /// Reset every document to empty before serving.
    #[arg(long, env = "CLEAR_DATA_ON_START")]
    pub clear_data_on_start: bool,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, env = "PARLEY_OTEL")]
    pub otel: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Options for [`crate::state::AppState::init`].
    pub fn startup_options(&self) -> StartupOptions {
        StartupOptions {
            data_dir: self.data_dir.clone(),
            clear_on_start: self.clear_data_on_start,
            fallback_token: self
                .fallback_token
                .clone()
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
        }
    }

    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
