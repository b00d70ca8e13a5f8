//! `parley.toml` settings loader.
//!
//! The file is optional. Anything unusable about it (unreadable, not TOML,
//! a value of the wrong type) leaves the server on [`ServerSettings`]
//! defaults rather than refusing to start. Unrecognized keys are reported
//! and ignored.

use std::path::Path;

use parley_types::config::ServerSettings;

/// Settings file name inside the data directory.
pub const SETTINGS_FILE: &str = "parley.toml";

const KNOWN_KEYS: [&str; 3] = ["upstream_timeout_secs", "body_limit_bytes", "web_dir"];

/// Settings from `{data_dir}/parley.toml`, or defaults.
pub async fn load_server_settings(data_dir: &Path) -> ServerSettings {
    let path = data_dir.join(SETTINGS_FILE);

    match read_settings(&path).await {
        Ok(Some(settings)) => {
            tracing::debug!(path = %path.display(), ?settings, "Loaded server settings");
            settings
        }
        Ok(None) => {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            ServerSettings::default()
        }
        Err(reason) => {
            tracing::warn!(path = %path.display(), %reason, "Ignoring settings file");
            ServerSettings::default()
        }
    }
}

/// `Ok(None)` when the file is absent; `Err` carries why it was rejected.
async fn read_settings(path: &Path) -> Result<Option<ServerSettings>, String> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(format!("cannot read file: {e}")),
    };

    let table: toml::Table = text
        .parse()
        .map_err(|e: toml::de::Error| format!("not valid TOML: {}", e.message()))?;

    for key in table.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        tracing::warn!(%key, "Unknown key in {SETTINGS_FILE}, ignored");
    }

    toml::Value::Table(table)
        .try_into::<ServerSettings>()
        .map(Some)
        .map_err(|e| format!("bad value: {}", e.message()))
}
