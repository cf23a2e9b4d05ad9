//! Environment-driven configuration for the server binary.

use std::path::PathBuf;
use std::time::Duration;

use crate::channel::ChannelConfig;

const DEFAULT_PORT: u16 = 4517;
const DEFAULT_RETENTION_MS: u64 = 5_000;

/// Server settings, read from `CHARTPILOT_*` environment variables with
/// sensible defaults. Unparseable values fall back to the default with a
/// warning rather than aborting startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Path to the JSON preference file; `None` keeps preferences in
    /// memory only.
    pub prefs_path: Option<PathBuf>,
    pub retention: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            prefs_path: None,
            retention: Duration::from_millis(DEFAULT_RETENTION_MS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var("CHARTPILOT_PORT") {
            match raw.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => tracing::warn!(%raw, "invalid CHARTPILOT_PORT, using default"),
            }
        }
        if let Ok(raw) = std::env::var("CHARTPILOT_PREFS") {
            if !raw.is_empty() {
                config.prefs_path = Some(PathBuf::from(raw));
            }
        }
        if let Ok(raw) = std::env::var("CHARTPILOT_RETENTION_MS") {
            match raw.parse::<u64>() {
                Ok(ms) => config.retention = Duration::from_millis(ms),
                Err(_) => tracing::warn!(%raw, "invalid CHARTPILOT_RETENTION_MS, using default"),
            }
        }
        config
    }

    pub fn channel_config(&self) -> ChannelConfig {
        ChannelConfig { retention: self.retention }
    }
}
