use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::storage::{CursorOptions, DEFAULT_HISTORY_LIMIT, UnknownCursorPolicy};

pub const DEFAULT_CONFIG_PATH: &str = "config/chat.json";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Messages returned to a client that has no cursor yet.
    pub history_limit: usize,
    pub unknown_cursor: UnknownCursorPolicy,
    pub storage: StorageConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            unknown_cursor: UnknownCursorPolicy::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn cursor_options(&self) -> CursorOptions {
        CursorOptions {
            history_limit: self.history_limit,
            unknown_cursor: self.unknown_cursor,
        }
    }
}

/// Message store backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Kept in process memory, lost on restart.
    #[default]
    Memory,
    Sqlite { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn poll_interval(&self) -> Duration {
        // A zero period would panic in tokio::time::interval.
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        // A zero timeout fails every request before it is sent.
        match self.request_timeout_ms {
            0 => Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            ms => Duration::from_millis(ms),
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "server": { "bind_addr": "0.0.0.0:8080", "unknown_cursor": "reject" } }"#,
        )
        .unwrap();

        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.server.unknown_cursor, UnknownCursorPolicy::Reject);
        assert_eq!(config.server.history_limit, DEFAULT_HISTORY_LIMIT);
        assert_eq!(config.server.storage, StorageConfig::Memory);
        assert_eq!(config.client, ClientConfig::default());
    }

    #[test]
    fn sqlite_storage_is_tagged() {
        let storage: StorageConfig =
            serde_json::from_str(r#"{ "kind": "sqlite", "path": "data/messages.db" }"#).unwrap();
        assert_eq!(
            storage,
            StorageConfig::Sqlite {
                path: PathBuf::from("data/messages.db")
            }
        );
    }

    #[test]
    fn missing_or_broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert_eq!(load_config(missing.to_str().unwrap()), AppConfig::default());

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert_eq!(load_config(broken.to_str().unwrap()), AppConfig::default());
    }

    #[test]
    fn zero_durations_fall_back_to_usable_values() {
        let config = ClientConfig {
            poll_interval_ms: 0,
            request_timeout_ms: 0,
            ..ClientConfig::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
        assert_eq!(
            config.request_timeout(),
            Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS)
        );

        let custom = ClientConfig {
            request_timeout_ms: 250,
            ..ClientConfig::default()
        };
        assert_eq!(custom.request_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config/chat.json");
        let path = path.to_str().unwrap();

        let mut config = AppConfig::default();
        config.client.poll_interval_ms = 500;
        save_config(path, &config).unwrap();

        assert_eq!(load_config(path), config);
    }
}
