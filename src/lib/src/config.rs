//! Server configuration
//!
//! [`ServerConfig`] is built once at startup and handed to the server. The only
//! value that may change while the server runs is the recommended client
//! version, which lives in a [`SharedSettings`] handle cloned into every worker.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::Deserialize;

use crate::constants::{
    CONFIG_FILENAME, DEFAULT_CLIENT_REQUEST_TIMEOUT_SECS, DEFAULT_HOME_DIR,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_RECOMMENDED_VERSION, HOME_DIR_ENV, RECOMMENDED_VERSION_ENV,
};
use crate::error::VantageError;
use crate::storage::DataLayout;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub home_dir: PathBuf,
    pub recommended_version: String,
    pub max_upload_bytes: usize,
    pub client_request_timeout: Duration,
}

/// Shape of `<home>/config.toml`. Every key is optional.
#[derive(Deserialize, Debug, Default)]
struct ConfigFile {
    recommended_version: Option<String>,
    max_upload_bytes: Option<usize>,
    client_request_timeout_secs: Option<u64>,
}

impl ServerConfig {
    pub fn new(home_dir: impl AsRef<Path>) -> ServerConfig {
        ServerConfig {
            home_dir: home_dir.as_ref().to_path_buf(),
            recommended_version: String::from(DEFAULT_RECOMMENDED_VERSION),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            client_request_timeout: Duration::from_secs(DEFAULT_CLIENT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Reads `.env`, `VANTAGE_HOME`, the home directory's `config.toml`, then
    /// applies `VANTAGE_RECOMMENDED_VERSION` on top.
    pub fn from_env() -> Result<ServerConfig, VantageError> {
        dotenv::dotenv().ok();

        let home_dir = env::var(HOME_DIR_ENV).unwrap_or_else(|_| String::from(DEFAULT_HOME_DIR));
        let mut config = ServerConfig::load(&home_dir)?;

        if let Ok(version) = env::var(RECOMMENDED_VERSION_ENV) {
            log::debug!("recommended version overridden from env: {}", version);
            config.recommended_version = version;
        }
        Ok(config)
    }

    /// Defaults for `home_dir`, overlaid with `config.toml` if it exists
    pub fn load(home_dir: impl AsRef<Path>) -> Result<ServerConfig, VantageError> {
        let mut config = ServerConfig::new(home_dir);
        let path = config.config_path();
        if !path.exists() {
            log::debug!("no config file at {:?}, using defaults", path);
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&path)?;
        let file: ConfigFile = toml::from_str(&contents)?;
        if let Some(version) = file.recommended_version {
            config.recommended_version = version;
        }
        if let Some(limit) = file.max_upload_bytes {
            if limit == 0 {
                return Err(VantageError::Config(String::from(
                    "max_upload_bytes must be greater than zero",
                )));
            }
            config.max_upload_bytes = limit;
        }
        if let Some(secs) = file.client_request_timeout_secs {
            config.client_request_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn with_recommended_version(mut self, version: impl Into<String>) -> ServerConfig {
        self.recommended_version = version.into();
        self
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> ServerConfig {
        self.max_upload_bytes = limit;
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.home_dir.join(CONFIG_FILENAME)
    }

    pub fn layout(&self) -> DataLayout {
        DataLayout::new(&self.home_dir)
    }
}

/// Runtime settings shared by every request handler.
///
/// Reads vastly outnumber writes, so a read-write lock guards the value.
/// Clones share the same underlying state.
#[derive(Debug, Clone)]
pub struct SharedSettings {
    recommended_version: Arc<RwLock<String>>,
}

impl SharedSettings {
    pub fn new(recommended_version: impl Into<String>) -> SharedSettings {
        SharedSettings {
            recommended_version: Arc::new(RwLock::new(recommended_version.into())),
        }
    }

    pub fn from_config(config: &ServerConfig) -> SharedSettings {
        SharedSettings::new(config.recommended_version.clone())
    }

    pub fn recommended_version(&self) -> String {
        self.recommended_version.read().clone()
    }

    pub fn set_recommended_version(&self, version: impl Into<String>) {
        let version = version.into();
        log::info!("recommended client version set to {}", version);
        *self.recommended_version.write() = version;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load(dir.path()).unwrap();
        assert_eq!(config.recommended_version, DEFAULT_RECOMMENDED_VERSION);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.home_dir, dir.path());
    }

    #[test]
    fn test_load_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILENAME),
            "recommended_version = \"2.4.1\"\nmax_upload_bytes = 1024\nclient_request_timeout_secs = 9\n",
        )
        .unwrap();

        let config = ServerConfig::load(dir.path()).unwrap();
        assert_eq!(config.recommended_version, "2.4.1");
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.client_request_timeout, Duration::from_secs(9));
    }

    #[test]
    fn test_load_rejects_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "recommended_version = [").unwrap();

        let result = ServerConfig::load(dir.path());
        assert!(matches!(result, Err(VantageError::Config(_))));
    }

    #[test]
    fn test_load_rejects_zero_upload_limit() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "max_upload_bytes = 0").unwrap();

        assert!(ServerConfig::load(dir.path()).is_err());
    }

    #[test]
    fn test_shared_settings_updates_are_visible_to_clones() {
        let settings = SharedSettings::new("1.0.0");
        let worker_view = settings.clone();

        settings.set_recommended_version("1.2.3.4.5.6.7.8.9");
        assert_eq!(worker_view.recommended_version(), "1.2.3.4.5.6.7.8.9");
    }

    #[test]
    fn test_shared_settings_from_config() {
        let config = ServerConfig::new("unused").with_recommended_version("3.1");
        let settings = SharedSettings::from_config(&config);
        assert_eq!(settings.recommended_version(), "3.1");
    }
}
