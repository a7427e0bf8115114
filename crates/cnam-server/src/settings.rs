//! Process settings.
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `CNAM__`-prefixed environment variables
//! (`CNAM__SERVER__PORT=9090`, `CNAM__STORE__BACKEND=file`, ...).

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use cnam_cache::{CacheBackend, ExpireWindow, FileBackend, MemoryBackend, MonitorConfig};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::provider::ProviderConfig;

/// Env var naming the settings file.
pub const CONFIG_PATH_ENV: &str = "CNAM_CONFIG";

/// Settings file read when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/cnam.toml";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid listen address '{host}': {reason}")]
    InvalidAddress { host: String, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub store: StoreSettings,
    pub monitor: MonitorSettings,
    pub cache: CacheSettings,
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directiva de `EnvFilter` usada cuando `RUST_LOG` no esta definida.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Which backend holds cached results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: BackendKind,
    /// Directory for the file backend.
    pub path: PathBuf,
    /// Entry limit for the memory backend; unbounded when unset.
    ///
    /// Setting it lets the backend evict records on its own, in addition to
    /// cleanup sweeps and explicit deletes.
    pub max_capacity: Option<u64>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            path: PathBuf::from("data/cache"),
            max_capacity: None,
        }
    }
}

impl StoreSettings {
    /// Builds the configured backend.
    ///
    /// A file backend whose directory cannot be created is still returned;
    /// the monitor keeps it unhealthy until the directory becomes usable.
    pub async fn build_backend(&self) -> Arc<dyn CacheBackend> {
        match self.backend {
            BackendKind::Memory => {
                let backend = match self.max_capacity {
                    Some(capacity) => MemoryBackend::with_capacity(capacity),
                    None => MemoryBackend::new(),
                };
                info!(max_capacity = ?self.max_capacity, "Using in-memory cache store");
                Arc::new(backend)
            },
            BackendKind::File => {
                let backend = FileBackend::new(&self.path);
                if let Err(e) = backend.ensure_dir().await {
                    warn!(path = %self.path.display(), error = %e, "Cache directory is not usable yet");
                }
                info!(path = %self.path.display(), "Using file cache store");
                Arc::new(backend)
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub interval_secs: u64,
    pub probe_timeout_ms: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            probe_timeout_ms: 5_000,
        }
    }
}

impl MonitorSettings {
    pub fn to_config(&self) -> MonitorConfig {
        MonitorConfig {
            interval: Duration::from_secs(self.interval_secs.max(1)),
            probe_timeout: Duration::from_millis(self.probe_timeout_ms.max(1)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub default_expire: ExpireWindow,
}

impl Settings {
    /// Loads settings from [`CONFIG_PATH_ENV`] (or [`DEFAULT_CONFIG_PATH`])
    /// and the environment.
    ///
    /// A path named by the env var must exist; the default path is optional.
    pub fn load() -> Result<Self, SettingsError> {
        let (path, required) = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => (PathBuf::from(path), true),
            _ => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };
        Self::from_file(&path, required)
    }

    /// Loads settings from `path` layered under the environment.
    pub fn from_file(path: &Path, required: bool) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from(path).required(required))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Loads settings from an inline TOML document layered under the
    /// environment.
    pub fn from_toml_str(toml: &str) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Returns the listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|e: std::net::AddrParseError| SettingsError::InvalidAddress {
                host: self.server.host.clone(),
                reason: e.to_string(),
            })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

fn environment() -> Environment {
    Environment::with_prefix("CNAM")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnam_cache::ExpireUnit;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.store.backend, BackendKind::Memory);
        assert_eq!(settings.store.max_capacity, None);
        assert_eq!(settings.monitor.to_config().interval, Duration::from_secs(60));
        assert_eq!(settings.cache.default_expire, ExpireWindow::default());
        assert_eq!(
            settings.socket_addr().unwrap(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9090

            [store]
            backend = "file"
            path = "/tmp/cnam"

            [cache.default_expire]
            value = 12
            unit = "hours"

            [provider]
            base_url = "https://cnam.example.com/v3/phone"

            [provider.query]
            format = "json"
            account_sid = "AC123"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.store.backend, BackendKind::File);
        assert_eq!(settings.store.path, PathBuf::from("/tmp/cnam"));
        assert_eq!(settings.cache.default_expire.value, 12);
        assert_eq!(settings.cache.default_expire.unit, ExpireUnit::Hours);
        assert_eq!(settings.provider.base_url, "https://cnam.example.com/v3/phone");
        assert_eq!(
            settings.provider.query.get("account_sid").map(String::as_str),
            Some("AC123")
        );
        // sections left out keep their defaults
        assert_eq!(settings.monitor.interval_secs, 60);
        assert_eq!(settings.provider.timeout_ms, 5_000);
    }

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let settings = Settings::from_file(Path::new("does/not/exist.toml"), false).unwrap();
        assert_eq!(settings.server.host, "0.0.0.0");
    }

    #[test]
    fn test_missing_required_file_fails() {
        let result = Settings::from_file(Path::new("does/not/exist.toml"), true);
        assert!(matches!(result, Err(SettingsError::Load(_))));
    }

    #[test]
    fn test_invalid_host() {
        let mut settings = Settings::default();
        settings.server.host = "not-an-ip".to_string();
        assert!(matches!(
            settings.socket_addr(),
            Err(SettingsError::InvalidAddress { .. })
        ));
    }

    #[tokio::test]
    async fn test_build_file_backend_creates_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = StoreSettings {
            backend: BackendKind::File,
            path: dir.path().join("cache"),
            max_capacity: None,
        };

        let backend = store.build_backend().await;
        assert_eq!(backend.name(), "file");
        assert!(dir.path().join("cache").is_dir());
    }
}
