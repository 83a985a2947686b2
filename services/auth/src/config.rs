//! Session service configuration
//!
//! Settings are layered with the `config` crate: built-in defaults first,
//! then `HMS_`-prefixed environment variables.

use std::sync::Arc;
use std::time::Duration;

use common::{FileStore, KeyValueStore, MemoryStore, RedisConfig, RedisPool, StoreError};
use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;

/// Which key-value back end holds the persisted session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    File,
    Redis,
}

/// Session service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Simulated credential round-trip in milliseconds (default: 800)
    pub login_delay_ms: u64,
    /// Pause before clearing the loading flag after a login (default: 300)
    pub settle_delay_ms: u64,
    /// Pause before clearing the loading flag on startup (default: 300)
    pub restore_delay_ms: u64,
    /// Store back end (default: file)
    pub store: StoreBackend,
    /// Path of the JSON file used by the file back end
    pub store_path: String,
}

impl AuthConfig {
    /// Create a new AuthConfig from environment variables
    ///
    /// # Environment Variables
    /// - `HMS_LOGIN_DELAY_MS`: Login latency (default: 800)
    /// - `HMS_SETTLE_DELAY_MS`: Post-login settle delay (default: 300)
    /// - `HMS_RESTORE_DELAY_MS`: Startup settle delay (default: 300)
    /// - `HMS_STORE`: `memory`, `file` or `redis` (default: file)
    /// - `HMS_STORE_PATH`: File store location (default: "hms-storage.json")
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .set_default("login_delay_ms", 800_i64)?
            .set_default("settle_delay_ms", 300_i64)?
            .set_default("restore_delay_ms", 300_i64)?
            .set_default("store", "file")?
            .set_default("store_path", "hms-storage.json")?
            .add_source(config::Environment::with_prefix("HMS").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Delays applied by the session manager
    pub fn timings(&self) -> SessionTimings {
        SessionTimings {
            login_delay: Duration::from_millis(self.login_delay_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            restore_delay: Duration::from_millis(self.restore_delay_ms),
        }
    }

    /// Open the configured store
    ///
    /// The Redis back end is checked for connectivity before it is handed
    /// out.
    pub async fn open_store(&self) -> Result<Arc<dyn KeyValueStore>, ConfigError> {
        let store: Arc<dyn KeyValueStore> = match self.store {
            StoreBackend::Memory => {
                info!("Using in-memory store");
                Arc::new(MemoryStore::new())
            }
            StoreBackend::File => {
                info!("Using file store at {}", self.store_path);
                Arc::new(FileStore::new(&self.store_path))
            }
            StoreBackend::Redis => {
                let redis_config = RedisConfig::from_env()?;
                let pool = RedisPool::new(&redis_config).await?;
                if !pool.health_check().await? {
                    return Err(StoreError::Configuration(format!(
                        "Redis at {} did not answer PING",
                        redis_config.url
                    ))
                    .into());
                }
                info!("Redis connection successful");
                Arc::new(pool)
            }
        };

        Ok(store)
    }
}

/// Fixed delays standing in for network latency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimings {
    pub login_delay: Duration,
    pub settle_delay: Duration,
    pub restore_delay: Duration,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            login_delay: Duration::from_millis(800),
            settle_delay: Duration::from_millis(300),
            restore_delay: Duration::from_millis(300),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "HMS_LOGIN_DELAY_MS",
        "HMS_SETTLE_DELAY_MS",
        "HMS_RESTORE_DELAY_MS",
        "HMS_STORE",
        "HMS_STORE_PATH",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn test_auth_config_defaults() {
        clear_env();

        let config = AuthConfig::from_env().unwrap();
        assert_eq!(config.store, StoreBackend::File);
        assert_eq!(config.store_path, "hms-storage.json");
        assert_eq!(config.timings(), SessionTimings::default());
    }

    #[test]
    #[serial]
    fn test_auth_config_from_env_with_custom_values() {
        clear_env();
        unsafe {
            std::env::set_var("HMS_LOGIN_DELAY_MS", "0");
            std::env::set_var("HMS_SETTLE_DELAY_MS", "5");
            std::env::set_var("HMS_STORE", "memory");
            std::env::set_var("HMS_STORE_PATH", "/tmp/hms.json");
        }

        let config = AuthConfig::from_env().unwrap();
        assert_eq!(config.login_delay_ms, 0);
        assert_eq!(config.settle_delay_ms, 5);
        assert_eq!(config.restore_delay_ms, 300);
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.store_path, "/tmp/hms.json");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_auth_config_rejects_unknown_backend() {
        clear_env();
        unsafe {
            std::env::set_var("HMS_STORE", "sqlite");
        }

        assert!(AuthConfig::from_env().is_err());

        clear_env();
    }

    #[tokio::test]
    async fn test_open_memory_store() {
        let config = AuthConfig {
            login_delay_ms: 0,
            settle_delay_ms: 0,
            restore_delay_ms: 0,
            store: StoreBackend::Memory,
            store_path: String::new(),
        };

        let store = config.open_store().await.unwrap();
        store.set("hms_user", "{}").await.unwrap();
        assert_eq!(store.get("hms_user").await.unwrap(), Some("{}".to_string()));
    }

    #[tokio::test]
    async fn test_open_file_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("hms-storage.json");
        let config = AuthConfig {
            login_delay_ms: 0,
            settle_delay_ms: 0,
            restore_delay_ms: 0,
            store: StoreBackend::File,
            store_path: path.to_string_lossy().into_owned(),
        };

        config.open_store().await.unwrap().set("hms_doctors", "[]").await.unwrap();

        let reopened = config.open_store().await.unwrap();
        assert_eq!(reopened.get("hms_doctors").await.unwrap(), Some("[]".to_string()));
        assert!(path.exists());
    }
}
