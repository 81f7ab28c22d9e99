//! API server configuration.
//!
//! Layered with the `config` crate, later sources winning:
//!
//! ```text
//! built-in defaults  →  flash.toml (optional)  →  FLASH_* environment
//! ```
//!
//! | Key               | Env var                 | Default        |
//! |-------------------|-------------------------|----------------|
//! | `host`            | `FLASH_HOST`            | `127.0.0.1`    |
//! | `port`            | `FLASH_PORT`            | `8000`         |
//! | `database_path`   | `FLASH_DATABASE_PATH`   | `./flash.db`   |
//! | `max_connections` | `FLASH_MAX_CONNECTIONS` | `5`            |
//! | `busy_timeout_ms` | `FLASH_BUSY_TIMEOUT_MS` | `5000`         |

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use config::{Config, Environment, File};
use flash_db::DbConfig;

const ENV_PREFIX: &str = "FLASH";
const DEFAULT_FILE: &str = "flash";

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind.
    pub host: String,

    /// HTTP port.
    pub port: u16,

    /// SQLite database file (`:memory:` for a throwaway database).
    pub database_path: String,

    /// Connection pool size.
    pub max_connections: u32,

    /// How long a sale waits for the write lock before failing.
    pub busy_timeout_ms: u64,
}

impl ApiConfig {
    /// Loads from `flash.toml` in the working directory (if present) and the
    /// process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_FILE, None)
    }

    /// Loads from an explicit file stem and, optionally, an environment map
    /// in place of the process environment.
    pub fn load_from(
        file: &str,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8000)?
            .set_default("database_path", "./flash.db")?
            .set_default("max_connections", 5)?
            .set_default("busy_timeout_ms", 5000)?
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
            .build()?;

        let config: ApiConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue("host".to_string()));
        }
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue("database_path".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool settings for [`flash_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        let base = if self.database_path == ":memory:" {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.database_path).max_connections(self.max_connections)
        };
        base.busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_file() -> String {
        let dir = tempfile::tempdir().unwrap();
        dir.path().join("absent").to_string_lossy().into_owned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::load_from(&no_file(), Some(HashMap::new())).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8000");
        assert_eq!(config.database_path, "./flash.db");
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flash.toml");
        std::fs::write(&path, "port = 9000\ndatabase_path = \"/tmp/file.db\"\n").unwrap();
        let stem = dir.path().join("flash").to_string_lossy().into_owned();

        let env = HashMap::from([("FLASH_PORT".to_string(), "9100".to_string())]);
        let config = ApiConfig::load_from(&stem, Some(env)).unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.database_path, "/tmp/file.db");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let env = HashMap::from([("FLASH_MAX_CONNECTIONS".to_string(), "0".to_string())]);
        assert!(matches!(
            ApiConfig::load_from(&no_file(), Some(env)),
            Err(ConfigError::InvalidValue(_))
        ));

        let env = HashMap::from([("FLASH_PORT".to_string(), "not-a-port".to_string())]);
        assert!(matches!(
            ApiConfig::load_from(&no_file(), Some(env)),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_memory_db_config() {
        let env = HashMap::from([("FLASH_DATABASE_PATH".to_string(), ":memory:".to_string())]);
        let config = ApiConfig::load_from(&no_file(), Some(env)).unwrap();

        assert!(config.db_config().is_in_memory());
    }
}
