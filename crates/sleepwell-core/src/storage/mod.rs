mod config;
pub mod database;
mod session_store;

pub use config::{AlarmConfig, Config, LoggingConfig, SummaryConfig};
pub use database::Database;
pub use session_store::{keys, SessionStore};

use std::path::PathBuf;

use crate::error::{ConfigError, DatabaseError};

/// Durable string key-value storage.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError>;
}

impl<K: KvStore + ?Sized> KvStore for &K {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        (**self).set(key, value)
    }
}

/// Returns the data directory, creating it if needed.
///
/// `SLEEPWELL_DATA_DIR` wins when set. Otherwise `~/.config/sleepwell/`, or
/// `~/.config/sleepwell-dev/` with `SLEEPWELL_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("SLEEPWELL_DATA_DIR") {
        Some(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SLEEPWELL_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("sleepwell-dev")
            } else {
                base_dir.join("sleepwell")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
