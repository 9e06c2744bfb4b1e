//! # Application Configuration
//!
//! Environment variables layered over defaults.
//!
//! | Variable                    | Default                    |
//! |-----------------------------|----------------------------|
//! | `MEDILIFE_DB_PATH`          | `./medilife.db`            |
//! | `MEDILIFE_MAX_CONNECTIONS`  | `5`                        |
//! | `MEDILIFE_PAYMENT_NOTE`     | validity disclaimer        |
//! | `MEDILIFE_EDITOR_ROWS`      | `5` (never less)           |
//! | `MEDILIFE_USER`             | none, stamped as `system`  |

use std::path::PathBuf;

use thiserror::Error;

use medilife_core::QuoteSettings;

use crate::audit::NamedUser;
use crate::pool::DbConfig;

pub const ENV_DB_PATH: &str = "MEDILIFE_DB_PATH";
pub const ENV_MAX_CONNECTIONS: &str = "MEDILIFE_MAX_CONNECTIONS";
pub const ENV_PAYMENT_NOTE: &str = "MEDILIFE_PAYMENT_NOTE";
pub const ENV_EDITOR_ROWS: &str = "MEDILIFE_EDITOR_ROWS";
pub const ENV_USER: &str = "MEDILIFE_USER";

const DEFAULT_DB_PATH: &str = "./medilife.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Everything a binary needs to build a quote service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub max_connections: u32,
    pub quotes: QuoteSettings,
    /// Acting user for audit stamps.
    pub user: NamedUser,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            quotes: QuoteSettings::default(),
            user: NamedUser::new(""),
        }
    }
}

impl AppConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            config.database_path = PathBuf::from(path);
        }

        if let Some(max) = lookup(ENV_MAX_CONNECTIONS) {
            config.max_connections = parse_positive(ENV_MAX_CONNECTIONS, &max)?;
        }

        if let Some(note) = lookup(ENV_PAYMENT_NOTE) {
            config.quotes = config.quotes.payment_note(note);
        }

        if let Some(rows) = lookup(ENV_EDITOR_ROWS) {
            let rows: u32 = parse_positive(ENV_EDITOR_ROWS, &rows)?;
            config.quotes = config.quotes.editor_rows(rows as usize);
        }

        if let Some(user) = lookup(ENV_USER) {
            config.user = NamedUser::new(user);
        }

        Ok(config)
    }

    /// Pool configuration for [`Database::new`](crate::Database::new).
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };

    let parsed: u32 = value.trim().parse().map_err(|e| invalid(format!("{}", e)))?;
    if parsed == 0 {
        return Err(invalid("must be positive".to_string()));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::CurrentUser;
    use medilife_core::{DEFAULT_PAYMENT_NOTE, MIN_EDITOR_ROWS};
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.quotes.default_payment_note, DEFAULT_PAYMENT_NOTE);
        assert_eq!(config.quotes.editor_rows, MIN_EDITOR_ROWS);
        assert_eq!(config.user.display_name().as_deref(), Some(""));
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/tmp/quotes.db"),
            (ENV_MAX_CONNECTIONS, "3"),
            (ENV_PAYMENT_NOTE, "Contado"),
            (ENV_EDITOR_ROWS, "8"),
            (ENV_USER, "mgarcia"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/quotes.db"));
        assert_eq!(config.db_config().max_connections, 3);
        assert_eq!(config.quotes.default_payment_note, "Contado");
        assert_eq!(config.quotes.editor_rows, 8);
        assert_eq!(config.user.display_name().as_deref(), Some("mgarcia"));
    }

    #[test]
    fn test_editor_rows_clamped() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_EDITOR_ROWS, "2")])).unwrap();
        assert_eq!(config.quotes.editor_rows, MIN_EDITOR_ROWS);
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(AppConfig::from_lookup(lookup(&[(ENV_MAX_CONNECTIONS, "many")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(ENV_MAX_CONNECTIONS, "0")])).is_err());
    }
}
