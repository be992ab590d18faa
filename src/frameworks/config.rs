use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ROSTER_PATH: &str = "data/guests.csv";
// Row-store deployments partition by a plain key; hash-store deployments use the hash name.
const DEFAULT_ROW_EVENT_KEY: &str = "default";
const DEFAULT_HASH_EVENT_KEY: &str = "gl:checkins";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown CHECKIN_BACKEND value: {0}")]
    UnknownBackend(String),
    #[error("invalid PORT value: {0}")]
    InvalidPort(String),
}

// Which check-in store the process talks to.
#[derive(Clone, PartialEq, Eq)]
pub enum Backend {
    Postgres { database_url: String },
    Redis { redis_url: String },
    Memory,
}

impl Backend {
    fn name(&self) -> &'static str {
        match self {
            Backend::Postgres { .. } => "postgres",
            Backend::Redis { .. } => "redis",
            Backend::Memory => "memory",
        }
    }
}

impl fmt::Debug for Backend {
    // Connection strings can embed credentials.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Process configuration, read once at startup.
//
// `auth_secret`, `guest_pin` and `backend` stay optional: a missing value is
// reported per request by the handlers that need it, not at startup.
#[derive(Clone)]
pub struct Config {
    pub auth_secret: Option<String>,
    pub guest_pin: Option<String>,
    pub event_key: String,
    pub backend: Option<Backend>,
    pub roster_path: PathBuf,
    pub port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("auth_secret", &self.auth_secret.as_ref().map(|_| "<redacted>"))
            .field("guest_pin", &self.guest_pin.as_ref().map(|_| "<redacted>"))
            .field("event_key", &self.event_key)
            .field("backend", &self.backend)
            .field("roster_path", &self.roster_path)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset.
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let backend = match var("CHECKIN_BACKEND").map(|v| v.to_ascii_lowercase()) {
            Some(kind) => match kind.as_str() {
                "postgres" => var("DATABASE_URL").map(|database_url| Backend::Postgres { database_url }),
                "redis" => var("REDIS_URL").map(|redis_url| Backend::Redis { redis_url }),
                "memory" => Some(Backend::Memory),
                _ => return Err(ConfigError::UnknownBackend(kind)),
            },
            None => var("DATABASE_URL")
                .map(|database_url| Backend::Postgres { database_url })
                .or_else(|| var("REDIS_URL").map(|redis_url| Backend::Redis { redis_url })),
        };
        if backend.is_none() {
            warn!("no check-in store configured; store-backed endpoints will fail");
        }

        let event_key = var("EVENT_KEY").unwrap_or_else(|| {
            let default = match backend {
                Some(Backend::Postgres { .. }) | None => DEFAULT_ROW_EVENT_KEY,
                Some(Backend::Redis { .. }) | Some(Backend::Memory) => DEFAULT_HASH_EVENT_KEY,
            };
            info!("EVENT_KEY not set, using default: {default}");
            default.to_string()
        });

        let port = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            auth_secret: var("AUTH_SECRET"),
            guest_pin: var("GUEST_PIN"),
            event_key,
            backend,
            roster_path: var("GUEST_ROSTER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ROSTER_PATH)),
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn when_environment_is_empty_then_defaults_apply() {
        let config = config_from(&[]).expect("expected config");

        assert_eq!(config.auth_secret, None);
        assert_eq!(config.guest_pin, None);
        assert_eq!(config.backend, None);
        assert_eq!(config.event_key, "default");
        assert_eq!(config.roster_path, PathBuf::from("data/guests.csv"));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn when_database_url_is_set_then_postgres_backend_is_inferred() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/checkins")])
            .expect("expected config");

        assert_eq!(
            config.backend,
            Some(Backend::Postgres {
                database_url: "postgres://localhost/checkins".to_string()
            })
        );
        assert_eq!(config.event_key, "default");
    }

    #[test]
    fn when_only_redis_url_is_set_then_hash_store_defaults_apply() {
        let config =
            config_from(&[("REDIS_URL", "redis://127.0.0.1/")]).expect("expected config");

        assert!(matches!(config.backend, Some(Backend::Redis { .. })));
        assert_eq!(config.event_key, "gl:checkins");
    }

    #[test]
    fn when_backend_is_explicit_then_it_wins_over_inference() {
        let config = config_from(&[
            ("CHECKIN_BACKEND", "redis"),
            ("DATABASE_URL", "postgres://localhost/checkins"),
            ("REDIS_URL", "redis://127.0.0.1/"),
        ])
        .expect("expected config");

        assert!(matches!(config.backend, Some(Backend::Redis { .. })));
    }

    #[test]
    fn when_explicit_backend_lacks_its_url_then_no_store_is_configured() {
        let config = config_from(&[("CHECKIN_BACKEND", "postgres")]).expect("expected config");

        assert_eq!(config.backend, None);
    }

    #[test]
    fn when_backend_is_unknown_then_returns_error() {
        let result = config_from(&[("CHECKIN_BACKEND", "mongo")]);

        assert_eq!(result.unwrap_err(), ConfigError::UnknownBackend("mongo".to_string()));
    }

    #[test]
    fn when_values_are_empty_then_they_count_as_unset() {
        let config = config_from(&[("AUTH_SECRET", ""), ("EVENT_KEY", "")]).expect("expected config");

        assert_eq!(config.auth_secret, None);
        assert_eq!(config.event_key, "default");
    }

    #[test]
    fn when_event_key_is_set_then_it_overrides_the_default() {
        let config = config_from(&[("CHECKIN_BACKEND", "memory"), ("EVENT_KEY", "gala-2026")])
            .expect("expected config");

        assert_eq!(config.backend, Some(Backend::Memory));
        assert_eq!(config.event_key, "gala-2026");
    }

    #[test]
    fn when_port_is_not_numeric_then_returns_error() {
        let result = config_from(&[("PORT", "eighty")]);

        assert_eq!(result.unwrap_err(), ConfigError::InvalidPort("eighty".to_string()));
    }

    #[test]
    fn when_config_is_debug_printed_then_secrets_are_redacted() {
        let config = config_from(&[("AUTH_SECRET", "hunter2"), ("GUEST_PIN", "4321")])
            .expect("expected config");

        let printed = format!("{config:?}");

        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("4321"));
    }
}
