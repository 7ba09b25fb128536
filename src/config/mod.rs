//! Runtime configuration, read once at startup

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

use crate::auth::{password::DEFAULT_COST, DEFAULT_TOKEN_TTL_SECS};

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("{0} must be set")]
    Missing(&'static str),
}

#[derive(Clone)]
pub struct AppConfig {
    /// HS256 signing key. Empty when unset; the issuer reports it per request.
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub store_timeout: Duration,
    pub bcrypt_cost: u32,
    pub bind_addr: SocketAddr,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("db_max_connections", &self.db_max_connections)
            .field("store_timeout", &self.store_timeout)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ttl_secs: i64 = parse_or(&var, "TOKEN_TTL_SECONDS", DEFAULT_TOKEN_TTL_SECS)?;
        if ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                var: "TOKEN_TTL_SECONDS",
                value: ttl_secs.to_string(),
            });
        }

        let bcrypt_cost: u32 = parse_or(&var, "BCRYPT_COST", DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                var: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let host: IpAddr = parse_or(&var, "HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port: u16 = parse_or(&var, "PORT", DEFAULT_PORT)?;
        let store_timeout_ms: u64 = parse_or(&var, "STORE_TIMEOUT_MS", DEFAULT_STORE_TIMEOUT_MS)?;
        if store_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "STORE_TIMEOUT_MS",
                value: store_timeout_ms.to_string(),
            });
        }

        let db_max_connections: u32 =
            parse_or(&var, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        if db_max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS",
                value: db_max_connections.to_string(),
            });
        }

        Ok(Self {
            jwt_secret: var("JWT_SECRET").unwrap_or_default(),
            token_ttl: chrono::Duration::seconds(ttl_secs),
            database_url: var("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            db_max_connections,
            store_timeout: Duration::from_millis(store_timeout_ms),
            bcrypt_cost,
            bind_addr: SocketAddr::new(host, port),
        })
    }

    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }
}

fn parse_or<F, T>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match var(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var: key,
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.token_ttl, chrono::Duration::hours(2));
        assert_eq!(config.store_timeout, Duration::from_secs(5));
        assert_eq!(config.bcrypt_cost, DEFAULT_COST);
        assert_eq!(config.bind_addr, "127.0.0.1:3001".parse().unwrap());
        assert!(config.jwt_secret.is_empty());
        assert!(config.database_url.is_none());
        assert_eq!(
            config.require_database_url(),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("JWT_SECRET", "k"),
            ("TOKEN_TTL_SECONDS", "900"),
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("STORE_TIMEOUT_MS", "250"),
            ("DATABASE_URL", "postgres://localhost/auth"),
        ])
        .unwrap();

        assert_eq!(config.jwt_secret, "k");
        assert_eq!(config.token_ttl, chrono::Duration::minutes(15));
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.store_timeout, Duration::from_millis(250));
        assert_eq!(config.require_database_url().unwrap(), "postgres://localhost/auth");
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        assert_eq!(
            config(&[("PORT", "eighty")]).unwrap_err(),
            ConfigError::Invalid {
                var: "PORT",
                value: "eighty".to_string()
            }
        );
        assert!(config(&[("TOKEN_TTL_SECONDS", "0")]).is_err());
        assert!(config(&[("TOKEN_TTL_SECONDS", "-5")]).is_err());
        assert!(config(&[("BCRYPT_COST", "2")]).is_err());
    }

    #[test]
    fn test_zero_timeout_and_empty_pool_are_rejected() {
        assert_eq!(
            config(&[("STORE_TIMEOUT_MS", "0")]).unwrap_err(),
            ConfigError::Invalid {
                var: "STORE_TIMEOUT_MS",
                value: "0".to_string()
            }
        );
        assert_eq!(
            config(&[("DB_MAX_CONNECTIONS", "0")]).unwrap_err(),
            ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS",
                value: "0".to_string()
            }
        );
        assert_eq!(config(&[("DB_MAX_CONNECTIONS", "1")]).unwrap().db_max_connections, 1);
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = config(&[("JWT_SECRET", "super-secret-value")]).unwrap();
        assert!(!format!("{:?}", config).contains("super-secret-value"));
    }
}
