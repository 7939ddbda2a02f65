//! Process settings read from the environment (`.env` is honored via dotenvy in main).

use crate::config::is_plain_identifier;
use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/tracker";
pub const DEFAULT_SCHEMA: &str = "tracker";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    /// PostgreSQL schema holding the tracker tables. From `TRACKER_SCHEMA`.
    pub schema: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub body_limit_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let schema = get("TRACKER_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into());
        if !is_plain_identifier(&schema) {
            return Err(ConfigError::Load(format!(
                "TRACKER_SCHEMA '{}' must be a plain lowercase identifier",
                schema
            )));
        }
        let bind_addr = parse_or("BIND_ADDR", get("BIND_ADDR"), || {
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().map_err(|e| e.to_string())
        })?;
        let max_connections = parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), || {
            Ok(DEFAULT_MAX_CONNECTIONS)
        })?;
        if max_connections == 0 {
            return Err(ConfigError::Load("DB_MAX_CONNECTIONS must be at least 1".into()));
        }
        let body_limit_bytes = parse_or("BODY_LIMIT_BYTES", get("BODY_LIMIT_BYTES"), || {
            Ok(DEFAULT_BODY_LIMIT_BYTES)
        })?;

        Ok(AppConfig {
            database_url,
            schema,
            bind_addr,
            max_connections,
            body_limit_bytes,
        })
    }
}

fn parse_or<T, D>(key: &str, raw: Option<String>, default: D) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    D: FnOnce() -> Result<T, String>,
{
    match raw {
        Some(s) => s
            .parse::<T>()
            .map_err(|e| ConfigError::Load(format!("{}: {}", key, e))),
        None => default().map_err(|e| ConfigError::Load(format!("{}: {}", key, e))),
    }
}
