//! Server configuration.
//!
//! Resolution chain: env var > default. Scheduling defaults are not read
//! here; they live in the store (see `GET /api/settings`).

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

pub const ADDR_VAR: &str = "PLAN_SCHEDULER_ADDR";
pub const DB_VAR: &str = "PLAN_SCHEDULER_DB";
pub const STATIC_DIR_VAR: &str = "PLAN_SCHEDULER_STATIC_DIR";

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_DB_PATH: &str = "data/db.json";
const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid socket address: {source}")]
    InvalidAddr {
        var: &'static str,
        value: String,
        #[source]
        source: AddrParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub static_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve from an arbitrary variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let addr_raw = get(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_raw
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                var: ADDR_VAR,
                value: addr_raw.clone(),
                source,
            })?;

        Ok(Self {
            addr,
            db_path: get(DB_VAR).map_or_else(|| PathBuf::from(DEFAULT_DB_PATH), PathBuf::from),
            static_dir: get(STATIC_DIR_VAR)
                .map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ServerConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = resolve(&[]).unwrap();
        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.db_path, PathBuf::from("data/db.json"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn env_overrides_defaults() {
        let config = resolve(&[
            (ADDR_VAR, "0.0.0.0:8080"),
            (DB_VAR, "/tmp/plans.json"),
            (STATIC_DIR_VAR, ""),
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.db_path, PathBuf::from("/tmp/plans.json"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn bad_addr_is_an_error() {
        let err = resolve(&[(ADDR_VAR, "localhost")]).unwrap_err();
        assert!(err.to_string().contains(ADDR_VAR));
    }
}
