//! Configuration loading and representation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::document_store::DEFAULT_DATA_FILE;

pub const DATA_FILE_VAR: &str = "STOCKROOM_DATA_FILE";
pub const BIND_ADDR_VAR: &str = "STOCKROOM_BIND_ADDR";
pub const MAX_SESSIONS_VAR: &str = "STOCKROOM_MAX_SESSIONS";
pub const SESSION_IDLE_SECS_VAR: &str = "STOCKROOM_SESSION_IDLE_SECS";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_SESSIONS: usize = 256;
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

/// Process configuration, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Location of the JSON document shared by all sessions.
    pub data_file: PathBuf,
    pub bind_addr: SocketAddr,
    /// Most sessions the HTTP adapter keeps in memory at once.
    pub max_sessions: usize,
    pub session_idle_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (unset or empty means default).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_file = get(DATA_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let raw_addr = get(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("{BIND_ADDR_VAR}={raw_addr:?} is not a socket address"))?;

        let max_sessions = match get(MAX_SESSIONS_VAR) {
            Some(raw) => positive(MAX_SESSIONS_VAR, &raw)?,
            None => DEFAULT_MAX_SESSIONS,
        };
        let session_idle_ttl = match get(SESSION_IDLE_SECS_VAR) {
            Some(raw) => Duration::from_secs(positive(SESSION_IDLE_SECS_VAR, &raw)? as u64),
            None => DEFAULT_SESSION_IDLE,
        };

        Ok(Self {
            data_file,
            bind_addr,
            max_sessions,
            session_idle_ttl,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            max_sessions: DEFAULT_MAX_SESSIONS,
            session_idle_ttl: DEFAULT_SESSION_IDLE,
        }
    }
}

fn positive(var: &str, raw: &str) -> anyhow::Result<usize> {
    let value = raw
        .trim()
        .parse::<usize>()
        .with_context(|| format!("{var}={raw:?} is not a whole number"))?;
    anyhow::ensure!(value > 0, "{var} must be greater than zero");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.data_file, PathBuf::from("depo_data.json"));
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            (DATA_FILE_VAR, "/tmp/stock.json"),
            (BIND_ADDR_VAR, "127.0.0.1:9000"),
        ]))
        .unwrap();
        assert_eq!(cfg.data_file, PathBuf::from("/tmp/stock.json"));
        assert_eq!(cfg.bind_addr.port(), 9000);
    }

    #[test]
    fn blank_values_mean_default() {
        let cfg = AppConfig::from_lookup(lookup(&[(DATA_FILE_VAR, "  ")])).unwrap();
        assert_eq!(cfg.data_file, PathBuf::from(DEFAULT_DATA_FILE));
    }

    #[test]
    fn reads_session_limits() {
        let cfg = AppConfig::from_lookup(lookup(&[
            (MAX_SESSIONS_VAR, "16"),
            (SESSION_IDLE_SECS_VAR, "90"),
        ]))
        .unwrap();
        assert_eq!(cfg.max_sessions, 16);
        assert_eq!(cfg.session_idle_ttl, Duration::from_secs(90));
    }

    #[test]
    fn zero_session_limit_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[(MAX_SESSIONS_VAR, "0")])).unwrap_err();
        assert!(err.to_string().contains(MAX_SESSIONS_VAR));
        assert!(AppConfig::from_lookup(lookup(&[(SESSION_IDLE_SECS_VAR, "soon")])).is_err());
    }

    #[test]
    fn bad_bind_addr_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[(BIND_ADDR_VAR, "not-an-addr")])).unwrap_err();
        assert!(err.to_string().contains(BIND_ADDR_VAR));
    }
}
