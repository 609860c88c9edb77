use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DATA_DIR_VAR: &str = "SHIFT_ROSTER_DATA_DIR";
pub const READ_FAILURE_VAR: &str = "SHIFT_ROSTER_READ_FAILURE";
pub const HTTP_ADDR_VAR: &str = "SHIFT_ROSTER_HTTP_ADDR";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}: expected 'lenient' or 'strict'")]
    ReadFailurePolicy { var: &'static str, value: String },
    #[error("invalid socket address '{value}' for {var}: {source}")]
    Addr {
        var: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// What a collection load does when the file cannot be read or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadFailurePolicy {
    /// Log the failure and behave as if the collection were empty.
    #[default]
    Lenient,
    /// Return the failure to the caller.
    Strict,
}

impl FromStr for ReadFailurePolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub read_failure: ReadFailurePolicy,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            read_failure: ReadFailurePolicy::default(),
        }
    }

    pub fn with_read_failure(mut self, policy: ReadFailurePolicy) -> Self {
        self.read_failure = policy;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        let read_failure = match lookup(READ_FAILURE_VAR) {
            Some(value) => ReadFailurePolicy::from_str(&value).map_err(|_| {
                ConfigError::ReadFailurePolicy {
                    var: READ_FAILURE_VAR,
                    value,
                }
            })?,
            None => ReadFailurePolicy::default(),
        };
        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            read_failure,
        })
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    pub addr: SocketAddr,
}

impl HttpConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = lookup(HTTP_ADDR_VAR).unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let addr = value.parse::<SocketAddr>().map_err(|source| ConfigError::Addr {
            var: HTTP_ADDR_VAR,
            value: value.clone(),
            source,
        })?;
        Ok(Self { addr })
    }
}
