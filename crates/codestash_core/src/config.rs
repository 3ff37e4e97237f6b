//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_URL};
use crate::error::ConfigError;
use crate::sort::{SortDirection, SortField, SortSpec};
use std::env;
use std::str::FromStr;

/// Environment variable holding the backend base URL.
pub const SERVER_ENV: &str = "CSTASH_SERVER";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "CSTASH_TIMEOUT_SECS";
/// Environment variable holding the default sort field.
pub const SORT_ENV: &str = "CSTASH_SORT";
/// Environment variable holding the default sort direction.
pub const ORDER_ENV: &str = "CSTASH_ORDER";

/// Runtime configuration for Code Stash clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub sort: SortSpec,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            sort: SortSpec::default(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_value<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_blank(raw) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|err: T::Err| ConfigError::InvalidValue {
                key,
                reason: err.to_string(),
                value,
            }),
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when variables are missing or blank.
    ///
    /// # Errors
    /// [`ConfigError::InvalidValue`] when a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let timeout: u64 = parse_value(
            TIMEOUT_ENV,
            lookup(TIMEOUT_ENV),
            defaults.request_timeout_secs,
        )?;
        if timeout == 0 {
            return Err(ConfigError::InvalidValue {
                key: TIMEOUT_ENV,
                value: "0".to_string(),
                reason: "timeout must be positive".to_string(),
            });
        }
        let field: SortField = parse_value(SORT_ENV, lookup(SORT_ENV), defaults.sort.field)?;
        let direction: SortDirection =
            parse_value(ORDER_ENV, lookup(ORDER_ENV), defaults.sort.direction)?;

        Ok(Self {
            server_url: non_blank(lookup(SERVER_ENV)).unwrap_or(defaults.server_url),
            request_timeout_secs: timeout,
            sort: SortSpec::new(field, direction),
        })
    }
}
