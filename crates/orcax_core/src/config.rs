//! Runtime configuration.
//!
//! # Responsibility
//! - Provide defaults for the remote endpoint, cache location, debounce
//!   window, and annual budget.
//! - Validate values supplied by the caller (flags or environment).
//!
//! # Invariants
//! - A blank remote URL disables the remote tier.
//! - Invalid values are errors, never silently ignored.

use crate::repo::snapshot_cache::SNAPSHOT_CACHE_KEY;
use crate::seed::DEFAULT_ANNUAL_BUDGET;
use crate::sync::debounce::DEFAULT_SAVE_DEBOUNCE;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REMOTE_URL: &str = "http://localhost:3000/api/data";
pub const DEFAULT_CACHE_DB_FILE_NAME: &str = "orcax_cache.sqlite3";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid `{key}` value `{value}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// `None` runs without a remote tier.
    pub remote_url: Option<String>,
    pub cache_db_path: PathBuf,
    pub cache_key: String,
    pub debounce: Duration,
    pub annual_budget: f64,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote_url: Some(DEFAULT_REMOTE_URL.to_string()),
            cache_db_path: PathBuf::from(DEFAULT_CACHE_DB_FILE_NAME),
            cache_key: SNAPSHOT_CACHE_KEY.to_string(),
            debounce: DEFAULT_SAVE_DEBOUNCE,
            annual_budget: DEFAULT_ANNUAL_BUDGET,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl AppConfig {
    /// Sets the remote endpoint; a blank value disables the remote tier.
    pub fn with_remote_url(mut self, url: Option<&str>) -> Self {
        self.remote_url = url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);
        self
    }

    /// Checks values that arrive from user input.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_db_path.as_os_str().is_empty() {
            return Err(invalid("cache_db_path", "", "path must not be empty"));
        }
        if !self.annual_budget.is_finite() || self.annual_budget < 0.0 {
            return Err(invalid(
                "annual_budget",
                &self.annual_budget.to_string(),
                "budget must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

fn invalid(key: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason,
    }
}
