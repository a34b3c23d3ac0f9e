//! CLI error envelope.

use orcax_core::logging::LoggingError;
use orcax_core::{CacheError, ConfigError, RemoteError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    Logging(LoggingError),
    Config(ConfigError),
    Remote(RemoteError),
    Cache(CacheError),
    Json(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "logging: {err}"),
            Self::Config(err) => write!(f, "config: {err}"),
            Self::Remote(err) => write!(f, "remote: {err}"),
            Self::Cache(err) => write!(f, "cache: {err}"),
            Self::Json(err) => write!(f, "json: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Remote(err) => Some(err),
            Self::Cache(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RemoteError> for CliError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}

impl From<CacheError> for CliError {
    fn from(value: CacheError) -> Self {
        Self::Cache(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
