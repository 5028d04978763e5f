// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `MARKETPLACE_API_URL` | Base URL of the marketplace API | `http://localhost:8000/api/` |
//! | `SESSION_DB_PATH` | redb file holding the durable session | `./data/session.redb` |
//! | `HTTP_TIMEOUT_SECS` | Per-request HTTP timeout | `10` |
//! | `BOOTSTRAP_TIMEOUT_SECS` | Deadline for startup session validation | `15` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::logging::LogFormat;
use crate::routing::RoutePaths;

/// Environment variable name for the API base URL.
pub const API_URL_ENV: &str = "MARKETPLACE_API_URL";

/// Default API base URL (local development backend).
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/";

/// Environment variable name for the session database path.
pub const SESSION_DB_PATH_ENV: &str = "SESSION_DB_PATH";

pub const DEFAULT_SESSION_DB_PATH: &str = "./data/session.redb";

/// Environment variable name for the per-request timeout, in seconds.
pub const HTTP_TIMEOUT_ENV: &str = "HTTP_TIMEOUT_SECS";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Environment variable name for the bootstrap deadline, in seconds.
///
/// Bounds startup validation so a hung server cannot block navigation.
pub const BOOTSTRAP_TIMEOUT_ENV: &str = "BOOTSTRAP_TIMEOUT_SECS";

pub const DEFAULT_BOOTSTRAP_TIMEOUT_SECS: u64 = 15;

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: String, reason: String },

    #[error("{name} must be a positive number of seconds, got {value:?}")]
    InvalidDuration { name: String, value: String },

    #[error("{name} must be `json` or `pretty`, got {value:?}")]
    InvalidLogFormat { name: String, value: String },
}

/// Settings for the session client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub session_db_path: PathBuf,
    pub http_timeout: Duration,
    pub bootstrap_timeout: Duration,
    pub log_format: LogFormat,
    pub paths: RoutePaths,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns the raw value of
    /// a variable if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let raw_url = optional(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&raw_url).map_err(|e| ConfigError::InvalidUrl {
            name: API_URL_ENV.to_string(),
            reason: e.to_string(),
        })?;

        let session_db_path = PathBuf::from(
            optional(SESSION_DB_PATH_ENV).unwrap_or_else(|| DEFAULT_SESSION_DB_PATH.to_string()),
        );

        let http_timeout = seconds(
            HTTP_TIMEOUT_ENV,
            optional(HTTP_TIMEOUT_ENV),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;
        let bootstrap_timeout = seconds(
            BOOTSTRAP_TIMEOUT_ENV,
            optional(BOOTSTRAP_TIMEOUT_ENV),
            DEFAULT_BOOTSTRAP_TIMEOUT_SECS,
        )?;

        let log_format = match optional(LOG_FORMAT_ENV) {
            None => LogFormat::default(),
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidLogFormat {
                    name: LOG_FORMAT_ENV.to_string(),
                    value,
                })?,
        };

        Ok(Self {
            api_url,
            session_db_path,
            http_timeout,
            bootstrap_timeout,
            log_format,
            paths: RoutePaths::default(),
        })
    }

    pub fn with_paths(mut self, paths: RoutePaths) -> Self {
        self.paths = paths;
        self
    }
}

fn seconds(name: &str, raw: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    let Some(value) = raw else {
        return Ok(Duration::from_secs(default));
    };
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidDuration {
            name: name.to_string(),
            value,
        }),
    }
}
