// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH0_DOMAIN` | Auth0 tenant domain issuing access tokens | Required |
//! | `API_AUDIENCE` | Expected JWT audience claim | Required |
//! | `JWT_ALGORITHM` | Token signing algorithm (only `RS256`) | `RS256` |
//! | `CLOCK_SKEW_SECS` | Tolerance applied to the `exp` check | `0` |
//! | `JWKS_CACHE_TTL_SECS` | Key-set cache lifetime, `0` fetches every time | `0` |
//! | `JWKS_TIMEOUT_SECS` | Timeout for the key-set request | `10` |
//! | `DATABASE_PATH` | redb file holding the drinks | `data/drinks.redb` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Environment variable name for the Auth0 tenant domain.
///
/// Issuer and JWKS location are both derived from it:
/// `https://{domain}/` and `https://{domain}/.well-known/jwks.json`.
pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";

/// Environment variable name for the expected audience.
pub const API_AUDIENCE_ENV: &str = "API_AUDIENCE";

/// Environment variable name for the signing algorithm.
pub const JWT_ALGORITHM_ENV: &str = "JWT_ALGORITHM";

/// Environment variable name for the expiry tolerance in seconds.
pub const CLOCK_SKEW_SECS_ENV: &str = "CLOCK_SKEW_SECS";

/// Environment variable name for the key-set cache TTL in seconds.
pub const JWKS_CACHE_TTL_SECS_ENV: &str = "JWKS_CACHE_TTL_SECS";

/// Environment variable name for the key-set request timeout in seconds.
pub const JWKS_TIMEOUT_SECS_ENV: &str = "JWKS_TIMEOUT_SECS";

/// Environment variable name for the drink database path.
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const SUPPORTED_ALGORITHM: &str = "RS256";
pub const DEFAULT_JWKS_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DATABASE_PATH: &str = "data/drinks.redb";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("unsupported JWT algorithm {0:?}; only RS256 is accepted")]
    UnsupportedAlgorithm(String),

    #[error("unknown log format {0:?}; expected json or pretty")]
    UnknownLogFormat(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(ConfigError::UnknownLogFormat(value.to_string())),
        }
    }
}

/// Settings for the authorization gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    pub domain: String,
    pub audience: String,
    pub clock_skew: Duration,
    /// `None` when caching is disabled.
    pub jwks_cache_ttl: Option<Duration>,
    pub jwks_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub auth: AuthSettings,
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let domain = var(AUTH0_DOMAIN_ENV).ok_or(ConfigError::Missing(AUTH0_DOMAIN_ENV))?;
        let audience = var(API_AUDIENCE_ENV).ok_or(ConfigError::Missing(API_AUDIENCE_ENV))?;

        if let Some(algorithm) = var(JWT_ALGORITHM_ENV) {
            if algorithm.trim() != SUPPORTED_ALGORITHM {
                return Err(ConfigError::UnsupportedAlgorithm(algorithm));
            }
        }

        let number = |name: &'static str, default: u64| -> Result<u64, ConfigError> {
            match var(name) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber { name, value }),
                None => Ok(default),
            }
        };

        let clock_skew = Duration::from_secs(number(CLOCK_SKEW_SECS_ENV, 0)?);
        let jwks_cache_ttl = match number(JWKS_CACHE_TTL_SECS_ENV, 0)? {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        let jwks_timeout =
            Duration::from_secs(number(JWKS_TIMEOUT_SECS_ENV, DEFAULT_JWKS_TIMEOUT_SECS)?);

        let port = match var(PORT_ENV) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                name: PORT_ENV,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let log_format = match var(LOG_FORMAT_ENV) {
            Some(value) => LogFormat::parse(&value)?,
            None => LogFormat::default(),
        };

        Ok(Self {
            auth: AuthSettings {
                domain: domain.trim().to_string(),
                audience,
                clock_skew,
                jwks_cache_ttl,
                jwks_timeout,
            },
            database_path: var(DATABASE_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            host: var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            log_format,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
