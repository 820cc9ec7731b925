//! Startup configuration read from the process environment.
//!
//! A `.env` file in the working directory is loaded first when present;
//! variables already set in the environment take precedence over it.

use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use url::Url;

use crate::client::Credentials;
use crate::domain::{ClientId, ClientSecret, ValidationError};

pub const APP_PORT: &str = "APP_PORT";
pub const APP_HOST: &str = "APP_HOST";
pub const SMS_CLIENT_ID: &str = ClientId::FIELD;
pub const SMS_CLIENT_SECRET: &str = ClientSecret::FIELD;
pub const SMS_GATEWAY_URL: &str = "SMS_GATEWAY_URL";
pub const SMS_ERROR_LOG: &str = "SMS_ERROR_LOG";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_ERROR_LOG: &str = "sms_service_app_error.log";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} environment variable is not set")]
    Missing { var: &'static str },

    #[error("APP_PORT must be a port number, got {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("SMS_GATEWAY_URL is not a valid URL ({value:?}): {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("SMS_GATEWAY_URL must use http or https, got {scheme:?}")]
    UnsupportedScheme { scheme: String },

    #[error("invalid credential: {0}")]
    Credential(#[from] ValidationError),

    #[error("failed to load .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),
}

/// Immutable service configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    host: String,
    port: u16,
    credentials: Credentials,
    gateway_url: Url,
    error_log: PathBuf,
}

impl RelayConfig {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(err.into());
            }
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Empty or whitespace-only values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let require = |var: &'static str| get(var).ok_or(ConfigError::Missing { var });

        let port_raw = require(APP_PORT)?;
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|source| ConfigError::InvalidPort {
                value: port_raw.clone(),
                source,
            })?;

        let credentials = Credentials::new(
            ClientId::new(require(SMS_CLIENT_ID)?)?,
            ClientSecret::new(require(SMS_CLIENT_SECRET)?)?,
        );

        let url_raw = require(SMS_GATEWAY_URL)?;
        let gateway_url = Url::parse(url_raw.trim()).map_err(|source| ConfigError::InvalidUrl {
            value: url_raw.clone(),
            source,
        })?;
        if !matches!(gateway_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                scheme: gateway_url.scheme().to_owned(),
            });
        }

        Ok(Self {
            host: get(APP_HOST).unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
            credentials,
            gateway_url,
            error_log: get(SMS_ERROR_LOG)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ERROR_LOG)),
        })
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn gateway_url(&self) -> &Url {
        &self.gateway_url
    }

    pub fn error_log(&self) -> &Path {
        &self.error_log
    }
}
