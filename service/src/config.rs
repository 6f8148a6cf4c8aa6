//! Process configuration, read once at start-up.
//!
//! # Design
//! Credentials and the service sid are required and checked before the
//! server binds, so a misconfigured process fails at launch rather than on
//! its first request. Lookups go through a closure so tests can feed a plain
//! map instead of mutating the process environment.

use std::collections::HashMap;

use sync_core::{Credentials, DEFAULT_BASE_URL};
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid PORT value: {0}")]
    InvalidPort(String),
}

/// Connection settings for the remote sync service.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub credentials: Credentials,
    pub service_sid: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub sync: SyncConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Build a config directly, with the default base URL and listen address.
    pub fn new(account_sid: &str, auth_token: &str, service_sid: &str) -> Self {
        Self {
            sync: SyncConfig {
                credentials: Credentials::new(account_sid, auth_token),
                service_sid: service_sid.to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
            },
            server: ServerConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.sync.base_url = base_url.into();
        self
    }

    /// Read configuration from the process environment.
    ///
    /// Required: `TWILIO_SID`, `TWILIO_AUTH_TOKEN`, `TWILIO_SYNC_SID`.
    /// Optional: `TWILIO_SYNC_BASE_URL`, `HOST`, `PORT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let account_sid = required("TWILIO_SID")?;
        let auth_token = required("TWILIO_AUTH_TOKEN")?;
        let service_sid = required("TWILIO_SYNC_SID")?;
        let base_url = lookup("TWILIO_SYNC_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            sync: SyncConfig {
                credentials: Credentials::new(account_sid, auth_token),
                service_sid,
                base_url,
            },
            server: ServerConfig { host, port },
        })
    }
}
