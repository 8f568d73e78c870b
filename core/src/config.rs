//! SDK options and their resolution into a usable configuration.
//!
//! # Design
//! `Options` is what the caller supplies; every field is optional and falls
//! back to the production defaults. `Config::resolve` runs once, before any
//! endpoint exists, and is the only place where the API key is looked up in
//! the environment. The lookup is injected so tests never touch process state.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::SenderError;
use crate::uri::UriOptions;

pub const API_KEY_ENV: &str = "SENDER_API_KEY";

const DEFAULT_HOST: &str = "api.sender.net";
const DEFAULT_PROTOCOL: &str = "https";
const DEFAULT_API_PATH: &str = "v2";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Caller-supplied options. Unknown keys are ignored when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    pub host: Option<String>,
    pub protocol: Option<String>,
    pub api_path: Option<String>,
    pub api_key: Option<String>,
    /// Seconds.
    pub timeout: Option<u64>,
    pub debug: Option<bool>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = Some(api_path.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }
}

/// Resolved configuration. Always holds a non-empty API key.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub protocol: String,
    pub api_path: String,
    api_key: String,
    pub timeout: Duration,
    pub debug: bool,
}

impl Config {
    /// Apply defaults and resolve the API key.
    ///
    /// An explicit non-empty `api_key` wins; otherwise `lookup(SENDER_API_KEY)`
    /// is consulted. Fails with `SenderError::Config` when neither yields a key.
    pub fn resolve<F>(options: Options, lookup: F) -> Result<Self, SenderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = options
            .api_key
            .filter(|key| !key.is_empty())
            .or_else(|| lookup(API_KEY_ENV).filter(|key| !key.is_empty()))
            .ok_or_else(|| SenderError::Config("Please set \"api_key\" in SDK options.".to_string()))?;

        Ok(Self {
            host: options.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            protocol: options.protocol.unwrap_or_else(|| DEFAULT_PROTOCOL.to_string()),
            api_path: options.api_path.unwrap_or_else(|| DEFAULT_API_PATH.to_string()),
            api_key,
            timeout: Duration::from_secs(options.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            debug: options.debug.unwrap_or(false),
        })
    }

    /// `resolve` against the process environment.
    pub fn from_env(options: Options) -> Result<Self, SenderError> {
        Self::resolve(options, |name| std::env::var(name).ok())
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn uri_options(&self) -> UriOptions {
        UriOptions {
            protocol: self.protocol.clone(),
            host: self.host.clone(),
            api_path: Some(self.api_path.clone()),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("protocol", &self.protocol)
            .field("api_path", &self.api_path)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("debug", &self.debug)
            .finish()
    }
}
