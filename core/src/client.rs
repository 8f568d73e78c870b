//! Entry point that wires configuration, transport and endpoints together.

use std::sync::Arc;

use crate::config::{Config, Options};
use crate::endpoints::Email;
use crate::error::SenderError;
use crate::transport::{HttpLayer, Transport};

/// Client for the sender API.
///
/// Construction resolves the configuration, so a client never exists without
/// an API key.
pub struct SenderNet<T> {
    pub email: Email<T>,
    http: Arc<HttpLayer<T>>,
}

impl<T: Transport> SenderNet<T> {
    /// Resolve `options` against the process environment and use `transport`.
    pub fn new(options: Options, transport: T) -> Result<Self, SenderError> {
        Ok(Self::with_config(Config::from_env(options)?, transport))
    }

    pub fn with_config(config: Config, transport: T) -> Self {
        let http = Arc::new(HttpLayer::new(config, transport));
        Self {
            email: Email::new(Arc::clone(&http)),
            http,
        }
    }

    pub fn config(&self) -> &Config {
        self.http.config()
    }
}

#[cfg(feature = "ureq")]
impl SenderNet<crate::transport::UreqTransport> {
    /// Client over the blocking `ureq` transport, honoring `timeout`.
    pub fn connect(options: Options) -> Result<Self, SenderError> {
        let config = Config::from_env(options)?;
        let transport = crate::transport::UreqTransport::new(config.timeout);
        Ok(Self::with_config(config, transport))
    }
}
