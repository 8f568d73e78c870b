//! The `message/send` endpoint.
//!
//! # Design
//! `build_send` is pure: it validates the params, builds the wire payload and
//! URI, and returns the `HttpRequest` without touching the network. `send`
//! hands that request to the shared `HttpLayer`, so local validation always
//! runs before the transport is reached.

use std::sync::Arc;

use crate::error::SenderError;
use crate::http::HttpRequest;
use crate::params::EmailParams;
use crate::payload::WirePayload;
use crate::transport::{ApiResponse, HttpLayer, Transport};
use crate::uri::{build_uri, UriOptions};
use crate::validate::validate_email_params;

const ENDPOINT: &str = "message/send";
const NO_QUERY: &[(&str, &str)] = &[];

/// The `message/send` endpoint.
pub struct Email<T> {
    http: Arc<HttpLayer<T>>,
    uri_options: UriOptions,
}

impl<T: Transport> Email<T> {
    pub fn new(http: Arc<HttpLayer<T>>) -> Self {
        let uri_options = http.config().uri_options();
        Self { http, uri_options }
    }

    /// Validate `params` and build the request without sending it.
    pub fn build_send(&self, params: &EmailParams) -> Result<HttpRequest, SenderError> {
        validate_email_params(params)?;
        let payload = WirePayload::from_params(params);
        let uri = build_uri(&self.uri_options, ENDPOINT, NO_QUERY);
        self.http.build_post(&uri, &payload)
    }

    /// Validate, send and classify a single message.
    ///
    /// A validation failure returns before the transport is called. Error
    /// statuses surface as `SenderError::Request`.
    pub fn send(&self, params: &EmailParams) -> Result<ApiResponse, SenderError> {
        let request = self.build_send(params)?;
        self.http.execute(request)
    }
}
