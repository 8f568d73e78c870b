//! Request execution and response interception.
//!
//! # Design
//! `Transport` is the only seam that touches the network: it turns an
//! `HttpRequest` into an `HttpResponse` and nothing else. `HttpLayer` wraps a
//! transport with the resolved `Config`. It adds authentication and JSON
//! headers, runs every response through `classify` before the caller sees
//! it, and normalizes passthrough responses into an `ApiResponse`.
//!
//! Retries, pooling and backoff are left to the transport or to the caller.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::classify::classify;
use crate::config::Config;
use crate::error::{RequestError, SenderError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

const USER_AGENT: &str = concat!("sender-core/", env!("CARGO_PKG_VERSION"));

/// Executes one HTTP round-trip.
///
/// Implementations must return error statuses as data rather than `Err`, and
/// must buffer the whole response body.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// A passthrough response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: IndexMap<String, Vec<String>>,
    /// Decoded JSON body; `None` when empty or not JSON.
    pub body: Option<Value>,
    pub response: HttpResponse,
}

impl ApiResponse {
    fn from_response(response: HttpResponse) -> Self {
        let body = serde_json::from_str(&response.body).ok();
        Self {
            status_code: response.status,
            headers: response.headers_map(),
            body,
            response,
        }
    }

    pub fn message_id(&self) -> Option<&str> {
        self.response
            .headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("X-Message-Id"))
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }
}

pub struct HttpLayer<T> {
    config: Config,
    transport: T,
}

impl<T: Transport> HttpLayer<T> {
    pub fn new(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build an authenticated JSON `POST` without sending it.
    pub fn build_post<P: Serialize>(&self, uri: &str, payload: &P) -> Result<HttpRequest, SenderError> {
        let body = serde_json::to_string(payload).map_err(|e| SenderError::Serialization(e.to_string()))?;
        if self.config.debug {
            debug!(uri, body = %body, "request payload");
        }
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: uri.to_string(),
            headers: self.default_headers(),
            body: Some(body),
        })
    }

    pub fn post<P: Serialize>(&self, uri: &str, payload: &P) -> Result<ApiResponse, SenderError> {
        let request = self.build_post(uri, payload)?;
        self.execute(request)
    }

    /// Send `request` and classify the response.
    pub fn execute(&self, request: HttpRequest) -> Result<ApiResponse, SenderError> {
        let response = self.transport.execute(&request)?;
        debug!(
            method = request.method.as_str(),
            url = %request.url,
            status = response.status,
            "api round-trip"
        );

        let response = classify(&request, response).inspect_err(|err| {
            warn!(status = err.status(), kind = error_kind(err), "api request failed");
        })?;
        Ok(ApiResponse::from_response(response))
    }

    fn default_headers(&self) -> Vec<(String, String)> {
        vec![
            ("Authorization".to_string(), format!("Bearer {}", self.config.api_key())),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
        ]
    }
}

fn error_kind(err: &RequestError) -> &'static str {
    match err {
        RequestError::Http(_) => "http",
        RequestError::Validation(_) => "validation",
        RequestError::RateLimit(_) => "rate_limit",
    }
}

/// Blocking transport backed by `ureq`.
#[cfg(feature = "ureq")]
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

#[cfg(feature = "ureq")]
impl UreqTransport {
    /// Error statuses come back as data; `timeout` bounds the whole call.
    pub fn new(timeout: std::time::Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }

    fn with_headers<B>(
        mut builder: ureq::RequestBuilder<B>,
        headers: &[(String, String)],
    ) -> ureq::RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }
}

#[cfg(feature = "ureq")]
impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let body = request.body.as_deref().unwrap_or_default().as_bytes();
        let result = match request.method {
            HttpMethod::Post => Self::with_headers(self.agent.post(url), &request.headers).send(body),
        };
        let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::new(e.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use std::sync::Mutex;

    struct Canned {
        response: HttpResponse,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Transport for Canned {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.response.clone())
        }
    }

    struct Unreachable;

    impl Transport for Unreachable {
        fn execute(&self, _: &HttpRequest) -> Result<HttpResponse, TransportError> {
            Err(TransportError::new("connection refused"))
        }
    }

    fn config() -> Config {
        Config::resolve(Options::new().with_api_key("key-123"), |_| None).unwrap()
    }

    fn layer(response: HttpResponse) -> HttpLayer<Canned> {
        HttpLayer::new(
            config(),
            Canned {
                response,
                seen: Mutex::new(Vec::new()),
            },
        )
    }

    #[test]
    fn build_post_sets_headers_and_body() {
        let layer = layer(HttpResponse::new(200, ""));
        let req = layer
            .build_post("https://api.sender.net/v2/message/send", &serde_json::json!({"a": 1}))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("authorization"), Some("Bearer key-123"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("accept"), Some("application/json"));
        assert!(req.header("user-agent").unwrap().starts_with("sender-core/"));
        assert_eq!(req.body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn post_normalizes_success() {
        let layer = layer(
            HttpResponse::new(202, r#"{"success":true}"#).with_header("X-Message-Id", "abc"),
        );
        let response = layer.post("https://api.sender.net/v2/message/send", &()).unwrap();
        assert_eq!(response.status_code, 202);
        assert_eq!(response.body, Some(serde_json::json!({"success": true})));
        assert_eq!(response.message_id(), Some("abc"));
        assert_eq!(response.headers["X-Message-Id"], vec!["abc".to_string()]);
        assert_eq!(layer.transport().seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn post_keeps_non_json_body_raw() {
        let layer = layer(HttpResponse::new(200, "accepted"));
        let response = layer.post("https://api.sender.net/v2/x", &()).unwrap();
        assert!(response.body.is_none());
        assert_eq!(response.response.body, "accepted");
        assert!(response.message_id().is_none());
    }

    #[test]
    fn post_surfaces_classified_errors() {
        let layer = layer(HttpResponse::new(503, ""));
        let err = layer.post("https://api.sender.net/v2/message/send", &()).unwrap_err();
        let SenderError::Request(err) = err else {
            panic!("expected request error, got {err:?}");
        };
        assert_eq!(err.status(), 503);
        assert_eq!(err.request().url, "https://api.sender.net/v2/message/send");
    }

    #[test]
    fn transport_failures_are_not_classified() {
        let layer = HttpLayer::new(config(), Unreachable);
        let err = layer.post("https://api.sender.net/v2/message/send", &()).unwrap_err();
        assert!(matches!(err, SenderError::Transport(_)));
        assert_eq!(err.to_string(), "transport failure: connection refused");
    }
}
