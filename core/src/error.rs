//! Error types for the sender client.
//!
//! # Design
//! Local failures (configuration, argument checks, validator rules) carry a
//! message only. Remote failures are grouped under `RequestError`, and every
//! variant keeps the originating request and the buffered response so callers
//! can inspect both. Transport failures never reached the classifier and are
//! kept apart from `RequestError`.

use indexmap::IndexMap;
use serde_json::Value;

use crate::http::{HttpRequest, HttpResponse};

/// Top-level error returned by the client.
#[derive(Debug, thiserror::Error)]
pub enum SenderError {
    /// No usable configuration, e.g. no API key could be resolved.
    #[error("{0}")]
    Config(String),

    /// A validator rule or a recipient/header check failed before any I/O.
    #[error(transparent)]
    Assert(#[from] AssertError),

    /// An attachment was constructed from invalid input.
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    /// The API answered with a non-passthrough status.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The transport produced no response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// A local assertion failed. Always fixable by correcting the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AssertError {
    pub message: String,
}

impl AssertError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct InvalidArgument {
    pub message: String,
}

impl InvalidArgument {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The transport failed before a response was available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An error response from the API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RequestError {
    /// Any error status other than 422 and 429.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// 422 with the provider's field errors.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 429.
    #[error(transparent)]
    RateLimit(#[from] RateLimitError),
}

impl RequestError {
    pub fn request(&self) -> &HttpRequest {
        match self {
            RequestError::Http(e) => &e.request,
            RequestError::Validation(e) => &e.request,
            RequestError::RateLimit(e) => &e.request,
        }
    }

    pub fn response(&self) -> &HttpResponse {
        match self {
            RequestError::Http(e) => &e.response,
            RequestError::Validation(e) => &e.response,
            RequestError::RateLimit(e) => &e.response,
        }
    }

    pub fn status(&self) -> u16 {
        self.response().status
    }
}

/// Generic error status. The message is the request descriptor.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct HttpError {
    pub(crate) request: HttpRequest,
    pub(crate) response: HttpResponse,
    pub(crate) message: String,
}

impl HttpError {
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn response(&self) -> &HttpResponse {
        &self.response
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// 422 response. `errors` holds the raw `errors` member of the body, or an
/// empty object when the body is not JSON or has none.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub(crate) request: HttpRequest,
    pub(crate) response: HttpResponse,
    pub(crate) message: String,
    pub(crate) errors: Value,
}

impl ValidationError {
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn response(&self) -> &HttpResponse {
        &self.response
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> u16 {
        self.response.status
    }

    /// The raw response body, unchanged.
    pub fn body(&self) -> &str {
        &self.response.body
    }

    pub fn headers(&self) -> IndexMap<String, Vec<String>> {
        self.response.headers_map()
    }

    pub fn errors(&self) -> &Value {
        &self.errors
    }

    /// Flattened `"field: message"` strings, in body order.
    ///
    /// Entries that are not non-empty strings are skipped. Errors without a
    /// field name (array-shaped `errors`, or an empty key) yield the bare
    /// message.
    pub fn error_messages(&self) -> Vec<String> {
        let entries: Vec<(Option<&str>, &Value)> = match &self.errors {
            Value::Object(map) => map.iter().map(|(k, v)| (Some(k.as_str()), v)).collect(),
            Value::Array(items) => items.iter().map(|v| (None, v)).collect(),
            _ => Vec::new(),
        };

        let mut messages = Vec::new();
        for (field, entry) in entries {
            match entry {
                Value::Array(items) => {
                    for item in items {
                        if let Some(text) = item.as_str().filter(|s| !s.is_empty()) {
                            messages.push(format_error_message(field, text));
                        }
                    }
                }
                Value::String(text) if !text.is_empty() => {
                    messages.push(format_error_message(field, text));
                }
                _ => {}
            }
        }
        messages
    }

    pub fn first_error(&self) -> Option<String> {
        self.error_messages().into_iter().next()
    }
}

fn format_error_message(field: Option<&str>, message: &str) -> String {
    match field.filter(|f| !f.is_empty()) {
        Some(field) => format!("{field}: {message}"),
        None => message.to_string(),
    }
}

/// 429 response. The message carries the `Retry-After` hint when present.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct RateLimitError {
    pub(crate) request: HttpRequest,
    pub(crate) response: HttpResponse,
    pub(crate) message: String,
}

impl RateLimitError {
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn response(&self) -> &HttpResponse {
        &self.response
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn headers(&self) -> IndexMap<String, Vec<String>> {
        self.response.headers_map()
    }

    /// Raw `Retry-After` value (seconds or HTTP-date), if any.
    pub fn retry_after(&self) -> Option<String> {
        let line = self.response.header_line("Retry-After");
        (!line.is_empty()).then_some(line)
    }
}
