//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! builds `HttpRequest` values and classifies `HttpResponse` values; a
//! `Transport` implementation executes the actual round-trip.
//!
//! The response body is buffered once into an owned `String`, so the error
//! classifier can capture it for diagnostics while the caller still sees the
//! full body afterwards.

use indexmap::IndexMap;

/// HTTP method for a request. Every provider call is a JSON POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Path plus query of `url`, e.g. `/v2/message/send`.
    ///
    /// Falls back to the raw `url` when it does not parse as an absolute URL.
    pub fn request_target(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(parsed) => match parsed.query() {
                Some(query) => format!("{}?{query}", parsed.path()),
                None => parsed.path().to_string(),
            },
            Err(_) => self.url.clone(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Header names keep the casing the transport reported; lookups are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: None,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Reason phrase reported by the transport, or the canonical one for the
    /// status code. Empty for unknown codes.
    pub fn reason_phrase(&self) -> String {
        if let Some(reason) = self.reason.as_deref().filter(|r| !r.is_empty()) {
            return reason.to_string();
        }
        ::http::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string()
    }

    /// All values of `name`, joined with `", "`. Empty when absent.
    pub fn header_line(&self, name: &str) -> String {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Headers grouped by name, in first-seen order.
    pub fn headers_map(&self) -> IndexMap<String, Vec<String>> {
        let mut map: IndexMap<String, Vec<String>> = IndexMap::new();
        for (name, value) in &self.headers {
            let existing = map.keys().find(|key| key.eq_ignore_ascii_case(name)).cloned();
            map.entry(existing.unwrap_or_else(|| name.clone()))
                .or_default()
                .push(value.clone());
        }
        map
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
