//! Maps a raw API response onto the error taxonomy.
//!
//! Statuses in `[200, 400)` pass through untouched. 422 and 429 get their own
//! error types; every other status becomes a generic `HttpError`.

use serde_json::Value;

use crate::error::{HttpError, RateLimitError, RequestError, ValidationError};
use crate::http::{HttpRequest, HttpResponse};

const DEFAULT_VALIDATION_MESSAGE: &str = "Validation Error";

/// Outcome kinds of `classify`, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Passthrough,
    Validation,
    RateLimit,
    Http,
}

pub fn classification(status: u16) -> Classification {
    match status {
        200..=399 => Classification::Passthrough,
        422 => Classification::Validation,
        429 => Classification::RateLimit,
        _ => Classification::Http,
    }
}

/// Pass the response through, or turn it into the matching `RequestError`.
pub fn classify(request: &HttpRequest, response: HttpResponse) -> Result<HttpResponse, RequestError> {
    match classification(response.status) {
        Classification::Passthrough => Ok(response),
        Classification::Validation => Err(validation_error(request, response).into()),
        Classification::RateLimit => Err(rate_limit_error(request, response).into()),
        Classification::Http => {
            let message = describe(request, &response);
            Err(HttpError {
                request: request.clone(),
                response,
                message,
            }
            .into())
        }
    }
}

/// `[url] {target} [http method] {method} [status code] {code} [reason phrase] {reason}`
pub fn describe(request: &HttpRequest, response: &HttpResponse) -> String {
    format!(
        "[url] {} [http method] {} [status code] {} [reason phrase] {}",
        request.request_target(),
        request.method.as_str(),
        response.status,
        response.reason_phrase()
    )
}

fn validation_error(request: &HttpRequest, response: HttpResponse) -> ValidationError {
    let payload = match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    };

    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_VALIDATION_MESSAGE)
        .to_string();

    let errors = match payload.get("errors") {
        Some(errors @ (Value::Object(_) | Value::Array(_))) => errors.clone(),
        _ => Value::Object(serde_json::Map::new()),
    };

    ValidationError {
        request: request.clone(),
        response,
        message,
        errors,
    }
}

fn rate_limit_error(request: &HttpRequest, response: HttpResponse) -> RateLimitError {
    let base = describe(request, &response);
    let retry_after = response.header_line("Retry-After");
    let message = if retry_after.is_empty() {
        base
    } else {
        format!("{base} [retry after] {retry_after}")
    };

    RateLimitError {
        request: request.clone(),
        response,
        message,
    }
}
