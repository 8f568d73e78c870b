//! In-memory stand-in for the sender `message/send` API.
//!
//! Applies a small subset of the provider's checks so clients can exercise
//! every response class: 401 without a bearer token, 422 with field errors,
//! 429 with `Retry-After` for `ratelimit@` recipients, 200 otherwise.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const RATE_LIMITED_PREFIX: &str = "ratelimit@";
pub const RETRY_AFTER_SECS: &str = "120";

#[derive(Clone, Debug, Serialize)]
pub struct StoredMessage {
    pub id: Uuid,
    pub payload: Value,
}

pub type Outbox = Arc<RwLock<Vec<StoredMessage>>>;

pub fn app() -> Router {
    let outbox: Outbox = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/v2/message/send", post(send_message))
        .route("/__messages", get(list_messages))
        .with_state(outbox)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_messages(State(outbox): State<Outbox>) -> Json<Vec<StoredMessage>> {
    Json(outbox.read().await.clone())
}

async fn send_message(State(outbox): State<Outbox>, headers: HeaderMap, body: String) -> Response {
    if !has_bearer_token(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthenticated."}))).into_response();
    }

    let payload: Value = match serde_json::from_str(&body) {
        Ok(value @ Value::Object(_)) => value,
        _ => return validation_failure(field_error("body", "The request body must be a JSON object.")),
    };

    let errors = validate(&payload);
    if !errors.is_empty() {
        return validation_failure(errors);
    }

    let recipient = payload["to"]["email"].as_str().unwrap_or_default();
    if recipient.starts_with(RATE_LIMITED_PREFIX) {
        tracing::info!(recipient, "rate limiting message");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, RETRY_AFTER_SECS)],
            Json(json!({"message": "Too Many Attempts."})),
        )
            .into_response();
    }

    let id = Uuid::new_v4();
    tracing::info!(%id, recipient, "accepted message");
    outbox.write().await.push(StoredMessage { id, payload });

    (
        StatusCode::OK,
        [("x-message-id", id.to_string())],
        Json(json!({"success": true, "message_id": id})),
    )
        .into_response()
}

fn has_bearer_token(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty())
}

/// Field errors for a decoded payload, keyed by wire field name.
pub fn validate(payload: &Value) -> Map<String, Value> {
    let mut errors = Map::new();

    if !is_non_empty_str(&payload["from"]["email"]) {
        errors.insert("from.email".to_string(), json!(["The from.email field is required."]));
    }
    if !is_non_empty_str(&payload["to"]["email"]) {
        errors.insert("to.email".to_string(), json!(["The to.email field is required."]));
    } else if !payload["to"]["email"].as_str().unwrap_or_default().contains('@') {
        errors.insert("to.email".to_string(), json!(["The to.email must be a valid email address."]));
    }
    if !is_non_empty_str(&payload["subject"]) {
        errors.insert("subject".to_string(), json!(["The subject field is required."]));
    }
    if payload.get("text").is_none() && payload.get("html").is_none() {
        errors.insert("text".to_string(), json!(["The text field is required when html is not present."]));
    }

    errors
}

fn is_non_empty_str(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.is_empty())
}

fn field_error(field: &str, message: &str) -> Map<String, Value> {
    let mut errors = Map::new();
    errors.insert(field.to_string(), json!([message]));
    errors
}

fn validation_failure(errors: Map<String, Value>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"message": "The given data was invalid.", "errors": errors})),
    )
        .into_response()
}
