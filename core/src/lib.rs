//! Client core for the sender transactional-email API.
//!
//! # Overview
//! Turns caller-supplied message parameters into a validated `message/send`
//! request and turns the API's response into either an `ApiResponse` or a
//! typed error. Each `send` runs one validate, serialize, send and classify
//! cycle; there are no retries and no shared state between calls.
//!
//! # Design
//! - Validation, payload building, URI building and response classification
//!   are pure functions over plain data.
//! - The network sits behind the `Transport` trait (host-does-IO), so the
//!   whole pipeline is testable with an in-memory transport. A `ureq`
//!   implementation ships behind the default `ureq` feature.
//! - `HttpLayer` is the interception point: every response is classified
//!   before it reaches an endpoint.

pub mod attachment;
pub mod classify;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod params;
pub mod payload;
pub mod transport;
pub mod uri;
pub mod validate;

pub use attachment::Attachment;
pub use classify::{classify, describe, Classification};
pub use client::SenderNet;
pub use config::{Config, Options};
pub use endpoints::Email;
pub use error::{
    AssertError, HttpError, InvalidArgument, RateLimitError, RequestError, SenderError, TransportError,
    ValidationError,
};
pub use crate::http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{EmailParams, Header, Recipient, SmsParams};
pub use payload::{Contact, WirePayload};
pub use transport::{ApiResponse, HttpLayer, Transport};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use uri::{build_uri, UriOptions};
pub use validate::{validate_email_params, validate_sms_params};
