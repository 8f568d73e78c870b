//! API endpoints. Each one validates its input, builds the wire payload and
//! hands the request to the shared `HttpLayer`.

pub mod email;

pub use email::Email;
