//! End-to-end sends against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then sends real HTTP through
//! `UreqTransport`. Validates that request building, the wire payload and
//! response classification work together with an actual server.

use sender_core::{EmailParams, Options, Recipient, RequestError, SenderError, SenderNet, UreqTransport};
use serde_json::Value;

fn start_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client(addr: std::net::SocketAddr) -> SenderNet<UreqTransport> {
    let options = Options::new()
        .with_api_key("integration-key")
        .with_protocol("http")
        .with_host(addr.to_string())
        .with_timeout(5);
    SenderNet::connect(options).unwrap()
}

fn message(recipient: &str) -> EmailParams {
    EmailParams::new()
        .with_from("sender@example.com")
        .with_from_name("Sender")
        .with_recipients([Recipient::unchecked(recipient, Some("Recipient".to_string()))])
        .with_subject("Integration test")
        .with_text(Some("Hello from the integration test".to_string()))
}

#[test]
fn send_lifecycle() {
    // Step 1: start mock server on a random port.
    let addr = start_server();
    let client = client(addr);

    // Step 2: a valid message is accepted.
    let response = client.email.send(&message("recipient@example.com")).unwrap();
    assert_eq!(response.status_code, 200);
    let message_id = response.message_id().unwrap().to_string();
    assert_eq!(response.body.as_ref().unwrap()["message_id"], message_id.as_str());

    // Step 3: the server stored the exact wire payload.
    let mut stored = ureq::get(&format!("http://{addr}/__messages")).call().unwrap();
    let stored: Vec<Value> = serde_json::from_str(&stored.body_mut().read_to_string().unwrap()).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["id"], message_id.as_str());
    assert_eq!(
        stored[0]["payload"],
        serde_json::json!({
            "from": {"email": "sender@example.com", "name": "Sender"},
            "to": {"email": "recipient@example.com", "name": "Recipient"},
            "subject": "Integration test",
            "text": "Hello from the integration test"
        })
    );

    // Step 4: a malformed recipient is rejected remotely with field errors.
    let err = client.email.send(&message("wrong recipient")).unwrap_err();
    let SenderError::Request(RequestError::Validation(err)) = err else {
        panic!("expected remote validation error, got {err:?}");
    };
    assert_eq!(err.status_code(), 422);
    assert_eq!(err.message(), "The given data was invalid.");
    assert_eq!(
        err.first_error().as_deref(),
        Some("to.email: The to.email must be a valid email address.")
    );

    // Step 5: a rate-limited recipient yields the retry hint.
    let err = client.email.send(&message("ratelimit@example.com")).unwrap_err();
    let SenderError::Request(RequestError::RateLimit(err)) = err else {
        panic!("expected rate limit error, got {err:?}");
    };
    assert_eq!(err.retry_after().as_deref(), Some(mock_server::RETRY_AFTER_SECS));
    assert!(err.to_string().contains("[retry after] 120"));

    // Step 6: local validation fails before any request is made.
    let err = client.email.send(&message("recipient@example.com").with_text(None)).unwrap_err();
    assert!(matches!(err, SenderError::Assert(_)));
}

#[test]
fn missing_api_key_is_rejected_by_server() {
    let addr = start_server();
    let client = client(addr);

    // Rebuild the request without credentials to check the 401 path.
    let mut request = client.email.build_send(&message("recipient@example.com")).unwrap();
    request.headers.retain(|(name, _)| !name.eq_ignore_ascii_case("authorization"));

    let transport = UreqTransport::new(std::time::Duration::from_secs(5));
    let response = sender_core::Transport::execute(&transport, &request).unwrap();
    let err = sender_core::classify(&request, response).unwrap_err();
    assert!(matches!(err, RequestError::Http(_)));
    assert_eq!(err.status(), 401);
    assert!(err.to_string().ends_with("[status code] 401 [reason phrase] Unauthorized"));
}

#[test]
fn unreachable_host_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr).email.send(&message("recipient@example.com")).unwrap_err();
    assert!(matches!(err, SenderError::Transport(_)));
}
