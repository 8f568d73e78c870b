//! Verify payload building and response classification against JSON test
//! vectors stored in `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) keeps the payload cases about
//! content; key order is checked separately in the unit tests.

use sender_core::{
    classify, Attachment, EmailParams, Header, HttpMethod, HttpRequest, HttpResponse, Recipient,
    RequestError, WirePayload,
};
use serde_json::Value;

fn opt_str(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Build `EmailParams` from a vector's `input` object.
fn params_from(input: &Value) -> EmailParams {
    let mut params = EmailParams::new();
    if let Some(from) = input["from"].as_str() {
        params = params.with_from(from);
    }
    if let Some(from_name) = input["from_name"].as_str() {
        params = params.with_from_name(from_name);
    }
    if let Some(subject) = input["subject"].as_str() {
        params = params.with_subject(subject);
    }

    let recipients: Vec<Recipient> = input["recipients"]
        .as_array()
        .map(|items| items.iter().map(|r| serde_json::from_value(r.clone()).unwrap()).collect())
        .unwrap_or_default();
    let headers: Vec<Header> = input["headers"]
        .as_array()
        .map(|items| items.iter().map(|h| serde_json::from_value(h.clone()).unwrap()).collect())
        .unwrap_or_default();
    let variables: Vec<(String, String)> = input["variables"]
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(k, v)| (k.clone(), v.as_str().unwrap().to_string()))
                .collect()
        })
        .unwrap_or_default();
    let attachments: Vec<Attachment> = input["attachments"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|a| {
                    let filename = a["filename"].as_str().unwrap();
                    match a["url"].as_str() {
                        Some(url) => Attachment::url(filename, url).unwrap(),
                        None => Attachment::base64(
                            filename,
                            a["base64"].as_str().unwrap(),
                            opt_str(&a["mime_type"]),
                        )
                        .unwrap(),
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    params
        .with_reply_to(opt_str(&input["reply_to"]))
        .with_reply_to_name(opt_str(&input["reply_to_name"]))
        .with_html(opt_str(&input["html"]))
        .with_text(opt_str(&input["text"]))
        .with_recipients(recipients)
        .with_headers(headers)
        .with_variables(variables)
        .with_attachments(attachments)
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

#[test]
fn payload_test_vectors() {
    let raw = include_str!("../../test-vectors/payload.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let params = params_from(&case["input"]);

        let json = WirePayload::from_params(&params).to_json().unwrap();
        let body: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(body, case["expected_body"], "{name}: body");

        // Re-reading the body and serializing again changes nothing.
        let reparsed: WirePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed.to_json().unwrap(), json, "{name}: idempotent");
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[test]
fn classify_test_vectors() {
    let raw = include_str!("../../test-vectors/classify.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let request = HttpRequest {
        method: match vectors["request"]["method"].as_str().unwrap() {
            "POST" => HttpMethod::Post,
            other => panic!("unknown method: {other}"),
        },
        url: vectors["request"]["url"].as_str().unwrap().to_string(),
        headers: Vec::new(),
        body: None,
    };

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            reason: None,
            headers: sim["headers"]
                .as_array()
                .unwrap()
                .iter()
                .map(|h| {
                    let pair = h.as_array().unwrap();
                    (pair[0].as_str().unwrap().to_string(), pair[1].as_str().unwrap().to_string())
                })
                .collect(),
            body: sim["body"].as_str().unwrap().to_string(),
        };

        let expected = &case["expected"];
        let result = classify(&request, response.clone());

        match expected["kind"].as_str().unwrap() {
            "Passthrough" => {
                assert_eq!(result.unwrap(), response, "{name}: passthrough");
            }
            "Validation" => {
                let Err(RequestError::Validation(err)) = result else {
                    panic!("{name}: expected Validation");
                };
                assert_eq!(err.message(), expected["message"].as_str().unwrap(), "{name}: message");
                assert_eq!(err.body(), response.body, "{name}: raw body");
                let messages: Vec<String> = serde_json::from_value(expected["error_messages"].clone()).unwrap();
                assert_eq!(err.error_messages(), messages, "{name}: error messages");
                assert_eq!(err.first_error(), opt_str(&expected["first_error"]), "{name}: first error");
            }
            "RateLimit" => {
                let Err(RequestError::RateLimit(err)) = result else {
                    panic!("{name}: expected RateLimit");
                };
                assert_eq!(err.to_string(), expected["message"].as_str().unwrap(), "{name}: message");
            }
            "Http" => {
                let Err(RequestError::Http(err)) = result else {
                    panic!("{name}: expected Http");
                };
                assert_eq!(err.to_string(), expected["message"].as_str().unwrap(), "{name}: message");
            }
            other => panic!("{name}: unknown expected kind: {other}"),
        }
    }
}
