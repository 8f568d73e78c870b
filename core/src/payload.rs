//! Wire payload for `message/send`.
//!
//! # Design
//! The payload is a typed struct whose field order is the wire key order.
//! Absent values are `None` or empty collections and are skipped when
//! serializing, so a key whose value would be null or empty never appears.
//! `false`, `0` and `""` are real values and are kept.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::params::{EmailParams, Header, Recipient};

/// Sender or reply-to address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Contact {
    /// `None` when there is no address, whatever the name.
    fn from_parts(email: Option<&str>, name: Option<&str>) -> Option<Self> {
        email.map(|email| Contact {
            email: email.to_string(),
            name: name.map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Recipient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<Header>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attachments: IndexMap<String, String>,
}

impl WirePayload {
    /// Map parameters onto the wire shape. Does not validate.
    ///
    /// Only the first recipient is sent: the API's `to` is a single object.
    pub fn from_params(params: &EmailParams) -> Self {
        WirePayload {
            from: Contact::from_parts(params.from(), params.from_name()),
            reply_to: Contact::from_parts(params.reply_to(), params.reply_to_name()),
            to: params.recipients().first().cloned(),
            subject: params.subject().map(str::to_string),
            text: params.text().map(str::to_string),
            html: params.html().map(str::to_string),
            headers: params.headers().to_vec(),
            variables: params.variables().clone(),
            attachments: attachments_map(params.attachments()),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// filename -> wire value; a repeated filename keeps the last value.
fn attachments_map(attachments: &[Attachment]) -> IndexMap<String, String> {
    let mut map = IndexMap::new();
    for attachment in attachments {
        map.insert(attachment.filename().to_string(), attachment.value());
    }
    map
}
