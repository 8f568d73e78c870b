//! Message parameters supplied by the caller.
//!
//! # Design
//! `EmailParams` is a plain builder: setters never reject input, so a
//! half-filled value can be passed around and completed later. The business
//! rules are enforced by `validate::validate_email_params` right before
//! sending. `Recipient` and `Header` are the exception: they check their own
//! fields at construction, unless built through `unchecked`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::error::AssertError;
use crate::validate::is_valid_email;

/// A message recipient, serialized as `{"email": .., "name": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Recipient {
    pub fn new(email: impl Into<String>, name: Option<String>) -> Result<Self, AssertError> {
        let email = email.into();
        if !is_valid_email(&email) {
            return Err(AssertError::new(format!(
                "Value \"{email}\" was expected to be a valid e-mail address."
            )));
        }
        Ok(Self { email, name })
    }

    /// A raw record that skips address validation; the API has the final say.
    pub fn unchecked(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            email: email.into(),
            name,
        }
    }
}

/// A custom message header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Result<Self, AssertError> {
        let name = name.into();
        let value = value.into();
        if name.is_empty() {
            return Err(AssertError::new("Header name cannot be empty"));
        }
        if value.is_empty() {
            return Err(AssertError::new("Header value cannot be empty"));
        }
        Ok(Self { name, value })
    }

    pub fn unchecked(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Parameters of a single email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailParams {
    from: Option<String>,
    from_name: Option<String>,
    reply_to: Option<String>,
    reply_to_name: Option<String>,
    recipients: Vec<Recipient>,
    subject: Option<String>,
    html: Option<String>,
    text: Option<String>,
    headers: Vec<Header>,
    variables: IndexMap<String, String>,
    attachments: Vec<Attachment>,
}

impl EmailParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_from_name(mut self, from_name: impl Into<String>) -> Self {
        self.from_name = Some(from_name.into());
        self
    }

    pub fn with_reply_to(mut self, reply_to: Option<String>) -> Self {
        self.reply_to = reply_to;
        self
    }

    pub fn with_reply_to_name(mut self, reply_to_name: Option<String>) -> Self {
        self.reply_to_name = reply_to_name;
        self
    }

    pub fn with_recipients(mut self, recipients: impl IntoIterator<Item = Recipient>) -> Self {
        self.recipients = recipients.into_iter().collect();
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_html(mut self, html: Option<String>) -> Self {
        self.html = html;
        self
    }

    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.text = text;
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = Header>) -> Self {
        self.headers = headers.into_iter().collect();
        self
    }

    /// Template variables. Later duplicates of a key replace earlier ones.
    pub fn with_variables<K, V>(mut self, variables: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.variables = variables
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = Attachment>) -> Self {
        self.attachments = attachments.into_iter().collect();
        self
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn from_name(&self) -> Option<&str> {
        self.from_name.as_deref()
    }

    pub fn reply_to(&self) -> Option<&str> {
        self.reply_to.as_deref()
    }

    pub fn reply_to_name(&self) -> Option<&str> {
        self.reply_to_name.as_deref()
    }

    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn variables(&self) -> &IndexMap<String, String> {
        &self.variables
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn has_url_attachments(&self) -> bool {
        self.attachments.iter().any(Attachment::is_url)
    }

    pub fn has_base64_attachments(&self) -> bool {
        self.attachments.iter().any(Attachment::is_base64)
    }
}

/// Parameters of a phone-number-addressed message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmsParams {
    from: Option<String>,
    to: Vec<String>,
    text: Option<String>,
}

impl SmsParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_to<S: Into<String>>(mut self, to: impl IntoIterator<Item = S>) -> Self {
        self.to = to.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to(&self) -> &[String] {
        &self.to
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}
