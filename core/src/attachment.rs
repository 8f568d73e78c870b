//! Message attachments.
//!
//! An attachment is either a remote file the API fetches by URL, or inline
//! content already encoded as base64. Both are checked when constructed and
//! never change afterwards.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::InvalidArgument;

const BASE64_SCHEME: &str = "base64://";

/// Accepts input with or without `=` padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Url {
        filename: String,
        url: String,
    },
    Base64 {
        filename: String,
        data: String,
        mime_type: Option<String>,
    },
}

impl Attachment {
    /// A remote attachment. `url` must be an absolute URL.
    pub fn url(filename: impl Into<String>, url: impl Into<String>) -> Result<Self, InvalidArgument> {
        let filename = filename.into();
        let url = url.into();
        if url.is_empty() {
            return Err(InvalidArgument::new("URL cannot be empty"));
        }
        if !is_absolute_url(&url) {
            return Err(InvalidArgument::new(format!("Invalid URL provided: {url}")));
        }
        check_filename(&filename)?;
        Ok(Attachment::Url { filename, url })
    }

    /// An inline attachment. `data` must already be base64-encoded; line
    /// breaks and missing padding are tolerated and `data` is kept verbatim.
    pub fn base64(
        filename: impl Into<String>,
        data: impl Into<String>,
        mime_type: Option<String>,
    ) -> Result<Self, InvalidArgument> {
        let filename = filename.into();
        let data = data.into();
        if data.is_empty() {
            return Err(InvalidArgument::new("Base64 string cannot be empty"));
        }
        if !decodes_as_base64(&data) {
            return Err(InvalidArgument::new("Invalid base64 encoding"));
        }
        check_filename(&filename)?;
        Ok(Attachment::Base64 {
            filename,
            data,
            mime_type,
        })
    }

    /// Encode raw bytes and build an inline attachment from them.
    pub fn from_bytes(
        filename: impl Into<String>,
        bytes: &[u8],
        mime_type: Option<String>,
    ) -> Result<Self, InvalidArgument> {
        Self::base64(filename, STANDARD.encode(bytes), mime_type)
    }

    pub fn filename(&self) -> &str {
        match self {
            Attachment::Url { filename, .. } | Attachment::Base64 { filename, .. } => filename,
        }
    }

    /// Wire value: the URL verbatim, or `base64://` followed by the data.
    pub fn value(&self) -> String {
        match self {
            Attachment::Url { url, .. } => url.clone(),
            Attachment::Base64 { data, .. } => format!("{BASE64_SCHEME}{data}"),
        }
    }

    pub fn url_value(&self) -> Option<&str> {
        match self {
            Attachment::Url { url, .. } => Some(url),
            Attachment::Base64 { .. } => None,
        }
    }

    pub fn base64_data(&self) -> Option<&str> {
        match self {
            Attachment::Base64 { data, .. } => Some(data),
            Attachment::Url { .. } => None,
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Attachment::Base64 { mime_type, .. } => mime_type.as_deref(),
            Attachment::Url { .. } => None,
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, Attachment::Url { .. })
    }

    pub fn is_base64(&self) -> bool {
        matches!(self, Attachment::Base64 { .. })
    }
}

fn check_filename(filename: &str) -> Result<(), InvalidArgument> {
    if filename.is_empty() {
        return Err(InvalidArgument::new("Filename cannot be empty"));
    }
    Ok(())
}

fn decodes_as_base64(data: &str) -> bool {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    !compact.is_empty() && LENIENT.decode(compact).is_ok()
}

/// Hierarchical URLs need an explicit `//` authority; of the opaque forms
/// only `mailto:` and `news:` are accepted.
fn is_absolute_url(candidate: &str) -> bool {
    match url::Url::parse(candidate) {
        Ok(parsed) if parsed.cannot_be_a_base() => matches!(parsed.scheme(), "mailto" | "news"),
        Ok(_) => candidate
            .split_once(':')
            .is_some_and(|(_, rest)| rest.starts_with("//")),
        Err(_) => false,
    }
}
