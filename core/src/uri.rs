//! Endpoint URI construction.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except RFC 3986 unreserved characters is escaped, so a space
/// becomes `%20` rather than `+`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Base URL parts shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriOptions {
    pub protocol: String,
    pub host: String,
    pub api_path: Option<String>,
}

/// `{protocol}://{host}[/{api_path}]/{path}[?{query}]`.
///
/// Query pairs are encoded in the order given. `host` and `protocol` are used
/// as-is.
pub fn build_uri<K, V>(options: &UriOptions, path: &str, query: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    // A prefix that trims to nothing adds no segment, so "/" never yields "//".
    let api_path = match options.api_path.as_deref().map(|p| p.trim_matches('/')) {
        Some(prefix) if !prefix.is_empty() => format!("/{prefix}"),
        _ => String::new(),
    };

    let base = format!("{}://{}{}/{}", options.protocol, options.host, api_path, path);

    let query_string = query
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key.as_ref(), QUERY_COMPONENT),
                utf8_percent_encode(value.as_ref(), QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    if query_string.is_empty() {
        base
    } else {
        format!("{base}?{query_string}")
    }
}
