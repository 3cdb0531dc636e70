//! Charset detection and body decoding.
//!
//! Detection order:
//! 1. `charset=` parameter of the `Content-Type` response header
//! 2. `<meta charset>` or `<meta http-equiv="Content-Type" content="...; charset=...">`
//!    within the first `peek_size` bytes of the body
//!
//! Labels are resolved through the WHATWG encoding registry, so the reported
//! name is canonical (`latin1` → `windows-1252`, `utf8` → `UTF-8`).

use std::collections::BTreeMap;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;
use tracing::{debug, trace};

/// Default number of body bytes inspected for a `<meta>` charset declaration.
pub const DEFAULT_PEEK_SIZE: usize = 1024;

#[allow(clippy::expect_used)]
static META_CHARSET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*?charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#)
        .expect("meta charset regex is valid") // Static pattern, safe to panic
});

/// Resolves the page charset name from response headers and body.
///
/// Returns `None` when neither source declares a known encoding.
#[must_use]
pub fn resolve(headers: &BTreeMap<String, String>, body: &[u8], peek_size: usize) -> Option<String> {
    resolve_encoding(headers, body, peek_size).map(|encoding| encoding.name().to_string())
}

/// Like [`resolve`], returning the `encoding_rs` encoding.
#[must_use]
pub fn resolve_encoding(
    headers: &BTreeMap<String, String>,
    body: &[u8],
    peek_size: usize,
) -> Option<&'static Encoding> {
    let from_header = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .and_then(|(_, value)| charset_from_content_type(value));
    if let Some(encoding) = from_header {
        trace!(charset = encoding.name(), "charset from content-type header");
        return Some(encoding);
    }

    let sniffed = sniff_meta_charset(body, peek_size);
    if let Some(encoding) = sniffed {
        trace!(charset = encoding.name(), "charset from meta tag");
    }
    sniffed
}

/// Extracts the encoding named by a `Content-Type` header value.
#[must_use]
pub fn charset_from_content_type(value: &str) -> Option<&'static Encoding> {
    value
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, label)| {
            let label = label.trim().trim_matches(|c| c == '"' || c == '\'');
            Encoding::for_label(label.as_bytes())
        })
}

/// Looks for a `<meta>` charset declaration in the first `peek_size` bytes.
#[must_use]
pub fn sniff_meta_charset(body: &[u8], peek_size: usize) -> Option<&'static Encoding> {
    let window = &body[..body.len().min(peek_size)];
    META_CHARSET_PATTERN
        .captures_iter(window)
        .filter_map(|caps| caps.get(1))
        .find_map(|label| Encoding::for_label(label.as_bytes()))
}

/// Decodes `body` with `encoding`, falling back to UTF-8.
///
/// A byte-order mark overrides the given encoding. Malformed sequences are
/// replaced with U+FFFD.
#[must_use]
pub fn decode(body: &[u8], encoding: Option<&'static Encoding>) -> String {
    let encoding = encoding.unwrap_or(UTF_8);
    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        debug!(charset = used.name(), "body contained malformed sequences");
    }
    text.into_owned()
}
