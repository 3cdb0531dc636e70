//! Substring deny-list for target URLs.

use url::{Host, Url};

/// Returns `true` when `url` contains any non-empty `blacklist` entry.
///
/// Matching is a case-sensitive substring test against the whole normalized
/// URL, not a hostname comparison: `"example.com"` also blocks
/// `https://notexample.com/` and `https://other.org/?ref=example.com`.
///
/// Normalized URLs carry internationalized hosts in punycode. An entry that
/// is a bare non-ASCII hostname (`bücher.example`) is therefore also matched
/// in its punycode form (`xn--bcher-kva.example`).
#[must_use]
pub fn is_blacklisted(url: &str, blacklist: &[String]) -> bool {
    blacklist
        .iter()
        .filter(|entry| !entry.is_empty())
        .any(|entry| {
            url.contains(entry.as_str())
                || punycode_host(entry).is_some_and(|ascii| url.contains(&ascii))
        })
}

/// ASCII form of a non-ASCII entry that is nothing but a hostname.
fn punycode_host(entry: &str) -> Option<String> {
    if entry.is_ascii() || entry.contains(['/', '?', '#', ':', '@']) {
        return None;
    }
    let parsed = Url::parse(&format!("http://{entry}/")).ok()?;
    match parsed.host()? {
        Host::Domain(domain) => Some(domain.to_string()),
        Host::Ipv4(_) | Host::Ipv6(_) => None,
    }
}
