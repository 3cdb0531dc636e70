//! Target URL validation and normalization.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::{Host, Url};

use super::error::{MAX_URL_LENGTH, UrlRejection};

/// Matches an explicit `scheme://` prefix.
#[allow(clippy::expect_used)]
static SCHEME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://").expect("scheme regex is valid") // Static pattern, safe to panic
});

/// Rules applied by [`validate_and_format_url`].
///
/// Field names follow the conventional validator option names
/// (`require_tld`, `allow_underscores`, ...), so option files written for
/// other Open Graph scrapers keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlValidatorSettings {
    /// Schemes accepted when `require_valid_protocol` is set.
    pub protocols: Vec<String>,
    /// Reject URLs without an explicit `scheme://` prefix.
    pub require_protocol: bool,
    /// Reject schemes not listed in `protocols`.
    pub require_valid_protocol: bool,
    /// Reject URLs without a host.
    pub require_host: bool,
    /// Require a top-level domain on domain hosts.
    pub require_tld: bool,
    /// Require an explicit port.
    pub require_port: bool,
    /// Accept underscores in host labels.
    pub allow_underscores: bool,
    /// Accept a trailing dot on the host (`example.com.`).
    pub allow_trailing_dot: bool,
    /// Accept `//host/path` URLs (fetched over http).
    pub allow_protocol_relative_urls: bool,
    /// Reject URLs with a username or password.
    pub disallow_auth: bool,
    /// When non-empty, only these hosts are accepted (case-insensitive, exact).
    pub host_whitelist: Vec<String>,
    /// Hosts that are always rejected (case-insensitive, exact).
    pub host_blacklist: Vec<String>,
}

impl Default for UrlValidatorSettings {
    fn default() -> Self {
        Self {
            protocols: vec!["http".to_string(), "https".to_string()],
            require_protocol: false,
            require_valid_protocol: true,
            require_host: true,
            require_tld: true,
            require_port: false,
            allow_underscores: false,
            allow_trailing_dot: false,
            allow_protocol_relative_urls: false,
            disallow_auth: false,
            host_whitelist: Vec::new(),
            host_blacklist: Vec::new(),
        }
    }
}

/// Validates a user-supplied URL and returns its normalized form.
///
/// Missing schemes default to `http://` unless `require_protocol` is set.
/// The result is the `url` crate serialization, so feeding the output back
/// in yields the same string.
///
/// Returns `None` for any rejected input; this function never fails loudly
/// and never touches the network.
///
/// # Examples
///
/// ```
/// use ogscraper_core::parser::{UrlValidatorSettings, validate_and_format_url};
///
/// let settings = UrlValidatorSettings::default();
/// assert_eq!(
///     validate_and_format_url("example.com/page", &settings).as_deref(),
///     Some("http://example.com/page")
/// );
/// assert_eq!(validate_and_format_url("not a url", &settings), None);
/// ```
#[tracing::instrument(level = "trace", skip(settings))]
#[must_use]
pub fn validate_and_format_url(raw: &str, settings: &UrlValidatorSettings) -> Option<String> {
    match check_url(raw, settings) {
        Ok(parsed) => {
            trace!(url = %parsed, "URL validated");
            Some(parsed.to_string())
        }
        Err(reason) => {
            debug!(url = %raw, error = %reason, "URL validation failed");
            None
        }
    }
}

fn check_url(raw: &str, settings: &UrlValidatorSettings) -> Result<Url, UrlRejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlRejection::Empty);
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlRejection::TooLong {
            length: trimmed.len(),
        });
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(UrlRejection::Whitespace);
    }

    let candidate: Cow<'_, str> = if trimmed.starts_with("//") {
        if !settings.allow_protocol_relative_urls {
            return Err(UrlRejection::ProtocolRelative);
        }
        Cow::Owned(format!("http:{trimmed}"))
    } else if SCHEME_PATTERN.is_match(trimmed) {
        Cow::Borrowed(trimmed)
    } else {
        if settings.require_protocol {
            return Err(UrlRejection::MissingProtocol);
        }
        Cow::Owned(format!("http://{trimmed}"))
    };

    let parsed = Url::parse(&candidate).map_err(|e| UrlRejection::Malformed {
        reason: e.to_string(),
    })?;

    let scheme = parsed.scheme();
    if settings.require_valid_protocol
        && !settings
            .protocols
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(scheme))
    {
        return Err(UrlRejection::UnsupportedScheme {
            scheme: scheme.to_string(),
        });
    }

    if settings.disallow_auth && (!parsed.username().is_empty() || parsed.password().is_some()) {
        return Err(UrlRejection::AuthNotAllowed);
    }

    if settings.require_port && parsed.port().is_none() {
        return Err(UrlRejection::MissingPort);
    }

    let Some(host) = parsed.host() else {
        if settings.require_host {
            return Err(UrlRejection::NoHost);
        }
        return Ok(parsed);
    };

    let host_text = match host {
        Host::Domain(domain) => {
            check_domain(domain, settings)?;
            domain.to_ascii_lowercase()
        }
        Host::Ipv4(addr) => addr.to_string(),
        Host::Ipv6(addr) => addr.to_string(),
    };
    let bare_host = host_text.trim_end_matches('.');

    if !settings.host_whitelist.is_empty()
        && !settings
            .host_whitelist
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(bare_host))
    {
        return Err(UrlRejection::NotWhitelisted {
            host: bare_host.to_string(),
        });
    }

    if settings
        .host_blacklist
        .iter()
        .any(|denied| denied.eq_ignore_ascii_case(bare_host))
    {
        return Err(UrlRejection::HostBlacklisted {
            host: bare_host.to_string(),
        });
    }

    Ok(parsed)
}

/// Applies the fully-qualified-domain rules to a domain host.
fn check_domain(domain: &str, settings: &UrlValidatorSettings) -> Result<(), UrlRejection> {
    let name = match domain.strip_suffix('.') {
        Some(stripped) if settings.allow_trailing_dot => stripped,
        Some(_) => return Err(UrlRejection::invalid_host(domain, "trailing dot not allowed")),
        None => domain,
    };

    let labels: Vec<&str> = name.split('.').collect();
    for label in &labels {
        if label.is_empty() {
            return Err(UrlRejection::invalid_host(domain, "empty label"));
        }
        if label.len() > 63 {
            return Err(UrlRejection::invalid_host(domain, "label longer than 63 chars"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(UrlRejection::invalid_host(
                domain,
                "label starts or ends with a hyphen",
            ));
        }
        if !settings.allow_underscores && label.contains('_') {
            return Err(UrlRejection::invalid_host(domain, "underscores not allowed"));
        }
    }

    if settings.require_tld {
        let Some(tld) = labels.last().filter(|_| labels.len() > 1) else {
            return Err(UrlRejection::invalid_host(domain, "missing top-level domain"));
        };
        let is_punycode = tld.starts_with("xn--");
        if tld.len() < 2 || (!is_punycode && !tld.chars().all(|c| c.is_ascii_alphabetic())) {
            return Err(UrlRejection::invalid_host(domain, "invalid top-level domain"));
        }
    }

    Ok(())
}
