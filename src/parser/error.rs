//! Rejection reasons produced while validating a target URL.
//!
//! These never leave the crate as errors: [`super::validate_and_format_url`]
//! logs the reason and returns `None`, and the pipeline turns that into
//! [`crate::ScrapeError::InvalidInput`].

use thiserror::Error;

/// Maximum URL length to accept (common browser limit).
pub const MAX_URL_LENGTH: usize = 2083;

/// Why a URL string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlRejection {
    /// Input was empty after trimming.
    #[error("URL is empty")]
    Empty,

    /// Input exceeds [`MAX_URL_LENGTH`].
    #[error("URL too long ({length} chars, max {MAX_URL_LENGTH})")]
    TooLong {
        /// Actual length.
        length: usize,
    },

    /// Input contains whitespace inside the URL.
    #[error("URL contains whitespace")]
    Whitespace,

    /// No scheme present and the settings require one.
    #[error("URL has no protocol")]
    MissingProtocol,

    /// Protocol-relative (`//host`) URL and the settings forbid them.
    #[error("protocol-relative URLs are not allowed")]
    ProtocolRelative,

    /// The `url` crate could not parse the input.
    #[error("malformed URL: {reason}")]
    Malformed {
        /// Parser message.
        reason: String,
    },

    /// Scheme is not in the allowed protocol list.
    #[error("scheme '{scheme}' is not allowed")]
    UnsupportedScheme {
        /// The rejected scheme.
        scheme: String,
    },

    /// URL has no host.
    #[error("URL has no host")]
    NoHost,

    /// URL carries credentials and the settings forbid them.
    #[error("URL contains credentials")]
    AuthNotAllowed,

    /// No explicit port and the settings require one.
    #[error("URL has no explicit port")]
    MissingPort,

    /// Host name fails the domain rules (TLD, underscores, label shape, trailing dot).
    #[error("invalid host '{host}': {reason}")]
    InvalidHost {
        /// The offending host.
        host: String,
        /// Which rule failed.
        reason: &'static str,
    },

    /// Host is absent from the configured whitelist.
    #[error("host '{host}' is not whitelisted")]
    NotWhitelisted {
        /// The offending host.
        host: String,
    },

    /// Host is on the validator's host blacklist.
    #[error("host '{host}' is blacklisted by the URL validator")]
    HostBlacklisted {
        /// The offending host.
        host: String,
    },
}

impl UrlRejection {
    /// Creates an `InvalidHost` rejection.
    #[must_use]
    pub fn invalid_host(host: &str, reason: &'static str) -> Self {
        Self::InvalidHost {
            host: host.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_long_message_mentions_limit() {
        let msg = UrlRejection::TooLong { length: 3000 }.to_string();
        assert!(msg.contains("3000"), "should contain length: {msg}");
        assert!(msg.contains("2083"), "should contain max: {msg}");
    }

    #[test]
    fn test_invalid_host_message() {
        let msg = UrlRejection::invalid_host("foo_bar.com", "underscores not allowed").to_string();
        assert!(msg.contains("foo_bar.com"));
        assert!(msg.contains("underscores"));
    }
}
