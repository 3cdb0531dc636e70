//! Error taxonomy surfaced by the scrape pipeline.
//!
//! Every failure that leaves [`crate::scrape`] is exactly one [`ScrapeError`].
//! Transport errors are classified before they get here (see
//! [`crate::download::classify_fetch_error`]), so callers can match on a small,
//! stable set of kinds instead of inspecting network internals.

use std::fmt;

use thiserror::Error;

/// Message used when the target URL fails validation.
pub const INVALID_URL_MESSAGE: &str = "Invalid URL";

/// Message used when both `url` and `html` are supplied.
pub const URL_AND_HTML_MESSAGE: &str = "Must specify either url or html, not both";

/// Message used when neither `url` nor `html` is supplied.
pub const MISSING_TARGET_MESSAGE: &str = "Must specify either url or html";

/// Errors returned by the scrape pipeline.
///
/// The set is closed: new low-level failure modes are mapped onto one of
/// these variants rather than added as new ones.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeError {
    /// Bad or missing URL, conflicting `url`/`html`, or an invalid option value.
    #[error("{message}")]
    InvalidInput {
        /// Human-readable reason.
        message: String,
    },

    /// The URL (or the response content type) points at something that is not HTML.
    #[error("Must scrape an HTML page")]
    NonHtmlResource,

    /// The URL contains an entry of the configured blacklist.
    #[error("Host name has been black listed")]
    Blacklisted,

    /// Host unreachable, URL rejected by the transport, or any unclassified failure.
    #[error("Page not found")]
    PageNotFound,

    /// The request did not complete within the configured timeout.
    #[error("Time out")]
    TimedOut,

    /// The upstream server answered with a 5xx status.
    #[error("Web server is returning error")]
    ServerError,

    /// The response body grew past the configured download limit.
    #[error("Exceeded the download limit of {limit} bytes")]
    DownloadLimitExceeded {
        /// The configured limit in bytes.
        limit: u64,
    },
}

impl ScrapeError {
    /// Creates an `InvalidInput` error with a custom message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates the `InvalidInput` error used for URLs that fail validation.
    #[must_use]
    pub fn invalid_url() -> Self {
        Self::invalid_input(INVALID_URL_MESSAGE)
    }

    /// Creates a `DownloadLimitExceeded` error for the given limit.
    #[must_use]
    pub fn download_limit_exceeded(limit: u64) -> Self {
        Self::DownloadLimitExceeded { limit }
    }

    /// Returns the kind tag for this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::NonHtmlResource => ErrorKind::NonHtmlResource,
            Self::Blacklisted => ErrorKind::Blacklisted,
            Self::PageNotFound => ErrorKind::PageNotFound,
            Self::TimedOut => ErrorKind::TimedOut,
            Self::ServerError => ErrorKind::ServerError,
            Self::DownloadLimitExceeded { .. } => ErrorKind::DownloadLimitExceeded,
        }
    }
}

/// Payload-free tag of a [`ScrapeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ScrapeError::InvalidInput`].
    InvalidInput,
    /// See [`ScrapeError::NonHtmlResource`].
    NonHtmlResource,
    /// See [`ScrapeError::Blacklisted`].
    Blacklisted,
    /// See [`ScrapeError::PageNotFound`].
    PageNotFound,
    /// See [`ScrapeError::TimedOut`].
    TimedOut,
    /// See [`ScrapeError::ServerError`].
    ServerError,
    /// See [`ScrapeError::DownloadLimitExceeded`].
    DownloadLimitExceeded,
}

impl ErrorKind {
    /// Stable identifier, suitable for logs and machine-readable output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::NonHtmlResource => "non_html_resource",
            Self::Blacklisted => "blacklisted",
            Self::PageNotFound => "page_not_found",
            Self::TimedOut => "timed_out",
            Self::ServerError => "server_error",
            Self::DownloadLimitExceeded => "download_limit_exceeded",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
