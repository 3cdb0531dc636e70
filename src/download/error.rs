//! Error types for the download module.
//!
//! Each variant is a distinct signal the classifier relies on. Keep them
//! distinguishable: a size-cap cancellation must never look like a generic
//! network failure.

use thiserror::Error;

/// Failures reported by a [`super::Fetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS resolution or connection establishment failed.
    #[error("host unreachable for {url}: {source}")]
    Unreachable {
        /// The URL being fetched.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The transport refused the URL before sending anything.
    #[error("invalid URL at transport layer: {url}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
    },

    /// The request did not complete within the timeout.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The server answered with a 5xx status.
    #[error("HTTP {status} fetching {url}")]
    ServerError {
        /// The URL being fetched.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The body exceeded the byte cap and the transfer was canceled.
    #[error("download of {url} canceled after exceeding {limit} bytes")]
    DownloadLimitExceeded {
        /// The URL being fetched.
        url: String,
        /// The configured limit in bytes.
        limit: u64,
    },

    /// The response declared a content type that is not HTML or text.
    #[error("non-HTML content type '{content_type}' from {url}")]
    NonHtmlContent {
        /// The URL being fetched.
        url: String,
        /// The declared `Content-Type`.
        content_type: String,
    },

    /// Any other transport failure (TLS, protocol, body decoding, redirect loop).
    #[error("transport error fetching {url}: {source}")]
    Transport {
        /// The URL being fetched.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Maps a reqwest error onto the matching variant.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else if source.is_builder() {
            Self::InvalidUrl { url }
        } else if source.is_connect() {
            Self::Unreachable { url, source }
        } else {
            Self::Transport { url, source }
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a server error for a 5xx status.
    pub fn server_error(url: impl Into<String>, status: u16) -> Self {
        Self::ServerError {
            url: url.into(),
            status,
        }
    }

    /// Creates a download-limit cancellation error.
    pub fn download_limit_exceeded(url: impl Into<String>, limit: u64) -> Self {
        Self::DownloadLimitExceeded {
            url: url.into(),
            limit,
        }
    }

    /// Creates a non-HTML content error.
    pub fn non_html_content(url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::NonHtmlContent {
            url: url.into(),
            content_type: content_type.into(),
        }
    }
}
