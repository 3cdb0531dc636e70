//! Constants for the download module (timeouts, size limits).

/// Default connect timeout for the shared HTTP client (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default total request timeout, including the body transfer (10 seconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default cap on downloaded body bytes (1 MB).
pub const DEFAULT_DOWNLOAD_LIMIT: u64 = 1_000_000;

/// Redirect hops followed by the transport before giving up.
pub const REDIRECT_LIMIT: usize = 10;
