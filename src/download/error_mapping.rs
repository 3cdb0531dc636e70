//! Classification of fetch failures into the public error taxonomy.

use tracing::debug;

use super::error::FetchError;
use crate::error::ScrapeError;

/// Maps a fetch failure onto exactly one [`ScrapeError`].
///
/// | fetch signal | result |
/// |---|---|
/// | unreachable host, transport-invalid URL, other transport failure | `PageNotFound` |
/// | timeout | `TimedOut` |
/// | 5xx status | `ServerError` |
/// | byte cap exceeded | `DownloadLimitExceeded` with the configured limit |
/// | non-HTML response content type | `NonHtmlResource` |
#[must_use]
pub fn classify_fetch_error(error: &FetchError) -> ScrapeError {
    let classified = match error {
        FetchError::Unreachable { .. }
        | FetchError::InvalidUrl { .. }
        | FetchError::Transport { .. } => ScrapeError::PageNotFound,

        FetchError::Timeout { .. } => ScrapeError::TimedOut,

        FetchError::ServerError { .. } => ScrapeError::ServerError,

        FetchError::DownloadLimitExceeded { limit, .. } => {
            ScrapeError::download_limit_exceeded(*limit)
        }

        FetchError::NonHtmlContent { .. } => ScrapeError::NonHtmlResource,
    };
    debug!(fetch_error = %error, kind = %classified.kind(), "classified fetch error");
    classified
}
