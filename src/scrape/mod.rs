//! The scrape pipeline.
//!
//! [`Scraper::scrape`] takes one [`ScrapeOptions`] and either extracts from
//! the supplied HTML directly, or runs the URL through the local gates, the
//! fetcher and the extractor. Every failure leaves as one [`ScrapeError`].

mod types;

pub use types::{OgObject, ScrapeResult};

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::charset;
use crate::download::{Fetcher, HttpFetcher, RawResponse, classify_fetch_error};
use crate::error::{MISSING_TARGET_MESSAGE, ScrapeError, URL_AND_HTML_MESSAGE};
use crate::extract::extract_metadata;
use crate::gate;
use crate::options::{PolicyOptions, ScrapeOptions, TransportOptions, split_options};

/// Runs scrapes through a shared [`Fetcher`].
///
/// Cloning is cheap; clones share the fetcher (and its connection pool) but
/// no per-scrape state.
#[derive(Clone)]
pub struct Scraper {
    fetcher: Arc<dyn Fetcher>,
}

impl fmt::Debug for Scraper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scraper").finish_non_exhaustive()
    }
}

impl Default for Scraper {
    fn default() -> Self {
        Self::new()
    }
}

impl Scraper {
    /// Creates a scraper backed by a default [`HttpFetcher`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_fetcher(Arc::new(HttpFetcher::new()))
    }

    /// Creates a scraper backed by `fetcher`.
    #[must_use]
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Scrapes one page.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when both or neither of `url`/`html` are set, when an
    ///   option value is invalid, or when the URL fails validation
    /// - `NonHtmlResource` / `Blacklisted` from the local gates
    /// - `PageNotFound`, `TimedOut`, `ServerError`, `DownloadLimitExceeded` or
    ///   `NonHtmlResource` when the fetch fails
    #[instrument(skip(self, options), fields(url = options.url.as_deref().unwrap_or_default(), html = options.html.is_some()))]
    pub async fn scrape(&self, options: ScrapeOptions) -> Result<ScrapeResult, ScrapeError> {
        let (policy, transport) = split_options(options)?;
        let has_url = policy.url.as_deref().is_some_and(|url| !url.is_empty());

        match (policy.html.as_deref(), has_url) {
            (Some(_), true) => Err(ScrapeError::invalid_input(URL_AND_HTML_MESSAGE)),
            (Some(html), false) => Ok(scrape_html(html, &policy)),
            (None, true) => self.scrape_url(&policy, transport).await,
            (None, false) => Err(ScrapeError::invalid_input(MISSING_TARGET_MESSAGE)),
        }
    }

    async fn scrape_url(
        &self,
        policy: &PolicyOptions,
        transport: TransportOptions,
    ) -> Result<ScrapeResult, ScrapeError> {
        let url = gate::check_url(policy.url.as_deref(), policy).inspect_err(|error| {
            debug!(kind = %error.kind(), "target rejected before fetch");
        })?;
        let transport = transport.with_url(url.as_str());

        let fetched = self
            .fetcher
            .fetch(&transport, policy.peek_size)
            .await
            .map_err(|error| {
                warn!(url = %url, error = %error, "fetch failed");
                classify_fetch_error(&error)
            })?;

        let metadata = extract_metadata(&fetched.decoded_body, &policy.extract_options(Some(&url)));
        let charset = if policy.only_get_open_graph_info {
            None
        } else {
            charset::resolve(
                &fetched.response.headers,
                fetched.decoded_body.as_bytes(),
                policy.peek_size,
            )
        };

        info!(url = %url, status = ?fetched.response.status_code, charset = ?charset, "scrape complete");

        Ok(ScrapeResult {
            og_object: OgObject {
                metadata,
                charset,
                request_url: Some(url),
                success: true,
            },
            response: fetched.response,
        })
    }
}

/// Scrapes with a default [`Scraper`].
///
/// # Errors
///
/// See [`Scraper::scrape`].
///
/// # Examples
///
/// ```
/// # tokio_test::block_on(async {
/// use ogscraper_core::{ScrapeOptions, scrape};
///
/// let options = ScrapeOptions::for_html(r#"<meta property="og:title" content="Hi">"#);
/// let result = scrape(options).await.unwrap();
/// assert_eq!(result.og_object.metadata.og_title.as_deref(), Some("Hi"));
/// assert!(result.og_object.request_url.is_none());
/// # });
/// ```
pub async fn scrape(options: ScrapeOptions) -> Result<ScrapeResult, ScrapeError> {
    Scraper::new().scrape(options).await
}

fn scrape_html(html: &str, policy: &PolicyOptions) -> ScrapeResult {
    debug!(bytes = html.len(), "extracting from supplied html");
    let metadata = extract_metadata(html, &policy.extract_options(None));
    ScrapeResult {
        og_object: OgObject {
            metadata,
            charset: None,
            request_url: None,
            success: true,
        },
        response: RawResponse {
            body: html.to_string(),
            ..RawResponse::default()
        },
    }
}
