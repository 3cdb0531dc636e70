//! Bounded HTTP fetcher.
//!
//! [`HttpFetcher`] performs a single GET per call, streams the body into
//! memory and drops the transfer as soon as it grows past the configured
//! byte cap. A timeout guard wraps the whole exchange; whichever of the two
//! guards fires first decides the outcome.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{CONTENT_TYPE, HeaderMap, USER_AGENT};
use reqwest::{Client, RequestBuilder, redirect};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, REDIRECT_LIMIT};
use super::error::FetchError;
use crate::charset;
use crate::options::TransportOptions;
use crate::user_agent;

/// Response data handed back to the caller alongside the metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    /// Response headers, lowercase names. Repeated headers are joined with `", "`.
    pub headers: BTreeMap<String, String>,
    /// HTTP status, absent when no request was made.
    pub status_code: Option<u16>,
    /// Body as received, read as UTF-8 with replacement characters.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
}

/// Successful fetch output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// Body decoded with the detected charset.
    pub decoded_body: String,
    /// Headers, status and raw body.
    pub response: RawResponse,
}

/// Performs the network request for one scrape.
///
/// Implementations must report failures through the distinct
/// [`FetchError`] variants; the pipeline's error classification depends on
/// them. Statuses below 500 are successful fetches.
///
/// Option keys the crate does not recognize arrive untouched in
/// [`TransportOptions::passthrough`]. They exist for custom implementations;
/// [`HttpFetcher`] ignores them.
///
/// # Object Safety
///
/// This trait uses `async_trait` so the pipeline can hold a `Box<dyn Fetcher>`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `transport.url`, honoring its byte cap and timeout.
    ///
    /// `peek_size` bounds the body prefix inspected for a charset declaration
    /// when decoding.
    async fn fetch(
        &self,
        transport: &TransportOptions,
        peek_size: usize,
    ) -> Result<FetchResult, FetchError>;
}

/// [`Fetcher`] backed by a `reqwest` client.
///
/// The client only pools connections; every call builds its request from the
/// [`TransportOptions`] it is given, so calls share no scrape state.
///
/// Only the URL, byte cap, timeout, headers and user agent of the transport
/// view are used. [`TransportOptions::passthrough`] is not read.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Creates a fetcher with the default client configuration.
    ///
    /// Default configuration:
    /// - Connect timeout: 10 seconds
    /// - Redirects: up to 10 hops
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let client = base_client_builder(CONNECT_TIMEOUT_SECS)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Wraps an existing client (custom TLS, proxies, default headers, ...).
    ///
    /// Per-request settings from [`TransportOptions`] still apply on top.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn build_request(&self, url: Url, transport: &TransportOptions) -> RequestBuilder {
        let mut request = self
            .client
            .get(url)
            .timeout(transport.timeout)
            .headers(transport.headers.clone());
        if let Some(ua) = transport.user_agent.as_deref() {
            request = request.header(USER_AGENT, ua);
        }
        request
    }

    async fn fetch_bounded(
        &self,
        request: RequestBuilder,
        url: &str,
        limit: u64,
        peek_size: usize,
    ) -> Result<FetchResult, FetchError> {
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status().as_u16();
        if status >= 500 {
            return Err(FetchError::server_error(url, status));
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            && !is_html_like(content_type)
        {
            return Err(FetchError::non_html_content(url, content_type));
        }

        if let Some(declared) = response.content_length()
            && declared > limit
        {
            debug!(declared, limit, "content-length exceeds download limit");
            return Err(FetchError::download_limit_exceeded(url, limit));
        }

        let headers = flatten_headers(response.headers());
        let bytes = read_body_limited(response, url, limit).await?;

        let encoding = charset::resolve_encoding(&headers, &bytes, peek_size);
        let decoded_body = charset::decode(&bytes, encoding);
        let body = String::from_utf8_lossy(&bytes).into_owned();

        info!(status, bytes = bytes.len(), "fetch complete");

        Ok(FetchResult {
            decoded_body,
            response: RawResponse {
                headers,
                status_code: Some(status),
                body,
            },
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self, transport, peek_size), fields(url = %transport.url, limit = transport.download_limit))]
    async fn fetch(
        &self,
        transport: &TransportOptions,
        peek_size: usize,
    ) -> Result<FetchResult, FetchError> {
        debug!("starting fetch");
        let url = transport.url.as_str();
        let parsed = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;
        let request = self.build_request(parsed, transport);

        // Covers connect, headers and body together; dropping the future cancels the transfer.
        tokio::time::timeout(
            transport.timeout,
            self.fetch_bounded(request, url, transport.download_limit, peek_size),
        )
        .await
        .unwrap_or_else(|_| {
            debug!(timeout_ms = duration_ms(transport.timeout), "fetch timed out");
            Err(FetchError::timeout(url))
        })
    }
}

/// Streams the body, failing as soon as more than `limit` bytes arrive.
async fn read_body_limited(
    response: reqwest::Response,
    url: &str,
    limit: u64,
) -> Result<Vec<u8>, FetchError> {
    let mut stream = response.bytes_stream();
    let mut body: Vec<u8> = Vec::new();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| FetchError::from_reqwest(url, e))?;
        let total = body.len() as u64 + chunk.len() as u64;
        if total > limit {
            debug!(received = total, limit, "download limit exceeded, canceling transfer");
            return Err(FetchError::download_limit_exceeded(url, limit));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

/// True for `text/*` and any `*html*` media type.
fn is_html_like(content_type: &str) -> bool {
    let lower = content_type.to_ascii_lowercase();
    lower.contains("text/") || lower.contains("html")
}

fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        flat.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    flat
}

fn base_client_builder(connect_timeout_secs: u64) -> reqwest::ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .redirect(redirect::Policy::limited(REDIRECT_LIMIT))
        .gzip(true)
        .user_agent(user_agent::default_user_agent())
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_is_html_like() {
        assert!(is_html_like("text/html; charset=utf-8"));
        assert!(is_html_like("TEXT/HTML"));
        assert!(is_html_like("application/xhtml+xml"));
        assert!(is_html_like("text/plain"));
        assert!(!is_html_like("application/pdf"));
        assert!(!is_html_like("image/png"));
        assert!(!is_html_like("application/json"));
    }

    #[test]
    fn test_flatten_headers_joins_repeated_values() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        let flat = flatten_headers(&headers);
        assert_eq!(flat.get("set-cookie").unwrap(), "a=1, b=2");
        assert_eq!(flat.get("content-type").unwrap(), "text/html");
    }

    #[test]
    fn test_http_fetcher_rejects_unparseable_url() {
        let fetcher = HttpFetcher::new();
        let transport = crate::options::split_options(crate::ScrapeOptions::default())
            .unwrap()
            .1
            .with_url("not a url");
        let result = tokio_test::block_on(fetcher.fetch(&transport, 1024));
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }
}
