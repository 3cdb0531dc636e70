//! Scrape configuration and the split into policy and transport views.
//!
//! Callers build one [`ScrapeOptions`] (directly or from JSON). The pipeline
//! calls [`split_options`] once per invocation to validate it and derive:
//!
//! - [`PolicyOptions`] - what to scrape and how to gate/extract it
//! - [`TransportOptions`] - what the fetcher needs (URL, byte cap, timeout, headers)
//!
//! Keys the crate does not recognize are kept verbatim in
//! [`TransportOptions::passthrough`].

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::charset::DEFAULT_PEEK_SIZE;
use crate::download::{DEFAULT_DOWNLOAD_LIMIT, DEFAULT_TIMEOUT_MS};
use crate::error::ScrapeError;
use crate::extract::{CustomMetaTag, ExtractOptions};
use crate::parser::UrlValidatorSettings;

/// Everything a single scrape invocation can be configured with.
///
/// Deserializes from camelCase JSON; every field is optional there.
///
/// | field | default |
/// |---|---|
/// | `only_get_open_graph_info` | `false` |
/// | `peek_size` | `1024` |
/// | `download_limit` | `1_000_000` |
/// | `timeout_ms` | `10_000` |
/// | `blacklist`, `headers`, `custom_meta_tags` | empty |
/// | `url_validator_settings` | [`UrlValidatorSettings::default`] |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrapeOptions {
    /// Page to fetch.
    pub url: Option<String>,
    /// Raw HTML to extract from instead of fetching.
    pub html: Option<String>,
    /// Only collect Open Graph tags: no fallbacks, no charset detection.
    pub only_get_open_graph_info: bool,
    /// Bytes of body inspected when sniffing the charset.
    pub peek_size: usize,
    /// Maximum body bytes before the transfer is canceled.
    pub download_limit: u64,
    /// URL substrings that are refused before fetching.
    pub blacklist: Vec<String>,
    /// Rules for URL validation.
    pub url_validator_settings: UrlValidatorSettings,
    /// Additional meta tags to collect.
    pub custom_meta_tags: Vec<CustomMetaTag>,
    /// Total request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Extra request headers.
    pub headers: BTreeMap<String, String>,
    /// User-Agent override.
    pub user_agent: Option<String>,
    /// Unrecognized keys, forwarded to the transport view untouched.
    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            url: None,
            html: None,
            only_get_open_graph_info: false,
            peek_size: DEFAULT_PEEK_SIZE,
            download_limit: DEFAULT_DOWNLOAD_LIMIT,
            blacklist: Vec::new(),
            url_validator_settings: UrlValidatorSettings::default(),
            custom_meta_tags: Vec::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            headers: BTreeMap::new(),
            user_agent: None,
            passthrough: Map::new(),
        }
    }
}

impl ScrapeOptions {
    /// Options targeting a URL, everything else default.
    #[must_use]
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Options extracting from an HTML string, everything else default.
    #[must_use]
    pub fn for_html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Self::default()
        }
    }
}

/// Pipeline policy: target, gates and extraction settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyOptions {
    /// Page to fetch, if any.
    pub url: Option<String>,
    /// Raw HTML, if any. Empty strings are treated as absent.
    pub html: Option<String>,
    /// See [`ScrapeOptions::only_get_open_graph_info`].
    pub only_get_open_graph_info: bool,
    /// See [`ScrapeOptions::peek_size`].
    pub peek_size: usize,
    /// See [`ScrapeOptions::download_limit`].
    pub download_limit: u64,
    /// See [`ScrapeOptions::blacklist`].
    pub blacklist: Vec<String>,
    /// See [`ScrapeOptions::url_validator_settings`].
    pub url_validator_settings: UrlValidatorSettings,
    /// See [`ScrapeOptions::custom_meta_tags`].
    pub custom_meta_tags: Vec<CustomMetaTag>,
}

impl PolicyOptions {
    /// Extraction settings for a page fetched from `request_url` (if any).
    #[must_use]
    pub fn extract_options(&self, request_url: Option<&str>) -> ExtractOptions {
        ExtractOptions {
            only_get_open_graph_info: self.only_get_open_graph_info,
            custom_meta_tags: self.custom_meta_tags.clone(),
            base_url: request_url.map(str::to_string),
        }
    }
}

/// Read-only view consumed by a [`crate::download::Fetcher`].
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Normalized target URL. Empty until the URL passes the gates.
    pub url: String,
    /// Body byte cap.
    pub download_limit: u64,
    /// Total request timeout.
    pub timeout: Duration,
    /// Validated request headers.
    pub headers: HeaderMap,
    /// User-Agent override.
    pub user_agent: Option<String>,
    /// Unrecognized option keys, unmodified. Read by custom fetchers only;
    /// [`crate::download::HttpFetcher`] ignores them.
    pub passthrough: Map<String, Value>,
}

impl TransportOptions {
    /// Returns a copy targeting `url`.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// Validates `options` and splits it into policy and transport views.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidInput`] when `peek_size`, `download_limit`
/// or `timeout_ms` is zero, or when a header name/value is not valid HTTP.
pub fn split_options(
    options: ScrapeOptions,
) -> Result<(PolicyOptions, TransportOptions), ScrapeError> {
    if options.peek_size == 0 {
        return Err(ScrapeError::invalid_input("peekSize must be greater than 0"));
    }
    if options.download_limit == 0 {
        return Err(ScrapeError::invalid_input(
            "downloadLimit must be greater than 0",
        ));
    }
    if options.timeout_ms == 0 {
        return Err(ScrapeError::invalid_input("timeoutMs must be greater than 0"));
    }

    let headers = build_header_map(&options.headers)?;

    if !options.passthrough.is_empty() {
        debug!(
            keys = ?options.passthrough.keys().collect::<Vec<_>>(),
            "forwarding unrecognized options to transport"
        );
    }

    let policy = PolicyOptions {
        url: options.url.clone(),
        html: options.html.filter(|html| !html.is_empty()),
        only_get_open_graph_info: options.only_get_open_graph_info,
        peek_size: options.peek_size,
        download_limit: options.download_limit,
        blacklist: options.blacklist,
        url_validator_settings: options.url_validator_settings,
        custom_meta_tags: options.custom_meta_tags,
    };

    let transport = TransportOptions {
        url: options.url.unwrap_or_default(),
        download_limit: options.download_limit,
        timeout: Duration::from_millis(options.timeout_ms),
        headers,
        user_agent: options.user_agent,
        passthrough: options.passthrough,
    };

    Ok((policy, transport))
}

fn build_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, ScrapeError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ScrapeError::invalid_input(format!("invalid header name '{name}'")))?;
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            ScrapeError::invalid_input(format!("invalid value for header '{name}'"))
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
