//! Result types returned by the scrape pipeline.

use serde::{Deserialize, Serialize};

use crate::download::RawResponse;
use crate::extract::OpenGraphMetadata;

/// Extracted metadata plus the per-invocation facts the pipeline attaches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OgObject {
    /// Everything found in the page markup.
    #[serde(flatten)]
    pub metadata: OpenGraphMetadata,
    /// Detected page charset. Omitted when detection was skipped or found nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    /// The normalized URL that was fetched; `None` for supplied HTML.
    pub request_url: Option<String>,
    /// Always `true` on a returned result.
    pub success: bool,
}

/// Output of a successful scrape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    /// Metadata and invocation facts.
    pub og_object: OgObject,
    /// Raw response (headers and status are empty for supplied HTML).
    pub response: RawResponse,
}
