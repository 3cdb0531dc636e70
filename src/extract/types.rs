//! Data types produced by the metadata extractor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An extra meta tag to collect alongside the Open Graph set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMetaTag {
    /// Collect every occurrence instead of the first one.
    #[serde(default)]
    pub multiple: bool,
    /// `property` / `name` attribute to match (case-insensitive).
    pub property: String,
    /// Key under which the value is reported.
    pub field_name: String,
}

/// Value of a custom meta tag: one string, or all of them when `multiple` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomMetaValue {
    /// First matching value.
    Single(String),
    /// Every matching value, in document order.
    Multiple(Vec<String>),
}

/// Settings consumed by [`super::extract_metadata`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Skip the non-Open-Graph fallbacks (`<title>`, `<img>`, ...).
    pub only_get_open_graph_info: bool,
    /// Additional tags to collect.
    pub custom_meta_tags: Vec<CustomMetaTag>,
    /// Page URL used to resolve relative media URLs.
    pub base_url: Option<String>,
}

/// An image, video or audio entry (`og:image`, `og:video`, `og:audio`, `twitter:image`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaObject {
    /// Resource URL.
    pub url: String,
    /// `:secure_url` variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_url: Option<String>,
    /// MIME type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Declared width, as written in the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// Declared height, as written in the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    /// Alternative text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl MediaObject {
    /// Creates an entry with only a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Open Graph and social-preview metadata of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraphMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_locale: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub og_locale_alternate: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_determiner: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub og_image: Vec<MediaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub og_video: Vec<MediaObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub og_audio: Vec<MediaObject>,
    /// Publication date (`article:published_time`, else `<meta name="date">`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_card: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_site: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub twitter_image: Vec<MediaObject>,
    /// First `<link rel="icon">`-style href.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    /// Other `og:*`, `article:*`, `book:*`, `profile:*`, `music:*` and `video:*` properties.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
    /// Values collected for [`CustomMetaTag`]s, keyed by `field_name`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_meta_tags: BTreeMap<String, CustomMetaValue>,
}
