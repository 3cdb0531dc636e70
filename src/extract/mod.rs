//! Meta tag extraction: HTML text in, [`OpenGraphMetadata`] out.
//!
//! Tags are read in document order. Scalar properties keep their first
//! value; `og:image`, `og:video`, `og:audio` and `twitter:image` start a new
//! entry each time they appear, and their structured properties
//! (`og:image:width`, `twitter:image:alt`, ...) attach to the latest entry.

pub mod types;
mod utils;

pub use types::*;

use scraper::Html;
use tracing::trace;
use utils::{
    MediaKind, apply_fallbacks, collect_meta_tags, find_favicon, finish_media, first_value,
    push_media_url, resolve_relative_urls, set_media_field,
};

/// Namespaces whose properties are kept in [`OpenGraphMetadata::extra`].
const EXTRA_PREFIXES: [&str; 6] = ["og:", "article:", "book:", "profile:", "music:", "video:"];

/// Extracts Open Graph metadata from an HTML document.
///
/// Never fails: malformed markup yields whatever the HTML parser recovers.
///
/// # Examples
///
/// ```
/// use ogscraper_core::extract::{ExtractOptions, extract_metadata};
///
/// let html = r#"<meta property="og:title" content="Hi">"#;
/// let metadata = extract_metadata(html, &ExtractOptions::default());
/// assert_eq!(metadata.og_title.as_deref(), Some("Hi"));
/// ```
#[must_use]
pub fn extract_metadata(html: &str, options: &ExtractOptions) -> OpenGraphMetadata {
    let doc = Html::parse_document(html);
    let tags = collect_meta_tags(&doc);
    trace!(tags = tags.len(), "collected meta tags");

    let mut metadata = OpenGraphMetadata::default();
    let mut media = MediaState::default();

    for (key, value) in &tags {
        apply_tag(&mut metadata, &mut media, key, value);
    }

    metadata.og_image = finish_media(media.images);
    metadata.og_video = finish_media(media.videos);
    metadata.og_audio = finish_media(media.audios);
    metadata.twitter_image = finish_media(media.twitter_images);

    collect_custom_tags(&mut metadata, &tags, &options.custom_meta_tags);

    if metadata.og_date.is_none() {
        metadata.og_date = first_value(&tags, "date");
    }
    metadata.favicon = find_favicon(&doc);

    if !options.only_get_open_graph_info {
        apply_fallbacks(&mut metadata, &doc, &tags);
    }

    if let Some(base) = options.base_url.as_deref() {
        resolve_relative_urls(&mut metadata, base);
    }

    metadata
}

#[derive(Default)]
struct MediaState {
    images: Vec<MediaObject>,
    videos: Vec<MediaObject>,
    audios: Vec<MediaObject>,
    twitter_images: Vec<MediaObject>,
}

impl MediaState {
    fn list(&mut self, kind: MediaKind) -> &mut Vec<MediaObject> {
        match kind {
            MediaKind::Image => &mut self.images,
            MediaKind::Video => &mut self.videos,
            MediaKind::Audio => &mut self.audios,
            MediaKind::TwitterImage => &mut self.twitter_images,
        }
    }
}

fn apply_tag(metadata: &mut OpenGraphMetadata, media: &mut MediaState, key: &str, value: &str) {
    if let Some((kind, field)) = MediaKind::classify(key) {
        let list = media.list(kind);
        match field {
            None | Some("url" | "src") => push_media_url(list, value),
            Some(field) => {
                if list.is_empty() {
                    list.push(MediaObject::default());
                }
                if let Some(entry) = list.last_mut() {
                    set_media_field(entry, field, value);
                }
            }
        }
        return;
    }

    let slot = match key {
        "og:title" => &mut metadata.og_title,
        "og:type" => &mut metadata.og_type,
        "og:description" => &mut metadata.og_description,
        "og:url" => &mut metadata.og_url,
        "og:site_name" => &mut metadata.og_site_name,
        "og:locale" => &mut metadata.og_locale,
        "og:determiner" => &mut metadata.og_determiner,
        "twitter:card" => &mut metadata.twitter_card,
        "twitter:site" => &mut metadata.twitter_site,
        "twitter:creator" => &mut metadata.twitter_creator,
        "twitter:title" => &mut metadata.twitter_title,
        "twitter:description" => &mut metadata.twitter_description,
        "og:locale:alternate" => {
            metadata.og_locale_alternate.push(value.to_string());
            return;
        }
        _ => {
            if key == "article:published_time" && metadata.og_date.is_none() {
                metadata.og_date = Some(value.to_string());
            }
            if EXTRA_PREFIXES.iter().any(|prefix| key.starts_with(prefix)) {
                metadata
                    .extra
                    .entry(key.to_string())
                    .or_insert_with(|| value.to_string());
            }
            return;
        }
    };
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}

fn collect_custom_tags(
    metadata: &mut OpenGraphMetadata,
    tags: &[(String, String)],
    custom: &[CustomMetaTag],
) {
    for tag in custom {
        let property = tag.property.to_ascii_lowercase();
        let mut values = tags
            .iter()
            .filter(|(key, _)| *key == property)
            .map(|(_, value)| value.clone());
        let collected = if tag.multiple {
            let all: Vec<String> = values.collect();
            (!all.is_empty()).then_some(CustomMetaValue::Multiple(all))
        } else {
            values.next().map(CustomMetaValue::Single)
        };
        if let Some(value) = collected {
            metadata
                .custom_meta_tags
                .insert(tag.field_name.clone(), value);
        }
    }
}
