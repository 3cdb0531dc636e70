use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use super::types::{MediaObject, OpenGraphMetadata};

#[allow(clippy::expect_used)]
static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("valid selector"));
#[allow(clippy::expect_used)]
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));
#[allow(clippy::expect_used)]
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("link[rel][href]").expect("valid selector"));
#[allow(clippy::expect_used)]
static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[src]").expect("valid selector"));

/// Which repeated media list a property belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MediaKind {
    Image,
    Video,
    Audio,
    TwitterImage,
}

const MEDIA_PREFIXES: [(&str, MediaKind); 4] = [
    ("og:image", MediaKind::Image),
    ("og:video", MediaKind::Video),
    ("og:audio", MediaKind::Audio),
    ("twitter:image", MediaKind::TwitterImage),
];

impl MediaKind {
    /// Splits `og:image:width` into `(Image, Some("width"))`, `og:image` into `(Image, None)`.
    pub(super) fn classify(key: &str) -> Option<(Self, Option<&str>)> {
        MEDIA_PREFIXES.iter().find_map(|(prefix, kind)| {
            let rest = key.strip_prefix(prefix)?;
            if rest.is_empty() {
                Some((*kind, None))
            } else {
                rest.strip_prefix(':').map(|field| (*kind, Some(field)))
            }
        })
    }
}

/// Returns `(key, value)` for every `<meta>` with a name and a value.
///
/// The key is `property`, else `name`, lowercased. The value is `content`,
/// else `value`. Both are trimmed; empty ones are skipped.
pub(super) fn collect_meta_tags(doc: &Html) -> Vec<(String, String)> {
    doc.select(&META_SELECTOR)
        .filter_map(|element| {
            let attrs = element.value();
            let key = attrs
                .attr("property")
                .or_else(|| attrs.attr("name"))?
                .trim()
                .to_ascii_lowercase();
            let value = attrs
                .attr("content")
                .or_else(|| attrs.attr("value"))?
                .trim()
                .to_string();
            (!key.is_empty() && !value.is_empty()).then_some((key, value))
        })
        .collect()
}

pub(super) fn first_value(tags: &[(String, String)], key: &str) -> Option<String> {
    tags.iter()
        .find(|(k, _)| k == key)
        .map(|(_, value)| value.clone())
}

/// Pushes a new entry for `url`, unless the latest entry is still waiting for
/// one or already carries the same URL.
pub(super) fn push_media_url(list: &mut Vec<MediaObject>, url: &str) {
    match list.last_mut() {
        Some(last) if last.url.is_empty() || last.url == url => last.url = url.to_string(),
        _ => list.push(MediaObject::new(url)),
    }
}

pub(super) fn set_media_field(entry: &mut MediaObject, field: &str, value: &str) {
    let slot = match field {
        "secure_url" => &mut entry.secure_url,
        "type" => &mut entry.media_type,
        "width" => &mut entry.width,
        "height" => &mut entry.height,
        "alt" => &mut entry.alt,
        _ => return,
    };
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}

/// Fills missing URLs from `secure_url` and drops entries that still have none.
pub(super) fn finish_media(list: Vec<MediaObject>) -> Vec<MediaObject> {
    list.into_iter()
        .filter_map(|mut entry| {
            if entry.url.is_empty() {
                entry.url = entry.secure_url.clone()?;
            }
            Some(entry)
        })
        .collect()
}

pub(super) fn find_favicon(doc: &Html) -> Option<String> {
    find_link(doc, |rel| rel.split_ascii_whitespace().any(|token| token.eq_ignore_ascii_case("icon")))
}

fn find_link(doc: &Html, rel_matches: impl Fn(&str) -> bool) -> Option<String> {
    doc.select(&LINK_SELECTOR)
        .filter(|element| element.value().attr("rel").is_some_and(&rel_matches))
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())
        .map(str::to_string)
}

/// Fills gaps in the Open Graph set from other page markup.
pub(super) fn apply_fallbacks(metadata: &mut OpenGraphMetadata, doc: &Html, tags: &[(String, String)]) {
    if metadata.og_title.is_none() {
        metadata.og_title = metadata.twitter_title.clone().or_else(|| {
            doc.select(&TITLE_SELECTOR)
                .map(|element| element.text().collect::<String>().trim().to_string())
                .find(|title| !title.is_empty())
        });
    }

    if metadata.og_description.is_none() {
        metadata.og_description = metadata
            .twitter_description
            .clone()
            .or_else(|| first_value(tags, "description"));
    }

    if metadata.og_image.is_empty() {
        if metadata.twitter_image.is_empty() {
            metadata.og_image = doc
                .select(&IMG_SELECTOR)
                .filter_map(|element| {
                    let src = element.value().attr("src")?.trim();
                    (!src.is_empty() && !src.starts_with("data:")).then(|| MediaObject {
                        alt: element
                            .value()
                            .attr("alt")
                            .map(str::trim)
                            .filter(|alt| !alt.is_empty())
                            .map(str::to_string),
                        ..MediaObject::new(src)
                    })
                })
                .take(1)
                .collect();
        } else {
            metadata.og_image = metadata.twitter_image.clone();
        }
    }

    if metadata.og_url.is_none() {
        metadata.og_url = find_link(doc, |rel| rel.eq_ignore_ascii_case("canonical"));
    }

    if metadata.og_locale.is_none() {
        metadata.og_locale = doc
            .root_element()
            .value()
            .attr("lang")
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .map(str::to_string);
    }

    if metadata.og_site_name.is_none() {
        metadata.og_site_name = first_value(tags, "application-name");
    }
}

/// Resolves relative media, favicon and page URLs against `base`.
pub(super) fn resolve_relative_urls(metadata: &mut OpenGraphMetadata, base: &str) {
    let Ok(base) = Url::parse(base) else {
        return;
    };

    let media = metadata
        .og_image
        .iter_mut()
        .chain(metadata.og_video.iter_mut())
        .chain(metadata.og_audio.iter_mut())
        .chain(metadata.twitter_image.iter_mut());
    for entry in media {
        absolutize(&base, &mut entry.url);
        if let Some(secure) = entry.secure_url.as_mut() {
            absolutize(&base, secure);
        }
    }

    for value in [metadata.favicon.as_mut(), metadata.og_url.as_mut()]
        .into_iter()
        .flatten()
    {
        absolutize(&base, value);
    }
}

fn absolutize(base: &Url, value: &mut String) {
    if Url::parse(value).is_ok() {
        return;
    }
    if let Ok(joined) = base.join(value) {
        *value = joined.to_string();
    }
}
