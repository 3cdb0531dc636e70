//! Extension-based rejection of URLs that cannot point at an HTML page.

use url::Url;

/// Extensions (lowercase, without the dot) that never serve an HTML page.
const NON_HTML_EXTENSIONS: &[&str] = &[
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp", "rtf", "epub",
    "csv", "txt", "json",
    // images
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "ico", "tif", "tiff", "avif", "heic",
    // audio and video
    "mp3", "wav", "ogg", "oga", "flac", "aac", "m4a", "mp4", "m4v", "mov", "avi", "mkv", "webm",
    "wmv", "flv", "3gp", "mpeg", "mpg",
    // archives and binaries
    "zip", "rar", "7z", "tar", "gz", "tgz", "bz2", "xz", "dmg", "iso", "exe", "msi", "apk",
    "bin",
    // web assets
    "css", "js", "mjs", "map", "wasm", "woff", "woff2", "ttf", "otf", "eot",
];

/// Compound extensions checked before the single trailing one.
const NON_HTML_COMPOUND_EXTENSIONS: &[&str] = &["tar.gz", "tar.bz2", "tar.xz"];

/// Returns `true` when the URL's last path segment carries a non-HTML extension.
///
/// Query string and fragment are ignored; matching is case-insensitive.
///
/// # Examples
///
/// ```
/// use ogscraper_core::gate::is_non_html_url;
///
/// assert!(is_non_html_url("https://example.com/paper.PDF?download=1"));
/// assert!(!is_non_html_url("https://example.com/blog/post"));
/// ```
#[must_use]
pub fn is_non_html_url(url: &str) -> bool {
    let segment = last_path_segment(url).to_ascii_lowercase();
    let Some((_, extension)) = segment.split_once('.') else {
        return false;
    };

    if NON_HTML_COMPOUND_EXTENSIONS
        .iter()
        .any(|compound| segment.ends_with(&format!(".{compound}")))
    {
        return true;
    }

    let last = extension.rsplit('.').next().unwrap_or(extension);
    NON_HTML_EXTENSIONS.contains(&last)
}

fn last_path_segment(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        return parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_string();
    }
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/').next().unwrap_or_default().to_string()
}
