//! Local checks a target URL must pass before any network access.
//!
//! [`check_url`] chains them in a fixed order and stops at the first failure:
//!
//! 1. validation and normalization → `InvalidInput`
//! 2. extension check → `NonHtmlResource`
//! 3. blacklist → `Blacklisted`

mod blacklist;
mod content_type;

pub use blacklist::is_blacklisted;
pub use content_type::is_non_html_url;

use tracing::debug;

use crate::error::ScrapeError;
use crate::options::PolicyOptions;
use crate::parser::validate_and_format_url;

/// Runs every gate on `raw` and returns the normalized URL.
///
/// # Errors
///
/// Returns the error of the first gate that rejects the URL.
pub fn check_url(raw: Option<&str>, policy: &PolicyOptions) -> Result<String, ScrapeError> {
    let url = validate(raw, policy)?;
    reject_non_html(&url)?;
    reject_blacklisted(&url, &policy.blacklist)?;
    Ok(url)
}

fn validate(raw: Option<&str>, policy: &PolicyOptions) -> Result<String, ScrapeError> {
    raw.and_then(|raw| validate_and_format_url(raw, &policy.url_validator_settings))
        .ok_or_else(ScrapeError::invalid_url)
}

fn reject_non_html(url: &str) -> Result<(), ScrapeError> {
    if is_non_html_url(url) {
        debug!(url, "rejected by extension");
        return Err(ScrapeError::NonHtmlResource);
    }
    Ok(())
}

fn reject_blacklisted(url: &str, blacklist: &[String]) -> Result<(), ScrapeError> {
    if is_blacklisted(url, blacklist) {
        debug!(url, "rejected by blacklist");
        return Err(ScrapeError::Blacklisted);
    }
    Ok(())
}
