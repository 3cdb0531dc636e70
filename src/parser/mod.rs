//! Target URL parsing: validation rules and normalization.
//!
//! # Example
//!
//! ```
//! use ogscraper_core::parser::{UrlValidatorSettings, validate_and_format_url};
//!
//! let url = validate_and_format_url("https://Example.com", &UrlValidatorSettings::default());
//! assert_eq!(url.as_deref(), Some("https://example.com/"));
//! ```

mod error;
mod url;

pub use error::{MAX_URL_LENGTH, UrlRejection};
pub use url::{UrlValidatorSettings, validate_and_format_url};
