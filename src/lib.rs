//! Open Graph scraper core library.
//!
//! This library fetches a web page (or takes HTML directly) and produces a
//! normalized object describing its Open Graph and social-preview metadata.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`options`] - Scrape configuration and its policy/transport split
//! - [`parser`] - Target URL validation and normalization
//! - [`gate`] - Local URL checks run before any network access
//! - [`download`] - Bounded HTTP fetching and fetch error classification
//! - [`extract`] - Meta tag extraction from HTML
//! - [`charset`] - Charset detection and decoding
//! - [`scrape`] - The pipeline tying the above together
//!
//! # Example
//!
//! ```no_run
//! use ogscraper_core::{ScrapeOptions, scrape};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let result = scrape(ScrapeOptions::for_url("https://www.rust-lang.org")).await?;
//! println!("{:?}", result.og_object.metadata.og_title);
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod charset;
pub mod download;
pub mod error;
pub mod extract;
pub mod gate;
pub mod options;
pub mod parser;
pub mod scrape;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use download::{FetchError, FetchResult, Fetcher, HttpFetcher, RawResponse};
pub use error::{ErrorKind, ScrapeError};
pub use extract::{CustomMetaTag, CustomMetaValue, MediaObject, OpenGraphMetadata};
pub use options::{PolicyOptions, ScrapeOptions, TransportOptions, split_options};
pub use parser::{UrlValidatorSettings, validate_and_format_url};
pub use scrape::{OgObject, ScrapeResult, Scraper, scrape};
