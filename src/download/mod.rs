//! Bounded page fetching.
//!
//! This module performs the one network request of a scrape and turns its
//! failures into the public error taxonomy.
//!
//! # Features
//!
//! - Streaming body reads with cancellation past the byte cap
//! - Total request timeout covering connect, headers and body
//! - 5xx statuses and non-HTML content types reported as distinct errors
//! - Charset-aware decoding of the body
//!
//! # Example
//!
//! ```no_run
//! use ogscraper_core::download::{Fetcher, HttpFetcher};
//! use ogscraper_core::{ScrapeOptions, split_options};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (_, transport) = split_options(ScrapeOptions::default())?;
//! let transport = transport.with_url("https://example.com/");
//! let fetched = HttpFetcher::new().fetch(&transport, 1024).await?;
//! println!("{} bytes", fetched.response.body.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod error_mapping;

pub use client::{FetchResult, Fetcher, HttpFetcher, RawResponse};
pub use constants::{CONNECT_TIMEOUT_SECS, DEFAULT_DOWNLOAD_LIMIT, DEFAULT_TIMEOUT_MS};
pub use error::FetchError;
pub use error_mapping::classify_fetch_error;

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, FetchError>` explicitly in function signatures.
