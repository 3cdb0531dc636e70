//! CLI argument definitions using clap derive macros.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ogscraper_core::ScrapeOptions;

/// Fetch a web page and print its Open Graph metadata as JSON.
///
/// Pass a URL, or `--html-file` to extract from a local document instead.
#[derive(Parser, Debug)]
#[command(name = "ogscraper")]
#[command(author, version, about)]
pub struct Args {
    /// Page to scrape
    pub url: Option<String>,

    /// Read HTML from this file instead of fetching a URL
    #[arg(long, value_name = "PATH")]
    pub html_file: Option<PathBuf>,

    /// JSON file with scrape options (camelCase keys); flags override it
    #[arg(long, value_name = "PATH")]
    pub options: Option<PathBuf>,

    /// Only collect Open Graph tags (no fallbacks, no charset detection)
    #[arg(long)]
    pub only_og: bool,

    /// Maximum body size in bytes before the download is canceled
    #[arg(long, value_name = "BYTES", value_parser = clap::value_parser!(u64).range(1..))]
    pub download_limit: Option<u64>,

    /// Total request timeout in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Bytes of body inspected for a charset declaration
    #[arg(long, value_name = "BYTES")]
    pub peek_size: Option<usize>,

    /// Refuse URLs containing this substring (repeatable)
    #[arg(long, value_name = "SUBSTR")]
    pub blacklist: Vec<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Include the response body in the output
    #[arg(long)]
    pub include_body: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Builds scrape options from the options file (if any) and the flags.
    ///
    /// # Errors
    ///
    /// Returns an error when the options file or the HTML file cannot be read,
    /// or when the options file is not valid JSON.
    pub fn to_scrape_options(&self) -> Result<ScrapeOptions> {
        let mut options = match &self.options {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read options file {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid options file {}", path.display()))?
            }
            None => ScrapeOptions::default(),
        };

        if let Some(url) = &self.url {
            options.url = Some(url.clone());
        }
        if let Some(path) = &self.html_file {
            let html = fs::read_to_string(path)
                .with_context(|| format!("failed to read HTML file {}", path.display()))?;
            options.html = Some(html);
        }
        if self.only_og {
            options.only_get_open_graph_info = true;
        }
        if let Some(limit) = self.download_limit {
            options.download_limit = limit;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            options.timeout_ms = timeout_ms;
        }
        if let Some(peek_size) = self.peek_size {
            options.peek_size = peek_size;
        }
        options.blacklist.extend(self.blacklist.iter().cloned());

        Ok(options)
    }
}
