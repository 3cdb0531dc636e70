//! CLI entry point for the ogscraper tool.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use ogscraper_core::{ScrapeResult, Scraper};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let options = args.to_scrape_options()?;
    let scraper = Scraper::new();

    match scraper.scrape(options).await {
        Ok(result) => {
            info!(success = result.og_object.success, "scrape finished");
            println!("{}", render(result, args.pretty, args.include_body)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            debug!(kind = %error.kind(), "scrape failed");
            eprintln!("Error: {error}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn render(mut result: ScrapeResult, pretty: bool, include_body: bool) -> Result<String> {
    if !include_body {
        result.response.body.clear();
    }
    let json = if pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    };
    json.context("failed to serialize scrape result")
}
