//! # Lenta Harvest
//!
//! Fetches the lenta.ru front page, follows up to five article links, and
//! stores each article's headline, body text and cover image in a local
//! SQLite database. Articles are deduplicated by a fingerprint of their
//! normalized URL path, so running the harvester repeatedly never stores the
//! same story twice.
//!
//! ## Usage
//!
//! ```sh
//! lenta_harvest                       # one pass into ./news.db
//! RUST_LOG=debug lenta_harvest --db-path data/news.db --summary-json run.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Store init**: create the `news` table if needed ([`store`])
//! 2. **Listing**: fetch the front page and pick article candidates ([`scrapers`])
//! 3. **Articles**: fetch and parse each article, sequentially, with a fixed pause
//! 4. **Persist**: insert-if-absent keyed by URL fingerprint ([`fingerprint`])
//! 5. **Report**: print a summary line, optionally write it as JSON ([`outputs`])

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod error;
mod fetcher;
mod fingerprint;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod store;
mod utils;

use cli::Cli;
use fetcher::HttpFetcher;
use outputs::json;
use pipeline::Pipeline;
use store::NewsStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("lenta_harvest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let site = match args.site_config() {
        Ok(site) => site,
        Err(e) => {
            error!(base_url = %args.base_url, error = %e, "Base URL is not an absolute URL");
            return Err(e.into());
        }
    };

    let store = NewsStore::new(&args.db_path);
    let fetcher = HttpFetcher::new(&site)?;
    info!(
        db = %store.path().display(),
        site = %site.base_url,
        limit = site.limit,
        delay_ms = site.delay.as_millis() as u64,
        "Harvesting"
    );

    let mut summary = match Pipeline::new(&fetcher, &store, &site).run().await {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Store could not be initialized");
            return Err(e.into());
        }
    };

    match store.count().await {
        Ok(total) => summary.total_records = Some(total),
        Err(e) => warn!(error = %e, "Could not count stored records"),
    }

    println!("{summary}");

    if let Some(path) = &args.summary_json {
        if let Err(e) = json::write_summary(&summary, Path::new(path)).await {
            error!(%path, error = %e, "Failed to write JSON summary");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        "Execution complete"
    );

    Ok(())
}
