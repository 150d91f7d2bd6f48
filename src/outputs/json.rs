//! JSON run summary.
//!
//! Written only when `--summary-json` is given, so that a cron job or a
//! dashboard can pick up the counters of the last pass without parsing logs.

use crate::models::RunSummary;
use crate::utils::ensure_parent_dir;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Write `summary` as pretty-printed JSON to `path`, creating parent
/// directories as needed. An existing file is replaced.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_summary(summary: &RunSummary, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(summary)?;

    ensure_parent_dir(path).await?;
    fs::write(path, json).await?;
    info!("Wrote run summary");
    Ok(())
}
