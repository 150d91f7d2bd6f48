//! Small helpers shared by the pipeline and the store.
//!
//! - Character-safe string truncation for log output
//! - Creating the directory that will hold the SQLite file

use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Truncate a string for logging purposes.
///
/// Keeps at most `max` characters (not bytes, headlines are often Cyrillic)
/// and appends an ellipsis when anything was cut.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 50), "short");
/// assert_eq!(truncate_for_log("Привет, мир", 6), "Привет...");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}...", &s[..cut]),
    }
}

/// Ensure the directory that will contain `file` exists.
///
/// A bare file name (`news.db`) lives in the working directory and needs
/// nothing.
#[instrument(level = "debug", skip_all, fields(path = %file.display()))]
pub async fn ensure_parent_dir(file: &Path) -> io::Result<()> {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await?;
            debug!(dir = %parent.display(), "Database directory ready");
            Ok(())
        }
        _ => Ok(()),
    }
}
