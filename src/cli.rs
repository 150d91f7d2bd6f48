//! Command-line interface definitions for the harvester.
//!
//! Every option has a default, so running the binary with no arguments
//! performs the standard single pass against lenta.ru into `./news.db`.
//! Options can also be supplied through environment variables.

use clap::Parser;
use std::time::Duration;
use url::Url;

/// Desktop browser identification sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36";

pub const DEFAULT_BASE_URL: &str = "https://lenta.ru/";

/// Command-line arguments for the harvester.
///
/// # Examples
///
/// ```sh
/// # One pass with the defaults
/// lenta_harvest
///
/// # Different database, faster pacing, JSON report
/// lenta_harvest --db-path /var/lib/news/news.db --delay-ms 250 --summary-json run.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// SQLite database file holding the `news` table
    #[arg(long, env = "NEWS_DB_PATH", default_value = "news.db")]
    pub db_path: String,

    /// Front page to harvest; relative links and images resolve against it
    #[arg(long, env = "NEWS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Maximum number of articles taken from the front page
    #[arg(long, default_value_t = 5)]
    pub limit: usize,

    /// Pause between consecutive articles, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long, env = "NEWS_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Optional file to write the run summary to as JSON
    #[arg(long)]
    pub summary_json: Option<String>,
}

/// Everything the fetcher and pipeline need to know about the target site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Listing page URL, also the base for resolving relative links.
    pub base_url: Url,
    pub user_agent: String,
    pub timeout: Duration,
    /// Maximum number of listing candidates processed per run.
    pub limit: usize,
    /// Fixed pause between consecutive articles.
    pub delay: Duration,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            limit: 5,
            delay: Duration::from_secs(1),
        }
    }
}

impl Cli {
    /// Turn the parsed arguments into a [`SiteConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--base-url` is not an absolute URL.
    pub fn site_config(&self) -> Result<SiteConfig, url::ParseError> {
        Ok(SiteConfig {
            base_url: Url::parse(&self.base_url)?,
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            limit: self.limit,
            delay: Duration::from_millis(self.delay_ms),
        })
    }
}
