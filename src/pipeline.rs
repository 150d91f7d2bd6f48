//! One harvesting pass: listing page, then each article in turn.
//!
//! ```text
//! Init ──► ListingFetched ──► (Fetching ─► Extracting ─► Persisting)* ──► Done
//!   │            │
//!   │            └─ listing fetch failed ──────────────────────────────► Done
//!   └─ store cannot be initialized ──► error
//! ```
//!
//! Article failures never stop the loop. A failed article fetch is stored with
//! a placeholder body and no image; a failed insert is logged and counted.
//! There is no cursor between runs: the next run starts from the listing page
//! again and relies on fingerprint uniqueness to skip what is already stored.

use crate::cli::SiteConfig;
use crate::error::StoreError;
use crate::fetcher::PageFetcher;
use crate::models::{ArticleContent, NewsRecord, RunSummary};
use crate::scrapers::lenta;
use crate::store::{InsertOutcome, NewsStore};
use crate::utils::truncate_for_log;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Longest headline prefix shown in progress lines.
const TITLE_LOG_CHARS: usize = 50;

/// Sequences fetch, extraction and persistence for one run.
pub struct Pipeline<'a, F> {
    fetcher: &'a F,
    store: &'a NewsStore,
    site: &'a SiteConfig,
}

impl<'a, F: PageFetcher> Pipeline<'a, F> {
    pub fn new(fetcher: &'a F, store: &'a NewsStore, site: &'a SiteConfig) -> Self {
        Self { fetcher, store, site }
    }

    /// Run the pass to completion.
    ///
    /// # Errors
    ///
    /// Only when the store cannot be initialized. Every other failure is
    /// reflected in the returned [`RunSummary`].
    #[instrument(level = "info", skip_all, fields(site = %self.site.base_url))]
    pub async fn run(&self) -> Result<RunSummary, StoreError> {
        let mut summary = RunSummary {
            listing_url: self.site.base_url.to_string(),
            started_at: Utc::now().to_rfc3339(),
            ..RunSummary::default()
        };

        self.store.initialize().await?;

        let listing_html = match self.fetcher.fetch_html(self.site.base_url.as_str()).await {
            Ok(html) => html,
            Err(e) => {
                error!(error = %e, "Listing page fetch failed; nothing to do");
                summary.listing_error = Some(e.to_string());
                return Ok(summary);
            }
        };

        let candidates =
            lenta::extract_listing(&listing_html, &self.site.base_url, self.site.limit);
        info!(count = candidates.len(), "Listing candidates found");

        for (i, candidate) in candidates.iter().enumerate() {
            if i > 0 && !self.site.delay.is_zero() {
                sleep(self.site.delay).await;
            }
            summary.candidates += 1;

            let content = match self.fetcher.fetch_html(&candidate.url).await {
                Ok(html) => lenta::extract_article(&html, &self.site.base_url),
                Err(e) => {
                    warn!(
                        url = %candidate.url,
                        error = %e,
                        "Article fetch failed; storing placeholder"
                    );
                    summary.placeholder_bodies += 1;
                    ArticleContent {
                        body_text: format!("Failed to fetch article: {e}"),
                        image_url: None,
                    }
                }
            };

            let record = NewsRecord::new(candidate.title.clone(), candidate.url.clone(), content);
            let title = truncate_for_log(&record.title, TITLE_LOG_CHARS);

            match self.store.insert_if_absent(&record).await {
                Ok(InsertOutcome::Inserted) => {
                    summary.inserted += 1;
                    info!(index = i, %title, fingerprint = %record.fingerprint, "Saved article");
                }
                Ok(InsertOutcome::AlreadyPresent) => {
                    summary.duplicates += 1;
                    info!(
                        index = i,
                        %title,
                        fingerprint = %record.fingerprint,
                        "Already stored; skipped"
                    );
                }
                Err(e) => {
                    summary.store_failures += 1;
                    error!(index = i, %title, error = %e, "Failed to save article");
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::fingerprint::fingerprint;
    use crate::store::testing::find_by_fingerprint;
    use reqwest::StatusCode;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use url::Url;

    /// Serves canned pages; any other URL is a 404.
    #[derive(Default)]
    struct CannedFetcher {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl CannedFetcher {
        fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl PageFetcher for CannedFetcher {
        async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND,
            })
        }
    }

    fn site() -> SiteConfig {
        SiteConfig {
            base_url: Url::parse("https://lenta.ru/").unwrap(),
            delay: Duration::ZERO,
            ..SiteConfig::default()
        }
    }

    fn listing(slugs: &[&str]) -> String {
        slugs
            .iter()
            .map(|slug| format!(r#"<a href="/news/{slug}/"><h3>Title {slug}</h3></a>"#))
            .collect()
    }

    fn article(text: &str) -> String {
        format!(
            r#"<img class="topic-cover__image" src="/img/{text}.jpg"><div class="topic-body"><p>{text}</p></div>"#
        )
    }

    #[tokio::test]
    async fn test_full_pass_stores_each_article() {
        let tmp = tempfile::tempdir().unwrap();
        let store = NewsStore::new(tmp.path().join("news.db"));
        let fetcher = CannedFetcher::default()
            .with_page("https://lenta.ru/", &listing(&["a", "b"]))
            .with_page("https://lenta.ru/news/a/", &article("alpha"))
            .with_page("https://lenta.ru/news/b/", &article("beta"));
        let site = site();

        let summary = Pipeline::new(&fetcher, &store, &site).run().await.unwrap();

        assert_eq!(summary.candidates, 2);
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.duplicates, 0);
        assert!(summary.listing_error.is_none());

        let stored = find_by_fingerprint(&store, &fingerprint("https://lenta.ru/news/a/"))
            .await
            .unwrap();
        assert_eq!(stored.title, "Title a");
        assert_eq!(stored.body_text, "alpha");
        assert_eq!(stored.image_url.as_deref(), Some("https://lenta.ru/img/alpha.jpg"));
    }

    #[tokio::test]
    async fn test_second_run_adds_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = NewsStore::new(tmp.path().join("news.db"));
        let fetcher = CannedFetcher::default()
            .with_page("https://lenta.ru/", &listing(&["a"]))
            .with_page("https://lenta.ru/news/a/", &article("alpha"));
        let site = site();
        let pipeline = Pipeline::new(&fetcher, &store, &site);

        pipeline.run().await.unwrap();
        let again = pipeline.run().await.unwrap();

        assert_eq!(again.inserted, 0);
        assert_eq!(again.duplicates, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_article_fetch_failure_stores_placeholder_and_continues() {
        let tmp = tempfile::tempdir().unwrap();
        let store = NewsStore::new(tmp.path().join("news.db"));
        let fetcher = CannedFetcher::default()
            .with_page("https://lenta.ru/", &listing(&["gone", "b"]))
            .with_page("https://lenta.ru/news/b/", &article("beta"));
        let site = site();

        let summary = Pipeline::new(&fetcher, &store, &site).run().await.unwrap();

        assert_eq!(summary.candidates, 2);
        assert_eq!(summary.placeholder_bodies, 1);
        assert_eq!(summary.inserted, 2);

        let failed = find_by_fingerprint(&store, &fingerprint("https://lenta.ru/news/gone/"))
            .await
            .unwrap();
        assert!(failed.body_text.starts_with("Failed to fetch article:"));
        assert!(failed.body_text.contains("404"));
        assert_eq!(failed.image_url, None);

        let next = find_by_fingerprint(&store, &fingerprint("https://lenta.ru/news/b/"))
            .await
            .unwrap();
        assert_eq!(next.body_text, "beta");
    }

    #[tokio::test]
    async fn test_listing_failure_ends_run_without_work() {
        let tmp = tempfile::tempdir().unwrap();
        let store = NewsStore::new(tmp.path().join("news.db"));
        let fetcher = CannedFetcher::default();
        let site = site();

        let summary = Pipeline::new(&fetcher, &store, &site).run().await.unwrap();

        assert!(summary.listing_error.as_deref().unwrap().contains("404"));
        assert_eq!(summary.candidates, 0);
        assert_eq!(fetcher.requested(), vec!["https://lenta.ru/".to_string()]);
        // initialization still happened
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_only_first_five_candidates_are_visited() {
        let tmp = tempfile::tempdir().unwrap();
        let store = NewsStore::new(tmp.path().join("news.db"));
        let slugs = ["s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8"];
        let mut fetcher = CannedFetcher::default().with_page("https://lenta.ru/", &listing(&slugs));
        for slug in slugs {
            fetcher = fetcher.with_page(&format!("https://lenta.ru/news/{slug}/"), &article(slug));
        }
        let site = site();

        let summary = Pipeline::new(&fetcher, &store, &site).run().await.unwrap();

        assert_eq!(summary.candidates, 5);
        let requested = fetcher.requested();
        assert_eq!(requested.len(), 6);
        assert_eq!(requested[1], "https://lenta.ru/news/s1/");
        assert_eq!(requested[5], "https://lenta.ru/news/s5/");
    }

    #[tokio::test]
    async fn test_duplicate_links_on_one_page_are_stored_once() {
        let tmp = tempfile::tempdir().unwrap();
        let store = NewsStore::new(tmp.path().join("news.db"));
        let html = r#"
            <a href="/news/2024/ABC/"><h3>First</h3></a>
            <a href="/news/2024/abc"><h3>Second</h3></a>
        "#;
        let fetcher = CannedFetcher::default()
            .with_page("https://lenta.ru/", html)
            .with_page("https://lenta.ru/news/2024/ABC/", &article("one"))
            .with_page("https://lenta.ru/news/2024/abc", &article("two"));
        let site = site();

        let summary = Pipeline::new(&fetcher, &store, &site).run().await.unwrap();

        assert_eq!((summary.inserted, summary.duplicates), (1, 1));
        let stored = find_by_fingerprint(&store, &fingerprint("https://lenta.ru/news/2024/abc"))
            .await
            .unwrap();
        assert_eq!(stored.title, "First");
    }

    #[tokio::test]
    async fn test_fixed_delay_between_articles() {
        let tmp = tempfile::tempdir().unwrap();
        let store = NewsStore::new(tmp.path().join("news.db"));
        let fetcher = CannedFetcher::default()
            .with_page("https://lenta.ru/", &listing(&["a", "b", "c"]))
            .with_page("https://lenta.ru/news/a/", &article("a"))
            .with_page("https://lenta.ru/news/b/", &article("b"))
            .with_page("https://lenta.ru/news/c/", &article("c"));
        let site = SiteConfig {
            delay: Duration::from_millis(60),
            ..site()
        };

        let started = std::time::Instant::now();
        let summary = Pipeline::new(&fetcher, &store, &site).run().await.unwrap();

        assert_eq!(summary.inserted, 3);
        // two pauses: before the second and before the third article
        assert!(started.elapsed() >= Duration::from_millis(120));
    }
}
