//! Data models for harvested articles and run reporting.
//!
//! - [`ListingCandidate`]: a (title, link) pair found on the front page
//! - [`ArticleContent`]: what article-mode extraction pulls out of a story page
//! - [`NewsRecord`]: one row about to be written to the `news` table
//! - [`RunSummary`]: counters describing a single harvesting pass

use crate::fingerprint::fingerprint;
use serde::Serialize;
use std::fmt;

/// A link to an article as found on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCandidate {
    /// Headline text with surrounding whitespace stripped. Never empty.
    pub title: String,
    /// Absolute article URL, resolved against the site base.
    pub url: String,
}

/// Body text and cover image pulled out of an article page.
///
/// Both fields are permissive: a page without the expected markup gives an
/// empty body and no image rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleContent {
    /// Paragraph texts joined with `\n`, in document order.
    pub body_text: String,
    /// Absolute cover image URL, if one was found.
    pub image_url: Option<String>,
}

/// One news item ready to be persisted.
///
/// The fingerprint is derived from `source_url` at construction time so the
/// two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRecord {
    pub title: String,
    /// The article URL exactly as observed (not normalized).
    pub source_url: String,
    pub fingerprint: String,
    pub body_text: String,
    pub image_url: Option<String>,
}

impl NewsRecord {
    pub fn new(
        title: impl Into<String>,
        source_url: impl Into<String>,
        content: ArticleContent,
    ) -> Self {
        let source_url = source_url.into();
        Self {
            title: title.into(),
            fingerprint: fingerprint(&source_url),
            source_url,
            body_text: content.body_text,
            image_url: content.image_url,
        }
    }
}

/// Outcome of one harvesting pass.
///
/// Serialized as-is when `--summary-json` is given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub listing_url: String,
    pub started_at: String,
    /// Listing candidates that were processed.
    pub candidates: usize,
    /// Records written for a fingerprint not seen before.
    pub inserted: usize,
    /// Records dropped because their fingerprint was already stored.
    pub duplicates: usize,
    /// Articles whose fetch failed and were stored with a placeholder body.
    pub placeholder_bodies: usize,
    /// Records that could not be written at all.
    pub store_failures: usize,
    /// Set when the listing page could not be fetched and nothing was done.
    pub listing_error: Option<String>,
    /// Rows in the `news` table after the pass, when it could be counted.
    pub total_records: Option<i64>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(err) = &self.listing_error {
            return write!(
                f,
                "Listing page {} unavailable ({err}); nothing harvested",
                self.listing_url
            );
        }
        write!(
            f,
            "Processed {} articles: {} new, {} already stored, {} placeholder bodies, {} failed to save",
            self.candidates,
            self.inserted,
            self.duplicates,
            self.placeholder_bodies,
            self.store_failures
        )?;
        if let Some(total) = self.total_records {
            write!(f, "; {total} records in store")?;
        }
        Ok(())
    }
}
