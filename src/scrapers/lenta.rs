//! Lenta.ru front page and article extraction.
//!
//! # Listing page
//!
//! Article links are anchors whose `href` starts with `/news/`. An anchor
//! only counts when it carries a headline, i.e. its first `h3` or `span`
//! descendant has non-empty text. Candidates keep document order.
//!
//! # Article page
//!
//! The body is every `div.topic-body p` paragraph, stripped and joined with
//! newlines. The cover image is the first `img.topic-cover__image` or
//! lazy-loaded `img[data-src]`, preferring `data-src` over `src`.
//!
//! Nothing here fails: missing markup means an empty body, no image, or no
//! candidates.

use crate::models::{ArticleContent, ListingCandidate};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

static ARTICLE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href^="/news/"]"#).unwrap());
static HEADLINE: Lazy<Selector> = Lazy::new(|| Selector::parse("h3, span").unwrap());
static BODY_PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("div.topic-body p").unwrap());
static COVER_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img.topic-cover__image, img[data-src]").unwrap());

/// Lazily walk the listing page for article candidates, in document order.
///
/// The iterator borrows `document`; take as many as needed and drop it.
pub fn listing_candidates<'a>(
    document: &'a Html,
    base: &'a Url,
) -> impl Iterator<Item = ListingCandidate> + 'a {
    document.select(&ARTICLE_LINK).filter_map(move |anchor| {
        let href = anchor.value().attr("href")?;
        let headline = anchor.select(&HEADLINE).next()?;
        let title = stripped_text(headline);
        if title.is_empty() {
            return None;
        }
        let url = resolve(base, href)?;
        Some(ListingCandidate { title, url })
    })
}

/// Parse the listing page and return at most `limit` candidates.
#[instrument(level = "info", skip_all, fields(base = %base, limit = limit))]
pub fn extract_listing(html: &str, base: &Url, limit: usize) -> Vec<ListingCandidate> {
    let document = Html::parse_document(html);
    let candidates: Vec<ListingCandidate> =
        listing_candidates(&document, base).take(limit).collect();
    debug!(count = candidates.len(), "Extracted listing candidates");
    candidates
}

/// Parse an article page into its body text and cover image.
#[instrument(level = "debug", skip_all)]
pub fn extract_article(html: &str, base: &Url) -> ArticleContent {
    let document = Html::parse_document(html);

    let body_text = document
        .select(&BODY_PARAGRAPH)
        .map(stripped_text)
        .collect::<Vec<_>>()
        .join("\n");

    let image_url = document.select(&COVER_IMAGE).next().and_then(|img| {
        let src = img
            .value()
            .attr("data-src")
            .filter(|s| !s.is_empty())
            .or_else(|| img.value().attr("src"))
            .filter(|s| !s.is_empty())?;
        resolve(base, src)
    });

    debug!(bytes = body_text.len(), has_image = image_url.is_some(), "Parsed article");
    ArticleContent { body_text, image_url }
}

/// Text of an element with each text node trimmed and empty ones dropped.
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Absolute form of a link found on the page.
///
/// A value with a scheme is already absolute and kept verbatim; anything else
/// (root-relative, protocol-relative, relative) is joined onto `base`.
fn resolve(base: &Url, link: &str) -> Option<String> {
    match Url::parse(link) {
        Ok(_) => Some(link.to_string()),
        Err(_) => base.join(link).ok().map(String::from),
    }
}
