//! Site-specific HTML extraction.
//!
//! Each site module exposes two pure functions over already-fetched HTML:
//!
//! - `extract_listing(html, base, limit)`: article candidates from the front page
//! - `extract_article(html, base)`: body text and cover image of one story
//!
//! Fetching is not their concern; see [`crate::fetcher`].
//!
//! # Supported Sources
//!
//! | Source   | Module    | Listing selector        | Body selector      |
//! |----------|-----------|-------------------------|--------------------|
//! | Lenta.ru | [`lenta`] | `a[href^="/news/"]`     | `div.topic-body p` |

pub mod lenta;
