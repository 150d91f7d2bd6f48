//! Run reports written after a harvesting pass.
//!
//! - [`json`]: writes the [`RunSummary`](crate::models::RunSummary) as a JSON file

pub mod json;
