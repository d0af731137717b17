//! Wiki enrichment: article fetching and lead-paragraph extraction.
//!
//! This crate provides:
//! - [`extract`]: pulls the first qualifying paragraphs out of an article body
//! - [`client`]: fetches articles by slug and degrades every failure to fallback text

pub mod client;
pub mod extract;

pub use client::{EnrichPolicy, WikiClient, WikiText};
pub use extract::{ExtractRules, clean_text, extract_lead_paragraphs};
