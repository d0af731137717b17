//! Entity-resolution and enrichment pipeline for holocron.
//!
//! This crate ties the upstream catalog, the scope filter, slug mapping and
//! wiki enrichment together into one pipeline per entity kind, and exposes
//! the seed operation that replaces a collection with a fresh batch.

pub mod catalog;
pub mod documents;
pub mod pipeline;
pub mod profile;
pub mod records;
pub mod reference;
pub mod scope;
pub mod seed;
pub mod slug;

pub use pipeline::{Pipeline, ProgressReporter, SilentProgress};
pub use seed::{CollectionStatus, SeedOutcome, SeedReport};
