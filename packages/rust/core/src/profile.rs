//! Per-kind pipeline profiles.
//!
//! One profile per [`EntityKind`] carries everything that differs between
//! the six pipelines. The built-in values are tuned against the live wiki;
//! `[kinds.<kind>]` config entries override them field by field.

use std::time::Duration;

use holocron_shared::{EntityKind, KindOverrides};
use holocron_wiki::{EnrichPolicy, ExtractRules};

use crate::scope::FilmReference;

/// Provenance tag stamped on every document.
pub const SOURCE_TAG: &str = "swapi_plus_wookieepedia";

/// Everything a pipeline run needs to know about one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindProfile {
    pub kind: EntityKind,
    /// Prefix of the document `id`.
    pub id_prefix: &'static str,
    /// Catalog resource name under the API base URL.
    pub resource: &'static str,
    /// Film field that scopes this kind. `None` for films, scoped by episode.
    pub film_reference: Option<FilmReference>,
    /// Paragraphs must be strictly longer than this.
    pub min_paragraph_len: usize,
    pub max_paragraphs: usize,
    /// Pause after each wiki request.
    pub delay: Duration,
    pub fallback_text: String,
}

impl KindProfile {
    /// Built-in profile for `kind`.
    pub fn builtin(kind: EntityKind) -> Self {
        let (id_prefix, resource, film_reference, min_len, max_paragraphs, delay_ms, fallback) =
            match kind {
                EntityKind::Films => ("film_", "films", None, 50, 3, 1000, "No description found."),
                EntityKind::Characters => (
                    "char_",
                    "people",
                    Some(FilmReference::Characters),
                    50,
                    5,
                    500,
                    "Description not found on Wiki.",
                ),
                EntityKind::Planets => (
                    "planet_",
                    "planets",
                    Some(FilmReference::Planets),
                    40,
                    5,
                    500,
                    "Geological data available, but history description missing.",
                ),
                EntityKind::Species => (
                    "species_",
                    "species",
                    Some(FilmReference::Species),
                    40,
                    10,
                    500,
                    "Biological classification exists, but cultural description is missing.",
                ),
                EntityKind::Starships => (
                    "starship_",
                    "starships",
                    Some(FilmReference::Starships),
                    40,
                    5,
                    500,
                    "Technical specifications available, but description not found.",
                ),
                EntityKind::Vehicles => (
                    "vehicle_",
                    "vehicles",
                    Some(FilmReference::Vehicles),
                    40,
                    5,
                    500,
                    "Technical schematics found, but tactical description missing.",
                ),
            };

        Self {
            kind,
            id_prefix,
            resource,
            film_reference,
            min_paragraph_len: min_len,
            max_paragraphs,
            delay: Duration::from_millis(delay_ms),
            fallback_text: fallback.to_string(),
        }
    }

    /// Built-in profile with any configured overrides applied.
    pub fn resolve(kind: EntityKind, overrides: &KindOverrides) -> Self {
        let mut profile = Self::builtin(kind);
        if let Some(min_len) = overrides.min_paragraph_len {
            profile.min_paragraph_len = min_len;
        }
        if let Some(max) = overrides.max_paragraphs {
            profile.max_paragraphs = max;
        }
        if let Some(delay_ms) = overrides.delay_ms {
            profile.delay = Duration::from_millis(delay_ms);
        }
        if let Some(text) = overrides.fallback_text.as_ref().filter(|t| !t.trim().is_empty()) {
            profile.fallback_text = text.clone();
        }
        profile
    }

    /// Document id for an upstream id.
    pub fn document_id(&self, upstream_id: &str) -> String {
        format!("{}{upstream_id}", self.id_prefix)
    }

    /// Enrichment policy handed to the wiki client.
    pub fn enrich_policy(&self) -> EnrichPolicy {
        EnrichPolicy {
            rules: ExtractRules {
                min_len: self.min_paragraph_len,
                max_paragraphs: self.max_paragraphs,
            },
            fallback_text: self.fallback_text.clone(),
        }
    }
}
