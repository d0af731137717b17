//! Saga scope: which upstream ids appear in episodes 1 to 6.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::records::FilmRecord;
use crate::reference::resolve_reference;

/// Episodes that make up the saga.
pub const SAGA_EPISODES: RangeInclusive<i64> = 1..=6;

/// Set of upstream ids of one kind that are in scope.
pub type ScopeSet = BTreeSet<String>;

/// Film field listing references to one related kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilmReference {
    Characters,
    Planets,
    Species,
    Starships,
    Vehicles,
}

/// Whether a film's episode number falls inside the saga.
pub fn in_saga(episode_id: i64) -> bool {
    SAGA_EPISODES.contains(&episode_id)
}

/// Union of the resolved `field` references of every in-saga film.
///
/// Unresolvable references are skipped.
pub fn scope_ids(films: &[FilmRecord], field: FilmReference) -> ScopeSet {
    films
        .iter()
        .filter(|film| in_saga(film.episode_id))
        .flat_map(|film| film.references(field))
        .filter_map(|url| resolve_reference(url))
        .collect()
}
