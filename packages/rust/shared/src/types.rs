//! Core domain types shared across holocron crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// One of the six catalog entity kinds ingested from the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Films,
    Characters,
    Planets,
    Species,
    Starships,
    Vehicles,
}

impl EntityKind {
    /// Every kind, in the order a full seed run processes them.
    pub const ALL: [EntityKind; 6] = [
        Self::Films,
        Self::Characters,
        Self::Planets,
        Self::Species,
        Self::Starships,
        Self::Vehicles,
    ];

    /// Stable lowercase name used in config keys, CLI arguments and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Films => "films",
            Self::Characters => "characters",
            Self::Planets => "planets",
            Self::Species => "species",
            Self::Starships => "starships",
            Self::Vehicles => "vehicles",
        }
    }

    /// Name of the document collection this kind is seeded into.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Films => "movies_raw",
            Self::Characters => "characters_raw",
            Self::Planets => "planets_raw",
            Self::Species => "species_raw",
            Self::Starships => "starships_raw",
            Self::Vehicles => "vehicles_raw",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == needle)
            .ok_or_else(|| {
                format!(
                    "unknown entity kind '{s}': expected one of films, characters, planets, species, starships, vehicles"
                )
            })
    }
}
