//! Persisted document shapes and the normalizer that builds them.
//!
//! Struct field order is serialization order. Foreign-key lists hold bare
//! upstream ids (`"1"`), while a document's own `id` carries the kind prefix
//! (`"char_1"`).

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use holocron_shared::EntityKind;

use crate::profile::SOURCE_TAG;
use crate::records::{
    FilmRecord, PersonRecord, PlanetRecord, SpeciesRecord, StarshipRecord, VehicleRecord,
};
use crate::reference::{resolve_all, resolve_optional, resolve_reference};

/// Identity of a document: prefixed id and the raw upstream id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocIds {
    pub id: String,
    pub original_swapi_id: String,
}

/// A catalog record of a kind scoped through film references.
///
/// Films are scoped by episode instead and are normalized by
/// [`FilmRecord::normalize`].
pub trait ReferencedEntity: DeserializeOwned {
    type Document: Serialize;

    const KIND: EntityKind;

    /// The record's own resource URL.
    fn url(&self) -> &str;

    /// Display name used for the wiki slug.
    fn name(&self) -> &str;

    /// Build the persisted document.
    fn normalize(self, ids: DocIds, wiki_text: String) -> Self::Document;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilmDocument {
    pub id: String,
    pub original_swapi_id: Option<String>,
    pub title: String,
    pub episode_id: i64,
    pub director: Option<Value>,
    pub release_date: Option<Value>,
    pub opening_crawl: Option<Value>,
    pub wiki_plot: String,
    pub character_ids: Vec<String>,
    pub planet_ids: Vec<String>,
    pub starship_ids: Vec<String>,
    pub vehicle_ids: Vec<String>,
    pub species_ids: Vec<String>,
    pub source: &'static str,
}

impl FilmRecord {
    /// Build the film document. CRLF line breaks in a string crawl become spaces.
    pub fn normalize(self, id: String, wiki_plot: String) -> FilmDocument {
        FilmDocument {
            id,
            original_swapi_id: self.url.as_deref().and_then(resolve_reference),
            title: self.title,
            episode_id: self.episode_id,
            director: self.director,
            release_date: self.release_date,
            opening_crawl: self.opening_crawl.map(|crawl| match crawl {
                Value::String(text) => Value::String(text.replace("\r\n", " ")),
                other => other,
            }),
            wiki_plot,
            character_ids: resolve_all(&self.characters),
            planet_ids: resolve_all(&self.planets),
            starship_ids: resolve_all(&self.starships),
            vehicle_ids: resolve_all(&self.vehicles),
            species_ids: resolve_all(&self.species),
            source: SOURCE_TAG,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterDocument {
    pub id: String,
    pub original_swapi_id: String,
    pub name: String,
    pub wiki_description: String,
    pub birth_year: Option<Value>,
    pub gender: Option<Value>,
    pub height: Option<Value>,
    pub mass: Option<Value>,
    pub homeworld_id: Option<String>,
    pub species_ids: Vec<String>,
    pub film_ids: Vec<String>,
    pub starship_ids: Vec<String>,
    pub vehicle_ids: Vec<String>,
    pub source: &'static str,
}

impl ReferencedEntity for PersonRecord {
    type Document = CharacterDocument;

    const KIND: EntityKind = EntityKind::Characters;

    fn url(&self) -> &str {
        &self.url
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn normalize(self, ids: DocIds, wiki_text: String) -> CharacterDocument {
        CharacterDocument {
            id: ids.id,
            original_swapi_id: ids.original_swapi_id,
            name: self.name,
            wiki_description: wiki_text,
            birth_year: self.birth_year,
            gender: self.gender,
            height: self.height,
            mass: self.mass,
            homeworld_id: resolve_optional(self.homeworld.as_deref()),
            species_ids: resolve_all(&self.species),
            film_ids: resolve_all(&self.films),
            starship_ids: resolve_all(&self.starships),
            vehicle_ids: resolve_all(&self.vehicles),
            source: SOURCE_TAG,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetDocument {
    pub id: String,
    pub original_swapi_id: String,
    pub name: String,
    pub rotation_period: Option<Value>,
    pub orbital_period: Option<Value>,
    pub diameter: Option<Value>,
    pub climate: Option<Value>,
    pub gravity: Option<Value>,
    pub terrain: Option<Value>,
    pub surface_water: Option<Value>,
    pub population: Option<Value>,
    pub wiki_description: String,
    pub film_ids: Vec<String>,
    pub resident_ids: Vec<String>,
    pub source: &'static str,
}

impl ReferencedEntity for PlanetRecord {
    type Document = PlanetDocument;

    const KIND: EntityKind = EntityKind::Planets;

    fn url(&self) -> &str {
        &self.url
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn normalize(self, ids: DocIds, wiki_text: String) -> PlanetDocument {
        PlanetDocument {
            id: ids.id,
            original_swapi_id: ids.original_swapi_id,
            name: self.name,
            rotation_period: self.rotation_period,
            orbital_period: self.orbital_period,
            diameter: self.diameter,
            climate: self.climate,
            gravity: self.gravity,
            terrain: self.terrain,
            surface_water: self.surface_water,
            population: self.population,
            wiki_description: wiki_text,
            film_ids: resolve_all(&self.films),
            resident_ids: resolve_all(&self.residents),
            source: SOURCE_TAG,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesDocument {
    pub id: String,
    pub original_swapi_id: String,
    pub name: String,
    pub classification: Option<Value>,
    pub designation: Option<Value>,
    pub average_height: Option<Value>,
    pub average_lifespan: Option<Value>,
    pub language: Option<Value>,
    pub skin_colors: Option<Value>,
    pub wiki_description: String,
    pub homeworld_id: Option<String>,
    pub people_ids: Vec<String>,
    pub film_ids: Vec<String>,
    pub source: &'static str,
}

impl ReferencedEntity for SpeciesRecord {
    type Document = SpeciesDocument;

    const KIND: EntityKind = EntityKind::Species;

    fn url(&self) -> &str {
        &self.url
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn normalize(self, ids: DocIds, wiki_text: String) -> SpeciesDocument {
        SpeciesDocument {
            id: ids.id,
            original_swapi_id: ids.original_swapi_id,
            name: self.name,
            classification: self.classification,
            designation: self.designation,
            average_height: self.average_height,
            average_lifespan: self.average_lifespan,
            language: self.language,
            skin_colors: self.skin_colors,
            wiki_description: wiki_text,
            homeworld_id: resolve_optional(self.homeworld.as_deref()),
            people_ids: resolve_all(&self.people),
            film_ids: resolve_all(&self.films),
            source: SOURCE_TAG,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarshipDocument {
    pub id: String,
    pub original_swapi_id: String,
    pub name: String,
    pub model: Option<Value>,
    pub manufacturer: Option<Value>,
    pub wiki_description: String,
    pub cost_in_credits: Option<Value>,
    pub length: Option<Value>,
    pub max_atmosphering_speed: Option<Value>,
    pub crew: Option<Value>,
    pub passengers: Option<Value>,
    pub cargo_capacity: Option<Value>,
    pub hyperdrive_rating: Option<Value>,
    pub starship_class: Option<Value>,
    pub pilot_ids: Vec<String>,
    pub film_ids: Vec<String>,
    pub source: &'static str,
}

impl ReferencedEntity for StarshipRecord {
    type Document = StarshipDocument;

    const KIND: EntityKind = EntityKind::Starships;

    fn url(&self) -> &str {
        &self.url
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn normalize(self, ids: DocIds, wiki_text: String) -> StarshipDocument {
        StarshipDocument {
            id: ids.id,
            original_swapi_id: ids.original_swapi_id,
            name: self.name,
            model: self.model,
            manufacturer: self.manufacturer,
            wiki_description: wiki_text,
            cost_in_credits: self.cost_in_credits,
            length: self.length,
            max_atmosphering_speed: self.max_atmosphering_speed,
            crew: self.crew,
            passengers: self.passengers,
            cargo_capacity: self.cargo_capacity,
            hyperdrive_rating: self.hyperdrive_rating,
            starship_class: self.starship_class,
            pilot_ids: resolve_all(&self.pilots),
            film_ids: resolve_all(&self.films),
            source: SOURCE_TAG,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleDocument {
    pub id: String,
    pub original_swapi_id: String,
    pub name: String,
    pub model: Option<Value>,
    pub manufacturer: Option<Value>,
    pub wiki_description: String,
    pub cost_in_credits: Option<Value>,
    pub length: Option<Value>,
    pub max_atmosphering_speed: Option<Value>,
    pub crew: Option<Value>,
    pub passengers: Option<Value>,
    pub cargo_capacity: Option<Value>,
    pub vehicle_class: Option<Value>,
    pub pilot_ids: Vec<String>,
    pub film_ids: Vec<String>,
    pub source: &'static str,
}

impl ReferencedEntity for VehicleRecord {
    type Document = VehicleDocument;

    const KIND: EntityKind = EntityKind::Vehicles;

    fn url(&self) -> &str {
        &self.url
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn normalize(self, ids: DocIds, wiki_text: String) -> VehicleDocument {
        VehicleDocument {
            id: ids.id,
            original_swapi_id: ids.original_swapi_id,
            name: self.name,
            model: self.model,
            manufacturer: self.manufacturer,
            wiki_description: wiki_text,
            cost_in_credits: self.cost_in_credits,
            length: self.length,
            max_atmosphering_speed: self.max_atmosphering_speed,
            crew: self.crew,
            passengers: self.passengers,
            cargo_capacity: self.cargo_capacity,
            vehicle_class: self.vehicle_class,
            pilot_ids: resolve_all(&self.pilots),
            film_ids: resolve_all(&self.films),
            source: SOURCE_TAG,
        }
    }
}
