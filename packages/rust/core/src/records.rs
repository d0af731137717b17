//! Raw catalog records as served by the upstream API.
//!
//! Scalars are kept as raw JSON values and copied into documents verbatim;
//! relations are lists of resource URLs. Missing or `null` fields
//! deserialize to `None`/empty.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::scope::FilmReference;

/// A film, the catalog that drives scoping.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilmRecord {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: String,
    pub episode_id: i64,
    #[serde(default)]
    pub director: Option<Value>,
    #[serde(default)]
    pub release_date: Option<Value>,
    #[serde(default)]
    pub opening_crawl: Option<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub characters: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub planets: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub species: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub starships: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub vehicles: Vec<String>,
}

impl FilmRecord {
    /// Reference URLs of one related kind.
    pub fn references(&self, field: FilmReference) -> &[String] {
        match field {
            FilmReference::Characters => &self.characters,
            FilmReference::Planets => &self.planets,
            FilmReference::Species => &self.species,
            FilmReference::Starships => &self.starships,
            FilmReference::Vehicles => &self.vehicles,
        }
    }
}

/// A missing or `null` list is empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A person (`characters` kind).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PersonRecord {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub birth_year: Option<Value>,
    #[serde(default)]
    pub gender: Option<Value>,
    #[serde(default)]
    pub height: Option<Value>,
    #[serde(default)]
    pub mass: Option<Value>,
    #[serde(default)]
    pub homeworld: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub species: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub films: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub starships: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub vehicles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanetRecord {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rotation_period: Option<Value>,
    #[serde(default)]
    pub orbital_period: Option<Value>,
    #[serde(default)]
    pub diameter: Option<Value>,
    #[serde(default)]
    pub climate: Option<Value>,
    #[serde(default)]
    pub gravity: Option<Value>,
    #[serde(default)]
    pub terrain: Option<Value>,
    #[serde(default)]
    pub surface_water: Option<Value>,
    #[serde(default)]
    pub population: Option<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub residents: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub films: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpeciesRecord {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub classification: Option<Value>,
    #[serde(default)]
    pub designation: Option<Value>,
    #[serde(default)]
    pub average_height: Option<Value>,
    #[serde(default)]
    pub average_lifespan: Option<Value>,
    #[serde(default)]
    pub language: Option<Value>,
    #[serde(default)]
    pub skin_colors: Option<Value>,
    #[serde(default)]
    pub homeworld: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub people: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub films: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StarshipRecord {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: Option<Value>,
    #[serde(default)]
    pub manufacturer: Option<Value>,
    #[serde(default)]
    pub cost_in_credits: Option<Value>,
    #[serde(default)]
    pub length: Option<Value>,
    #[serde(default)]
    pub max_atmosphering_speed: Option<Value>,
    #[serde(default)]
    pub crew: Option<Value>,
    #[serde(default)]
    pub passengers: Option<Value>,
    #[serde(default)]
    pub cargo_capacity: Option<Value>,
    #[serde(default)]
    pub hyperdrive_rating: Option<Value>,
    #[serde(default)]
    pub starship_class: Option<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pilots: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub films: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VehicleRecord {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: Option<Value>,
    #[serde(default)]
    pub manufacturer: Option<Value>,
    #[serde(default)]
    pub cost_in_credits: Option<Value>,
    #[serde(default)]
    pub length: Option<Value>,
    #[serde(default)]
    pub max_atmosphering_speed: Option<Value>,
    #[serde(default)]
    pub crew: Option<Value>,
    #[serde(default)]
    pub passengers: Option<Value>,
    #[serde(default)]
    pub cargo_capacity: Option<Value>,
    #[serde(default)]
    pub vehicle_class: Option<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pilots: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub films: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn film_tolerates_missing_relations() {
        let film: FilmRecord = serde_json::from_str(
            r#"{"title": "A New Hope", "episode_id": 4, "characters": ["https://x/people/1/"]}"#,
        )
        .unwrap();
        assert_eq!(film.url, None);
        assert!(film.planets.is_empty());
        assert_eq!(film.references(FilmReference::Characters).len(), 1);
    }

    #[test]
    fn person_null_homeworld() {
        let person: PersonRecord = serde_json::from_str(
            r#"{"url": "https://x/people/2/", "name": "C-3PO", "homeworld": null, "mass": "75"}"#,
        )
        .unwrap();
        assert_eq!(person.homeworld, None);
        assert_eq!(person.mass, Some(Value::from("75")));
        assert_eq!(person.gender, None);
    }

    #[test]
    fn scalars_keep_their_json_type() {
        let person: PersonRecord = serde_json::from_value(json!({
            "url": "https://x/people/2/",
            "name": "C-3PO",
            "height": 167,
            "films": null,
            "species": ["https://x/species/2/"],
        }))
        .unwrap();
        assert_eq!(person.height, Some(json!(167)));
        assert!(person.films.is_empty());
        assert_eq!(person.species.len(), 1);
    }

    #[test]
    fn film_without_title_still_scopes() {
        let film: FilmRecord = serde_json::from_value(json!({
            "episode_id": 2,
            "planets": null,
            "characters": ["https://x/people/1/"],
        }))
        .unwrap();
        assert_eq!(film.title, "");
        assert!(film.planets.is_empty());
        assert_eq!(film.references(FilmReference::Characters).len(), 1);
    }
}
