//! Seed and status operations over the document store.
//!
//! A seed fully replaces a kind's collection: `delete_all` then
//! `insert_many`, as two separate storage calls. A failure between the two
//! leaves the collection empty until the next successful seed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{info, instrument};

use holocron_shared::{EntityKind, Result};
use holocron_storage::Storage;

use crate::pipeline::Pipeline;

/// Counts reported after a collection was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub kind: EntityKind,
    pub collection: &'static str,
    pub deleted: u64,
    pub inserted: usize,
    /// Row id of the first inserted document.
    pub sample_id: Option<String>,
    /// SHA-256 of the serialized batch.
    pub digest: String,
}

/// Outcome of seeding one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SeedOutcome {
    /// The pipeline produced no documents. Storage was not touched.
    NoData { kind: EntityKind },
    Seeded(SeedReport),
}

/// Document count of a collection at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStatus {
    pub kind: EntityKind,
    pub collection: &'static str,
    pub count: u64,
    pub has_data: bool,
    pub checked_at: DateTime<Utc>,
}

/// Run the pipeline for `kind` and replace its collection with the result.
#[instrument(skip_all, fields(kind = %kind))]
pub async fn seed(kind: EntityKind, pipeline: &Pipeline, storage: &Storage) -> Result<SeedOutcome> {
    let documents = pipeline.documents(kind).await?;
    if documents.is_empty() {
        info!("no data returned, collection left untouched");
        return Ok(SeedOutcome::NoData { kind });
    }

    let collection = kind.collection();
    let digest = batch_digest(&documents)?;

    let deleted = storage.delete_all(collection).await?;
    let row_ids = storage.insert_many(collection, &documents).await?;

    info!(collection, deleted, inserted = row_ids.len(), %digest, "collection replaced");
    Ok(SeedOutcome::Seeded(SeedReport {
        kind,
        collection,
        deleted,
        inserted: row_ids.len(),
        sample_id: row_ids.into_iter().next(),
        digest,
    }))
}

/// Current document count of `kind`'s collection.
pub async fn status(kind: EntityKind, storage: &Storage) -> Result<CollectionStatus> {
    let collection = kind.collection();
    let count = storage.count(collection).await?;
    Ok(CollectionStatus {
        kind,
        collection,
        count,
        has_data: count > 0,
        checked_at: Utc::now(),
    })
}

/// Hex SHA-256 over the serialized batch. Equal digests mean byte-identical batches.
pub fn batch_digest(documents: &[Value]) -> Result<String> {
    let bytes = serde_json::to_vec(documents)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use holocron_shared::{KindOverrides, PipelineConfig};
    use serde_json::json;
    use uuid::Uuid;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn temp_storage() -> Storage {
        let tmp = std::env::temp_dir().join(format!("holocron_seed_{}.db", Uuid::now_v7()));
        Storage::open(&tmp).await.unwrap()
    }

    fn pipeline(server: &MockServer) -> Pipeline {
        let no_delay = KindOverrides {
            delay_ms: Some(0),
            ..KindOverrides::default()
        };
        let config = PipelineConfig {
            swapi_base_url: format!("{}/api", server.uri()),
            wiki_base_url: format!("{}/wiki", server.uri()),
            overrides: EntityKind::ALL
                .into_iter()
                .map(|kind| (kind, no_delay.clone()))
                .collect::<BTreeMap<_, _>>(),
            ..PipelineConfig::default()
        };
        Pipeline::new(config).unwrap()
    }

    async fn mount_films(server: &MockServer, episode_id: i64) {
        Mock::given(method("GET"))
            .and(path("/api/films"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "url": "https://swapi.info/api/films/2",
                "title": "The Empire Strikes Back",
                "episode_id": episode_id,
                "planets": ["https://swapi.info/api/planets/4/"],
            }])))
            .mount(server)
            .await;
    }

    #[test]
    fn digest_tracks_content() {
        let a = vec![json!({"id": "planet_1"})];
        let b = vec![json!({"id": "planet_2"})];
        assert_eq!(batch_digest(&a).unwrap(), batch_digest(&a.clone()).unwrap());
        assert_ne!(batch_digest(&a).unwrap(), batch_digest(&b).unwrap());
        assert_eq!(batch_digest(&a).unwrap().len(), 64);
    }

    #[tokio::test]
    async fn empty_pipeline_leaves_collection_untouched() {
        let server = MockServer::start().await;
        mount_films(&server, 7).await;
        let storage = temp_storage().await;
        storage
            .insert_many("planets_raw", &[json!({"id": "planet_9"})])
            .await
            .unwrap();

        let outcome = seed(EntityKind::Planets, &pipeline(&server), &storage).await.unwrap();

        assert_eq!(outcome, SeedOutcome::NoData { kind: EntityKind::Planets });
        assert_eq!(storage.count("planets_raw").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn seed_replaces_collection() {
        let server = MockServer::start().await;
        mount_films(&server, 5).await;
        Mock::given(method("GET"))
            .and(path("/api/planets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"url": "https://swapi.info/api/planets/1", "name": "Tatooine"},
                {"url": "https://swapi.info/api/planets/4", "name": "Hoth"},
            ])))
            .mount(&server)
            .await;

        let storage = temp_storage().await;
        storage
            .insert_many("planets_raw", &[json!({"id": "stale_1"}), json!({"id": "stale_2"})])
            .await
            .unwrap();

        let pipeline = pipeline(&server);
        let SeedOutcome::Seeded(first) = seed(EntityKind::Planets, &pipeline, &storage).await.unwrap() else {
            panic!("expected a seeded outcome");
        };
        assert_eq!(first.collection, "planets_raw");
        assert_eq!(first.deleted, 2);
        assert_eq!(first.inserted, 1);
        assert!(first.sample_id.is_some());

        let hoth = storage.get_document("planets_raw", "planet_4").await.unwrap().unwrap();
        assert_eq!(hoth["name"], "Hoth");
        assert_eq!(
            hoth["wiki_description"],
            "Geological data available, but history description missing."
        );
        assert!(storage.get_document("planets_raw", "stale_1").await.unwrap().is_none());

        let SeedOutcome::Seeded(second) = seed(EntityKind::Planets, &pipeline, &storage).await.unwrap() else {
            panic!("expected a seeded outcome");
        };
        assert_eq!(second.deleted, 1);
        assert_eq!(second.digest, first.digest);

        let status = status(EntityKind::Planets, &storage).await.unwrap();
        assert_eq!(status.count, 1);
        assert!(status.has_data);
    }

    #[tokio::test]
    async fn status_of_empty_collection() {
        let storage = temp_storage().await;
        let status = status(EntityKind::Vehicles, &storage).await.unwrap();
        assert_eq!(status.collection, "vehicles_raw");
        assert_eq!(status.count, 0);
        assert!(!status.has_data);
    }
}
