//! Embedded libSQL document store.
//!
//! The [`Storage`] struct keeps seeded documents as JSON rows grouped into
//! named collections (`movies_raw`, `characters_raw`, ...).
//!
//! **Replace semantics:** a seed is [`Storage::delete_all`] followed by
//! [`Storage::insert_many`]. The two steps are separate calls with
//! no transaction spanning them; a crash in between leaves the collection
//! empty until the next seed.

mod migrations;

use std::path::Path;

use chrono::Utc;
use holocron_shared::{HolocronError, Result};
use libsql::{Connection, Database, params};
use serde_json::Value;
use uuid::Uuid;

/// Primary storage handle wrapping a libSQL database.
pub struct Storage {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
    readonly: bool,
}

impl Storage {
    /// Open or create a database at `path` in read-write mode.
    pub async fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| HolocronError::io(parent, e))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| HolocronError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| HolocronError::Storage(e.to_string()))?;

        let storage = Self {
            db,
            conn,
            readonly: false,
        };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Open an existing database at `path` in read-only mode (for status checks).
    pub async fn open_readonly(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HolocronError::Storage(format!(
                "database not found at {}",
                path.display()
            )));
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| HolocronError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| HolocronError::Storage(e.to_string()))?;

        Ok(Self {
            db,
            conn,
            readonly: true,
        })
    }

    /// Run pending schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version().await;

        for migration in migrations::all_migrations() {
            if migration.version > current_version {
                tracing::info!(
                    version = migration.version,
                    description = migration.description,
                    "applying migration"
                );
                self.conn.execute_batch(migration.sql).await.map_err(|e| {
                    HolocronError::Storage(format!("migration v{} failed: {e}", migration.version))
                })?;
            }
        }
        Ok(())
    }

    /// Get the current schema version, or 0 if no migrations have been applied.
    async fn get_schema_version(&self) -> u32 {
        let result = self
            .conn
            .query("SELECT MAX(version) FROM schema_migrations", params![])
            .await;

        match result {
            Ok(mut rows) => {
                if let Ok(Some(row)) = rows.next().await {
                    row.get::<u32>(0).unwrap_or(0)
                } else {
                    0
                }
            }
            Err(_) => 0, // Table doesn't exist yet
        }
    }

    /// Ensure we're in read-write mode before writing.
    fn check_writable(&self) -> Result<()> {
        if self.readonly {
            return Err(HolocronError::Storage(
                "database is opened in read-only mode".into(),
            ));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Collection operations
    // -----------------------------------------------------------------------

    /// Delete every document in `collection`. Returns the number removed.
    pub async fn delete_all(&self, collection: &str) -> Result<u64> {
        self.check_writable()?;
        let deleted = self
            .conn
            .execute(
                "DELETE FROM documents WHERE collection = ?1",
                params![collection],
            )
            .await
            .map_err(|e| HolocronError::Storage(e.to_string()))?;

        tracing::debug!(collection, deleted, "collection cleared");
        Ok(deleted)
    }

    /// Append `docs` to `collection` in order. Returns the generated row ids.
    ///
    /// A document's `id` field, when it is a string, is indexed as `doc_id`.
    pub async fn insert_many(&self, collection: &str, docs: &[Value]) -> Result<Vec<String>> {
        self.check_writable()?;
        let now = Utc::now().to_rfc3339();
        let offset = self.count(collection).await? as i64;
        let mut row_ids = Vec::with_capacity(docs.len());

        for (i, doc) in docs.iter().enumerate() {
            let row_id = Uuid::now_v7().to_string();
            let doc_id = doc.get("id").and_then(Value::as_str);
            let body = serde_json::to_string(doc)?;

            self.conn
                .execute(
                    "INSERT INTO documents (row_id, collection, doc_id, position, body, inserted_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        row_id.as_str(),
                        collection,
                        doc_id,
                        offset + i as i64,
                        body.as_str(),
                        now.as_str()
                    ],
                )
                .await
                .map_err(|e| HolocronError::Storage(e.to_string()))?;

            row_ids.push(row_id);
        }

        tracing::debug!(collection, inserted = row_ids.len(), "documents inserted");
        Ok(row_ids)
    }

    /// Number of documents in `collection`.
    pub async fn count(&self, collection: &str) -> Result<u64> {
        let mut rows = self
            .conn
            .query(
                "SELECT COUNT(*) FROM documents WHERE collection = ?1",
                params![collection],
            )
            .await
            .map_err(|e| HolocronError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let n = row
                    .get::<i64>(0)
                    .map_err(|e| HolocronError::Storage(e.to_string()))?;
                Ok(n.max(0) as u64)
            }
            Ok(None) => Ok(0),
            Err(e) => Err(HolocronError::Storage(e.to_string())),
        }
    }

    /// All documents of `collection`, in insertion order.
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Value>> {
        let mut rows = self
            .conn
            .query(
                "SELECT body FROM documents WHERE collection = ?1 ORDER BY position",
                params![collection],
            )
            .await
            .map_err(|e| HolocronError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| HolocronError::Storage(e.to_string()))?
        {
            let body = row
                .get::<String>(0)
                .map_err(|e| HolocronError::Storage(e.to_string()))?;
            results.push(serde_json::from_str(&body)?);
        }
        Ok(results)
    }

    /// Look up one document by its `id` field.
    pub async fn get_document(&self, collection: &str, doc_id: &str) -> Result<Option<Value>> {
        let mut rows = self
            .conn
            .query(
                "SELECT body FROM documents WHERE collection = ?1 AND doc_id = ?2
                 ORDER BY position LIMIT 1",
                params![collection, doc_id],
            )
            .await
            .map_err(|e| HolocronError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let body = row
                    .get::<String>(0)
                    .map_err(|e| HolocronError::Storage(e.to_string()))?;
                Ok(Some(serde_json::from_str(&body)?))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(HolocronError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Create a temp file storage for testing.
    async fn test_storage() -> Storage {
        let tmp = std::env::temp_dir().join(format!("holocron_test_{}.db", Uuid::now_v7()));
        Storage::open(&tmp).await.expect("open test db")
    }

    #[tokio::test]
    async fn open_and_migrate() {
        let storage = test_storage().await;
        assert_eq!(storage.get_schema_version().await, 1);
    }

    #[tokio::test]
    async fn idempotent_migration() {
        let tmp = std::env::temp_dir().join(format!("holocron_test_{}.db", Uuid::now_v7()));
        let s1 = Storage::open(&tmp).await.expect("first open");
        drop(s1);
        let s2 = Storage::open(&tmp).await.expect("second open");
        assert_eq!(s2.get_schema_version().await, 1);
    }

    #[tokio::test]
    async fn insert_preserves_order_and_ids() {
        let storage = test_storage().await;
        let docs = vec![json!({"id": "char_1", "name": "Luke"}), json!({"id": "char_2", "name": "C-3PO"})];

        let row_ids = storage.insert_many("characters_raw", &docs).await.expect("insert");
        assert_eq!(row_ids.len(), 2);
        assert_ne!(row_ids[0], row_ids[1]);

        let stored = storage.list_documents("characters_raw").await.expect("list");
        assert_eq!(stored, docs);

        let luke = storage
            .get_document("characters_raw", "char_1")
            .await
            .expect("get");
        assert_eq!(luke.unwrap()["name"], "Luke");
        assert!(storage.get_document("characters_raw", "char_9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_documents_returns_every_row_in_key_order() {
        let storage = test_storage().await;
        let docs: Vec<_> = (1..=40)
            .map(|i| json!({"id": format!("vehicle_{i}"), "name": "Sand Crawler", "crew": i}))
            .collect();
        storage.insert_many("vehicles_raw", &docs).await.unwrap();

        let stored = storage.list_documents("vehicles_raw").await.unwrap();
        assert_eq!(stored.len(), 40);
        let keys: Vec<_> = stored[39].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["id", "name", "crew"]);
    }

    #[tokio::test]
    async fn list_documents_fails_on_corrupt_row() {
        let storage = test_storage().await;
        storage
            .insert_many("species_raw", &[json!({"id": "species_1"})])
            .await
            .unwrap();
        storage
            .conn
            .execute(
                "INSERT INTO documents (row_id, collection, doc_id, position, body, inserted_at)
                 VALUES ('bad', 'species_raw', NULL, 1, '{not json', 'now')",
                (),
            )
            .await
            .unwrap();

        assert!(storage.list_documents("species_raw").await.is_err());
    }

    #[tokio::test]
    async fn delete_all_is_scoped_to_collection() {
        let storage = test_storage().await;
        storage
            .insert_many("planets_raw", &[json!({"id": "planet_1"}), json!({"id": "planet_2"})])
            .await
            .unwrap();
        storage
            .insert_many("species_raw", &[json!({"id": "species_1"})])
            .await
            .unwrap();

        assert_eq!(storage.delete_all("planets_raw").await.unwrap(), 2);
        assert_eq!(storage.count("planets_raw").await.unwrap(), 0);
        assert_eq!(storage.count("species_raw").await.unwrap(), 1);
        assert_eq!(storage.delete_all("planets_raw").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn replace_is_delete_then_insert() {
        let storage = test_storage().await;
        storage
            .insert_many("movies_raw", &[json!({"id": "film_4"}), json!({"id": "film_5"})])
            .await
            .unwrap();

        let deleted = storage.delete_all("movies_raw").await.unwrap();
        storage
            .insert_many("movies_raw", &[json!({"id": "film_6"})])
            .await
            .unwrap();

        assert_eq!(deleted, 2);
        let ids: Vec<_> = storage
            .list_documents("movies_raw")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["film_6"]);
    }

    #[tokio::test]
    async fn readonly_rejects_writes() {
        let tmp = std::env::temp_dir().join(format!("holocron_test_{}.db", Uuid::now_v7()));
        let rw = Storage::open(&tmp).await.unwrap();
        rw.insert_many("vehicles_raw", &[json!({"id": "vehicle_4"})])
            .await
            .unwrap();
        drop(rw);

        let ro = Storage::open_readonly(&tmp).await.unwrap();
        assert_eq!(ro.count("vehicles_raw").await.unwrap(), 1);
        assert!(ro.delete_all("vehicles_raw").await.is_err());
        assert!(ro.insert_many("vehicles_raw", &[json!({})]).await.is_err());
    }

    #[tokio::test]
    async fn readonly_requires_existing_file() {
        let tmp = std::env::temp_dir().join(format!("holocron_missing_{}.db", Uuid::now_v7()));
        assert!(Storage::open_readonly(&tmp).await.is_err());
    }
}
