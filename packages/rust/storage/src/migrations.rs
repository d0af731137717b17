//! SQL migration definitions for the holocron document store.
//!
//! Migrations are applied in order on database open. Each migration has a
//! version number and a batch of SQL statements.

/// A database migration with a version and SQL statements.
pub(crate) struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All migrations, in ascending version order.
pub(crate) fn all_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "Initial schema: documents grouped by collection",
        sql: r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version    INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- One row per seeded document. `position` preserves batch order.
CREATE TABLE IF NOT EXISTS documents (
    row_id      TEXT PRIMARY KEY,
    collection  TEXT NOT NULL,
    doc_id      TEXT,
    position    INTEGER NOT NULL,
    body        TEXT NOT NULL,
    inserted_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, position);
CREATE INDEX IF NOT EXISTS idx_documents_doc_id ON documents(collection, doc_id);

INSERT INTO schema_migrations (version) VALUES (1);
"#,
    }]
}
