//! Persisted applied-version state.
//!
//! The history collection is the durable source of truth for which
//! migrations have run; the in-process registry only declares what could
//! run. The engine talks to it through [`HistoryStore`] so the reconcile
//! logic stays independent of the wire protocol.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};

use crate::error::MigrateError;

/// One successfully applied migration, as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    pub version: u64,
    pub description: String,
}

/// Store contract: read all entries, append one, delete one by version.
/// Each call is a single logical operation, atomic per entry.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn load(&self) -> Result<Vec<AppliedMigration>, MigrateError>;
    async fn append(&self, entry: &AppliedMigration) -> Result<(), MigrateError>;
    async fn remove(&self, version: u64) -> Result<(), MigrateError>;
}

/// History persisted in a MongoDB collection, one document per applied
/// migration: `{ version, description, applied_at }`. Versions are stored
/// as `i64` since BSON has no unsigned integer type.
pub struct MongoHistory {
    collection: Collection<Document>,
}

impl MongoHistory {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
        }
    }
}

/// Decode one history document, rejecting anything that cannot be a record
/// this crate wrote: missing or mistyped fields, or a negative version.
fn entry_from_document(document: &Document) -> Result<AppliedMigration, MigrateError> {
    let version = document
        .get_i64("version")
        .map_err(|err| MigrateError::MalformedHistory(format!("version: {err}")))?;
    let version = u64::try_from(version).map_err(|_| {
        MigrateError::MalformedHistory(format!("negative version {version}"))
    })?;
    let description = document
        .get_str("description")
        .map_err(|err| MigrateError::MalformedHistory(format!("description: {err}")))?;
    Ok(AppliedMigration {
        version,
        description: description.to_string(),
    })
}

#[async_trait]
impl HistoryStore for MongoHistory {
    async fn load(&self) -> Result<Vec<AppliedMigration>, MigrateError> {
        let mut cursor = self.collection.find(None, None).await?;
        let mut entries = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            entries.push(entry_from_document(&document)?);
        }
        Ok(entries)
    }

    async fn append(&self, entry: &AppliedMigration) -> Result<(), MigrateError> {
        self.collection
            .insert_one(
                doc! {
                    "version": entry.version as i64,
                    "description": &entry.description,
                    "applied_at": mongodb::bson::DateTime::now(),
                },
                None,
            )
            .await?;
        Ok(())
    }

    async fn remove(&self, version: u64) -> Result<(), MigrateError> {
        self.collection
            .delete_one(doc! { "version": version as i64 }, None)
            .await?;
        Ok(())
    }
}
