//! A named registry: the migrations declared for one database, the handle
//! they run against, and the collection their history is persisted in.

use mongodb::Database;

use crate::engine;
use crate::error::MigrateError;
use crate::history::MongoHistory;
use crate::migration::Migration;

/// Default name of the history collection.
pub const DEFAULT_MIGRATIONS_COLLECTION: &str = "migrations";

/// One migration namespace, typically per service or per database.
pub struct Registry {
    name: String,
    db: Option<Database>,
    history_collection: String,
    migrations: Vec<Migration>,
}

impl Registry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            db: None,
            history_collection: DEFAULT_MIGRATIONS_COLLECTION.to_string(),
            migrations: Vec::new(),
        }
    }

    pub fn with_database(mut self, db: Database) -> Self {
        self.db = Some(db);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database(&self) -> Option<&Database> {
        self.db.as_ref()
    }

    pub fn history_collection(&self) -> &str {
        &self.history_collection
    }

    /// Registered migrations in insertion order. Records are not sorted by
    /// version until execution.
    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    pub(crate) fn set_database(&mut self, db: Database) {
        self.db = Some(db);
    }

    pub(crate) fn set_history_collection(&mut self, collection_name: impl Into<String>) {
        self.history_collection = collection_name.into();
    }

    /// Append a record, rejecting a version already present.
    pub(crate) fn add(&mut self, migration: Migration) -> Result<(), MigrateError> {
        if self.migrations.iter().any(|m| m.version == migration.version) {
            return Err(MigrateError::DuplicateVersion {
                registry: self.name.clone(),
                version: migration.version,
            });
        }
        self.migrations.push(migration);
        Ok(())
    }

    fn db_and_store(&self) -> Result<(&Database, MongoHistory), MigrateError> {
        let db = self
            .db
            .as_ref()
            .ok_or_else(|| MigrateError::DatabaseNotSet(self.name.clone()))?;
        Ok((db, MongoHistory::new(db, &self.history_collection)))
    }

    /// Apply pending migrations in ascending version order, all of them for
    /// `None` or at most `n` for `Some(n)`. See [`crate::engine`] for the
    /// partial-failure contract.
    pub async fn up(&self, n: Option<usize>) -> Result<(), MigrateError> {
        let (db, store) = self.db_and_store()?;
        engine::run_up(&store, db, &self.migrations, n).await
    }

    /// Revert applied migrations in descending version order, all of them
    /// for `None` or at most `n` for `Some(n)`.
    pub async fn down(&self, n: Option<usize>) -> Result<(), MigrateError> {
        let (db, store) = self.db_and_store()?;
        engine::run_down(&store, db, &self.migrations, n).await
    }

    /// Highest applied version and its description, `(0, "")` when no
    /// migration has run yet.
    pub async fn version(&self) -> Result<(u64, String), MigrateError> {
        let (_db, store) = self.db_and_store()?;
        engine::latest_applied(&store).await
    }
}
