//! The registry directory: an owned name → [`Registry`] map.
//!
//! This is deliberately a plain value the orchestrating caller owns and
//! passes around, not process-global state. All registration happens during
//! single-threaded startup; the directory has no internal locking.

use std::collections::HashMap;

use mongodb::Database;

use crate::error::MigrateError;
use crate::extract;
use crate::migration::{Migration, MigrationFn};
use crate::registry::Registry;

#[derive(Default)]
pub struct MigrationDirectory {
    registries: HashMap<String, Registry>,
}

impl MigrationDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a migration under `name`, deriving its version and
    /// description from `source`, the path of the file that defines it
    /// (`<version>_<description>.<ext>`). Creates the registry on first use.
    ///
    /// Fails on a malformed `source` or a version already registered under
    /// `name`; a failed call leaves the registry untouched.
    pub fn register(
        &mut self,
        name: &str,
        source: &str,
        up: MigrationFn,
        down: MigrationFn,
    ) -> Result<(), MigrateError> {
        let (version, description) = extract::version_description(source)?;
        self.registries
            .entry(name.to_string())
            .or_insert_with(|| Registry::new(name))
            .add(Migration::new(version, description, up, down))
    }

    /// Like [`register`](Self::register), but panics on error. For
    /// module-load-time call sites where continuing with an incomplete
    /// migration set is worse than terminating; the entry point decides
    /// whether the panic escalates to process exit.
    pub fn must_register(&mut self, name: &str, source: &str, up: MigrationFn, down: MigrationFn) {
        if let Err(err) = self.register(name, source, up, down) {
            panic!("migration registration failed: {err}");
        }
    }

    pub fn registry(&self, name: &str) -> Option<&Registry> {
        self.registries.get(name)
    }

    /// Snapshot of the named registry's records in insertion order. An
    /// unknown name yields an empty list, not an error.
    pub fn registered_migrations(&self, name: &str) -> Vec<Migration> {
        self.registries
            .get(name)
            .map(|r| r.migrations().to_vec())
            .unwrap_or_default()
    }

    /// Assign the database handle the named registry runs against.
    /// Ignored for an unknown name; never creates a registry.
    pub fn set_database(&mut self, name: &str, db: Database) {
        if let Some(registry) = self.registries.get_mut(name) {
            registry.set_database(db);
        }
    }

    /// Override the history collection for the named registry. Ignored for
    /// an unknown name.
    pub fn set_migrations_collection(&mut self, name: &str, collection_name: &str) {
        if let Some(registry) = self.registries.get_mut(name) {
            registry.set_history_collection(collection_name);
        }
    }

    fn get(&self, name: &str) -> Result<&Registry, MigrateError> {
        self.registries
            .get(name)
            .ok_or_else(|| MigrateError::UnknownRegistry(name.to_string()))
    }

    pub async fn up(&self, name: &str, n: Option<usize>) -> Result<(), MigrateError> {
        self.get(name)?.up(n).await
    }

    pub async fn down(&self, name: &str, n: Option<usize>) -> Result<(), MigrateError> {
        self.get(name)?.down(n).await
    }

    pub async fn version(&self, name: &str) -> Result<(u64, String), MigrateError> {
        self.get(name)?.version().await
    }
}
