//! Migration record types.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use mongodb::Database;

/// A forward or reverse migration action.
///
/// Actions receive the target [`Database`] by value; the handle is a cheap
/// clone over a shared connection pool. Shared so records can be cloned for
/// defensive snapshots.
pub type MigrationFn =
    Arc<dyn Fn(Database) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Adapt a plain async closure into a [`MigrationFn`].
///
/// ```no_run
/// use mongodrift::migration_fn;
/// use mongodb::{bson::doc, Database};
///
/// let up = migration_fn(|db: Database| async move {
///     db.collection("users").insert_one(doc! { "seed": true }, None).await?;
///     Ok(())
/// });
/// ```
pub fn migration_fn<F, Fut>(f: F) -> MigrationFn
where
    F: Fn(Database) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |db| Box::pin(f(db)))
}

/// One versioned, described pair of forward/reverse database actions.
/// Immutable after creation; versions are unique within a registry.
#[derive(Clone)]
pub struct Migration {
    pub version: u64,
    pub description: String,
    pub up: MigrationFn,
    pub down: MigrationFn,
}

impl Migration {
    pub fn new(
        version: u64,
        description: impl Into<String>,
        up: MigrationFn,
        down: MigrationFn,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up,
            down,
        }
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("version", &self.version)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Which way a migration ran when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
        }
    }
}
