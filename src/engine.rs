//! Execution engine: reconciles registered migrations against persisted
//! applied-version state and moves the database forward or back.
//!
//! A failed step stops the run immediately. Nothing is auto-reverted; the
//! history collection reflects every step that completed, which is the
//! recovery point for a retry of the same operation.

use std::collections::{HashMap, HashSet};

use mongodb::Database;
use tracing::{error, info};

use crate::error::MigrateError;
use crate::history::{AppliedMigration, HistoryStore};
use crate::migration::{Direction, Migration};

/// Highest applied version and its description, `(0, "")` when the history
/// is empty.
pub(crate) async fn latest_applied(
    store: &dyn HistoryStore,
) -> Result<(u64, String), MigrateError> {
    let entries = store.load().await?;
    Ok(entries
        .into_iter()
        .max_by_key(|e| e.version)
        .map(|e| (e.version, e.description))
        .unwrap_or((0, String::new())))
}

/// Apply pending migrations in ascending version order.
///
/// `limit` of `None` applies every pending migration; `Some(k)` applies at
/// most the first `k`. Each applied version is persisted before the next
/// action runs.
pub(crate) async fn run_up(
    store: &dyn HistoryStore,
    db: &Database,
    migrations: &[Migration],
    limit: Option<usize>,
) -> Result<(), MigrateError> {
    let applied: HashSet<u64> = store.load().await?.into_iter().map(|e| e.version).collect();

    let mut pending: Vec<&Migration> = migrations
        .iter()
        .filter(|m| !applied.contains(&m.version))
        .collect();
    pending.sort_by_key(|m| m.version);

    let take = limit.unwrap_or(pending.len()).min(pending.len());
    for migration in &pending[..take] {
        info!(
            version = migration.version,
            description = %migration.description,
            "applying migration"
        );
        if let Err(err) = (migration.up)(db.clone()).await {
            error!(version = migration.version, "migration failed: {err}");
            return Err(MigrateError::Migration {
                version: migration.version,
                direction: Direction::Up,
                source: err,
            });
        }
        store
            .append(&AppliedMigration {
                version: migration.version,
                description: migration.description.clone(),
            })
            .await?;
    }
    Ok(())
}

/// Revert applied migrations in descending version order.
///
/// An applied version with no matching registered migration is an error:
/// reverting it would need the reverse action of a record that no longer
/// exists. Each history entry is removed only after its reverse action
/// succeeds.
pub(crate) async fn run_down(
    store: &dyn HistoryStore,
    db: &Database,
    migrations: &[Migration],
    limit: Option<usize>,
) -> Result<(), MigrateError> {
    let by_version: HashMap<u64, &Migration> =
        migrations.iter().map(|m| (m.version, m)).collect();

    let mut entries = store.load().await?;
    entries.sort_by(|a, b| b.version.cmp(&a.version));

    let take = limit.unwrap_or(entries.len()).min(entries.len());
    for entry in &entries[..take] {
        let migration = by_version
            .get(&entry.version)
            .ok_or(MigrateError::UnknownAppliedVersion(entry.version))?;
        info!(
            version = migration.version,
            description = %migration.description,
            "reverting migration"
        );
        if let Err(err) = (migration.down)(db.clone()).await {
            error!(version = migration.version, "revert failed: {err}");
            return Err(MigrateError::Migration {
                version: migration.version,
                direction: Direction::Down,
                source: err,
            });
        }
        store.remove(entry.version).await?;
    }
    Ok(())
}
