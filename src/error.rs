use thiserror::Error;

use crate::migration::Direction;

/// Errors produced by registration, lookup, and migration execution.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// The source path did not follow the `<version>_<description>.<ext>` form.
    #[error("invalid migration source {path:?}: {reason}")]
    BadSourcePath { path: String, reason: &'static str },

    #[error("migration with version {version} already registered in {registry:?}")]
    DuplicateVersion { registry: String, version: u64 },

    #[error("no registry named {0:?}")]
    UnknownRegistry(String),

    #[error("no database assigned to registry {0:?}")]
    DatabaseNotSet(String),

    /// A forward or reverse action failed. Execution stops at this step;
    /// the history collection still reflects every step that completed.
    #[error("migration {version} failed ({direction}): {source}")]
    Migration {
        version: u64,
        direction: Direction,
        #[source]
        source: anyhow::Error,
    },

    /// History holds a version with no matching registered migration,
    /// e.g. the defining file was removed from the codebase.
    #[error("applied version {0} has no registered migration")]
    UnknownAppliedVersion(u64),

    #[error("migration history operation failed: {0}")]
    Persistence(#[from] mongodb::error::Error),

    #[error("malformed history entry: {0}")]
    MalformedHistory(String),
}
