//! Versioned migration registry and runner for MongoDB.
//!
//! Migrations are forward/reverse action pairs tied to monotonically
//! increasing versions. They are registered into named registries held by a
//! [`MigrationDirectory`], and applied or reverted against a live database
//! while the history collection tracks which versions have already run.
//!
//! A migration's identity comes from the path of its defining file, named
//! `<version>_<description>.<ext>`:
//!
//! ```no_run
//! use mongodb::{bson::doc, Client, IndexModel};
//! use mongodrift::{migration_fn, MigrationDirectory};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let mut directory = MigrationDirectory::new();
//! directory.register(
//!     "billing",
//!     "migrations/1_create_customer_index.rs",
//!     migration_fn(|db| async move {
//!         let index = IndexModel::builder().keys(doc! { "customer_id": 1 }).build();
//!         db.collection::<mongodb::bson::Document>("invoices")
//!             .create_index(index, None)
//!             .await?;
//!         Ok(())
//!     }),
//!     migration_fn(|db| async move {
//!         db.collection::<mongodb::bson::Document>("invoices")
//!             .drop_indexes(None)
//!             .await?;
//!         Ok(())
//!     }),
//! )?;
//!
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! directory.set_database("billing", client.database("billing"));
//! directory.up("billing", None).await?;
//!
//! let (version, description) = directory.version("billing").await?;
//! println!("at {version} ({description})");
//! # Ok(())
//! # }
//! ```
//!
//! Execution stops at the first failing step and never auto-reverts; the
//! persisted history is the recovery point for a retry. Registration is a
//! single-threaded startup concern; the directory has no internal locking.

mod directory;
mod engine;
mod error;
mod extract;
mod history;
mod migration;
mod registry;

pub use directory::MigrationDirectory;
pub use error::MigrateError;
pub use extract::version_description;
pub use history::{AppliedMigration, HistoryStore, MongoHistory};
pub use migration::{migration_fn, Direction, Migration, MigrationFn};
pub use registry::{Registry, DEFAULT_MIGRATIONS_COLLECTION};

pub type Result<T, E = MigrateError> = std::result::Result<T, E>;
