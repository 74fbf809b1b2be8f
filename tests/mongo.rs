//! End-to-end tests against a running MongoDB.
//!
//! Run with `cargo test --features integration`. The target server defaults
//! to localhost and can be overridden with `MONGODRIFT_TEST_URI`.
#![cfg(feature = "integration")]

use mongodb::bson::{doc, Document};
use mongodb::{Client, Database};
use serial_test::serial;

use mongodrift::{migration_fn, MigrateError, MigrationDirectory};

async fn test_db(name: &str) -> Database {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let uri = std::env::var("MONGODRIFT_TEST_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let db = Client::with_uri_str(&uri)
        .await
        .expect("connect to test mongod")
        .database(name);
    db.drop(None).await.expect("drop stale test database");
    db
}

fn directory_with_crud_migrations(name: &str) -> MigrationDirectory {
    let mut directory = MigrationDirectory::new();
    directory
        .register(
            name,
            "1_seed_settings.rs",
            migration_fn(|db| async move {
                db.collection::<Document>("settings")
                    .insert_one(doc! { "_id": "defaults", "retries": 3 }, None)
                    .await?;
                Ok(())
            }),
            migration_fn(|db| async move {
                db.collection::<Document>("settings")
                    .delete_one(doc! { "_id": "defaults" }, None)
                    .await?;
                Ok(())
            }),
        )
        .unwrap();
    directory
        .register(
            name,
            "2_raise_retries.rs",
            migration_fn(|db| async move {
                db.collection::<Document>("settings")
                    .update_one(
                        doc! { "_id": "defaults" },
                        doc! { "$set": { "retries": 5 } },
                        None,
                    )
                    .await?;
                Ok(())
            }),
            migration_fn(|db| async move {
                db.collection::<Document>("settings")
                    .update_one(
                        doc! { "_id": "defaults" },
                        doc! { "$set": { "retries": 3 } },
                        None,
                    )
                    .await?;
                Ok(())
            }),
        )
        .unwrap();
    directory
}

async fn retries(db: &Database) -> Option<i32> {
    db.collection::<Document>("settings")
        .find_one(doc! { "_id": "defaults" }, None)
        .await
        .unwrap()
        .and_then(|d| d.get_i32("retries").ok())
}

#[tokio::test]
#[serial]
async fn up_version_down_round_trip() {
    let db = test_db("mongodrift_it_round_trip").await;
    let mut directory = directory_with_crud_migrations("it");
    directory.set_database("it", db.clone());

    directory.up("it", None).await.unwrap();
    assert_eq!(retries(&db).await, Some(5));
    assert_eq!(
        directory.version("it").await.unwrap(),
        (2, "raise_retries".to_string())
    );

    directory.down("it", None).await.unwrap();
    assert_eq!(retries(&db).await, None);
    assert_eq!(directory.version("it").await.unwrap(), (0, String::new()));

    db.drop(None).await.unwrap();
}

#[tokio::test]
#[serial]
async fn bounded_steps_and_resume() {
    let db = test_db("mongodrift_it_bounded").await;
    let mut directory = directory_with_crud_migrations("it");
    directory.set_database("it", db.clone());
    directory.set_migrations_collection("it", "schema_history");

    directory.up("it", Some(1)).await.unwrap();
    assert_eq!(retries(&db).await, Some(3));
    assert_eq!(
        directory.version("it").await.unwrap(),
        (1, "seed_settings".to_string())
    );

    // History landed in the overridden collection.
    let count = db
        .collection::<Document>("schema_history")
        .count_documents(None, None)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // A second run picks up from the persisted state.
    directory.up("it", None).await.unwrap();
    assert_eq!(retries(&db).await, Some(5));

    db.drop(None).await.unwrap();
}

#[tokio::test]
#[serial]
async fn failing_step_keeps_prior_progress() {
    let db = test_db("mongodrift_it_failure").await;
    let mut directory = directory_with_crud_migrations("it");
    directory
        .register(
            "it",
            "3_always_fails.rs",
            migration_fn(|_db| async move { anyhow::bail!("deliberate failure") }),
            migration_fn(|_db| async move { Ok(()) }),
        )
        .unwrap();
    directory.set_database("it", db.clone());

    let err = directory.up("it", None).await.unwrap_err();
    assert!(matches!(err, MigrateError::Migration { version: 3, .. }));

    // Versions 1 and 2 stay applied and the run can be resumed after a fix.
    assert_eq!(
        directory.version("it").await.unwrap(),
        (2, "raise_retries".to_string())
    );

    db.drop(None).await.unwrap();
}
