//! rstest fixtures for dataset-driven tests.
//!
//! ```rust,no_run
//! use dbrider_test::fixtures::*;
//! use dbrider_test::{DataSet, DbRider};
//! use rstest::*;
//!
//! #[rstest]
//! #[tokio::test]
//! async fn test_seeding(#[future] sqlite_db: dbrider_db::SqliteDatabase, rider: DbRider) {
//!     let db = sqlite_db.await;
//!     rider.setup(&db, &DataSet::new(["setup/findbyid.yml"])).await.unwrap();
//! }
//! ```

use std::path::Path;

use dbrider_db::SqliteDatabase;
use rstest::*;
use sqlx::migrate::Migrator;

use crate::error::RiderResult;
use crate::logging::init_test_logging;
use crate::rider::DbRider;
use crate::settings::RiderSettings;

/// Fixture providing an empty in-memory SQLite database.
#[fixture]
pub async fn sqlite_db() -> SqliteDatabase {
	init_test_logging();
	SqliteDatabase::memory()
		.await
		.expect("Failed to open in-memory SQLite database")
}

/// Fixture providing a rider with default settings.
#[fixture]
pub fn rider() -> DbRider {
	init_test_logging();
	DbRider::with_settings(RiderSettings::default())
}

/// Applies the migrations found in `dir` to `db`.
pub async fn apply_migrations(db: &SqliteDatabase, dir: impl AsRef<Path>) -> RiderResult<()> {
	let migrator = Migrator::new(dir.as_ref()).await?;
	migrator.run(db.pool()).await?;
	tracing::debug!(dir = %dir.as_ref().display(), "applied migrations");
	Ok(())
}

/// Opens an in-memory database with the migrations in `dir` applied.
pub async fn migrated_sqlite_db(dir: impl AsRef<Path>) -> RiderResult<SqliteDatabase> {
	init_test_logging();
	let db = SqliteDatabase::memory().await?;
	apply_migrations(&db, dir).await?;
	Ok(db)
}
