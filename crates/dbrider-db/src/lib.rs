//! Database side of dbrider: seeding fixtures and reading snapshots.
//!
//! - [`DatabaseHandle`] abstracts the live connection
//! - [`SqliteDatabase`] implements it on top of an sqlx SQLite pool
//! - [`Seeder`] cleans tables, runs scripts and inserts fixture rows
//! - [`SnapshotReader`] reads tables back into a [`Fixture`](dbrider_dataset::Fixture)
//!
//! # Example
//!
//! ```ignore
//! use dbrider_db::{SqliteDatabase, Seeder, SeedOptions, SnapshotReader};
//! use dbrider_dataset::FixtureLoader;
//!
//! let db = SqliteDatabase::memory().await?;
//! let data = FixtureLoader::new().load(["datasets/setup/employees.yml"])?;
//! Seeder::with_options(SeedOptions::new().with_clean_before(true))
//!     .seed(&db, &data)
//!     .await?;
//! let actual = SnapshotReader::new().snapshot_for(&db, &data.fixture).await?;
//! ```

#![warn(missing_docs)]

pub mod backends;
pub mod error;
pub mod handle;
pub mod seeder;
pub mod snapshot;

#[cfg(feature = "sqlite")]
pub use backends::SqliteDatabase;
pub use error::{DatabaseError, DatabaseResult, SeedError, SeedResult};
pub use handle::DatabaseHandle;
pub use seeder::{ForeignKey, SeedOptions, SeedReport, Seeder, seed};
pub use snapshot::{SnapshotReader, snapshot};
