//! # dbrider
//!
//! Dataset-driven fixtures and assertions for database integration tests.
//!
//! A test describes the rows it needs in YAML, JSON, flat XML, CSV or a SQL
//! script. dbrider seeds them before the test body runs and afterwards
//! compares the tables the code under test touched against an expected data
//! set.
//!
//! ## Crates
//!
//! - [`dataset`] - row model, format parsers, fixture loader and comparator
//! - [`db`] - database handle, seeder and snapshot reader
//! - [`test`] - `DataSet` / `ExpectedDataSet` harness, settings and rstest fixtures
//!
//! ## Feature Flags
//!
//! - `full` (default) - every format, the SQLite backend and the harness
//! - `yaml`, `xml`, `csv` - individual fixture formats (JSON and SQL are always available)
//! - `sqlite` - SQLite backend via `sqlx`
//! - `harness` - the `dbrider-test` crate
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use dbrider::prelude::*;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let db = SqliteDatabase::memory().await?;
//! let rider = DbRider::new();
//!
//! rider.setup(&db, &DataSet::new(["setup/2record.yml"])).await?;
//! let verdict = rider
//!     .verify(&db, &ExpectedDataSet::new(["expected/1record.yml"]).compare_operation(CompareOperation::Contains))
//!     .await?;
//! assert!(verdict.is_pass());
//! # Ok(())
//! # }
//! ```

pub use dbrider_dataset as dataset;
pub use dbrider_db as db;
#[cfg(feature = "harness")]
pub use dbrider_test as test;

pub use dbrider_dataset::{
	CaseStrategy, Comparator, CompareOperation, ComparisonConfig, DatasetError, Fixture,
	FixtureFormat, FixtureLoader, FixtureSource, LoadOptions, Mismatch, MismatchKind, Row, Scalar,
	Table, Verdict, compare,
};
pub use dbrider_db::{DatabaseError, DatabaseHandle, SeedError, SeedOptions, Seeder, SnapshotReader};

#[cfg(feature = "sqlite")]
pub use dbrider_db::SqliteDatabase;

#[cfg(feature = "harness")]
pub use dbrider_test::{DataSet, DbRider, ExpectedDataSet, RiderError, RiderSettings};

/// Commonly used types.
pub mod prelude {
	pub use crate::{
		CaseStrategy, CompareOperation, ComparisonConfig, Fixture, FixtureFormat, FixtureSource,
		MismatchKind, Row, Scalar, Verdict, compare,
	};
	pub use crate::{DatabaseHandle, SeedOptions, Seeder, SnapshotReader};

	#[cfg(feature = "sqlite")]
	pub use crate::SqliteDatabase;

	#[cfg(feature = "harness")]
	pub use crate::{DataSet, DbRider, ExpectedDataSet, RiderSettings};
}
