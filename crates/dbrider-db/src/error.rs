//! Error types for database access, seeding and snapshots.

use dbrider_dataset::DatasetError;
use thiserror::Error;

/// Errors raised by a [`DatabaseHandle`](crate::DatabaseHandle).
#[derive(Debug, Error)]
pub enum DatabaseError {
	/// Error reported by the driver.
	#[error("Database error: {0}")]
	Driver(#[from] sqlx::Error),

	/// A statement of a script failed. `position` is 1-based.
	#[error("Statement {position} failed: {source}")]
	Statement {
		/// Position of the failing statement.
		position: usize,
		/// Driver error.
		#[source]
		source: sqlx::Error,
	},

	/// A value that cannot be sent to the database.
	#[error("Unsupported parameter value: {0}")]
	UnsupportedValue(String),
}

/// Result type alias for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Errors raised while seeding or reading back a database.
#[derive(Debug, Error)]
pub enum SeedError {
	/// Deleting the rows of a table failed; nothing was inserted.
	#[error("Cleanup of table '{table}' failed: {source}")]
	CleanupFailed {
		/// Table being cleaned.
		table: String,
		/// Underlying error.
		#[source]
		source: DatabaseError,
	},

	/// Declared foreign keys form a cycle, so no deletion order exists.
	#[error("Cannot order cleanup, foreign keys form a cycle through: {}", .tables.join(", "))]
	DependencyCycle {
		/// Tables on the cycle.
		tables: Vec<String>,
	},

	/// A script statement or a row insert failed.
	#[error("Seeding {origin} failed at position {position}: {source}")]
	SeedFailed {
		/// Script source name or `table '<name>'`.
		origin: String,
		/// 1-based statement or row position.
		position: usize,
		/// Underlying error.
		#[source]
		source: DatabaseError,
	},

	/// A table could not be read back.
	#[error("Reading table '{table}' failed: {source}")]
	SnapshotReadFailed {
		/// Table being read.
		table: String,
		/// Underlying error.
		#[source]
		source: DatabaseError,
	},

	/// Loading a data set failed.
	#[error(transparent)]
	Dataset(#[from] DatasetError),
}

/// Result type alias for seeding and snapshot operations.
pub type SeedResult<T> = Result<T, SeedError>;
