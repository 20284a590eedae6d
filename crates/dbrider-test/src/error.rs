//! Harness errors.

use std::path::PathBuf;

use dbrider_dataset::{DatasetError, Mismatch};
use dbrider_db::{DatabaseError, SeedError};
use thiserror::Error;

/// Errors raised by [`DbRider`](crate::DbRider).
#[derive(Debug, Error)]
pub enum RiderError {
	/// A data set could not be loaded.
	#[error(transparent)]
	Dataset(#[from] DatasetError),

	/// Seeding or reading back failed.
	#[error(transparent)]
	Seed(#[from] SeedError),

	/// A direct database call failed.
	#[error(transparent)]
	Database(#[from] DatabaseError),

	/// Schema migrations could not be applied.
	#[error("Migration failed: {0}")]
	Migration(#[from] sqlx::migrate::MigrateError),

	/// The settings file could not be read.
	#[error("Failed to read settings from {path}: {source}")]
	SettingsIo {
		/// Settings file path.
		path: PathBuf,
		/// Underlying I/O error.
		#[source]
		source: std::io::Error,
	},

	/// The settings could not be parsed.
	#[error("Invalid settings: {message}")]
	Settings {
		/// Parser message.
		message: String,
	},

	/// A data set declaration cannot be used as written.
	#[error("Invalid data set: {0}")]
	InvalidDataSet(String),

	/// The database does not match the expected data set.
	#[error("Expected data set does not match: {0}")]
	Assertion(Mismatch),
}

/// Result type alias for harness operations.
pub type RiderResult<T> = Result<T, RiderError>;
