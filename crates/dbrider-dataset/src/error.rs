//! Error types for dataset loading.
//!
//! Comparison mismatches are not errors; they are reported through
//! [`Verdict`](crate::Verdict).

use thiserror::Error;

/// Errors that can occur while reading or parsing a fixture source.
#[derive(Debug, Error)]
pub enum DatasetError {
	/// The source could not be decoded in its declared format.
	#[error("Malformed fixture '{}'{}: {}", .source_name, fmt_location(.location), .message)]
	MalformedFixture {
		/// Name of the offending source (file path or inline name).
		source_name: String,
		/// Position inside the source, when the decoder reports one.
		location: Option<String>,
		/// What was wrong.
		message: String,
	},

	/// The format of a source could not be inferred or is not supported.
	#[error("Unknown fixture format for '{source_name}': {reason}")]
	UnknownFormat {
		/// Name of the source.
		source_name: String,
		/// Why no parser could be selected.
		reason: String,
	},

	/// Fixture file not found.
	#[error("Fixture file not found: {0}")]
	SourceNotFound(String),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl DatasetError {
	/// Builds a [`DatasetError::MalformedFixture`] without location information.
	pub fn malformed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
		Self::MalformedFixture {
			source_name: source_name.into(),
			location: None,
			message: message.into(),
		}
	}

	/// Builds a [`DatasetError::MalformedFixture`] pointing at a location.
	pub fn malformed_at(
		source_name: impl Into<String>,
		location: impl Into<String>,
		message: impl Into<String>,
	) -> Self {
		Self::MalformedFixture {
			source_name: source_name.into(),
			location: Some(location.into()),
			message: message.into(),
		}
	}

	/// Builds a [`DatasetError::UnknownFormat`].
	pub fn unknown_format(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::UnknownFormat {
			source_name: source_name.into(),
			reason: reason.into(),
		}
	}
}

fn fmt_location(location: &Option<String>) -> String {
	location
		.as_ref()
		.map(|l| format!(" at {}", l))
		.unwrap_or_default()
}

/// Result type alias for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;
