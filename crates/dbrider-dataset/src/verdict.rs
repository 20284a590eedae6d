//! Comparison verdicts.

use std::fmt;

use thiserror::Error;

/// Why a comparison failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MismatchKind {
	/// An expected table is missing from the actual data.
	TableCountMismatch,
	/// A table holds the wrong number of rows.
	RowCountMismatch,
	/// A row holds the wrong values.
	RowContentMismatch,
	/// The right rows appear in the wrong order.
	RowOrderMismatch,
}

impl fmt::Display for MismatchKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::TableCountMismatch => write!(f, "table count mismatch"),
			Self::RowCountMismatch => write!(f, "row count mismatch"),
			Self::RowContentMismatch => write!(f, "row content mismatch"),
			Self::RowOrderMismatch => write!(f, "row order mismatch"),
		}
	}
}

/// The first difference found between actual and expected data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} in table '{table}'{}: {detail}", fmt_position(.row, .column))]
pub struct Mismatch {
	/// Failure kind.
	pub kind: MismatchKind,
	/// Table the difference was found in.
	pub table: String,
	/// Index of the expected row, after ordering.
	pub row: Option<usize>,
	/// Column holding the difference.
	pub column: Option<String>,
	/// Human readable description.
	pub detail: String,
}

fn fmt_position(row: &Option<usize>, column: &Option<String>) -> String {
	match (row, column) {
		(Some(row), Some(column)) => format!(" at row {}, column '{}'", row, column),
		(Some(row), None) => format!(" at row {}", row),
		(None, Some(column)) => format!(" at column '{}'", column),
		(None, None) => String::new(),
	}
}

impl Mismatch {
	/// Creates a mismatch for a whole table.
	pub fn new(kind: MismatchKind, table: impl Into<String>, detail: impl Into<String>) -> Self {
		Self {
			kind,
			table: table.into(),
			row: None,
			column: None,
			detail: detail.into(),
		}
	}

	/// Points the mismatch at a row.
	pub fn at_row(mut self, row: usize) -> Self {
		self.row = Some(row);
		self
	}

	/// Points the mismatch at a column.
	pub fn at_column(mut self, column: impl Into<String>) -> Self {
		self.column = Some(column.into());
		self
	}
}

/// Outcome of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
	/// Actual data satisfies the expectation.
	Pass,
	/// The first difference found.
	Fail(Mismatch),
}

impl Verdict {
	/// Returns true for [`Verdict::Pass`].
	pub fn is_pass(&self) -> bool {
		matches!(self, Verdict::Pass)
	}

	/// Returns the mismatch of a failed verdict.
	pub fn mismatch(&self) -> Option<&Mismatch> {
		match self {
			Verdict::Pass => None,
			Verdict::Fail(mismatch) => Some(mismatch),
		}
	}

	/// Returns the failure kind, if any.
	pub fn kind(&self) -> Option<MismatchKind> {
		self.mismatch().map(|m| m.kind)
	}

	/// Converts the verdict into a `Result` for use with `?`.
	pub fn into_result(self) -> Result<(), Mismatch> {
		match self {
			Verdict::Pass => Ok(()),
			Verdict::Fail(mismatch) => Err(mismatch),
		}
	}
}

impl fmt::Display for Verdict {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Verdict::Pass => write!(f, "pass"),
			Verdict::Fail(mismatch) => write!(f, "fail: {}", mismatch),
		}
	}
}
