//! Comparison configuration.

use serde::{Deserialize, Serialize};

/// How expected rows relate to actual rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOperation {
	/// Same number of rows, every expected row matched.
	#[default]
	Equals,
	/// At least as many actual rows, every expected row matched by a
	/// distinct actual row.
	Contains,
}

/// Rules applied by the [`Comparator`](crate::Comparator).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
	/// Equals or contains.
	pub compare_operation: CompareOperation,

	/// Columns both sides are sorted by before comparison. When empty, rows
	/// are sorted by all of their columns.
	pub order_by: Vec<String>,

	/// Compare table and column names case-insensitively.
	pub case_insensitive_names: bool,

	/// Clean referenced tables before seeding. Not used by the comparator
	/// itself; kept here so one struct describes a data set's behavior.
	pub clean_before_seed: bool,

	/// Columns skipped on both sides.
	pub ignore_columns: Vec<String>,

	/// Compare rows positionally, without sorting, when `order_by` is empty.
	pub strict_order: bool,
}

impl ComparisonConfig {
	/// Creates the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the compare operation.
	pub fn with_compare_operation(mut self, operation: CompareOperation) -> Self {
		self.compare_operation = operation;
		self
	}

	/// Sets the sort columns.
	pub fn with_order_by<I, S>(mut self, columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.order_by = columns.into_iter().map(Into::into).collect();
		self
	}

	/// Sets case-insensitive name comparison.
	pub fn with_case_insensitive_names(mut self, enabled: bool) -> Self {
		self.case_insensitive_names = enabled;
		self
	}

	/// Sets the clean-before-seed flag.
	pub fn with_clean_before_seed(mut self, enabled: bool) -> Self {
		self.clean_before_seed = enabled;
		self
	}

	/// Sets the ignored columns.
	pub fn with_ignore_columns<I, S>(mut self, columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.ignore_columns = columns.into_iter().map(Into::into).collect();
		self
	}

	/// Sets positional comparison.
	pub fn with_strict_order(mut self, enabled: bool) -> Self {
		self.strict_order = enabled;
		self
	}

	/// Normalizes a name for comparison.
	pub fn name_key(&self, name: &str) -> String {
		if self.case_insensitive_names {
			name.to_lowercase()
		} else {
			name.to_string()
		}
	}

	/// Returns true if the column is excluded from comparison.
	pub fn is_ignored(&self, column: &str) -> bool {
		let key = self.name_key(column);
		self.ignore_columns.iter().any(|c| self.name_key(c) == key)
	}
}
