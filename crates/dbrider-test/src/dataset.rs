//! Declarations of the data a test starts from and the data it should leave.

use dbrider_dataset::{CompareOperation, FixtureSource};

/// Data seeded before a test body runs.
///
/// # Example
///
/// ```
/// use dbrider_test::DataSet;
///
/// let data_set = DataSet::new(["setup/findbyid.yml", "setup/findbyid2.yml"])
///     .clean_before(true)
///     .execute_scripts_before(["setup/reset_sequences.sql"]);
/// assert_eq!(data_set.sources.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DataSet {
	/// Fixture sources, merged in order.
	pub sources: Vec<FixtureSource>,

	/// Clean the referenced tables first. Falls back to the settings when unset.
	pub clean_before: Option<bool>,

	/// Tables cleaned in addition to those referenced by the sources.
	pub clean_tables: Vec<String>,

	/// SQL files run after cleanup and before the sources are inserted.
	pub scripts_before: Vec<FixtureSource>,

	/// SQL files run by [`DbRider::teardown`](crate::DbRider::teardown).
	pub scripts_after: Vec<FixtureSource>,

	/// Tables inserted first, in this order. Falls back to the settings when empty.
	pub table_ordering: Vec<String>,
}

impl DataSet {
	/// Declares a data set from sources.
	pub fn new<I, S>(sources: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<FixtureSource>,
	{
		Self {
			sources: sources.into_iter().map(Into::into).collect(),
			..Self::default()
		}
	}

	/// Declares a data set without sources, useful with `clean_before`.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Sets the clean-before flag.
	pub fn clean_before(mut self, clean: bool) -> Self {
		self.clean_before = Some(clean);
		self
	}

	/// Adds tables to clean.
	pub fn clean_tables<I, S>(mut self, tables: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.clean_tables.extend(tables.into_iter().map(Into::into));
		self
	}

	/// Adds SQL files run before seeding.
	pub fn execute_scripts_before<I, S>(mut self, scripts: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<FixtureSource>,
	{
		self.scripts_before.extend(scripts.into_iter().map(Into::into));
		self
	}

	/// Adds SQL files run on teardown.
	pub fn execute_scripts_after<I, S>(mut self, scripts: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<FixtureSource>,
	{
		self.scripts_after.extend(scripts.into_iter().map(Into::into));
		self
	}

	/// Sets the table ordering.
	pub fn table_ordering<I, S>(mut self, tables: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.table_ordering = tables.into_iter().map(Into::into).collect();
		self
	}
}

/// Data the database must hold after a test body runs.
///
/// # Example
///
/// ```
/// use dbrider_dataset::CompareOperation;
/// use dbrider_test::ExpectedDataSet;
///
/// let expected = ExpectedDataSet::new(["expected/2record-reverse.yml"])
///     .compare_operation(CompareOperation::Contains)
///     .order_by(["id"]);
/// assert_eq!(expected.order_by, vec!["id"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExpectedDataSet {
	/// Fixture sources, merged in order. Scripts are not allowed.
	pub sources: Vec<FixtureSource>,

	/// Equals or contains.
	pub compare_operation: CompareOperation,

	/// Columns both sides are sorted by.
	pub order_by: Vec<String>,

	/// Columns skipped on both sides.
	pub ignore_columns: Vec<String>,

	/// Compare rows positionally.
	pub strict_order: bool,
}

impl ExpectedDataSet {
	/// Declares an expectation from sources.
	pub fn new<I, S>(sources: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<FixtureSource>,
	{
		Self {
			sources: sources.into_iter().map(Into::into).collect(),
			..Self::default()
		}
	}

	/// Sets the compare operation.
	pub fn compare_operation(mut self, operation: CompareOperation) -> Self {
		self.compare_operation = operation;
		self
	}

	/// Sets the sort columns.
	pub fn order_by<I, S>(mut self, columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.order_by = columns.into_iter().map(Into::into).collect();
		self
	}

	/// Sets the ignored columns.
	pub fn ignore_columns<I, S>(mut self, columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.ignore_columns = columns.into_iter().map(Into::into).collect();
		self
	}

	/// Sets positional comparison.
	pub fn strict_order(mut self, strict: bool) -> Self {
		self.strict_order = strict;
		self
	}
}
