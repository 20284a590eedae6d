//! Comparison of actual data against an expected fixture.
//!
//! The comparator is a pure function of the actual fixture (usually a
//! database snapshot), the expected fixture and a [`ComparisonConfig`]. Only
//! tables present in the expected fixture are checked and only the columns an
//! expected row declares are compared.

use std::cmp::{Ordering, Reverse};

use indexmap::IndexSet;

use crate::config::{CompareOperation, ComparisonConfig};
use crate::model::{Fixture, Row, Scalar, Table};
use crate::verdict::{Mismatch, MismatchKind, Verdict};

/// Compares fixtures under a configuration.
#[derive(Debug, Clone, Default)]
pub struct Comparator {
	config: ComparisonConfig,
}

impl Comparator {
	/// Creates a comparator.
	pub fn new(config: ComparisonConfig) -> Self {
		Self { config }
	}

	/// Configuration in use.
	pub fn config(&self) -> &ComparisonConfig {
		&self.config
	}

	/// Compares `actual` against `expected`, stopping at the first
	/// difference.
	///
	/// # Example
	///
	/// ```
	/// # use dbrider_dataset::{Comparator, ComparisonConfig, Fixture, Row, Scalar};
	/// let mut actual = Fixture::new();
	/// actual.push_row("employees", Row::from_pairs([("id", Scalar::from(1)), ("name", "Taro".into())]));
	/// let mut expected = Fixture::new();
	/// expected.push_row("employees", Row::from_pairs([("id", Scalar::from("1"))]));
	///
	/// let verdict = Comparator::new(ComparisonConfig::default()).compare(&actual, &expected);
	/// assert!(verdict.is_pass());
	/// ```
	pub fn compare(&self, actual: &Fixture, expected: &Fixture) -> Verdict {
		for table in expected.tables() {
			if let Err(mismatch) = self.compare_table(actual, table) {
				tracing::warn!(
					table = %mismatch.table,
					kind = %mismatch.kind,
					row = ?mismatch.row,
					column = ?mismatch.column,
					"data set comparison failed"
				);
				return Verdict::Fail(mismatch);
			}
		}
		tracing::info!(
			tables = expected.len(),
			operation = ?self.config.compare_operation,
			"data set comparison passed"
		);
		Verdict::Pass
	}

	fn compare_table(&self, actual: &Fixture, expected: &Table) -> Result<(), Mismatch> {
		let name = expected.name();
		let Some(actual_table) = actual.find_table(name, self.config.case_insensitive_names) else {
			return Err(Mismatch::new(
				MismatchKind::TableCountMismatch,
				name,
				format!("expected table '{}' is not present in the actual data", name),
			));
		};

		let expected_rows = self.normalize(expected.rows());
		let actual_rows = self.normalize(actual_table.rows());

		let count_ok = match self.config.compare_operation {
			CompareOperation::Equals => actual_rows.len() == expected_rows.len(),
			CompareOperation::Contains => actual_rows.len() >= expected_rows.len(),
		};
		if !count_ok {
			return Err(Mismatch::new(
				MismatchKind::RowCountMismatch,
				name,
				format!(
					"expected {}{} rows, found {}",
					match self.config.compare_operation {
						CompareOperation::Equals => "",
						CompareOperation::Contains => "at least ",
					},
					expected_rows.len(),
					actual_rows.len()
				),
			));
		}

		match self.config.compare_operation {
			CompareOperation::Equals => self.compare_equals(name, expected_rows, actual_rows),
			CompareOperation::Contains => self.compare_contains(name, expected_rows, actual_rows),
		}
	}

	/// Drops ignored columns and normalizes column names.
	fn normalize(&self, rows: &[Row]) -> Vec<Row> {
		rows.iter()
			.map(|row| {
				Row::from_pairs(
					row.iter()
						.filter(|(column, _)| !self.config.is_ignored(column))
						.map(|(column, value)| (self.config.name_key(column), value.clone())),
				)
			})
			.collect()
	}

	/// Sort columns: `order_by` when set, otherwise every column the expected
	/// rows declare.
	fn key_columns(&self, expected: &[Row]) -> Vec<String> {
		if !self.config.order_by.is_empty() {
			return self
				.config
				.order_by
				.iter()
				.filter(|column| !self.config.is_ignored(column))
				.map(|column| self.config.name_key(column))
				.collect();
		}
		let mut columns = IndexSet::new();
		for row in expected {
			for column in row.columns() {
				columns.insert(column.to_string());
			}
		}
		columns.into_iter().collect()
	}

	fn compare_equals(&self, table: &str, mut expected: Vec<Row>, mut actual: Vec<Row>) -> Result<(), Mismatch> {
		if self.config.order_by.is_empty() && self.config.strict_order {
			return compare_positional(table, &expected, &actual);
		}

		let columns = self.key_columns(&expected);
		expected.sort_by(|a, b| cmp_by(a, b, &columns));
		actual.sort_by(|a, b| cmp_by(a, b, &columns));

		match compare_groups(table, &expected, &actual, &columns) {
			Ok(()) => Ok(()),
			// Unspecified cells sort apart from the values they stand for, so
			// without an explicit order the sorted pairing can miss a valid one.
			Err(_) if self.config.order_by.is_empty() && perfect_matching(&expected, &actual) => Ok(()),
			Err(mismatch) => Err(mismatch),
		}
	}

	fn compare_contains(&self, table: &str, mut expected: Vec<Row>, mut actual: Vec<Row>) -> Result<(), Mismatch> {
		if !self.config.order_by.is_empty() {
			let columns = self.key_columns(&expected);
			expected.sort_by(|a, b| cmp_by(a, b, &columns));
			actual.sort_by(|a, b| cmp_by(a, b, &columns));
		}

		let strict = self.config.strict_order && self.config.order_by.is_empty();
		if !strict {
			return contains_unordered(table, &expected, &actual);
		}
		let mut used = vec![false; actual.len()];
		let mut last: Option<usize> = None;

		for (index, row) in expected.iter().enumerate() {
			let start = last.map_or(0, |l| l + 1);
			if let Some(found) = (start..actual.len()).find(|&a| !used[a] && row_matches(row, &actual[a])) {
				used[found] = true;
				last = Some(found);
				continue;
			}

			if (0..start).any(|a| !used[a] && row_matches(row, &actual[a])) {
				return Err(Mismatch::new(
					MismatchKind::RowOrderMismatch,
					table,
					"expected row is present but before a row matched earlier",
				)
				.at_row(index));
			}
			if actual.iter().any(|candidate| row_matches(row, candidate)) {
				return Err(Mismatch::new(
					MismatchKind::RowCountMismatch,
					table,
					"expected row only matches actual rows already matched by earlier expected rows",
				)
				.at_row(index));
			}

			return Err(closest_mismatch(table, index, row, &actual, &used));
		}
		Ok(())
	}
}

/// Every expected row must pair with a distinct actual row. Pairing uses a
/// maximum matching, so a row that matches several actual rows never steals
/// the only match of a later one.
fn contains_unordered(table: &str, expected: &[Row], actual: &[Row]) -> Result<(), Mismatch> {
	let assignment = max_matching(expected, actual);
	let Some(index) = assignment.iter().position(Option::is_none) else {
		return Ok(());
	};

	let row = &expected[index];
	if actual.iter().any(|candidate| row_matches(row, candidate)) {
		return Err(Mismatch::new(
			MismatchKind::RowCountMismatch,
			table,
			"expected row only matches actual rows already matched by other expected rows",
		)
		.at_row(index));
	}
	let mut used = vec![false; actual.len()];
	for a in assignment.into_iter().flatten() {
		used[a] = true;
	}
	Err(closest_mismatch(table, index, row, actual, &used))
}

/// Content mismatch against the unused actual row sharing the most values
/// with `row`.
fn closest_mismatch(table: &str, index: usize, row: &Row, actual: &[Row], used: &[bool]) -> Mismatch {
	let closest = actual
		.iter()
		.enumerate()
		.filter(|(a, _)| !used[*a])
		.min_by_key(|(_, candidate)| Reverse(matching_columns(row, candidate)))
		.map(|(_, candidate)| candidate);
	match closest {
		Some(candidate) => content_mismatch(table, index, row, candidate),
		None => Mismatch::new(MismatchKind::RowContentMismatch, table, "no matching actual row").at_row(index),
	}
}

/// Compares `actual` against `expected` with `config`.
pub fn compare(actual: &Fixture, expected: &Fixture, config: &ComparisonConfig) -> Verdict {
	Comparator::new(config.clone()).compare(actual, expected)
}

/// Only the columns the expected row declares are checked. An expected
/// column missing from the actual row matches only when it is unspecified.
fn row_matches(expected: &Row, actual: &Row) -> bool {
	expected.iter().all(|(column, value)| match actual.get(column) {
		Some(found) => value.matches(found),
		None => value.is_unspecified(),
	})
}

fn matching_columns(expected: &Row, actual: &Row) -> usize {
	expected
		.iter()
		.filter(|(column, value)| actual.get(column).is_some_and(|found| value.matches(found)))
		.count()
}

fn cmp_by(a: &Row, b: &Row, columns: &[String]) -> Ordering {
	for column in columns {
		let x = a.get(column).unwrap_or(&Scalar::Null);
		let y = b.get(column).unwrap_or(&Scalar::Null);
		match x.canonical_cmp(y) {
			Ordering::Equal => continue,
			unequal => return unequal,
		}
	}
	Ordering::Equal
}

fn content_mismatch(table: &str, index: usize, expected: &Row, actual: &Row) -> Mismatch {
	for (column, value) in expected.iter() {
		match actual.get(column) {
			None if value.is_unspecified() => {}
			None => {
				return Mismatch::new(
					MismatchKind::RowContentMismatch,
					table,
					format!("expected {}, but the actual row has no such column", value),
				)
				.at_row(index)
				.at_column(column);
			}
			Some(found) if !value.matches(found) => {
				return Mismatch::new(
					MismatchKind::RowContentMismatch,
					table,
					format!("expected {}, found {}", value, found),
				)
				.at_row(index)
				.at_column(column);
			}
			Some(_) => {}
		}
	}
	Mismatch::new(MismatchKind::RowContentMismatch, table, "no matching actual row").at_row(index)
}

fn compare_positional(table: &str, expected: &[Row], actual: &[Row]) -> Result<(), Mismatch> {
	for (index, (row, found)) in expected.iter().zip(actual).enumerate() {
		if row_matches(row, found) {
			continue;
		}
		if let Some(position) = actual.iter().position(|candidate| row_matches(row, candidate)) {
			return Err(Mismatch::new(
				MismatchKind::RowOrderMismatch,
				table,
				format!("expected row found at position {}", position),
			)
			.at_row(index));
		}
		return Err(content_mismatch(table, index, row, found));
	}
	Ok(())
}

/// Position-wise comparison of sorted rows. Rows with equal sort keys form a
/// group whose members may pair up in any order.
fn compare_groups(table: &str, expected: &[Row], actual: &[Row], columns: &[String]) -> Result<(), Mismatch> {
	let mut start = 0;
	while start < expected.len() {
		let mut end = start + 1;
		while end < expected.len() && cmp_by(&expected[start], &expected[end], columns) == Ordering::Equal {
			end += 1;
		}

		let group = &expected[start..end];
		let candidates = &actual[start..end];
		let in_place = group.iter().zip(candidates).all(|(e, a)| row_matches(e, a));
		if !in_place {
			let assignment = max_matching(group, candidates);
			if let Some(offset) = assignment.iter().position(Option::is_none) {
				let index = start + offset;
				return Err(content_mismatch(table, index, &expected[index], &actual[index]));
			}
		}
		start = end;
	}
	Ok(())
}

fn perfect_matching(expected: &[Row], actual: &[Row]) -> bool {
	max_matching(expected, actual).iter().all(Option::is_some)
}

/// Maximum one-to-one assignment of expected rows to actual rows
/// (augmenting paths). Returns the actual index assigned to each expected row.
fn max_matching(expected: &[Row], actual: &[Row]) -> Vec<Option<usize>> {
	fn assign(
		e: usize,
		expected: &[Row],
		actual: &[Row],
		seen: &mut [bool],
		owner: &mut [Option<usize>],
	) -> bool {
		for a in 0..actual.len() {
			if seen[a] || !row_matches(&expected[e], &actual[a]) {
				continue;
			}
			seen[a] = true;
			let free = match owner[a] {
				None => true,
				Some(other) => assign(other, expected, actual, seen, owner),
			};
			if free {
				owner[a] = Some(e);
				return true;
			}
		}
		false
	}

	let mut owner: Vec<Option<usize>> = vec![None; actual.len()];
	for e in 0..expected.len() {
		let mut seen = vec![false; actual.len()];
		assign(e, expected, actual, &mut seen, &mut owner);
	}

	let mut assignment = vec![None; expected.len()];
	for (a, e) in owner.iter().enumerate() {
		if let Some(e) = e {
			assignment[*e] = Some(a);
		}
	}
	assignment
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn row(pairs: &[(&str, Scalar)]) -> Row {
		Row::from_pairs(pairs.iter().cloned())
	}

	fn fixture(tables: &[(&str, Vec<Row>)]) -> Fixture {
		let mut fixture = Fixture::new();
		for (name, rows) in tables {
			fixture.declare_table(*name);
			for r in rows {
				fixture.push_row(name, r.clone());
			}
		}
		fixture
	}

	fn ids(values: &[i64]) -> Vec<Row> {
		values.iter().map(|id| row(&[("id", Scalar::Integer(*id))])).collect()
	}

	fn employees() -> Vec<Row> {
		vec![
			row(&[("id", 1.into()), ("first_name", "Taro".into()), ("last_name", "Yamada".into())]),
			row(&[("id", 2.into()), ("first_name", "Jiro".into()), ("last_name", "Yamada".into())]),
		]
	}

	#[rstest]
	fn test_reflexive() {
		let data = fixture(&[("employees", employees()), ("departments", ids(&[10]))]);
		assert_eq!(compare(&data, &data, &ComparisonConfig::default()), Verdict::Pass);
	}

	#[rstest]
	fn test_extra_actual_tables_are_ignored() {
		let actual = fixture(&[("employees", employees()), ("departments", ids(&[10]))]);
		let expected = fixture(&[("employees", employees())]);
		assert!(compare(&actual, &expected, &ComparisonConfig::default()).is_pass());
	}

	#[rstest]
	fn test_missing_table() {
		let actual = fixture(&[("employees", employees())]);
		let expected = fixture(&[("employees", employees()), ("departments", vec![])]);
		let verdict = compare(&actual, &expected, &ComparisonConfig::default());
		let mismatch = verdict.mismatch().unwrap();
		assert_eq!(mismatch.kind, MismatchKind::TableCountMismatch);
		assert_eq!(mismatch.table, "departments");
	}

	#[rstest]
	fn test_default_mode_ignores_order() {
		let actual = fixture(&[(
			"employees",
			vec![
				row(&[("id", 1.into()), ("name", "Jiro".into())]),
				row(&[("id", 2.into()), ("name", "Taro".into())]),
			],
		)]);
		let expected = fixture(&[(
			"employees",
			vec![
				row(&[("id", 2.into()), ("name", "Taro".into())]),
				row(&[("id", 1.into()), ("name", "Jiro".into())]),
			],
		)]);
		assert!(compare(&actual, &expected, &ComparisonConfig::default()).is_pass());
	}

	#[rstest]
	fn test_strict_order_reports_row_order() {
		let actual = fixture(&[("employees", ids(&[1, 2]))]);
		let expected = fixture(&[("employees", ids(&[2, 1]))]);
		let config = ComparisonConfig::new().with_strict_order(true);

		let verdict = compare(&actual, &expected, &config);
		assert_eq!(verdict.kind(), Some(MismatchKind::RowOrderMismatch));
		assert_eq!(verdict.mismatch().unwrap().row, Some(0));
	}

	#[rstest]
	fn test_strict_order_reports_content_when_row_is_absent() {
		let actual = fixture(&[("employees", ids(&[1, 2]))]);
		let expected = fixture(&[("employees", ids(&[1, 3]))]);
		let config = ComparisonConfig::new().with_strict_order(true);

		let verdict = compare(&actual, &expected, &config);
		let mismatch = verdict.mismatch().unwrap();
		assert_eq!(mismatch.kind, MismatchKind::RowContentMismatch);
		assert_eq!(mismatch.row, Some(1));
		assert_eq!(mismatch.column.as_deref(), Some("id"));
	}

	#[rstest]
	fn test_undeclared_columns_are_not_checked() {
		let actual = fixture(&[("employees", vec![row(&[("id", 1.into()), ("name", "Taro".into())])])]);
		let expected = fixture(&[("employees", ids(&[1]))]);
		assert!(compare(&actual, &expected, &ComparisonConfig::default()).is_pass());
	}

	#[rstest]
	fn test_expected_column_missing_from_actual() {
		let actual = fixture(&[("employees", vec![row(&[("id", 1.into()), ("name", "Taro".into())])])]);
		let expected = fixture(&[(
			"employees",
			vec![row(&[("id", 1.into()), ("name", "Taro".into()), ("dept", "X".into())])],
		)]);

		let verdict = compare(&actual, &expected, &ComparisonConfig::default());
		let mismatch = verdict.mismatch().unwrap();
		assert_eq!(mismatch.kind, MismatchKind::RowContentMismatch);
		assert_eq!(mismatch.column.as_deref(), Some("dept"));
	}

	#[rstest]
	fn test_unspecified_expected_column_may_be_missing() {
		let actual = fixture(&[("employees", ids(&[1]))]);
		let expected = fixture(&[(
			"employees",
			vec![row(&[("id", 1.into()), ("updated_at", Scalar::Unspecified)])],
		)]);
		assert!(compare(&actual, &expected, &ComparisonConfig::default()).is_pass());
	}

	#[rstest]
	fn test_unspecified_cells_do_not_break_unordered_pairing() {
		let actual = fixture(&[(
			"employees",
			vec![
				row(&[("id", 1.into()), ("name", "Taro".into())]),
				row(&[("id", 2.into()), ("name", "Jiro".into())]),
			],
		)]);
		let expected = fixture(&[(
			"employees",
			vec![
				row(&[("id", Scalar::Unspecified), ("name", "Taro".into())]),
				row(&[("id", 2.into()), ("name", "Jiro".into())]),
			],
		)]);
		assert!(compare(&actual, &expected, &ComparisonConfig::default()).is_pass());
	}

	#[rstest]
	fn test_equals_row_count() {
		let actual = fixture(&[("employees", ids(&[1, 2]))]);
		let expected = fixture(&[("employees", ids(&[1]))]);
		let verdict = compare(&actual, &expected, &ComparisonConfig::default());
		assert_eq!(verdict.kind(), Some(MismatchKind::RowCountMismatch));
	}

	#[rstest]
	fn test_contains_subset() {
		let actual = fixture(&[("employees", ids(&[1, 2]))]);
		let expected = fixture(&[("employees", ids(&[1]))]);
		let config = ComparisonConfig::new().with_compare_operation(CompareOperation::Contains);
		assert!(compare(&actual, &expected, &config).is_pass());
	}

	#[rstest]
	fn test_contains_requires_distinct_rows() {
		let config = ComparisonConfig::new().with_compare_operation(CompareOperation::Contains);

		let actual = fixture(&[("employees", ids(&[1]))]);
		let expected = fixture(&[("employees", ids(&[1, 1]))]);
		let verdict = compare(&actual, &expected, &config);
		assert_eq!(verdict.kind(), Some(MismatchKind::RowCountMismatch));

		let actual = fixture(&[("employees", ids(&[1, 2, 3]))]);
		let expected = fixture(&[("employees", ids(&[1, 1]))]);
		let verdict = compare(&actual, &expected, &config);
		assert_eq!(verdict.kind(), Some(MismatchKind::RowCountMismatch));
		assert_eq!(verdict.mismatch().unwrap().row, Some(1));
	}

	#[rstest]
	fn test_contains_pairs_rows_by_maximum_matching() {
		let actual = fixture(&[(
			"e",
			vec![
				row(&[("id", 1.into()), ("name", "Taro".into())]),
				row(&[("id", 2.into()), ("name", "Taro".into())]),
				row(&[("id", 3.into()), ("name", "Jiro".into())]),
			],
		)]);
		// the first expected row would take id 1 under first-fit pairing
		let expected = fixture(&[(
			"e",
			vec![
				row(&[("name", "Taro".into())]),
				row(&[("id", 1.into()), ("name", "Taro".into())]),
			],
		)]);
		let config = ComparisonConfig::new().with_compare_operation(CompareOperation::Contains);
		assert!(compare(&actual, &expected, &config).is_pass());

		let config = config.with_order_by(["name"]);
		assert!(compare(&actual, &expected, &config).is_pass());
	}

	#[rstest]
	fn test_contains_reports_closest_row() {
		let actual = fixture(&[("employees", employees())]);
		let expected = fixture(&[(
			"employees",
			vec![row(&[("id", 2.into()), ("first_name", "Saburo".into())])],
		)]);
		let config = ComparisonConfig::new().with_compare_operation(CompareOperation::Contains);

		let verdict = compare(&actual, &expected, &config);
		let mismatch = verdict.mismatch().unwrap();
		assert_eq!(mismatch.kind, MismatchKind::RowContentMismatch);
		assert_eq!(mismatch.column.as_deref(), Some("first_name"));
	}

	#[rstest]
	fn test_contains_strict_order_is_subsequence() {
		let actual = fixture(&[("employees", ids(&[1, 2, 3]))]);
		let config = ComparisonConfig::new()
			.with_compare_operation(CompareOperation::Contains)
			.with_strict_order(true);

		let expected = fixture(&[("employees", ids(&[1, 3]))]);
		assert!(compare(&actual, &expected, &config).is_pass());

		let expected = fixture(&[("employees", ids(&[3, 1]))]);
		let verdict = compare(&actual, &expected, &config);
		assert_eq!(verdict.kind(), Some(MismatchKind::RowOrderMismatch));
	}

	#[rstest]
	fn test_order_by_ties_are_not_failures() {
		let actual = fixture(&[(
			"employees",
			vec![
				row(&[("last_name", "Yamada".into()), ("first_name", "Taro".into())]),
				row(&[("last_name", "Suzuki".into()), ("first_name", "Ichiro".into())]),
				row(&[("last_name", "Yamada".into()), ("first_name", "Jiro".into())]),
			],
		)]);
		let expected = fixture(&[(
			"employees",
			vec![
				row(&[("last_name", "Yamada".into()), ("first_name", "Jiro".into())]),
				row(&[("last_name", "Yamada".into()), ("first_name", "Taro".into())]),
				row(&[("last_name", "Suzuki".into()), ("first_name", "Ichiro".into())]),
			],
		)]);
		let config = ComparisonConfig::new().with_order_by(["last_name"]);
		assert!(compare(&actual, &expected, &config).is_pass());
	}

	#[rstest]
	fn test_order_by_content_mismatch() {
		let actual = fixture(&[("employees", employees())]);
		let expected = fixture(&[(
			"employees",
			vec![
				row(&[("id", 1.into()), ("first_name", "Taro".into())]),
				row(&[("id", 2.into()), ("first_name", "Saburo".into())]),
			],
		)]);
		let config = ComparisonConfig::new().with_order_by(["id"]);

		let verdict = compare(&actual, &expected, &config);
		let mismatch = verdict.mismatch().unwrap();
		assert_eq!(mismatch.kind, MismatchKind::RowContentMismatch);
		assert_eq!(mismatch.row, Some(1));
		assert_eq!(mismatch.column.as_deref(), Some("first_name"));
	}

	#[rstest]
	fn test_order_by_with_contains_presorts() {
		let actual = fixture(&[("employees", ids(&[3, 1, 2]))]);
		let expected = fixture(&[("employees", ids(&[2, 1]))]);
		let config = ComparisonConfig::new()
			.with_compare_operation(CompareOperation::Contains)
			.with_order_by(["id"]);
		assert!(compare(&actual, &expected, &config).is_pass());
	}

	#[rstest]
	fn test_numeric_normalization() {
		let actual = fixture(&[("employees", vec![row(&[("id", 1.into()), ("ratio", 0.5.into())])])]);
		let expected = fixture(&[(
			"employees",
			vec![row(&[("id", "1".into()), ("ratio", "0.50".into())])],
		)]);
		assert!(compare(&actual, &expected, &ComparisonConfig::default()).is_pass());
	}

	#[rstest]
	fn test_null_matches_only_null() {
		let actual = fixture(&[("employees", vec![row(&[("id", 1.into()), ("name", Scalar::Null)])])]);
		let expected = fixture(&[("employees", vec![row(&[("id", 1.into()), ("name", "".into())])])]);
		let verdict = compare(&actual, &expected, &ComparisonConfig::default());
		assert_eq!(verdict.kind(), Some(MismatchKind::RowContentMismatch));
	}

	#[rstest]
	#[case(true, true)]
	#[case(false, false)]
	fn test_case_insensitive_names(#[case] enabled: bool, #[case] passes: bool) {
		let actual = fixture(&[("EMPLOYEES", vec![row(&[("ID", 1.into())])])]);
		let expected = fixture(&[("employees", ids(&[1]))]);
		let config = ComparisonConfig::new().with_case_insensitive_names(enabled);
		assert_eq!(compare(&actual, &expected, &config).is_pass(), passes);
	}

	#[rstest]
	fn test_ignore_columns() {
		let actual = fixture(&[(
			"employees",
			vec![row(&[("id", 1.into()), ("updated_at", "2024-01-01".into())])],
		)]);
		let expected = fixture(&[(
			"employees",
			vec![row(&[("id", 1.into()), ("updated_at", "1999-12-31".into())])],
		)]);

		let verdict = compare(&actual, &expected, &ComparisonConfig::default());
		assert_eq!(verdict.kind(), Some(MismatchKind::RowContentMismatch));

		let config = ComparisonConfig::new().with_ignore_columns(["updated_at"]);
		assert!(compare(&actual, &expected, &config).is_pass());
	}

	#[rstest]
	fn test_first_failing_table_wins() {
		let actual = fixture(&[("employees", ids(&[1])), ("departments", ids(&[10]))]);
		let expected = fixture(&[("employees", ids(&[2])), ("projects", vec![])]);
		let verdict = compare(&actual, &expected, &ComparisonConfig::default());
		assert_eq!(verdict.mismatch().unwrap().table, "employees");
	}

	#[rstest]
	fn test_empty_expected_table_requires_empty_actual() {
		let actual = fixture(&[("employees", ids(&[1]))]);
		let expected = fixture(&[("employees", vec![])]);
		let verdict = compare(&actual, &expected, &ComparisonConfig::default());
		assert_eq!(verdict.kind(), Some(MismatchKind::RowCountMismatch));
	}
}
