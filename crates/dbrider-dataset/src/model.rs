//! Row model shared by every fixture format.
//!
//! A [`Fixture`] maps table names to [`Table`]s, a table holds an ordered
//! sequence of [`Row`]s, and a row maps column names to [`Scalar`] values in
//! insertion order. Nothing here knows which format a fixture came from.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, DatasetResult};

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
	/// SQL NULL.
	Null,
	/// Boolean value.
	Bool(bool),
	/// Integral number.
	Integer(i64),
	/// Floating point number.
	Float(f64),
	/// Text value.
	Text(String),
	/// "Do not check this cell". Never written to the database.
	Unspecified,
}

/// Numeric view of a scalar used for normalized comparison.
#[derive(Debug, Clone, Copy)]
enum Numeric {
	Int(i64),
	Float(f64),
}

impl Numeric {
	fn as_f64(self) -> f64 {
		match self {
			Numeric::Int(i) => i as f64,
			Numeric::Float(f) => f,
		}
	}

	fn cmp(self, other: Numeric) -> Ordering {
		match (self, other) {
			(Numeric::Int(a), Numeric::Int(b)) => a.cmp(&b),
			(a, b) => a.as_f64().total_cmp(&b.as_f64()),
		}
	}
}

impl Scalar {
	/// Returns true for [`Scalar::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Scalar::Null)
	}

	/// Returns true for [`Scalar::Unspecified`].
	pub fn is_unspecified(&self) -> bool {
		matches!(self, Scalar::Unspecified)
	}

	/// Returns true if the value is a typed number.
	pub fn is_number(&self) -> bool {
		matches!(self, Scalar::Integer(_) | Scalar::Float(_))
	}

	/// Interprets bare text using the literal rules shared by the text based
	/// formats (flat XML attributes and CSV fields).
	///
	/// Markers are checked first, then booleans, then numbers. Numbers with a
	/// leading zero (`"007"`) or a leading `+` stay text.
	///
	/// # Example
	///
	/// ```
	/// # use dbrider_dataset::model::{Scalar, LiteralRules};
	/// let rules = LiteralRules::default();
	/// assert_eq!(Scalar::from_literal("42", &rules), Scalar::Integer(42));
	/// assert_eq!(Scalar::from_literal("true", &rules), Scalar::Bool(true));
	/// assert_eq!(Scalar::from_literal("007", &rules), Scalar::Text("007".into()));
	/// assert_eq!(Scalar::from_literal("[null]", &rules), Scalar::Null);
	/// ```
	pub fn from_literal(text: &str, rules: &LiteralRules) -> Self {
		if let Some(marker) = rules.marker(text) {
			return marker;
		}
		match text {
			"true" => return Scalar::Bool(true),
			"false" => return Scalar::Bool(false),
			_ => {}
		}
		if is_integer_literal(text)
			&& let Ok(i) = text.parse::<i64>()
		{
			return Scalar::Integer(i);
		}
		if is_float_literal(text)
			&& let Ok(f) = text.parse::<f64>()
		{
			return Scalar::Float(f);
		}
		Scalar::Text(text.to_string())
	}

	/// Builds a scalar from a string that was already typed as a string by
	/// its format. Only markers are recognised.
	pub fn from_string(text: &str, rules: &LiteralRules) -> Self {
		rules
			.marker(text)
			.unwrap_or_else(|| Scalar::Text(text.to_string()))
	}

	fn numeric(&self) -> Option<Numeric> {
		match self {
			Scalar::Integer(i) => Some(Numeric::Int(*i)),
			Scalar::Float(f) => Some(Numeric::Float(*f)),
			_ => None,
		}
	}

	/// Numeric interpretation including numeric-looking text.
	fn numeric_lenient(&self) -> Option<Numeric> {
		match self {
			Scalar::Text(s) => {
				let trimmed = s.trim();
				if let Ok(i) = trimmed.parse::<i64>() {
					Some(Numeric::Int(i))
				} else {
					trimmed
						.parse::<f64>()
						.ok()
						.filter(|f| f.is_finite())
						.map(Numeric::Float)
				}
			}
			Scalar::Bool(b) => Some(Numeric::Int(i64::from(*b))),
			other => other.numeric(),
		}
	}

	/// Normalized equality used by the comparator.
	///
	/// - null equals only null
	/// - when either side is a typed number, both sides are compared
	///   numerically (`1`, `1.0` and `"1"` are equal)
	/// - booleans equal `0`/`1` and `"true"`/`"false"`
	/// - two texts compare exactly
	/// - [`Scalar::Unspecified`] equals anything
	pub fn matches(&self, other: &Scalar) -> bool {
		match (self, other) {
			(Scalar::Unspecified, _) | (_, Scalar::Unspecified) => true,
			(Scalar::Null, Scalar::Null) => true,
			(Scalar::Null, _) | (_, Scalar::Null) => false,
			(Scalar::Text(a), Scalar::Text(b)) => a == b,
			(Scalar::Bool(a), Scalar::Bool(b)) => a == b,
			(Scalar::Bool(b), Scalar::Text(t)) | (Scalar::Text(t), Scalar::Bool(b)) => {
				t.eq_ignore_ascii_case(if *b { "true" } else { "false" })
					|| t.trim() == if *b { "1" } else { "0" }
			}
			(a, b) => match (a.numeric_lenient(), b.numeric_lenient()) {
				(Some(x), Some(y)) => x.cmp(y) == Ordering::Equal,
				_ => false,
			},
		}
	}

	/// Total order consistent with [`Scalar::matches`] for values that are
	/// not unspecified. Used to build canonical sort keys.
	///
	/// Null sorts first, then anything with a numeric interpretation, then
	/// text. Unspecified sorts last.
	pub fn canonical_cmp(&self, other: &Scalar) -> Ordering {
		fn rank(s: &Scalar) -> u8 {
			match s {
				Scalar::Null => 0,
				Scalar::Unspecified => 3,
				other if other.numeric_lenient().is_some() => 1,
				_ => 2,
			}
		}

		match rank(self).cmp(&rank(other)) {
			Ordering::Equal => {}
			unequal => return unequal,
		}
		match (self.numeric_lenient(), other.numeric_lenient()) {
			(Some(a), Some(b)) => a.cmp(b),
			_ => self.to_string().cmp(&other.to_string()),
		}
	}
}

impl fmt::Display for Scalar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Scalar::Null => write!(f, "null"),
			Scalar::Bool(b) => write!(f, "{}", b),
			Scalar::Integer(i) => write!(f, "{}", i),
			Scalar::Float(v) => write!(f, "{}", v),
			Scalar::Text(s) => write!(f, "\"{}\"", s),
			Scalar::Unspecified => write!(f, "[unspecified]"),
		}
	}
}

impl From<&str> for Scalar {
	fn from(s: &str) -> Self {
		Scalar::Text(s.to_string())
	}
}

impl From<String> for Scalar {
	fn from(s: String) -> Self {
		Scalar::Text(s)
	}
}

impl From<i64> for Scalar {
	fn from(i: i64) -> Self {
		Scalar::Integer(i)
	}
}

impl From<i32> for Scalar {
	fn from(i: i32) -> Self {
		Scalar::Integer(i64::from(i))
	}
}

impl From<f64> for Scalar {
	fn from(f: f64) -> Self {
		Scalar::Float(f)
	}
}

impl From<bool> for Scalar {
	fn from(b: bool) -> Self {
		Scalar::Bool(b)
	}
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(Scalar::Null)
	}
}

fn is_integer_literal(text: &str) -> bool {
	let digits = text.strip_prefix('-').unwrap_or(text);
	!digits.is_empty()
		&& digits.bytes().all(|b| b.is_ascii_digit())
		&& (digits == "0" || !digits.starts_with('0'))
}

fn is_float_literal(text: &str) -> bool {
	let body = text.strip_prefix('-').unwrap_or(text);
	let (mantissa, exponent) = match body.find(['e', 'E']) {
		Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
		None => (body, None),
	};
	let Some((int_part, frac_part)) = mantissa.split_once('.') else {
		return exponent.is_some() && is_integer_literal(mantissa) && valid_exponent(exponent);
	};
	let int_ok = !int_part.is_empty()
		&& int_part.bytes().all(|b| b.is_ascii_digit())
		&& (int_part == "0" || !int_part.starts_with('0'));
	let frac_ok = !frac_part.is_empty() && frac_part.bytes().all(|b| b.is_ascii_digit());
	int_ok && frac_ok && (exponent.is_none() || valid_exponent(exponent))
}

fn valid_exponent(exponent: Option<&str>) -> bool {
	exponent
		.map(|e| e.strip_prefix(['+', '-']).unwrap_or(e))
		.is_some_and(|e| !e.is_empty() && e.bytes().all(|b| b.is_ascii_digit()))
}

/// Special text spellings recognised in every format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiteralRules {
	/// Spellings that mean SQL NULL.
	pub null_markers: Vec<String>,
	/// Spellings that mean "unspecified, do not compare".
	pub unspecified_markers: Vec<String>,
}

impl Default for LiteralRules {
	fn default() -> Self {
		Self {
			null_markers: vec!["[null]".to_string()],
			unspecified_markers: vec!["[unspecified]".to_string(), "[ignore]".to_string()],
		}
	}
}

impl LiteralRules {
	fn marker(&self, text: &str) -> Option<Scalar> {
		if self.null_markers.iter().any(|m| m == text) {
			Some(Scalar::Null)
		} else if self.unspecified_markers.iter().any(|m| m == text) {
			Some(Scalar::Unspecified)
		} else {
			None
		}
	}
}

/// How table and column names are normalized when a fixture is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStrategy {
	/// Keep names exactly as written.
	#[default]
	None,
	/// Lowercase every identifier.
	Lowercase,
	/// Uppercase every identifier.
	Uppercase,
}

impl CaseStrategy {
	/// Applies the strategy to an identifier.
	pub fn apply(&self, name: &str) -> String {
		match self {
			CaseStrategy::None => name.to_string(),
			CaseStrategy::Lowercase => name.to_lowercase(),
			CaseStrategy::Uppercase => name.to_uppercase(),
		}
	}
}

/// Ordered mapping from column name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
	cells: IndexMap<String, Scalar>,
}

impl Row {
	/// Creates an empty row.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a row from `(column, value)` pairs.
	///
	/// # Example
	///
	/// ```
	/// # use dbrider_dataset::model::{Row, Scalar};
	/// let row = Row::from_pairs([("id", Scalar::from(1)), ("name", "Taro".into())]);
	/// assert_eq!(row.len(), 2);
	/// assert_eq!(row.get("name"), Some(&Scalar::Text("Taro".into())));
	/// ```
	pub fn from_pairs<K, I>(pairs: I) -> Self
	where
		K: Into<String>,
		I: IntoIterator<Item = (K, Scalar)>,
	{
		Self {
			cells: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
		}
	}

	/// Sets a cell, keeping the original position if the column exists.
	pub fn insert(&mut self, column: impl Into<String>, value: Scalar) -> Option<Scalar> {
		self.cells.insert(column.into(), value)
	}

	/// Returns a cell value.
	pub fn get(&self, column: &str) -> Option<&Scalar> {
		self.cells.get(column)
	}

	/// Returns true if the column is declared in this row.
	pub fn contains(&self, column: &str) -> bool {
		self.cells.contains_key(column)
	}

	/// Declared column names in insertion order.
	pub fn columns(&self) -> impl Iterator<Item = &str> {
		self.cells.keys().map(String::as_str)
	}

	/// Iterates over `(column, value)` pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
		self.cells.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Number of declared columns.
	pub fn len(&self) -> usize {
		self.cells.len()
	}

	/// Returns true if no column is declared.
	pub fn is_empty(&self) -> bool {
		self.cells.is_empty()
	}

	/// Row equality: every column present in either row must hold matching
	/// values, except where either side is unspecified.
	pub fn row_eq(&self, other: &Row) -> bool {
		let covers = |a: &Row, b: &Row| {
			a.cells.iter().all(|(column, value)| match b.cells.get(column) {
				Some(other) => value.matches(other),
				None => value.is_unspecified(),
			})
		};
		covers(self, other) && covers(other, self)
	}

	/// Returns a copy with every column renamed by `rename`.
	///
	/// Fails if two columns collapse onto the same name.
	pub fn renamed(&self, rename: impl Fn(&str) -> String) -> Result<Row, String> {
		let mut cells = IndexMap::with_capacity(self.cells.len());
		for (column, value) in &self.cells {
			let name = rename(column);
			if cells.insert(name.clone(), value.clone()).is_some() {
				return Err(name);
			}
		}
		Ok(Row { cells })
	}
}

impl<'a> IntoIterator for &'a Row {
	type Item = (&'a String, &'a Scalar);
	type IntoIter = indexmap::map::Iter<'a, String, Scalar>;

	fn into_iter(self) -> Self::IntoIter {
		self.cells.iter()
	}
}

/// A named, ordered sequence of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
	name: String,
	rows: Vec<Row>,
}

impl Table {
	/// Creates an empty table.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			rows: Vec::new(),
		}
	}

	/// Creates a table from rows.
	pub fn with_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
		Self {
			name: name.into(),
			rows,
		}
	}

	/// Table name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Rows in sequence order.
	pub fn rows(&self) -> &[Row] {
		&self.rows
	}

	/// Appends a row.
	pub fn push(&mut self, row: Row) {
		self.rows.push(row);
	}

	/// Number of rows.
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	/// Returns true if the table has no rows.
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Union of the columns declared by any row, in first-seen order.
	pub fn columns(&self) -> Vec<&str> {
		let mut seen: IndexMap<&str, ()> = IndexMap::new();
		for row in &self.rows {
			for column in row.columns() {
				seen.entry(column).or_insert(());
			}
		}
		seen.into_keys().collect()
	}
}

/// Mapping from table name to table, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fixture {
	tables: IndexMap<String, Table>,
}

impl Fixture {
	/// Creates an empty fixture.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a table by exact name.
	pub fn table(&self, name: &str) -> Option<&Table> {
		self.tables.get(name)
	}

	/// Returns a table, comparing names case-insensitively when asked to.
	pub fn find_table(&self, name: &str, case_insensitive: bool) -> Option<&Table> {
		if !case_insensitive {
			return self.table(name);
		}
		self.tables
			.values()
			.find(|t| t.name.to_lowercase() == name.to_lowercase())
	}

	/// Returns the table with the given name, creating it empty if needed.
	pub fn table_mut(&mut self, name: &str) -> &mut Table {
		self.tables
			.entry(name.to_string())
			.or_insert_with(|| Table::new(name))
	}

	/// Declares a table (possibly empty) and returns it.
	pub fn declare_table(&mut self, name: impl Into<String>) -> &mut Table {
		let name = name.into();
		self.table_mut(&name)
	}

	/// Appends a row to a table, declaring the table if needed.
	pub fn push_row(&mut self, table: &str, row: Row) {
		self.table_mut(table).push(row);
	}

	/// Adds a whole table. Rows of an existing table with the same name are
	/// kept and the new rows are appended after them.
	pub fn add_table(&mut self, table: Table) {
		let target = self.table_mut(&table.name);
		target.rows.extend(table.rows);
	}

	/// Append-only merge: tables new to `self` are added after the existing
	/// ones, rows for existing tables are appended after the current rows.
	pub fn merge(&mut self, other: Fixture) {
		for (_, table) in other.tables {
			self.add_table(table);
		}
	}

	/// Iterates over tables in insertion order.
	pub fn tables(&self) -> impl Iterator<Item = &Table> {
		self.tables.values()
	}

	/// Table names in insertion order.
	pub fn table_names(&self) -> Vec<String> {
		self.tables.keys().cloned().collect()
	}

	/// Number of tables.
	pub fn len(&self) -> usize {
		self.tables.len()
	}

	/// Returns true if no table is declared.
	pub fn is_empty(&self) -> bool {
		self.tables.is_empty()
	}

	/// Total number of rows across tables.
	pub fn row_count(&self) -> usize {
		self.tables.values().map(Table::len).sum()
	}

	/// Renames every table and column with `strategy`.
	///
	/// Tables that collapse onto the same name are merged in order. Columns
	/// that collapse inside one row are reported as malformed.
	pub fn with_case_strategy(self, strategy: CaseStrategy, source_name: &str) -> DatasetResult<Self> {
		if strategy == CaseStrategy::None {
			return Ok(self);
		}
		let mut normalized = Fixture::new();
		for (_, table) in self.tables {
			let name = strategy.apply(&table.name);
			let mut rows = Vec::with_capacity(table.rows.len());
			for (index, row) in table.rows.iter().enumerate() {
				let renamed = row.renamed(|c| strategy.apply(c)).map_err(|column| {
					DatasetError::malformed_at(
						source_name,
						format!("table '{}' row {}", name, index),
						format!("column '{}' is declared twice", column),
					)
				})?;
				rows.push(renamed);
			}
			normalized.add_table(Table::with_rows(name, rows));
		}
		Ok(normalized)
	}
}
