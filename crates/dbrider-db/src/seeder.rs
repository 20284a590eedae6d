//! Writes fixtures into a live database.
//!
//! Seeding runs in three steps:
//!
//! 1. optionally delete every row of the referenced tables, children first
//! 2. run SQL scripts, each inside its own transaction
//! 3. insert fixture rows table by table with parameterized statements
//!
//! Steps 1 and 3 are not transactional.

use indexmap::{IndexMap, IndexSet};

use dbrider_dataset::{Fixture, LoadResult, Script};

use crate::error::{DatabaseError, SeedError, SeedResult};
use crate::handle::{DatabaseHandle, insert_statement};

/// A declared foreign key: rows of `table` reference rows of `references`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignKey {
	/// Referencing (child) table.
	pub table: String,
	/// Referenced (parent) table.
	pub references: String,
}

impl ForeignKey {
	/// Creates a foreign key declaration.
	pub fn new(table: impl Into<String>, references: impl Into<String>) -> Self {
		Self {
			table: table.into(),
			references: references.into(),
		}
	}
}

/// Options for seeding.
#[derive(Debug, Clone, Default)]
pub struct SeedOptions {
	/// Delete all rows of the referenced tables before inserting.
	pub clean_before: bool,

	/// Tables inserted first, in this order. Cleanup without foreign keys
	/// deletes in the reverse of the resulting insertion order.
	pub table_ordering: Vec<String>,

	/// Foreign keys used to derive the deletion order.
	pub foreign_keys: Vec<ForeignKey>,

	/// Tables cleaned in addition to those referenced by the fixture.
	pub extra_clean_tables: Vec<String>,
}

impl SeedOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the clean-before flag.
	pub fn with_clean_before(mut self, clean: bool) -> Self {
		self.clean_before = clean;
		self
	}

	/// Sets the table ordering.
	pub fn with_table_ordering<I, S>(mut self, tables: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.table_ordering = tables.into_iter().map(Into::into).collect();
		self
	}

	/// Declares a foreign key.
	pub fn with_foreign_key(mut self, table: impl Into<String>, references: impl Into<String>) -> Self {
		self.foreign_keys.push(ForeignKey::new(table, references));
		self
	}

	/// Adds tables to clean.
	pub fn with_extra_clean_tables<I, S>(mut self, tables: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.extra_clean_tables
			.extend(tables.into_iter().map(Into::into));
		self
	}
}

/// Statistics of a seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
	/// Tables emptied, in deletion order.
	pub tables_cleaned: Vec<String>,

	/// Number of rows inserted from fixtures.
	pub rows_inserted: u64,

	/// Number of script statements executed.
	pub statements_executed: usize,
}

/// Applies fixtures to a database.
#[derive(Debug, Clone, Default)]
pub struct Seeder {
	options: SeedOptions,
}

impl Seeder {
	/// Creates a seeder with default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a seeder with custom options.
	pub fn with_options(options: SeedOptions) -> Self {
		Self { options }
	}

	/// Options in use.
	pub fn options(&self) -> &SeedOptions {
		&self.options
	}

	/// Seeds a loaded data set: cleanup, then scripts, then rows.
	///
	/// Cleanup runs when either the options or the load result ask for it.
	/// A cleanup failure stops before anything is inserted.
	pub async fn seed(&self, db: &dyn DatabaseHandle, data: &LoadResult) -> SeedResult<SeedReport> {
		let mut report = SeedReport::default();

		if self.options.clean_before || data.clean_before {
			report.tables_cleaned = self.clean(db, &data.fixture).await?;
		}
		for script in &data.scripts {
			report.statements_executed += self.execute_script(db, script).await?;
		}
		report.rows_inserted = self.insert_fixture(db, &data.fixture).await?;

		tracing::info!(
			backend = db.backend_name(),
			tables_cleaned = report.tables_cleaned.len(),
			statements = report.statements_executed,
			rows = report.rows_inserted,
			"seeded data set"
		);
		Ok(report)
	}

	/// Deletes all rows of the tables referenced by `fixture` plus the extra
	/// clean tables, returning the tables in the order they were emptied.
	pub async fn clean(&self, db: &dyn DatabaseHandle, fixture: &Fixture) -> SeedResult<Vec<String>> {
		let order = self.deletion_order(fixture)?;
		for table in &order {
			let sql = format!("DELETE FROM {}", db.quote_identifier(table));
			let deleted = db
				.execute(&sql, Vec::new())
				.await
				.map_err(|source| SeedError::CleanupFailed {
					table: table.clone(),
					source,
				})?;
			tracing::debug!(table = %table, rows = deleted, "cleaned table");
		}
		Ok(order)
	}

	/// Executes a script inside one transaction and returns the number of
	/// statements run.
	pub async fn execute_script(&self, db: &dyn DatabaseHandle, script: &Script) -> SeedResult<usize> {
		if script.is_empty() {
			return Ok(0);
		}
		db.execute_script(&script.statements)
			.await
			.map_err(|error| match error {
				DatabaseError::Statement { position, source } => SeedError::SeedFailed {
					origin: script.source_name.clone(),
					position,
					source: DatabaseError::Driver(source),
				},
				other => SeedError::SeedFailed {
					origin: script.source_name.clone(),
					position: 0,
					source: other,
				},
			})?;
		tracing::debug!(source = %script.source_name, statements = script.len(), "executed script");
		Ok(script.len())
	}

	/// Inserts every row of `fixture` and returns the number of rows written.
	///
	/// Each row is inserted with exactly the columns it declares. Unspecified
	/// cells are left to the column default.
	pub async fn insert_fixture(&self, db: &dyn DatabaseHandle, fixture: &Fixture) -> SeedResult<u64> {
		let mut inserted = 0;
		for name in self.insertion_order(fixture) {
			let Some(table) = fixture.table(&name) else {
				continue;
			};
			for (index, row) in table.rows().iter().enumerate() {
				let cells: Vec<_> = row.iter().filter(|(_, value)| !value.is_unspecified()).collect();
				let columns: Vec<&str> = cells.iter().map(|(column, _)| *column).collect();
				let params = cells.iter().map(|(_, value)| (*value).clone()).collect();
				let sql = insert_statement(db, table.name(), &columns);
				db.execute(&sql, params)
					.await
					.map_err(|source| SeedError::SeedFailed {
						origin: format!("table '{}'", table.name()),
						position: index + 1,
						source,
					})?;
				inserted += 1;
			}
			tracing::debug!(table = %table.name(), rows = table.len(), "inserted rows");
		}
		Ok(inserted)
	}

	/// Tables in insertion order: `table_ordering` first, then the rest of the
	/// fixture in declaration order.
	pub fn insertion_order(&self, fixture: &Fixture) -> Vec<String> {
		let mut order: IndexSet<String> = IndexSet::new();
		for table in &self.options.table_ordering {
			if fixture.table(table).is_some() {
				order.insert(table.clone());
			}
		}
		for table in fixture.table_names() {
			order.insert(table);
		}
		order.into_iter().collect()
	}

	/// Order in which tables are emptied.
	///
	/// With foreign keys declared, children are deleted before the tables
	/// they reference. Otherwise tables are deleted in the reverse of the
	/// insertion order. Extra clean tables come first in both cases unless a
	/// foreign key places them elsewhere.
	pub fn deletion_order(&self, fixture: &Fixture) -> SeedResult<Vec<String>> {
		let mut tables: IndexSet<String> = self.options.extra_clean_tables.iter().cloned().collect();
		tables.extend(self.insertion_order(fixture).into_iter().rev());

		if self.options.foreign_keys.is_empty() {
			return Ok(tables.into_iter().collect());
		}
		dependency_order(&tables, &self.options.foreign_keys)
	}
}

/// Topological order with children first. Ties keep the order of `tables`.
fn dependency_order(tables: &IndexSet<String>, foreign_keys: &[ForeignKey]) -> SeedResult<Vec<String>> {
	// number of tables still referencing each table
	let mut referrers: IndexMap<&str, usize> = tables.iter().map(|t| (t.as_str(), 0)).collect();
	for fk in foreign_keys {
		if fk.table != fk.references
			&& tables.contains(&fk.table)
			&& let Some(count) = referrers.get_mut(fk.references.as_str())
		{
			*count += 1;
		}
	}

	let mut order = Vec::with_capacity(tables.len());
	while !referrers.is_empty() {
		let Some(next) = referrers
			.iter()
			.find(|(_, count)| **count == 0)
			.map(|(table, _)| *table)
		else {
			return Err(SeedError::DependencyCycle {
				tables: referrers.keys().map(|t| t.to_string()).collect(),
			});
		};
		referrers.shift_remove(next);
		for fk in foreign_keys {
			if fk.table == next
				&& fk.references != next
				&& let Some(count) = referrers.get_mut(fk.references.as_str())
			{
				*count -= 1;
			}
		}
		order.push(next.to_string());
	}
	Ok(order)
}

/// Seeds `fixture` with default options.
pub async fn seed(db: &dyn DatabaseHandle, fixture: &Fixture, clean_before: bool) -> SeedResult<SeedReport> {
	let data = LoadResult {
		fixture: fixture.clone(),
		clean_before,
		..LoadResult::default()
	};
	Seeder::new().seed(db, &data).await
}
