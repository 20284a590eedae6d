//! Reads the current state of database tables into a [`Fixture`].

use dbrider_dataset::{Fixture, Row, Table};

use crate::error::{SeedError, SeedResult};
use crate::handle::DatabaseHandle;

/// Materializes tables as a fixture.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotReader;

impl SnapshotReader {
	/// Creates a reader.
	pub fn new() -> Self {
		Self
	}

	/// Reads every row of each named table, in the order the database
	/// returns them. The snapshot declares every requested table, even empty
	/// ones.
	pub async fn snapshot<S: AsRef<str>>(&self, db: &dyn DatabaseHandle, tables: &[S]) -> SeedResult<Fixture> {
		let mut fixture = Fixture::new();
		for table in tables {
			let table = table.as_ref();
			let rows = self.read_table(db, table).await?;
			fixture.add_table(Table::with_rows(table, rows));
		}
		tracing::info!(
			backend = db.backend_name(),
			tables = fixture.len(),
			rows = fixture.row_count(),
			"captured snapshot"
		);
		Ok(fixture)
	}

	/// Reads the tables an expected fixture refers to.
	pub async fn snapshot_for(&self, db: &dyn DatabaseHandle, expected: &Fixture) -> SeedResult<Fixture> {
		self.snapshot(db, &expected.table_names()).await
	}

	async fn read_table(&self, db: &dyn DatabaseHandle, table: &str) -> SeedResult<Vec<Row>> {
		let sql = format!("SELECT * FROM {}", db.quote_identifier(table));
		let rows = db
			.query(&sql, Vec::new())
			.await
			.map_err(|source| SeedError::SnapshotReadFailed {
				table: table.to_string(),
				source,
			})?;
		tracing::debug!(table = %table, rows = rows.len(), "read table");
		Ok(rows)
	}
}

/// Reads the named tables with a default reader.
pub async fn snapshot<S: AsRef<str>>(db: &dyn DatabaseHandle, tables: &[S]) -> SeedResult<Fixture> {
	SnapshotReader::new().snapshot(db, tables).await
}
