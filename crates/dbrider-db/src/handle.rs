//! The database handle consumed by the seeder and the snapshot reader.

use async_trait::async_trait;
use dbrider_dataset::{Row, Scalar};

use crate::error::DatabaseResult;

/// A live database connection.
///
/// Parameters and result cells use the dataset [`Scalar`] type. Implementations
/// must reject [`Scalar::Unspecified`] parameters instead of binding them.
#[async_trait]
pub trait DatabaseHandle: Send + Sync {
	/// Short backend name used in logs.
	fn backend_name(&self) -> &'static str;

	/// Placeholder for the parameter at `index` (1-based).
	fn placeholder(&self, index: usize) -> String;

	/// Quotes a table or column name.
	fn quote_identifier(&self, name: &str) -> String {
		format!("\"{}\"", name.replace('"', "\"\""))
	}

	/// Executes a statement and returns the number of affected rows.
	async fn execute(&self, sql: &str, params: Vec<Scalar>) -> DatabaseResult<u64>;

	/// Runs a query and returns its rows in the order the database yields them.
	async fn query(&self, sql: &str, params: Vec<Scalar>) -> DatabaseResult<Vec<Row>>;

	/// Executes statements in order inside one transaction.
	///
	/// The first failing statement rolls the transaction back and is reported
	/// as [`DatabaseError::Statement`](crate::DatabaseError::Statement).
	async fn execute_script(&self, statements: &[String]) -> DatabaseResult<u64>;
}

/// Builds `INSERT INTO t (a, b) VALUES (?, ?)` for the given columns.
pub fn insert_statement(db: &dyn DatabaseHandle, table: &str, columns: &[&str]) -> String {
	if columns.is_empty() {
		return format!("INSERT INTO {} DEFAULT VALUES", db.quote_identifier(table));
	}
	let names: Vec<String> = columns.iter().map(|c| db.quote_identifier(c)).collect();
	let placeholders: Vec<String> = (1..=columns.len()).map(|i| db.placeholder(i)).collect();
	format!(
		"INSERT INTO {} ({}) VALUES ({})",
		db.quote_identifier(table),
		names.join(", "),
		placeholders.join(", ")
	)
}
