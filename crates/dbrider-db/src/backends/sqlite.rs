//! SQLite backend

use std::time::Duration;

use async_trait::async_trait;
use dbrider_dataset::{Row, Scalar};
use sqlx::pool::PoolOptions;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row as SqlxRow, Sqlite, SqlitePool, ValueRef};

use crate::error::{DatabaseError, DatabaseResult};
use crate::handle::DatabaseHandle;

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, <Sqlite as sqlx::Database>::Arguments<'q>>;

/// SQLite database handle
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
	pool: SqlitePool,
}

impl SqliteDatabase {
	/// Wraps an existing pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Connects to `url` with a single long-lived connection, so that
	/// `sqlite::memory:` databases survive between calls.
	pub async fn connect(url: &str) -> DatabaseResult<Self> {
		let pool = PoolOptions::<Sqlite>::new()
			.max_connections(1)
			.idle_timeout(None::<Duration>)
			.max_lifetime(None::<Duration>)
			.connect(url)
			.await?;
		Ok(Self::new(pool))
	}

	/// Opens a private in-memory database.
	pub async fn memory() -> DatabaseResult<Self> {
		Self::connect("sqlite::memory:").await
	}

	/// Underlying pool, for migrations and for the code under test.
	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	fn check_params(params: &[Scalar]) -> DatabaseResult<()> {
		match params.iter().position(Scalar::is_unspecified) {
			Some(index) => Err(DatabaseError::UnsupportedValue(format!(
				"parameter {} is unspecified",
				index + 1
			))),
			None => Ok(()),
		}
	}

	fn bind_value<'q>(query: SqliteQuery<'q>, value: &'q Scalar) -> SqliteQuery<'q> {
		match value {
			// Unspecified is rejected by check_params before binding
			Scalar::Null | Scalar::Unspecified => query.bind(None::<i64>),
			Scalar::Bool(b) => query.bind(*b),
			Scalar::Integer(i) => query.bind(*i),
			Scalar::Float(f) => query.bind(*f),
			Scalar::Text(s) => query.bind(s.as_str()),
		}
	}

	fn convert_row(sqlite_row: SqliteRow) -> DatabaseResult<Row> {
		let mut row = Row::new();
		for column in sqlite_row.columns() {
			let column_name = column.name();
			let ordinal = column.ordinal();
			if sqlite_row.try_get_raw(ordinal)?.is_null() {
				row.insert(column_name, Scalar::Null);
			} else if let Ok(value) = sqlite_row.try_get::<i64, _>(ordinal) {
				row.insert(column_name, Scalar::Integer(value));
			} else if let Ok(value) = sqlite_row.try_get::<f64, _>(ordinal) {
				row.insert(column_name, Scalar::Float(value));
			} else if let Ok(value) = sqlite_row.try_get::<String, _>(ordinal) {
				row.insert(column_name, Scalar::Text(value));
			} else if let Ok(value) = sqlite_row.try_get::<Vec<u8>, _>(ordinal) {
				row.insert(column_name, Scalar::Text(String::from_utf8_lossy(&value).into_owned()));
			} else {
				return Err(DatabaseError::UnsupportedValue(format!(
					"cannot decode column '{}'",
					column_name
				)));
			}
		}
		Ok(row)
	}
}

#[async_trait]
impl DatabaseHandle for SqliteDatabase {
	fn backend_name(&self) -> &'static str {
		"sqlite"
	}

	fn placeholder(&self, _index: usize) -> String {
		"?".to_string()
	}

	async fn execute(&self, sql: &str, params: Vec<Scalar>) -> DatabaseResult<u64> {
		Self::check_params(&params)?;
		let mut query = sqlx::query(sql);
		for param in &params {
			query = Self::bind_value(query, param);
		}
		let result = query.execute(&self.pool).await?;
		Ok(result.rows_affected())
	}

	async fn query(&self, sql: &str, params: Vec<Scalar>) -> DatabaseResult<Vec<Row>> {
		Self::check_params(&params)?;
		let mut query = sqlx::query(sql);
		for param in &params {
			query = Self::bind_value(query, param);
		}
		let sqlite_rows = query.fetch_all(&self.pool).await?;
		sqlite_rows.into_iter().map(Self::convert_row).collect()
	}

	async fn execute_script(&self, statements: &[String]) -> DatabaseResult<u64> {
		let mut tx = self.pool.begin().await?;
		let mut affected = 0;
		for (index, statement) in statements.iter().enumerate() {
			match sqlx::query(statement.as_str()).execute(&mut *tx).await {
				Ok(result) => affected += result.rows_affected(),
				Err(source) => {
					if let Err(e) = tx.rollback().await {
						tracing::warn!(error = %e, "rollback after failed statement failed");
					}
					return Err(DatabaseError::Statement {
						position: index + 1,
						source,
					});
				}
			}
		}
		tx.commit().await?;
		Ok(affected)
	}
}
