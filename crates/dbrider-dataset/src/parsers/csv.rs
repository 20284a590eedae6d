//! CSV datasets.
//!
//! One source holds one table. The first record is the header naming the
//! columns and the table name is the file stem of the source name, so
//! `setup/employees.csv` fills the `employees` table. An empty field or the
//! word `null` is SQL NULL; every other field goes through the literal rules.

use std::path::Path;

use super::{FormatParser, ParseOptions, ParsedSource};
use crate::error::{DatasetError, DatasetResult};
use crate::format::FixtureFormat;
use crate::model::{Fixture, Row, Scalar};

/// Parser for CSV datasets.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvParser;

impl CsvParser {
	/// Derives the table name from a source name.
	pub fn table_name(source_name: &str) -> Option<String> {
		Path::new(source_name)
			.file_stem()
			.and_then(|stem| stem.to_str())
			.filter(|stem| !stem.is_empty())
			.map(str::to_string)
	}
}

impl FormatParser for CsvParser {
	fn format(&self) -> FixtureFormat {
		FixtureFormat::Csv
	}

	fn parse(
		&self,
		source_name: &str,
		content: &str,
		options: &ParseOptions,
	) -> DatasetResult<ParsedSource> {
		let table = Self::table_name(source_name).ok_or_else(|| {
			DatasetError::malformed(source_name, "cannot derive a table name from the source name")
		})?;

		let mut reader = ::csv::ReaderBuilder::new()
			.has_headers(true)
			.flexible(false)
			.trim(::csv::Trim::Headers)
			.from_reader(content.as_bytes());

		let headers = reader
			.headers()
			.map_err(|e| csv_error(source_name, &e))?
			.clone();
		if headers.is_empty() || headers.iter().all(str::is_empty) {
			return Err(DatasetError::malformed_at(
				source_name,
				"line 1",
				"missing header line",
			));
		}

		for (index, column) in headers.iter().enumerate() {
			if headers.iter().take(index).any(|earlier| earlier == column) {
				return Err(DatasetError::malformed_at(
					source_name,
					"line 1",
					format!("column '{}' is declared twice", column),
				));
			}
		}

		let mut fixture = Fixture::new();
		fixture.declare_table(table.as_str());
		for record in reader.records() {
			let record = record.map_err(|e| csv_error(source_name, &e))?;
			let mut row = Row::new();
			for (column, field) in headers.iter().zip(record.iter()) {
				let value = if field.is_empty() || field == "null" {
					Scalar::Null
				} else {
					Scalar::from_literal(field, &options.literals)
				};
				row.insert(column, value);
			}
			fixture.push_row(&table, row);
		}

		Ok(ParsedSource::Rows(fixture))
	}
}

fn csv_error(source_name: &str, error: &::csv::Error) -> DatasetError {
	match error.position() {
		Some(position) => DatasetError::malformed_at(
			source_name,
			format!("line {}", position.line()),
			error.to_string(),
		),
		None => DatasetError::malformed(source_name, error.to_string()),
	}
}
