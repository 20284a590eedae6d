//! YAML datasets.
//!
//! ```yaml
//! employees:
//!   - id: "1"
//!     first_name: Taro
//!     last_name: Yamada
//! departments: []
//! ```
//!
//! An empty sequence (or a bare key) declares a table with no rows.

use serde_yaml::Value;

use super::{FormatParser, ParseOptions, ParsedSource};
use crate::error::{DatasetError, DatasetResult};
use crate::format::FixtureFormat;
use crate::model::{Fixture, Row, Scalar};

/// Parser for YAML datasets.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlParser;

impl YamlParser {
	fn scalar(
		&self,
		source_name: &str,
		location: &str,
		value: Value,
		options: &ParseOptions,
	) -> DatasetResult<Scalar> {
		match value {
			Value::Null => Ok(Scalar::Null),
			Value::Bool(b) => Ok(Scalar::Bool(b)),
			Value::Number(n) => Ok(if let Some(i) = n.as_i64() {
				Scalar::Integer(i)
			} else if let Some(f) = n.as_f64() {
				Scalar::Float(f)
			} else {
				Scalar::Text(n.to_string())
			}),
			Value::String(s) => Ok(Scalar::from_string(&s, &options.literals)),
			Value::Tagged(tagged) => self.scalar(source_name, location, tagged.value, options),
			Value::Sequence(_) | Value::Mapping(_) => Err(DatasetError::malformed_at(
				source_name,
				location,
				"cell values must be scalars",
			)),
		}
	}

	fn key(&self, source_name: &str, location: &str, key: Value) -> DatasetResult<String> {
		match key {
			Value::String(s) => Ok(s),
			Value::Number(n) => Ok(n.to_string()),
			Value::Bool(b) => Ok(b.to_string()),
			_ => Err(DatasetError::malformed_at(
				source_name,
				location,
				"names must be strings",
			)),
		}
	}
}

impl FormatParser for YamlParser {
	fn format(&self) -> FixtureFormat {
		FixtureFormat::Yaml
	}

	fn parse(
		&self,
		source_name: &str,
		content: &str,
		options: &ParseOptions,
	) -> DatasetResult<ParsedSource> {
		if content.trim().is_empty() {
			return Ok(ParsedSource::Rows(Fixture::new()));
		}
		let document: Value = serde_yaml::from_str(content).map_err(|e| {
			let location = e
				.location()
				.map(|l| format!("line {}, column {}", l.line(), l.column()))
				.unwrap_or_else(|| "document".to_string());
			DatasetError::malformed_at(source_name, location, e.to_string())
		})?;

		let mut fixture = Fixture::new();
		let tables = match document {
			Value::Null => return Ok(ParsedSource::Rows(fixture)),
			Value::Mapping(tables) => tables,
			_ => {
				return Err(DatasetError::malformed(
					source_name,
					"top level must map table names to rows",
				));
			}
		};

		for (table_key, rows) in tables {
			let table_name = self.key(source_name, "top level", table_key)?;
			let rows = match rows {
				Value::Null => Vec::new(),
				Value::Sequence(rows) => rows,
				_ => {
					return Err(DatasetError::malformed_at(
						source_name,
						format!("table '{}'", table_name),
						"rows must be a sequence",
					));
				}
			};

			fixture.declare_table(table_name.as_str());
			for (index, row) in rows.into_iter().enumerate() {
				let location = format!("table '{}' row {}", table_name, index);
				let Value::Mapping(cells) = row else {
					return Err(DatasetError::malformed_at(
						source_name,
						location,
						"row must be a mapping of column to value",
					));
				};
				let mut parsed = Row::new();
				for (column, value) in cells {
					let column = self.key(source_name, &location, column)?;
					let value = self.scalar(source_name, &location, value, options)?;
					parsed.insert(column, value);
				}
				fixture.push_row(&table_name, parsed);
			}
		}

		Ok(ParsedSource::Rows(fixture))
	}
}
