//! JSON datasets.
//!
//! ```json
//! {
//!   "employees": [
//!     {"id": "1", "first_name": "Taro", "last_name": "Yamada"}
//!   ]
//! }
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;

use super::{FormatParser, ParseOptions, ParsedSource};
use crate::error::{DatasetError, DatasetResult};
use crate::format::FixtureFormat;
use crate::model::{Fixture, Row, Scalar};

/// Parser for JSON datasets.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonParser;

impl JsonParser {
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
			Value::Array(_) | Value::Object(_) => Err(DatasetError::malformed_at(
				source_name,
				location,
				"cell values must be scalars",
			)),
		}
	}
}

impl FormatParser for JsonParser {
	fn format(&self) -> FixtureFormat {
		FixtureFormat::Json
	}

	fn parse(
		&self,
		source_name: &str,
		content: &str,
		options: &ParseOptions,
	) -> DatasetResult<ParsedSource> {
		let Tables(tables) = serde_json::from_str(content).map_err(|e| {
			DatasetError::malformed_at(
				source_name,
				format!("line {}, column {}", e.line(), e.column()),
				e.to_string(),
			)
		})?;

		let mut fixture = Fixture::new();
		for (table_name, rows) in tables {
			fixture.declare_table(table_name.as_str());
			for (index, Columns(cells)) in rows.unwrap_or_default().into_iter().enumerate() {
				let location = format!("table '{}' row {}", table_name, index);
				let mut parsed = Row::new();
				for (column, value) in cells {
					let value = self.scalar(source_name, &location, value, options)?;
					parsed.insert(column, value);
				}
				fixture.push_row(&table_name, parsed);
			}
		}

		Ok(ParsedSource::Rows(fixture))
	}
}

/// Top-level members in document order. `null` declares an empty table.
struct Tables(Vec<(String, Option<Vec<Columns>>)>);

/// Cells of one row in document order.
struct Columns(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for Tables {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer
			.deserialize_map(MembersVisitor::new("an object of table names to rows", "table"))
			.map(Tables)
	}
}

impl<'de> Deserialize<'de> for Columns {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer
			.deserialize_map(MembersVisitor::new("a row object of column to value", "column"))
			.map(Columns)
	}
}

/// Collects object members without letting a repeated key replace an
/// earlier one; `serde_json::Map` keeps only the last.
struct MembersVisitor<T> {
	expecting: &'static str,
	member: &'static str,
	marker: PhantomData<T>,
}

impl<T> MembersVisitor<T> {
	fn new(expecting: &'static str, member: &'static str) -> Self {
		Self {
			expecting,
			member,
			marker: PhantomData,
		}
	}
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for MembersVisitor<T> {
	type Value = Vec<(String, T)>;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.expecting)
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
		let mut members: Vec<(String, T)> = Vec::new();
		while let Some(key) = map.next_key::<String>()? {
			if members.iter().any(|(existing, _)| *existing == key) {
				return Err(de::Error::custom(format!(
					"{} '{}' is declared twice",
					self.member, key
				)));
			}
			let value = map.next_value()?;
			members.push((key, value));
		}
		Ok(members)
	}
}
