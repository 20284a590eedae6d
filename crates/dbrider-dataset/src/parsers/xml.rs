//! Flat XML datasets.
//!
//! The root element (conventionally `<dataset>`) holds one child element per
//! row. The element name is the table name and the attributes are the
//! columns. An element without attributes declares an empty table.
//!
//! ```xml
//! <dataset>
//!     <employees id="1" first_name="Taro" last_name="Yamada"/>
//!     <departments/>
//! </dataset>
//! ```

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{FormatParser, ParseOptions, ParsedSource, line_column};
use crate::error::{DatasetError, DatasetResult};
use crate::format::FixtureFormat;
use crate::model::{Fixture, Row, Scalar};

/// Parser for flat XML datasets.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlatXmlParser;

impl FlatXmlParser {
	/// Turns one row element into its table name and row.
	fn row(
		&self,
		source_name: &str,
		location: &str,
		element: &BytesStart<'_>,
		options: &ParseOptions,
	) -> DatasetResult<(String, Row)> {
		let table = String::from_utf8_lossy(element.name().as_ref()).to_string();
		let mut row = Row::new();
		for attr in element.attributes() {
			let attr = attr.map_err(|e| {
				DatasetError::malformed_at(source_name, location, format!("XML attribute error: {}", e))
			})?;
			let column = String::from_utf8_lossy(attr.key.as_ref()).to_string();
			let value = attr.unescape_value().map_err(|e| {
				DatasetError::malformed_at(source_name, location, format!("XML decode error: {}", e))
			})?;
			row.insert(column, Scalar::from_literal(&value, &options.literals));
		}
		Ok((table, row))
	}
}

impl FormatParser for FlatXmlParser {
	fn format(&self) -> FixtureFormat {
		FixtureFormat::Xml
	}

	fn parse(
		&self,
		source_name: &str,
		content: &str,
		options: &ParseOptions,
	) -> DatasetResult<ParsedSource> {
		let mut reader = Reader::from_str(content);
		reader.config_mut().trim_text(true);

		let mut fixture = Fixture::new();
		// 0: before the root, 1: inside the root, 2: inside a row element
		let mut depth = 0usize;
		let mut root_closed = false;

		loop {
			let position = reader.buffer_position() as usize;
			let location = line_column(content, position);
			let event = reader.read_event().map_err(|e| {
				DatasetError::malformed_at(source_name, location.clone(), format!("XML parse error: {}", e))
			})?;

			match event {
				Event::Start(_) | Event::Empty(_) if root_closed => {
					return Err(DatasetError::malformed_at(
						source_name,
						location,
						"only one root element is allowed",
					));
				}
				Event::Start(_) if depth == 0 => depth = 1,
				Event::Empty(_) if depth == 0 => root_closed = true,
				Event::Start(element) if depth == 1 => {
					let (table, row) = self.row(source_name, &location, &element, options)?;
					push(&mut fixture, table, row);
					depth = 2;
				}
				Event::Empty(element) if depth == 1 => {
					let (table, row) = self.row(source_name, &location, &element, options)?;
					push(&mut fixture, table, row);
				}
				Event::Start(_) | Event::Empty(_) => {
					return Err(DatasetError::malformed_at(
						source_name,
						location,
						"row elements cannot contain nested elements",
					));
				}
				Event::End(_) => {
					depth = depth.saturating_sub(1);
					if depth == 0 {
						root_closed = true;
					}
				}
				Event::Text(text) => {
					let raw: &[u8] = &text;
					if !raw.iter().all(u8::is_ascii_whitespace) {
						return Err(DatasetError::malformed_at(
							source_name,
							location,
							"text content is not allowed in a flat dataset",
						));
					}
				}
				// `&amp;` and friends arrive as their own event, never as text
				Event::GeneralRef(_) => {
					return Err(DatasetError::malformed_at(
						source_name,
						location,
						"text content is not allowed in a flat dataset",
					));
				}
				Event::CData(_) => {
					return Err(DatasetError::malformed_at(
						source_name,
						location,
						"CDATA is not allowed in a flat dataset",
					));
				}
				Event::Eof => break,
				_ => {}
			}
		}

		if depth != 0 {
			return Err(DatasetError::malformed_at(
				source_name,
				line_column(content, content.len()),
				"unclosed element",
			));
		}
		if !root_closed {
			return Err(DatasetError::malformed(source_name, "missing root element"));
		}

		Ok(ParsedSource::Rows(fixture))
	}
}

fn push(fixture: &mut Fixture, table: String, row: Row) {
	if row.is_empty() {
		fixture.declare_table(table);
	} else {
		fixture.push_row(&table, row);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn parse(content: &str) -> DatasetResult<Fixture> {
		match FlatXmlParser.parse("test.xml", content, &ParseOptions::default())? {
			ParsedSource::Rows(fixture) => Ok(fixture),
			ParsedSource::Script(_) => panic!("Expected rows"),
		}
	}

	#[rstest]
	fn test_parse_flat_dataset() {
		let fixture = parse(
			r#"<?xml version="1.0" encoding="UTF-8"?>
<dataset>
    <employees id="1" first_name="Taro" last_name="Yamada"/>
    <employees id="2" first_name="Jiro"></employees>
    <departments/>
</dataset>"#,
		)
		.unwrap();

		assert_eq!(fixture.table_names(), vec!["employees", "departments"]);
		let employees = fixture.table("employees").unwrap();
		assert_eq!(employees.len(), 2);
		assert_eq!(employees.rows()[0].get("id"), Some(&Scalar::Integer(1)));
		assert_eq!(
			employees.rows()[0].get("first_name"),
			Some(&Scalar::Text("Taro".to_string()))
		);
		assert!(!employees.rows()[1].contains("last_name"));
		assert!(fixture.table("departments").unwrap().is_empty());
	}

	#[rstest]
	fn test_attribute_values_are_unescaped() {
		let fixture = parse(r#"<dataset><notes body="a &amp; b" flag="[null]"/></dataset>"#).unwrap();
		let row = &fixture.table("notes").unwrap().rows()[0];
		assert_eq!(row.get("body"), Some(&Scalar::Text("a & b".to_string())));
		assert_eq!(row.get("flag"), Some(&Scalar::Null));
	}

	#[rstest]
	fn test_empty_root() {
		assert!(parse("<dataset/>").unwrap().is_empty());
	}

	#[rstest]
	#[case("<dataset><employees id=\"1\">")]
	#[case("<dataset><employees id=\"1\"><nested/></employees></dataset>")]
	#[case("<dataset><employees>text</employees></dataset>")]
	#[case("<dataset><employees id=\"1\">&amp;</employees></dataset>")]
	#[case("<dataset>&#65;<employees id=\"1\"/></dataset>")]
	#[case("<dataset></other>")]
	#[case("<dataset/><dataset/>")]
	#[case("")]
	fn test_malformed(#[case] content: &str) {
		assert!(matches!(
			parse(content),
			Err(DatasetError::MalformedFixture { .. })
		));
	}
}
