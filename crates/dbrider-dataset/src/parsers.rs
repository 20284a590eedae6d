//! Fixture parsing.
//!
//! Each supported format has a [`FormatParser`] implementation. The
//! [`FixtureParser`] selects one by the explicit [`FixtureFormat`] tag; it
//! never sniffs content.

#[cfg(feature = "csv")]
pub mod csv;
#[cfg(feature = "json")]
pub mod json;
pub mod sql;
#[cfg(feature = "xml")]
pub mod xml;
#[cfg(feature = "yaml")]
pub mod yaml;

use crate::error::{DatasetError, DatasetResult};
use crate::format::{FixtureFormat, FixtureSource};
use crate::model::{Fixture, LiteralRules};

/// Options shared by all parsers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
	/// Null and unspecified marker spellings.
	pub literals: LiteralRules,
}

/// SQL statements taken verbatim from a script source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
	/// Name of the source the statements came from.
	pub source_name: String,
	/// Statements in source order, without trailing semicolons.
	pub statements: Vec<String>,
}

impl Script {
	/// Number of statements.
	pub fn len(&self) -> usize {
		self.statements.len()
	}

	/// Returns true if the script holds no statement.
	pub fn is_empty(&self) -> bool {
		self.statements.is_empty()
	}
}

/// Output of a single parser.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedSource {
	/// Rows in the row model.
	Rows(Fixture),
	/// A script bypassing the row model.
	Script(Script),
}

/// A parser for one fixture format.
pub trait FormatParser {
	/// Format handled by this parser.
	fn format(&self) -> FixtureFormat;

	/// Parses `content`. `source_name` is used for error messages and, for
	/// formats without table names, to derive the table name.
	fn parse(
		&self,
		source_name: &str,
		content: &str,
		options: &ParseOptions,
	) -> DatasetResult<ParsedSource>;
}

/// Dispatches to the parser of a declared format.
#[derive(Debug, Default, Clone)]
pub struct FixtureParser {
	options: ParseOptions,
}

impl FixtureParser {
	/// Creates a parser with default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a parser with custom options.
	pub fn with_options(options: ParseOptions) -> Self {
		Self { options }
	}

	/// Returns the parser implementation for a format.
	///
	/// # Errors
	///
	/// Returns [`DatasetError::UnknownFormat`] when the crate was built
	/// without the feature that provides the format.
	pub fn parser_for(format: FixtureFormat) -> DatasetResult<Box<dyn FormatParser>> {
		match format {
			#[cfg(feature = "yaml")]
			FixtureFormat::Yaml => Ok(Box::new(yaml::YamlParser)),
			#[cfg(feature = "json")]
			FixtureFormat::Json => Ok(Box::new(json::JsonParser)),
			#[cfg(feature = "xml")]
			FixtureFormat::Xml => Ok(Box::new(xml::FlatXmlParser)),
			#[cfg(feature = "csv")]
			FixtureFormat::Csv => Ok(Box::new(csv::CsvParser)),
			FixtureFormat::Sql => Ok(Box::new(sql::SqlScriptParser)),
			#[allow(unreachable_patterns)]
			other => Err(DatasetError::unknown_format(
				other.to_string(),
				format!(
					"{} support requires the '{}' feature",
					other,
					required_feature(other)
				),
			)),
		}
	}

	/// Parses fixture text in a declared format.
	pub fn parse_string(
		&self,
		source_name: &str,
		content: &str,
		format: FixtureFormat,
	) -> DatasetResult<ParsedSource> {
		let parser = Self::parser_for(format)?;
		parser.parse(source_name, content, &self.options)
	}

	/// Reads and parses a single source.
	pub fn parse_source(&self, source: &FixtureSource) -> DatasetResult<ParsedSource> {
		let format = source.resolve_format()?;
		let content = source.read_text()?;
		let name = source.name();
		let parsed = self.parse_string(&name, &content, format)?;
		tracing::debug!(source = %name, %format, "parsed fixture source");
		Ok(parsed)
	}
}

/// Cargo feature that compiles in the parser for `format`.
fn required_feature(format: FixtureFormat) -> &'static str {
	match format {
		FixtureFormat::Yaml => "yaml",
		FixtureFormat::Json => "json",
		FixtureFormat::Xml => "xml",
		FixtureFormat::Csv => "csv",
		FixtureFormat::Sql => "sql",
	}
}

/// Converts a position inside `content` into `line N, column M`.
pub(crate) fn line_column(content: &str, offset: usize) -> String {
	let offset = offset.min(content.len());
	let before = &content[..offset];
	let line = before.matches('\n').count() + 1;
	let column = before.rfind('\n').map(|nl| offset - nl).unwrap_or(offset + 1);
	format!("line {}, column {}", line, column)
}
