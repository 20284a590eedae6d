//! Fixture formats and fixture sources.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, DatasetResult};

/// Supported fixture formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureFormat {
	/// YAML mapping of table name to a list of rows.
	Yaml,
	/// JSON object of table name to an array of rows.
	Json,
	/// Flat XML: one element per row, attributes are columns.
	Xml,
	/// CSV with a header line; the table name comes from the source name.
	Csv,
	/// SQL script executed verbatim.
	Sql,
}

impl FixtureFormat {
	/// Determines the fixture format from a file extension.
	///
	/// # Example
	///
	/// ```
	/// # use dbrider_dataset::FixtureFormat;
	/// assert_eq!(FixtureFormat::from_extension("yml"), Some(FixtureFormat::Yaml));
	/// assert_eq!(FixtureFormat::from_extension("CSV"), Some(FixtureFormat::Csv));
	/// assert_eq!(FixtureFormat::from_extension("xls"), None);
	/// ```
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext.to_lowercase().as_str() {
			"yaml" | "yml" => Some(Self::Yaml),
			"json" => Some(Self::Json),
			"xml" => Some(Self::Xml),
			"csv" => Some(Self::Csv),
			"sql" => Some(Self::Sql),
			_ => None,
		}
	}

	/// Determines the fixture format from a file path.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}

	/// Returns the default file extension for this format.
	pub fn extension(&self) -> &'static str {
		match self {
			Self::Yaml => "yml",
			Self::Json => "json",
			Self::Xml => "xml",
			Self::Csv => "csv",
			Self::Sql => "sql",
		}
	}

	/// Returns true for formats executed directly instead of parsed into rows.
	pub fn is_script(&self) -> bool {
		matches!(self, Self::Sql)
	}
}

impl fmt::Display for FixtureFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Yaml => write!(f, "YAML"),
			Self::Json => write!(f, "JSON"),
			Self::Xml => write!(f, "XML"),
			Self::Csv => write!(f, "CSV"),
			Self::Sql => write!(f, "SQL"),
		}
	}
}

/// Where the text of a fixture source comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
	/// A file on disk.
	File(PathBuf),
	/// Text held in memory under a name.
	Inline {
		/// Name used in error messages and, for CSV, as the table name.
		name: String,
		/// Source text.
		text: String,
	},
}

/// One `(format, source)` pair handed to the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSource {
	origin: SourceOrigin,
	format: Option<FixtureFormat>,
}

impl FixtureSource {
	/// A file source whose format is inferred from its extension.
	pub fn file(path: impl Into<PathBuf>) -> Self {
		Self {
			origin: SourceOrigin::File(path.into()),
			format: None,
		}
	}

	/// An in-memory source with an explicit format.
	///
	/// # Example
	///
	/// ```
	/// # use dbrider_dataset::{FixtureFormat, FixtureSource};
	/// let source = FixtureSource::inline("employees.csv", FixtureFormat::Csv, "id\n1\n");
	/// assert_eq!(source.name(), "employees.csv");
	/// assert_eq!(source.resolve_format().unwrap(), FixtureFormat::Csv);
	/// ```
	pub fn inline(name: impl Into<String>, format: FixtureFormat, text: impl Into<String>) -> Self {
		Self {
			origin: SourceOrigin::Inline {
				name: name.into(),
				text: text.into(),
			},
			format: Some(format),
		}
	}

	/// Declares the format explicitly instead of inferring it.
	pub fn with_format(mut self, format: FixtureFormat) -> Self {
		self.format = Some(format);
		self
	}

	/// Where the text comes from.
	pub fn origin(&self) -> &SourceOrigin {
		&self.origin
	}

	/// Declared format, if any.
	pub fn declared_format(&self) -> Option<FixtureFormat> {
		self.format
	}

	/// Display name of the source.
	pub fn name(&self) -> String {
		match &self.origin {
			SourceOrigin::File(path) => path.display().to_string(),
			SourceOrigin::Inline { name, .. } => name.clone(),
		}
	}

	/// Resolves this source against a base directory. Inline sources and
	/// absolute paths are returned unchanged.
	pub fn resolved_against(self, base: &Path) -> Self {
		if let SourceOrigin::File(path) = &self.origin
			&& path.is_relative()
		{
			return Self {
				origin: SourceOrigin::File(base.join(path)),
				format: self.format,
			};
		}
		self
	}

	/// Returns the declared format or infers it from the source name.
	pub fn resolve_format(&self) -> DatasetResult<FixtureFormat> {
		if let Some(format) = self.format {
			return Ok(format);
		}
		let name = self.name();
		let path = Path::new(&name);
		FixtureFormat::from_path(path).ok_or_else(|| {
			let reason = match path.extension().and_then(|e| e.to_str()) {
				Some(ext) => format!("unsupported extension '{}'", ext),
				None => "no extension and no declared format".to_string(),
			};
			DatasetError::unknown_format(name.clone(), reason)
		})
	}

	/// Reads the source text.
	pub fn read_text(&self) -> DatasetResult<String> {
		match &self.origin {
			SourceOrigin::File(path) => {
				let bytes = std::fs::read(path).map_err(|e| {
					if e.kind() == std::io::ErrorKind::NotFound {
						DatasetError::SourceNotFound(path.display().to_string())
					} else {
						DatasetError::Io(e)
					}
				})?;
				String::from_utf8(bytes).map_err(|e| {
					DatasetError::malformed_at(
						path.display().to_string(),
						format!("byte {}", e.utf8_error().valid_up_to()),
						"source is not valid UTF-8",
					)
				})
			}
			SourceOrigin::Inline { text, .. } => Ok(text.clone()),
		}
	}
}

impl From<&str> for FixtureSource {
	fn from(path: &str) -> Self {
		Self::file(path)
	}
}

impl From<PathBuf> for FixtureSource {
	fn from(path: PathBuf) -> Self {
		Self::file(path)
	}
}

impl From<&Path> for FixtureSource {
	fn from(path: &Path) -> Self {
		Self::file(path)
	}
}
