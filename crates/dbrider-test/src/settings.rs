//! Global harness settings.
//!
//! Settings are usually read from a `dbrider.toml` file:
//!
//! ```toml
//! dataset_root = "tests/datasets"
//! case_strategy = "lowercase"
//! case_insensitive_names = true
//! clean_before = false
//! table_ordering = ["departments", "employees"]
//! clean_tables = ["audit_log"]
//!
//! [[foreign_keys]]
//! table = "employees"
//! references = "departments"
//!
//! [literals]
//! null_markers = ["[null]"]
//! unspecified_markers = ["[ignore]"]
//! ```

use std::path::{Path, PathBuf};

use dbrider_dataset::{CaseStrategy, ComparisonConfig, LiteralRules, LoadOptions, ParseOptions};
use dbrider_db::SeedOptions;
use serde::{Deserialize, Serialize};

use crate::error::{RiderError, RiderResult};

/// Child-to-parent table dependency, as written in a settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeySetting {
	/// Referencing table.
	pub table: String,
	/// Referenced table.
	pub references: String,
}

/// Settings applied to every data set a [`DbRider`](crate::DbRider) handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiderSettings {
	/// Directory relative data set paths are resolved against.
	pub dataset_root: PathBuf,

	/// Name normalization applied when loading data sets.
	pub case_strategy: CaseStrategy,

	/// Compare table and column names case-insensitively.
	pub case_insensitive_names: bool,

	/// Default clean-before flag for data sets that do not set one.
	pub clean_before: bool,

	/// Tables inserted first, in this order.
	pub table_ordering: Vec<String>,

	/// Declared table dependencies, used to order cleanup.
	pub foreign_keys: Vec<ForeignKeySetting>,

	/// Tables always cleaned when cleanup runs.
	pub clean_tables: Vec<String>,

	/// Null and unspecified marker spellings.
	pub literals: LiteralRules,
}

impl Default for RiderSettings {
	fn default() -> Self {
		Self {
			dataset_root: PathBuf::from("tests/datasets"),
			case_strategy: CaseStrategy::None,
			case_insensitive_names: false,
			clean_before: false,
			table_ordering: Vec::new(),
			foreign_keys: Vec::new(),
			clean_tables: Vec::new(),
			literals: LiteralRules::default(),
		}
	}
}

impl RiderSettings {
	/// Creates default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Load settings from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> RiderResult<Self> {
		let content = std::fs::read_to_string(path.as_ref()).map_err(|e| RiderError::SettingsIo {
			path: path.as_ref().to_path_buf(),
			source: e,
		})?;

		Self::from_toml(&content)
	}

	/// Parse settings from a TOML string.
	pub fn from_toml(content: &str) -> RiderResult<Self> {
		toml::from_str(content).map_err(|e| RiderError::Settings {
			message: e.to_string(),
		})
	}

	/// Sets the data set root.
	pub fn with_dataset_root(mut self, root: impl Into<PathBuf>) -> Self {
		self.dataset_root = root.into();
		self
	}

	/// Sets the case strategy.
	pub fn with_case_strategy(mut self, strategy: CaseStrategy) -> Self {
		self.case_strategy = strategy;
		self
	}

	/// Enables case-insensitive name comparison.
	pub fn with_case_insensitive_names(mut self, enabled: bool) -> Self {
		self.case_insensitive_names = enabled;
		self
	}

	/// Sets the default clean-before flag.
	pub fn with_clean_before(mut self, clean: bool) -> Self {
		self.clean_before = clean;
		self
	}

	/// Declares a table dependency.
	pub fn with_foreign_key(mut self, table: impl Into<String>, references: impl Into<String>) -> Self {
		self.foreign_keys.push(ForeignKeySetting {
			table: table.into(),
			references: references.into(),
		});
		self
	}

	/// Loader options derived from these settings.
	pub fn load_options(&self) -> LoadOptions {
		LoadOptions::new()
			.with_case_strategy(self.case_strategy)
			.with_parse_options(ParseOptions {
				literals: self.literals.clone(),
			})
			.with_base_dir(self.dataset_root.clone())
	}

	/// Seeder options derived from these settings.
	pub fn seed_options(&self) -> SeedOptions {
		let mut options = SeedOptions::new()
			.with_clean_before(self.clean_before)
			.with_table_ordering(self.table_ordering.iter().cloned())
			.with_extra_clean_tables(self.clean_tables.iter().cloned());
		for fk in &self.foreign_keys {
			options = options.with_foreign_key(fk.table.as_str(), fk.references.as_str());
		}
		options
	}

	/// Comparison options derived from these settings.
	pub fn comparison_config(&self) -> ComparisonConfig {
		ComparisonConfig::new()
			.with_case_insensitive_names(self.case_insensitive_names)
			.with_clean_before_seed(self.clean_before)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[rstest]
	fn test_defaults() {
		let settings = RiderSettings::default();
		assert_eq!(settings.dataset_root, PathBuf::from("tests/datasets"));
		assert_eq!(settings.case_strategy, CaseStrategy::None);
		assert!(!settings.clean_before);
		assert_eq!(settings.literals, LiteralRules::default());
	}

	#[rstest]
	fn test_from_toml() {
		let settings = RiderSettings::from_toml(
			r#"
dataset_root = "fixtures"
case_strategy = "lowercase"
case_insensitive_names = true
clean_tables = ["audit_log"]

[[foreign_keys]]
table = "employees"
references = "departments"

[literals]
null_markers = ["NULL"]
"#,
		)
		.unwrap();

		assert_eq!(settings.dataset_root, PathBuf::from("fixtures"));
		assert_eq!(settings.case_strategy, CaseStrategy::Lowercase);
		assert!(settings.case_insensitive_names);
		assert_eq!(settings.literals.null_markers, vec!["NULL"]);
		// unset marker lists keep their defaults
		assert_eq!(
			settings.literals.unspecified_markers,
			LiteralRules::default().unspecified_markers
		);

		let seed = settings.seed_options();
		assert_eq!(seed.extra_clean_tables, vec!["audit_log"]);
		assert_eq!(seed.foreign_keys.len(), 1);
		assert!(settings.comparison_config().case_insensitive_names);
	}

	#[rstest]
	fn test_from_toml_rejects_unknown_strategy() {
		let result = RiderSettings::from_toml("case_strategy = \"camel\"");
		assert!(matches!(result, Err(RiderError::Settings { .. })));
	}

	#[rstest]
	fn test_from_file() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "clean_before = true").unwrap();

		let settings = RiderSettings::from_file(file.path()).unwrap();
		assert!(settings.clean_before);
		assert!(settings.seed_options().clean_before);
	}

	#[rstest]
	fn test_from_missing_file() {
		let result = RiderSettings::from_file("/nonexistent/dbrider.toml");
		assert!(matches!(result, Err(RiderError::SettingsIo { .. })));
	}

	#[rstest]
	fn test_load_options_use_dataset_root() {
		let settings = RiderSettings::new()
			.with_dataset_root("/data")
			.with_case_strategy(CaseStrategy::Uppercase);
		let options = settings.load_options();
		assert_eq!(options.base_dir, Some(PathBuf::from("/data")));
		assert_eq!(options.case_strategy, CaseStrategy::Uppercase);
	}
}
