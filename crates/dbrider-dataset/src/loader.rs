//! Fixture loading.
//!
//! The loader turns an ordered list of sources into one [`Fixture`] plus the
//! SQL scripts found among them. It never touches the database.

use std::path::{Path, PathBuf};

use crate::error::DatasetResult;
use crate::format::FixtureSource;
use crate::model::{CaseStrategy, Fixture};
use crate::parsers::{FixtureParser, ParseOptions, ParsedSource, Script};

/// Options for loading fixtures.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
	/// Name normalization applied to every table and column.
	pub case_strategy: CaseStrategy,

	/// Carried through to the seeder: clean referenced tables first.
	pub clean_before: bool,

	/// Options handed to every parser.
	pub parse: ParseOptions,

	/// Directory relative file sources are resolved against.
	pub base_dir: Option<PathBuf>,
}

impl LoadOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the case strategy.
	pub fn with_case_strategy(mut self, strategy: CaseStrategy) -> Self {
		self.case_strategy = strategy;
		self
	}

	/// Sets the clean-before flag.
	pub fn with_clean_before(mut self, clean: bool) -> Self {
		self.clean_before = clean;
		self
	}

	/// Sets the parse options.
	pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
		self.parse = parse;
		self
	}

	/// Sets the base directory.
	pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.base_dir = Some(dir.into());
		self
	}
}

/// Result of loading a list of sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadResult {
	/// Row-backed sources merged in list order.
	pub fixture: Fixture,

	/// Script sources in list order.
	pub scripts: Vec<Script>,

	/// Number of sources read.
	pub sources_loaded: usize,

	/// Whether the seeder should clean the referenced tables first.
	pub clean_before: bool,
}

impl LoadResult {
	/// Returns true if nothing was loaded.
	pub fn is_empty(&self) -> bool {
		self.fixture.is_empty() && self.scripts.is_empty()
	}
}

/// Resolves fixture sources into a merged fixture.
#[derive(Debug, Clone, Default)]
pub struct FixtureLoader {
	options: LoadOptions,
}

impl FixtureLoader {
	/// Creates a loader with default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a loader with custom options.
	pub fn with_options(options: LoadOptions) -> Self {
		Self { options }
	}

	/// Options in use.
	pub fn options(&self) -> &LoadOptions {
		&self.options
	}

	/// Loads the sources in order.
	///
	/// Rows for a table already seen are appended after the existing rows.
	/// The first source that fails aborts the load.
	///
	/// # Example
	///
	/// ```
	/// # use dbrider_dataset::{FixtureFormat, FixtureLoader, FixtureSource};
	/// let loader = FixtureLoader::new();
	/// let result = loader
	///     .load([
	///         FixtureSource::inline("a.yml", FixtureFormat::Yaml, "employees:\n  - id: 1\n"),
	///         FixtureSource::inline("b.json", FixtureFormat::Json, r#"{"employees": [{"id": 2}]}"#),
	///     ])
	///     .unwrap();
	/// assert_eq!(result.fixture.table("employees").unwrap().len(), 2);
	/// ```
	pub fn load<I, S>(&self, sources: I) -> DatasetResult<LoadResult>
	where
		I: IntoIterator<Item = S>,
		S: Into<FixtureSource>,
	{
		let parser = FixtureParser::with_options(self.options.parse.clone());
		let mut result = LoadResult {
			clean_before: self.options.clean_before,
			..LoadResult::default()
		};

		for source in sources {
			let source = self.resolve(source.into());
			let name = source.name();
			match parser.parse_source(&source)? {
				ParsedSource::Rows(fixture) => {
					let fixture = fixture.with_case_strategy(self.options.case_strategy, &name)?;
					result.fixture.merge(fixture);
				}
				ParsedSource::Script(script) => result.scripts.push(script),
			}
			result.sources_loaded += 1;
		}

		tracing::debug!(
			sources = result.sources_loaded,
			tables = result.fixture.len(),
			rows = result.fixture.row_count(),
			scripts = result.scripts.len(),
			"loaded fixture sources"
		);
		Ok(result)
	}

	/// Loads a single file.
	pub fn load_path(&self, path: &Path) -> DatasetResult<LoadResult> {
		self.load([FixtureSource::file(path)])
	}

	fn resolve(&self, source: FixtureSource) -> FixtureSource {
		match &self.options.base_dir {
			Some(base) => source.resolved_against(base),
			None => source,
		}
	}
}

/// Loads sources with default options, keeping only the rows.
pub fn load_fixture<I, S>(sources: I) -> DatasetResult<Fixture>
where
	I: IntoIterator<Item = S>,
	S: Into<FixtureSource>,
{
	FixtureLoader::new().load(sources).map(|result| result.fixture)
}
