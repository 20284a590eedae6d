//! Format-independent datasets for database tests.
//!
//! This crate holds everything that does not need a database connection:
//!
//! - **Row model**: [`Fixture`], [`Table`], [`Row`] and [`Scalar`]
//! - **Parsers**: YAML, JSON, flat XML and CSV into the row model, SQL into a
//!   [`Script`]
//! - **Loader**: [`FixtureLoader`] merges an ordered list of sources
//! - **Comparator**: [`Comparator`] checks actual data against an expected
//!   fixture and returns a [`Verdict`]
//!
//! # Features
//!
//! - `yaml` - YAML datasets (enabled by default)
//! - `json` - JSON datasets (enabled by default)
//! - `xml` - Flat XML datasets (enabled by default)
//! - `csv` - CSV datasets (enabled by default)
//! - `full` - All formats
//!
//! # Example
//!
//! ```
//! use dbrider_dataset::{Comparator, ComparisonConfig, FixtureFormat, FixtureLoader, FixtureSource};
//!
//! let expected = FixtureLoader::new()
//!     .load([FixtureSource::inline(
//!         "expected.yml",
//!         FixtureFormat::Yaml,
//!         "employees:\n  - id: 1\n    first_name: Taro\n",
//!     )])
//!     .unwrap()
//!     .fixture;
//! let actual = FixtureLoader::new()
//!     .load([FixtureSource::inline(
//!         "employees.csv",
//!         FixtureFormat::Csv,
//!         "id,first_name,last_name\n1,Taro,Yamada\n",
//!     )])
//!     .unwrap()
//!     .fixture;
//!
//! let verdict = Comparator::new(ComparisonConfig::default()).compare(&actual, &expected);
//! assert!(verdict.is_pass());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod comparator;
pub mod config;
pub mod error;
pub mod format;
pub mod loader;
pub mod model;
pub mod parsers;
pub mod verdict;

pub use comparator::{Comparator, compare};
pub use config::{CompareOperation, ComparisonConfig};
pub use error::{DatasetError, DatasetResult};
pub use format::{FixtureFormat, FixtureSource, SourceOrigin};
pub use loader::{FixtureLoader, LoadOptions, LoadResult, load_fixture};
pub use model::{CaseStrategy, Fixture, LiteralRules, Row, Scalar, Table};
pub use parsers::{FixtureParser, FormatParser, ParseOptions, ParsedSource, Script};
pub use verdict::{Mismatch, MismatchKind, Verdict};
