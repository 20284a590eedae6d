//! Seeds data sets before a test and checks expected data sets after it.

use dbrider_dataset::{Comparator, FixtureLoader, FixtureSource, LoadResult, Verdict};
use dbrider_db::{DatabaseHandle, SeedReport, Seeder, SnapshotReader};

use crate::dataset::{DataSet, ExpectedDataSet};
use crate::error::{RiderError, RiderResult};
use crate::settings::RiderSettings;

/// Entry point for dataset-driven tests.
///
/// A test calls [`setup`](Self::setup) with the data it starts from, runs
/// the code under test, then [`assert_expected`](Self::assert_expected) with
/// the data the database must hold.
#[derive(Debug, Clone, Default)]
pub struct DbRider {
	settings: RiderSettings,
}

impl DbRider {
	/// Creates a rider with default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a rider with custom settings.
	pub fn with_settings(settings: RiderSettings) -> Self {
		Self { settings }
	}

	/// Settings in use.
	pub fn settings(&self) -> &RiderSettings {
		&self.settings
	}

	/// Seeds `data_set`: cleanup when requested, then the scripts run before
	/// seeding and any script sources, then the rows.
	pub async fn setup(&self, db: &dyn DatabaseHandle, data_set: &DataSet) -> RiderResult<SeedReport> {
		let loader = self.loader();
		let before = self.load_scripts(&loader, &data_set.scripts_before)?;
		let mut data = loader.load(data_set.sources.iter().cloned())?;

		let clean_before = data_set.clean_before.unwrap_or(self.settings.clean_before);
		data.clean_before = clean_before;
		let mut scripts = before.scripts;
		scripts.append(&mut data.scripts);
		data.scripts = scripts;

		let mut options = self
			.settings
			.seed_options()
			.with_clean_before(clean_before)
			.with_extra_clean_tables(data_set.clean_tables.iter().cloned());
		if !data_set.table_ordering.is_empty() {
			options = options.with_table_ordering(data_set.table_ordering.iter().cloned());
		}

		let report = Seeder::with_options(options).seed(db, &data).await?;
		tracing::info!(
			sources = data.sources_loaded,
			rows = report.rows_inserted,
			"data set ready"
		);
		Ok(report)
	}

	/// Compares the database against `expected` and returns the verdict.
	pub async fn verify(&self, db: &dyn DatabaseHandle, expected: &ExpectedDataSet) -> RiderResult<Verdict> {
		if expected.sources.is_empty() {
			return Err(RiderError::InvalidDataSet(
				"expected data set has no sources".to_string(),
			));
		}
		let data = self.loader().load(expected.sources.iter().cloned())?;
		if let Some(script) = data.scripts.first() {
			return Err(RiderError::InvalidDataSet(format!(
				"expected data set cannot contain scripts: {}",
				script.source_name
			)));
		}

		let actual = SnapshotReader::new().snapshot_for(db, &data.fixture).await?;
		let config = self
			.settings
			.comparison_config()
			.with_compare_operation(expected.compare_operation)
			.with_order_by(expected.order_by.iter().cloned())
			.with_ignore_columns(expected.ignore_columns.iter().cloned())
			.with_strict_order(expected.strict_order);
		Ok(Comparator::new(config).compare(&actual, &data.fixture))
	}

	/// Like [`verify`](Self::verify), but a failing verdict becomes
	/// [`RiderError::Assertion`].
	pub async fn assert_expected(&self, db: &dyn DatabaseHandle, expected: &ExpectedDataSet) -> RiderResult<()> {
		self.verify(db, expected)
			.await?
			.into_result()
			.map_err(RiderError::Assertion)
	}

	/// Runs the scripts `data_set` declares for after the test and returns
	/// the number of statements executed.
	pub async fn teardown(&self, db: &dyn DatabaseHandle, data_set: &DataSet) -> RiderResult<usize> {
		let after = self.load_scripts(&self.loader(), &data_set.scripts_after)?;
		let seeder = Seeder::new();
		let mut executed = 0;
		for script in &after.scripts {
			executed += seeder.execute_script(db, script).await?;
		}
		tracing::debug!(statements = executed, "ran teardown scripts");
		Ok(executed)
	}

	fn loader(&self) -> FixtureLoader {
		FixtureLoader::with_options(self.settings.load_options())
	}

	fn load_scripts(&self, loader: &FixtureLoader, sources: &[FixtureSource]) -> RiderResult<LoadResult> {
		let result = loader.load(sources.iter().cloned())?;
		if let Some(table) = result.fixture.tables().next() {
			return Err(RiderError::InvalidDataSet(format!(
				"script list contains row data for table '{}'",
				table.name()
			)));
		}
		Ok(result)
	}
}
