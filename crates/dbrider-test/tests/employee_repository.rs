//! Dataset-driven tests of a small employee repository.

use dbrider_dataset::{CaseStrategy, CompareOperation, MismatchKind};
use dbrider_db::{DatabaseHandle, SeedError, SqliteDatabase};
use dbrider_test::assertions::{assert_verdict_fails_with, assert_verdict_pass};
use dbrider_test::fixtures::sqlite_db;
use dbrider_test::{DataSet, DbRider, ExpectedDataSet, RiderError, RiderSettings};
use rstest::*;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;

static MIGRATOR: Migrator = sqlx::migrate!("tests/migrations");

const DATASET_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/datasets");

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
struct Employee {
	id: String,
	first_name: String,
	last_name: String,
}

impl Employee {
	fn new(id: &str, first_name: &str, last_name: &str) -> Self {
		Self {
			id: id.to_string(),
			first_name: first_name.to_string(),
			last_name: last_name.to_string(),
		}
	}
}

struct EmployeeRepository<'a> {
	pool: &'a SqlitePool,
}

impl<'a> EmployeeRepository<'a> {
	fn new(pool: &'a SqlitePool) -> Self {
		Self { pool }
	}

	async fn find_by_id(&self, id: &str) -> sqlx::Result<Option<Employee>> {
		sqlx::query_as::<_, Employee>("SELECT id, first_name, last_name FROM employees WHERE id = ?")
			.bind(id)
			.fetch_optional(self.pool)
			.await
	}

	async fn insert(&self, employee: &Employee) -> sqlx::Result<()> {
		sqlx::query("INSERT INTO employees (id, first_name, last_name) VALUES (?, ?, ?)")
			.bind(&employee.id)
			.bind(&employee.first_name)
			.bind(&employee.last_name)
			.execute(self.pool)
			.await?;
		Ok(())
	}
}

#[fixture]
async fn db(#[future] sqlite_db: SqliteDatabase) -> SqliteDatabase {
	let db = sqlite_db.await;
	MIGRATOR
		.run(db.pool())
		.await
		.expect("Failed to apply migrations");
	db
}

#[fixture]
fn rider() -> DbRider {
	DbRider::with_settings(
		RiderSettings::new()
			.with_dataset_root(DATASET_ROOT)
			.with_case_strategy(CaseStrategy::Lowercase)
			.with_case_insensitive_names(true),
	)
}

async fn find_by_id(db: &SqliteDatabase, id: &str) -> Option<Employee> {
	EmployeeRepository::new(db.pool()).find_by_id(id).await.unwrap()
}

// Seeding from each format

#[rstest]
#[case::yaml("setup/findbyid.yml")]
#[case::xml("setup/findbyid.xml")]
#[case::json("setup/findbyid.json")]
#[case::csv("setup/employees.csv")]
#[tokio::test]
async fn test_seed_from_file(#[future] db: SqliteDatabase, rider: DbRider, #[case] path: &str) {
	let db = db.await;
	rider.setup(&db, &DataSet::new([path])).await.unwrap();

	let actual = find_by_id(&db, "1").await;
	assert_eq!(actual, Some(Employee::new("1", "Taro", "Yamada")));
}

#[rstest]
#[tokio::test]
async fn test_seed_from_script(#[future] db: SqliteDatabase, rider: DbRider) {
	let db = db.await;
	let data_set = DataSet::empty()
		.clean_before(true)
		.clean_tables(["employees"])
		.execute_scripts_before(["setup/findbyid.sql"]);

	let report = rider.setup(&db, &data_set).await.unwrap();
	assert_eq!(report.statements_executed, 1);
	assert_eq!(report.tables_cleaned, vec!["employees"]);

	let actual = find_by_id(&db, "1").await;
	assert_eq!(actual, Some(Employee::new("1", "Taro", "Yamada")));
}

#[rstest]
#[tokio::test]
async fn test_seed_from_multiple_files(#[future] db: SqliteDatabase, rider: DbRider) {
	let db = db.await;
	let data_set = DataSet::new(["setup/findbyid.yml", "setup/findbyid2.yml"]);
	let report = rider.setup(&db, &data_set).await.unwrap();
	assert_eq!(report.rows_inserted, 2);

	assert_eq!(
		find_by_id(&db, "1").await,
		Some(Employee::new("1", "Taro", "Yamada"))
	);
	assert_eq!(
		find_by_id(&db, "2").await,
		Some(Employee::new("2", "Jiro", "Yamada"))
	);
}

// Asserting the state left by the code under test

#[rstest]
#[tokio::test]
async fn test_assert_after_insert(#[future] db: SqliteDatabase, rider: DbRider) {
	let db = db.await;
	rider
		.setup(&db, &DataSet::empty().clean_before(true).clean_tables(["employees"]))
		.await
		.unwrap();

	EmployeeRepository::new(db.pool())
		.insert(&Employee::new("1", "Taro", "Yamada"))
		.await
		.unwrap();

	rider
		.assert_expected(&db, &ExpectedDataSet::new(["expected/insert.yml"]))
		.await
		.unwrap();
}

#[rstest]
#[tokio::test]
async fn test_assert_reports_mismatch(#[future] db: SqliteDatabase, rider: DbRider) {
	let db = db.await;
	let result = rider
		.assert_expected(&db, &ExpectedDataSet::new(["expected/insert.yml"]))
		.await;

	match result {
		Err(RiderError::Assertion(mismatch)) => {
			assert_eq!(mismatch.kind, MismatchKind::RowCountMismatch);
			assert_eq!(mismatch.table, "employees");
		}
		other => panic!("Expected assertion failure, got {:?}", other),
	}
}

// Table coverage

#[rstest]
#[tokio::test]
async fn test_fewer_expected_tables_pass(#[future] db: SqliteDatabase, rider: DbRider) {
	let db = db.await;
	rider
		.setup(&db, &DataSet::new(["setup/2table.yml"]).clean_before(true))
		.await
		.unwrap();

	let verdict = rider
		.verify(&db, &ExpectedDataSet::new(["expected/1table.yml"]))
		.await
		.unwrap();
	assert_verdict_pass(&verdict);
}

#[rstest]
#[tokio::test]
async fn test_more_expected_tables_fail(#[future] db: SqliteDatabase, rider: DbRider) {
	let db = db.await;
	rider
		.setup(&db, &DataSet::new(["setup/1table.yml"]).clean_before(true))
		.await
		.unwrap();

	let verdict = rider
		.verify(&db, &ExpectedDataSet::new(["expected/2table.yml"]))
		.await
		.unwrap();
	// departments exists but is empty
	assert_verdict_fails_with(&verdict, MismatchKind::RowCountMismatch);
	assert_eq!(verdict.mismatch().unwrap().table, "departments");
}

// Record counts

#[rstest]
#[case::fewer_expected("setup/2record.yml", "expected/1record.yml")]
#[case::more_expected("setup/1record.yml", "expected/2record.yml")]
#[tokio::test]
async fn test_record_count_mismatch_fails(
	#[future] db: SqliteDatabase,
	rider: DbRider,
	#[case] setup: &str,
	#[case] expected: &str,
) {
	let db = db.await;
	rider.setup(&db, &DataSet::new([setup])).await.unwrap();

	let verdict = rider.verify(&db, &ExpectedDataSet::new([expected])).await.unwrap();
	assert_verdict_fails_with(&verdict, MismatchKind::RowCountMismatch);
}

#[rstest]
#[tokio::test]
async fn test_contains_passes_with_fewer_expected_records(#[future] db: SqliteDatabase, rider: DbRider) {
	let db = db.await;
	rider.setup(&db, &DataSet::new(["setup/2record.yml"])).await.unwrap();

	let expected = ExpectedDataSet::new(["expected/1record.yml"]).compare_operation(CompareOperation::Contains);
	let verdict = rider.verify(&db, &expected).await.unwrap();
	assert_verdict_pass(&verdict);
}

// Column coverage

#[rstest]
#[tokio::test]
async fn test_fewer_expected_columns_pass(#[future] db: SqliteDatabase, rider: DbRider) {
	let db = db.await;
	rider.setup(&db, &DataSet::new(["setup/1record.yml"])).await.unwrap();

	let verdict = rider
		.verify(&db, &ExpectedDataSet::new(["expected/undercolumn.yml"]))
		.await
		.unwrap();
	assert_verdict_pass(&verdict);
}

#[rstest]
#[tokio::test]
async fn test_more_expected_columns_fail(#[future] db: SqliteDatabase, rider: DbRider) {
	let db = db.await;
	rider.setup(&db, &DataSet::new(["setup/1record.yml"])).await.unwrap();

	let verdict = rider
		.verify(&db, &ExpectedDataSet::new(["expected/overcolumn.yml"]))
		.await
		.unwrap();
	assert_verdict_fails_with(&verdict, MismatchKind::RowContentMismatch);
}

// Record order

#[rstest]
#[tokio::test]
async fn test_reversed_records_fail_in_strict_order(#[future] db: SqliteDatabase, rider: DbRider) {
	let db = db.await;
	rider.setup(&db, &DataSet::new(["setup/2record.yml"])).await.unwrap();

	let expected = ExpectedDataSet::new(["expected/2record-reverse.yml"]).strict_order(true);
	let verdict = rider.verify(&db, &expected).await.unwrap();
	assert_verdict_fails_with(&verdict, MismatchKind::RowOrderMismatch);
}

#[rstest]
#[case::default(ExpectedDataSet::new(["expected/2record-reverse.yml"]))]
#[case::contains(
	ExpectedDataSet::new(["expected/2record-reverse.yml"]).compare_operation(CompareOperation::Contains)
)]
#[case::order_by(ExpectedDataSet::new(["expected/2record-reverse.yml"]).order_by(["id"]))]
#[tokio::test]
async fn test_reversed_records_pass(
	#[future] db: SqliteDatabase,
	rider: DbRider,
	#[case] expected: ExpectedDataSet,
) {
	let db = db.await;
	rider.setup(&db, &DataSet::new(["setup/2record.yml"])).await.unwrap();

	let verdict = rider.verify(&db, &expected).await.unwrap();
	assert_verdict_pass(&verdict);
}

// Harness behavior

#[rstest]
#[tokio::test]
async fn test_teardown_runs_scripts_after(#[future] db: SqliteDatabase, rider: DbRider) {
	let db = db.await;
	let data_set = DataSet::new(["setup/2table.yml"]).execute_scripts_after(["setup/cleanup.sql"]);
	rider.setup(&db, &data_set).await.unwrap();

	let executed = rider.teardown(&db, &data_set).await.unwrap();
	assert_eq!(executed, 2);
	let rows = db.query("SELECT id FROM employees", vec![]).await.unwrap();
	assert!(rows.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_expected_data_set_rejects_scripts(#[future] db: SqliteDatabase, rider: DbRider) {
	let db = db.await;
	let result = rider
		.verify(&db, &ExpectedDataSet::new(["setup/findbyid.sql"]))
		.await;
	assert!(matches!(result, Err(RiderError::InvalidDataSet(_))));
}

#[rstest]
#[tokio::test]
async fn test_scripts_before_reject_row_data(#[future] db: SqliteDatabase, rider: DbRider) {
	let db = db.await;
	let data_set = DataSet::empty().execute_scripts_before(["setup/findbyid.yml"]);
	let result = rider.setup(&db, &data_set).await;
	assert!(matches!(result, Err(RiderError::InvalidDataSet(_))));
}

#[rstest]
#[tokio::test]
async fn test_missing_data_set_file(#[future] db: SqliteDatabase, rider: DbRider) {
	let db = db.await;
	let result = rider.setup(&db, &DataSet::new(["setup/missing.yml"])).await;
	assert!(matches!(result, Err(RiderError::Dataset(_))));
}

#[rstest]
#[tokio::test]
async fn test_seeding_twice_without_cleanup_conflicts(#[future] db: SqliteDatabase, rider: DbRider) {
	let db = db.await;
	let data_set = DataSet::new(["setup/findbyid.yml"]);
	rider.setup(&db, &data_set).await.unwrap();

	let result = rider.setup(&db, &data_set).await;
	assert!(matches!(
		result,
		Err(RiderError::Seed(SeedError::SeedFailed { position: 1, .. }))
	));

	rider.setup(&db, &data_set.clean_before(true)).await.unwrap();
}

#[rstest]
#[tokio::test]
async fn test_settings_from_file(#[future] db: SqliteDatabase) {
	let db = db.await;
	let settings = RiderSettings::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/dbrider.toml"))
		.unwrap()
		.with_dataset_root(DATASET_ROOT);
	assert_eq!(settings.case_strategy, CaseStrategy::Lowercase);
	let rider = DbRider::with_settings(settings);

	// clean_tables from the settings file empties employees before the script runs
	let data_set = DataSet::empty()
		.clean_before(true)
		.execute_scripts_before(["setup/findbyid.sql"]);
	rider.setup(&db, &data_set).await.unwrap();
	rider.setup(&db, &data_set).await.unwrap();

	rider
		.assert_expected(&db, &ExpectedDataSet::new(["expected/insert.yml"]))
		.await
		.unwrap();
}
