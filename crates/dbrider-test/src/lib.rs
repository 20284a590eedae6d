//! # dbrider-test
//!
//! Dataset-driven setup and assertions for database integration tests.
//!
//! A test declares the data it starts from as a [`DataSet`] and the data
//! the database must hold afterwards as an [`ExpectedDataSet`]. A
//! [`DbRider`] seeds the first, reads the affected tables back, and compares
//! them with the second.
//!
//! ```rust,no_run
//! use dbrider_db::SqliteDatabase;
//! use dbrider_test::{DataSet, DbRider, ExpectedDataSet, RiderSettings};
//!
//! # async fn run() -> dbrider_test::RiderResult<()> {
//! let db = SqliteDatabase::memory().await?;
//! let rider = DbRider::with_settings(RiderSettings::from_file("dbrider.toml")?);
//!
//! rider.setup(&db, &DataSet::new(["setup/findbyid.yml"]).clean_before(true)).await?;
//! // exercise the code under test
//! rider.assert_expected(&db, &ExpectedDataSet::new(["expected/insert.yml"])).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`dataset`]: data set declarations
//! - [`rider`]: setup, verification and teardown
//! - [`settings`]: settings shared by every data set
//! - [`fixtures`]: rstest fixtures
//! - [`assertions`]: verdict assertions
//! - [`logging`]: test logging setup

#![warn(missing_docs)]

pub mod assertions;
pub mod dataset;
pub mod error;
pub mod fixtures;
pub mod logging;
pub mod rider;
pub mod settings;

pub use dataset::{DataSet, ExpectedDataSet};
pub use error::{RiderError, RiderResult};
pub use rider::DbRider;
pub use settings::{ForeignKeySetting, RiderSettings};
