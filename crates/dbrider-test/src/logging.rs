//! Test logging setup.

use std::sync::Once;

static INIT: Once = Once::new();

/// Installs a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
///
/// # Examples
///
/// ```
/// use dbrider_test::logging::init_test_logging;
///
/// init_test_logging();
/// tracing::info!("visible with --nocapture");
/// ```
pub fn init_test_logging() {
	INIT.call_once(|| {
		let _ = tracing_subscriber::fmt()
			.with_test_writer()
			.with_target(false)
			.try_init();
	});
}
