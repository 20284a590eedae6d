//! Assertion helpers for comparison results.

use dbrider_dataset::{ComparisonConfig, Fixture, MismatchKind, Verdict, compare};

/// Assert that a verdict passed, printing the mismatch otherwise.
///
/// # Examples
///
/// ```
/// use dbrider_dataset::Verdict;
/// use dbrider_test::assertions::assert_verdict_pass;
///
/// assert_verdict_pass(&Verdict::Pass);
/// ```
pub fn assert_verdict_pass(verdict: &Verdict) {
	if let Some(mismatch) = verdict.mismatch() {
		panic!("Expected data set to match, got: {}", mismatch);
	}
}

/// Assert that a verdict failed with the given kind of mismatch.
pub fn assert_verdict_fails_with(verdict: &Verdict, kind: MismatchKind) {
	assert_eq!(
		verdict.kind(),
		Some(kind),
		"Expected {} failure, got {}",
		kind,
		verdict
	);
}

/// Assert that `actual` satisfies `expected` under `config`.
///
/// # Examples
///
/// ```
/// use dbrider_dataset::{ComparisonConfig, Fixture, Row, Scalar};
/// use dbrider_test::assertions::assert_data_set_matches;
///
/// let mut fixture = Fixture::new();
/// fixture.push_row("employees", Row::from_pairs([("id", Scalar::Integer(1))]));
/// assert_data_set_matches(&fixture, &fixture, &ComparisonConfig::default());
/// ```
pub fn assert_data_set_matches(actual: &Fixture, expected: &Fixture, config: &ComparisonConfig) {
	assert_verdict_pass(&compare(actual, expected, config));
}
