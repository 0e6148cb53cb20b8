//! Test logging

use std::sync::Once;

static INIT: Once = Once::new();

/// Directives applied before `RUST_LOG`, which overrides them
const DEFAULT_FILTERS: &str = "datagrid_core=warn,datagrid_engine=warn";

/// Routes grid events to the test output, once per process.
///
/// Grid events are `tracing` events forwarded through the `log` facade to
/// `env_logger`. Only warnings show by default; set
/// `RUST_LOG=datagrid_engine=trace` to follow hashing, loads and session
/// writes.
///
/// # Examples
///
/// ```
/// use datagrid_test::logging::init_test_logging;
///
/// init_test_logging();
/// tracing::warn!(grid = "grid_people", "Discarding unreadable grid session data");
///
/// // Later calls keep the first logger
/// init_test_logging();
/// ```
pub fn init_test_logging() {
	INIT.call_once(|| {
		let _ = env_logger::Builder::new()
			.is_test(true)
			.parse_filters(DEFAULT_FILTERS)
			.parse_default_env()
			.try_init();
	});
}
