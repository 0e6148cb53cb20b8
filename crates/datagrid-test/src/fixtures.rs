//! rstest fixtures
//!
//! Doctests cannot use rstest fixtures; the functions can be called directly
//! instead.

use datagrid_core::{Column, GridServices, InMemorySession, Row};
use rstest::*;
use serde_json::json;
use std::sync::Arc;

use crate::doubles::{GrantedRoles, SimpleRouter, StaticRequestStack, StaticSource};

/// Fixture providing an empty in-memory session
#[fixture]
pub fn session() -> Arc<InMemorySession> {
	crate::logging::init_test_logging();
	Arc::new(InMemorySession::new())
}

/// Fixture providing collaborators with no current request and no granted
/// role
///
/// # Examples
///
/// ```
/// use datagrid_test::fixtures::services;
///
/// let services = services();
/// assert!(services.current_request().is_none());
/// assert!(services.is_granted(None));
/// assert!(!services.is_granted(Some("ROLE_ADMIN")));
/// ```
#[fixture]
pub fn services() -> GridServices {
	crate::logging::init_test_logging();
	GridServices::new(
		Arc::new(SimpleRouter),
		Arc::new(StaticRequestStack::empty()),
		Arc::new(GrantedRoles::none()),
	)
}

/// Fixture providing a source of 25 people with `id` (primary), `name` and
/// `team` columns
///
/// Names are `person-01` to `person-25`; teams alternate between `red` and
/// `blue`, starting with `red`.
#[fixture]
pub fn people_source() -> StaticSource {
	let rows = (1..=25).map(|id| {
		Row::from_fields([
			("id", json!(id)),
			("name", json!(format!("person-{:02}", id))),
			("team", json!(if id % 2 == 1 { "red" } else { "blue" })),
		])
	});

	StaticSource::new()
		.column(Column::text("id").primary(true).title("Id"))
		.column(Column::text("name").title("Name"))
		.column(Column::text("team").title("Team"))
		.rows(rows)
}
