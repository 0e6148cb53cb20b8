//! Request handling of a grid against an in-memory session and source

use bytes::Bytes;
use datagrid_core::{
	GridError, GridServices, InMemorySession, MassAction, MassActionCallback, SessionStore,
	shared_export, shared_source,
};
use datagrid_engine::{Grid, GridResponse, TweakSpec};
use datagrid_test::doubles::{GrantedRoles, RecordingExport, ScriptedRequest, SimpleRouter, StaticRequestStack, StaticSource};
use datagrid_test::fixtures::{people_source, services, session};
use datagrid_test::mock::{MockActionDispatcher, MockExport};
use indexmap::IndexMap;
use parking_lot::Mutex;
use rstest::*;
use serde_json::{Value, json};
use std::sync::Arc;

const HASH: &str = "grid_people";

fn people_grid(services: GridServices, source: StaticSource) -> Grid {
	let mut grid = Grid::new(services, Some("people"), None);
	grid.set_source(shared_source(source)).unwrap();
	grid.set_limits([10, 25]);
	grid.set_route_url("/people");
	grid
}

fn request(session: &Arc<InMemorySession>) -> ScriptedRequest {
	ScriptedRequest::new().with_session(session.clone())
}

fn post(session: &Arc<InMemorySession>, parameters: Value) -> Arc<dyn datagrid_core::GridRequest> {
	request(session)
		.with_grid_parameters(HASH, parameters)
		.into_shared()
}

fn stored(session: &InMemorySession) -> Option<Value> {
	session.get(HASH)
}

fn ids(grid: &Grid) -> Vec<Value> {
	grid.rows()
		.iter()
		.map(|row| row.field("id").cloned().unwrap_or(Value::Null))
		.collect()
}

// ============================================================================
// Plain rendering
// ============================================================================

#[rstest]
fn test_first_visit_loads_first_page(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	let mut grid = people_grid(services, people_source);

	grid.handle_request(request(&session).into_shared()).unwrap();

	assert_eq!(grid.hash(), Some(HASH));
	assert_eq!(grid.page(), 0);
	assert_eq!(grid.limit(), 10);
	assert_eq!(grid.total_count(), 25);
	assert_eq!(grid.page_count(), 3);
	assert_eq!(grid.rows().len(), 10);
	assert_eq!(grid.rows().get(0).unwrap().primary_field(), Some("id"));
	assert!(!grid.is_ready_for_redirect());
	assert!(stored(&session).is_none());
	assert!(grid.grid_response().unwrap().is_render());
}

#[rstest]
fn test_request_without_session_still_loads(services: GridServices, people_source: StaticSource) {
	let mut grid = people_grid(services, people_source);

	grid.handle_request(ScriptedRequest::new().into_shared()).unwrap();

	assert_eq!(grid.rows().len(), 10);
}

#[rstest]
fn test_persisted_state_is_applied(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	session.set(
		HASH,
		json!({"_page": 1, "_limit": 10, "_order": "id|desc", "team": {"from": "blue"}}),
	);
	let mut grid = people_grid(services, people_source);

	grid.handle_request(request(&session).into_shared()).unwrap();

	// 12 blue people sorted by the text of their id, descending
	assert_eq!(grid.total_count(), 12);
	assert_eq!(grid.page(), 1);
	assert_eq!(grid.rows().len(), 2);
	assert!(grid.is_filtered());
	assert!(grid.has_filter("team").unwrap());
}

#[rstest]
fn test_page_past_the_end_falls_back_to_first_page(
	services: GridServices,
	people_source: StaticSource,
	session: Arc<InMemorySession>,
) {
	session.set(HASH, json!({"_page": 7}));
	let mut grid = people_grid(services, people_source);

	grid.handle_request(request(&session).into_shared()).unwrap();

	assert_eq!(grid.page(), 0);
	assert_eq!(ids(&grid).first(), Some(&json!(1)));
}

#[rstest]
fn test_stale_session_order_is_ignored(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	session.set(HASH, json!({"_order": "ghost|asc"}));
	let mut grid = people_grid(services, people_source);

	grid.handle_request(request(&session).into_shared()).unwrap();

	assert!(grid.columns().iter().all(|column| !column.is_sorted()));
}

#[rstest]
fn test_source_is_required(services: GridServices, session: Arc<InMemorySession>) {
	let mut grid = Grid::new(services, Some("people"), None);

	let result = grid.handle_request(request(&session).into_shared());

	assert!(matches!(result, Err(GridError::Logic(_))));
}

#[rstest]
fn test_grid_response_handles_current_request(people_source: StaticSource, session: Arc<InMemorySession>) {
	let stack = StaticRequestStack::new(post(&session, json!({"_page": 1})));
	let services = GridServices::new(Arc::new(SimpleRouter), Arc::new(stack), Arc::new(GrantedRoles::none()));
	let mut grid = people_grid(services, people_source);

	let response = grid.grid_response().unwrap();

	assert!(matches!(response, GridResponse::Redirect(ref url) if url == "/people"));
	assert_eq!(stored(&session), Some(json!({"_page": 1})));
}

// ============================================================================
// Hash and persistence
// ============================================================================

#[rstest]
fn test_hash_is_derived_from_controller_columns_and_source(people_source: StaticSource, session: Arc<InMemorySession>) {
	let hash_for = |controller: &str| {
		let mut grid = Grid::new(services(), None, None);
		grid.set_source(shared_source(people_source.clone())).unwrap();
		grid.handle_request(
			request(&session)
				.with_attribute("_controller", controller)
				.into_shared(),
		)
		.unwrap();
		grid.hash().unwrap().to_string()
	};

	let list = hash_for("App:People:list");

	assert!(list.starts_with("grid_"));
	assert_eq!(list.len(), "grid_".len() + 32);
	assert_eq!(list, hash_for("App:People:list"));
	assert_ne!(list, hash_for("App:People:archive"));
}

#[rstest]
#[case::other_page("http://localhost/elsewhere", false, true)]
#[case::same_page_with_query("http://localhost/?sort=1", false, false)]
#[case::persistent_grid("http://localhost/elsewhere", true, false)]
fn test_arriving_from_another_page(
	services: GridServices,
	people_source: StaticSource,
	session: Arc<InMemorySession>,
	#[case] referer: &str,
	#[case] persistence: bool,
	#[case] cleared: bool,
) {
	session.set(HASH, json!({"_page": 2}));
	let mut grid = people_grid(services, people_source);
	grid.set_persistence(persistence);

	grid.handle_request(request(&session).with_referer(referer).into_shared())
		.unwrap();

	assert_eq!(stored(&session).is_none(), cleared);
	assert_eq!(grid.page(), if cleared { 0 } else { 2 });
}

#[rstest]
fn test_xhr_requests_keep_state(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	session.set(HASH, json!({"_page": 2}));
	let mut grid = people_grid(services, people_source);

	grid.handle_request(
		request(&session)
			.with_referer("http://localhost/elsewhere")
			.xml_http_request()
			.into_shared(),
	)
	.unwrap();

	assert_eq!(grid.page(), 2);
}

#[rstest]
fn test_reset_drops_state(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	session.set(HASH, json!({"_page": 2, "name": {"from": "person"}}));
	let mut grid = people_grid(services, people_source);

	grid.handle_request(post(&session, json!({"_reset": 1}))).unwrap();

	assert!(stored(&session).is_none());
	assert!(grid.is_ready_for_redirect());
}

// ============================================================================
// Page, order, limit and filters
// ============================================================================

#[rstest]
#[case::page_only(json!({"_page": 2}), json!({"_page": 2}))]
#[case::page_as_text(json!({"_page": "1"}), json!({"_page": 1}))]
#[case::unknown_order_column(json!({"_page": 2, "_order": "order|foo"}), json!({"_page": 0}))]
#[case::bad_direction(json!({"_order": "name|up"}), json!({"_page": 0}))]
#[case::sortable_column(json!({"_order": "name|desc"}), json!({"_page": 0, "_order": "name|desc"}))]
#[case::undefined_limit(json!({"_limit": 50}), json!({"_page": 0}))]
#[case::defined_limit(json!({"_limit": 25}), json!({"_page": 0, "_limit": 25}))]
#[case::filter(json!({"_page": 2, "name": "person-1"}), json!({"_page": 0, "name": {"from": "person-1"}}))]
#[case::range_filter(
	json!({"id": {"operator": "btw", "from": "3", "to": "9"}}),
	json!({"_page": 0, "id": {"operator": "btw", "from": "3", "to": "9"}})
)]
#[case::unselected_mass_action(json!({"_page": 2, "__action_id": -1}), json!({"_page": 0}))]
fn test_request_parameters_are_persisted(
	services: GridServices,
	people_source: StaticSource,
	session: Arc<InMemorySession>,
	#[case] parameters: Value,
	#[case] expected: Value,
) {
	let mut grid = people_grid(services, people_source);

	grid.handle_request(post(&session, parameters)).unwrap();

	assert_eq!(stored(&session), Some(expected));
	assert!(grid.is_ready_for_redirect());
	assert!(grid.rows().is_empty());
}

#[rstest]
fn test_order_on_unsortable_column_is_ignored(services: GridServices, session: Arc<InMemorySession>) {
	let source = StaticSource::new().column(datagrid_core::Column::text("id").primary(true).sortable(false));
	let mut grid = people_grid(services, source);

	grid.handle_request(post(&session, json!({"_order": "id|asc"}))).unwrap();

	assert_eq!(stored(&session), Some(json!({"_page": 0})));
}

#[rstest]
fn test_blank_filter_clears_persisted_filter(
	services: GridServices,
	people_source: StaticSource,
	session: Arc<InMemorySession>,
) {
	session.set(HASH, json!({"_page": 1, "name": {"from": "person"}}));
	let mut grid = people_grid(services, people_source);

	grid.handle_request(post(&session, json!({"name": {"from": ""}}))).unwrap();

	assert_eq!(stored(&session), Some(json!({"_page": 0})));
}

#[rstest]
fn test_xhr_request_loads_updated_page(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	let mut grid = people_grid(services, people_source);

	grid.handle_request(
		request(&session)
			.with_grid_parameters(HASH, json!({"_page": 1}))
			.xml_http_request()
			.into_shared(),
	)
	.unwrap();

	assert!(!grid.is_ready_for_redirect());
	assert_eq!(ids(&grid).first(), Some(&json!(11)));
	assert!(grid.grid_response().unwrap().is_render());
}

// ============================================================================
// Defaults and permanent filters
// ============================================================================

#[rstest]
fn test_defaults_seed_a_fresh_session(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	let mut grid = people_grid(services, people_source);
	grid.set_default_order("name", "DESC");
	grid.set_default_limit(25);
	grid.set_default_page(2).unwrap();
	grid.set_default_filters(IndexMap::from([("team".to_string(), json!("red"))]));

	grid.handle_request(request(&session).into_shared()).unwrap();

	assert_eq!(
		stored(&session),
		Some(json!({"_page": 1, "_limit": 25, "_order": "name|desc", "team": {"from": "red"}}))
	);
	// 13 red people fit on the first page of 25
	assert_eq!(grid.page(), 0);
	assert_eq!(grid.total_count(), 13);
	assert_eq!(ids(&grid).first(), Some(&json!(25)));
}

#[rstest]
fn test_defaults_do_not_override_existing_state(
	services: GridServices,
	people_source: StaticSource,
	session: Arc<InMemorySession>,
) {
	session.set(HASH, json!({"_limit": 10}));
	let mut grid = people_grid(services, people_source);
	grid.set_default_limit(25);
	grid.set_default_filters(IndexMap::from([("team".to_string(), json!("red"))]));

	grid.handle_request(request(&session).into_shared()).unwrap();

	assert_eq!(grid.limit(), 10);
	assert_eq!(grid.total_count(), 25);
}

#[rstest]
#[case::empty_direction("name", "")]
#[case::bad_direction("name", "sideways")]
#[case::unknown_column("ghost", "asc")]
fn test_invalid_default_order(
	services: GridServices,
	people_source: StaticSource,
	session: Arc<InMemorySession>,
	#[case] column: &str,
	#[case] direction: &str,
) {
	let mut grid = people_grid(services, people_source);
	grid.set_default_order(column, direction);

	let result = grid.handle_request(request(&session).into_shared());

	assert!(matches!(result, Err(GridError::InvalidArgument(_))));
}

#[rstest]
fn test_default_limit_must_be_a_limit(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	let mut grid = people_grid(services, people_source);
	grid.set_default_limit(15);

	let error = grid.handle_request(request(&session).into_shared()).unwrap_err();

	assert_eq!(error.to_string(), "Invalid argument: Limit 15 is not defined in limits.");
}

#[rstest]
fn test_permanent_filters_always_apply(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	session.set(HASH, json!({"team": {"from": "blue"}}));
	let mut grid = people_grid(services, people_source);
	grid.set_permanent_filters(IndexMap::from([("team".to_string(), json!("red"))]));

	grid.handle_request(
		request(&session)
			.with_grid_parameters(HASH, json!({"team": "blue"}))
			.xml_http_request()
			.into_shared(),
	)
	.unwrap();

	assert_eq!(grid.total_count(), 13);
	assert!(!grid.column("team").unwrap().is_filterable());
	assert!(grid.is_filter_section_visible());
}

#[rstest]
fn test_permanent_filter_on_unknown_column(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	let mut grid = people_grid(services, people_source);
	grid.set_permanent_filters(IndexMap::from([("ghost".to_string(), json!(true))]));

	let result = grid.handle_request(request(&session).into_shared());

	assert!(matches!(result, Err(GridError::InvalidArgument(_))));
}

#[rstest]
fn test_lazy_visibility(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	let mut grid = people_grid(services, people_source);
	grid.set_visible_columns(["id", "name"]);
	grid.show_columns(["team"]);
	grid.hide_columns(["name"]);

	grid.handle_request(request(&session).into_shared()).unwrap();

	assert!(grid.column("id").unwrap().is_visible());
	assert!(!grid.column("name").unwrap().is_visible());
	assert!(grid.column("team").unwrap().is_visible());
}

#[rstest]
fn test_hiding_unknown_column_fails(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	let mut grid = people_grid(services, people_source);
	grid.set_hidden_columns(["ghost"]);

	let result = grid.handle_request(request(&session).into_shared());

	assert!(matches!(result, Err(GridError::InvalidArgument(_))));
}

// ============================================================================
// Mass actions
// ============================================================================

fn recording_action(selected: Arc<Mutex<Vec<(Vec<Value>, bool)>>>) -> MassAction {
	MassAction::new("Archive").callback(MassActionCallback::inline(move |context| {
		selected
			.lock()
			.push((context.primary_keys.clone(), context.all_keys));
		Ok(None)
	}))
}

#[rstest]
fn test_mass_action_receives_selected_keys(
	services: GridServices,
	people_source: StaticSource,
	session: Arc<InMemorySession>,
) {
	let selected = Arc::new(Mutex::new(Vec::new()));
	let mut grid = people_grid(services, people_source);
	grid.add_mass_action(recording_action(selected.clone()));

	grid.handle_request(post(
		&session,
		json!({"__action_id": 0, "__action": {"3": "on", "5": "on"}, "_page": 2}),
	))
	.unwrap();

	assert_eq!(*selected.lock(), vec![(vec![json!("3"), json!("5")], false)]);
	assert_eq!(stored(&session), Some(json!({"_page": 0})));
	assert!(!grid.is_mass_action_redirect());
	assert!(matches!(grid.grid_response().unwrap(), GridResponse::Redirect(_)));
}

#[rstest]
fn test_mass_action_on_all_rows(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	session.set(HASH, json!({"_page": 2, "_limit": 25}));
	let selected = Arc::new(Mutex::new(Vec::new()));
	let mut grid = people_grid(services, people_source);
	grid.add_mass_action(recording_action(selected.clone()));
	grid.set_permanent_filters(IndexMap::from([("team".to_string(), json!("blue"))]));

	grid.handle_request(post(
		&session,
		json!({"__action_id": "0", "__action_all_keys": "1"}),
	))
	.unwrap();

	let calls = selected.lock();
	let (keys, all_keys) = &calls[0];
	assert!(*all_keys);
	assert_eq!(keys.len(), 12);
	assert_eq!(keys[0], json!(2));
	assert_eq!(grid.page(), 0);
	assert_eq!(grid.limit(), 0);
}

#[rstest]
fn test_mass_action_response_wins_over_redirect(
	services: GridServices,
	people_source: StaticSource,
	session: Arc<InMemorySession>,
) {
	let mut grid = people_grid(services, people_source);
	grid.add_mass_action(MassAction::new("Download").callback(MassActionCallback::inline(|_| {
		Ok(Some(http::Response::new(Bytes::from_static(b"zip"))))
	})));

	grid.handle_request(post(&session, json!({"__action_id": 0}))).unwrap();

	assert!(grid.is_mass_action_redirect());
	match grid.grid_response().unwrap() {
		GridResponse::MassAction(response) => assert_eq!(response.body(), &Bytes::from_static(b"zip")),
		other => panic!("unexpected response {:?}", other),
	}
}

#[rstest]
#[case(3)]
#[case(i64::MAX)]
fn test_unknown_mass_action(
	services: GridServices,
	people_source: StaticSource,
	session: Arc<InMemorySession>,
	#[case] index: i64,
) {
	let mut grid = people_grid(services, people_source);
	grid.add_mass_action(MassAction::new("Archive").callback(MassActionCallback::inline(|_| Ok(None))));

	let result = grid.handle_request(post(&session, json!({"__action_id": index})));

	let expected = format!("Mass action {} is not defined", index);
	assert!(matches!(result, Err(GridError::OutOfBounds(ref message)) if *message == expected));
}

#[rstest]
fn test_delegated_mass_action_needs_controller_reference(
	services: GridServices,
	people_source: StaticSource,
	session: Arc<InMemorySession>,
) {
	let mut grid = people_grid(services, people_source);
	grid.add_mass_action(MassAction::new("Archive").callback(MassActionCallback::delegated("invalidCallback")));

	let result = grid.handle_request(post(&session, json!({"__action_id": 0})));

	assert!(matches!(result, Err(GridError::Runtime(_))));
}

#[rstest]
fn test_delegated_mass_action_is_dispatched(people_source: StaticSource, session: Arc<InMemorySession>) {
	let mut dispatcher = MockActionDispatcher::new();
	dispatcher
		.expect_dispatch()
		.withf(|controller, attributes| {
			controller.to_string() == "App:People:archive"
				&& attributes["primaryKeys"] == json!(["4"])
				&& attributes["allPrimaryKeys"] == json!(false)
				&& attributes["_controller"] == json!("App:People:archive")
				&& attributes["reason"] == json!("cleanup")
		})
		.times(1)
		.returning(|_, _| Ok(http::Response::new(Bytes::from_static(b"archived"))));
	let services = services().with_dispatcher(Arc::new(dispatcher));
	let mut grid = people_grid(services, people_source);
	grid.add_mass_action(
		MassAction::new("Archive")
			.callback(MassActionCallback::delegated("App:People:archive"))
			.parameter("reason", "cleanup"),
	);

	grid.handle_request(post(&session, json!({"__action_id": 0, "__action": {"4": "on"}})))
		.unwrap();

	assert!(matches!(grid.grid_response().unwrap(), GridResponse::MassAction(_)));
}

// ============================================================================
// Exports
// ============================================================================

#[rstest]
fn test_export_covers_every_filtered_row(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	session.set(HASH, json!({"_page": 1, "team": {"from": "red"}}));
	let export = RecordingExport::new("CSV");
	let data = export.data();
	let mut grid = people_grid(services, people_source);
	grid.add_export(shared_export(export));

	grid.handle_request(post(&session, json!({"__export_id": 0}))).unwrap();

	assert!(grid.is_ready_for_export());
	let data = data.lock().clone().unwrap();
	assert_eq!(data.titles, vec!["Id", "Name", "Team"]);
	assert_eq!(data.rows.len(), 13);
	match grid.grid_response().unwrap() {
		GridResponse::Export(response) => assert!(response.body().starts_with(b"Id,Name,Team\n1,person-01,red")),
		other => panic!("unexpected response {:?}", other),
	}
}

#[rstest]
fn test_export_failure_is_propagated(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	let mut export = MockExport::new();
	export.expect_title().return_const("Mock".to_string());
	export
		.expect_compute_data()
		.withf(|grid| grid.rows().len() == 25)
		.times(1)
		.returning(|_| Ok(()));
	export
		.expect_response()
		.times(1)
		.returning(|| Err(GridError::Runtime("encoder unavailable".to_string())));
	let mut grid = people_grid(services, people_source);
	grid.add_export(shared_export(export));

	let result = grid.handle_request(post(&session, json!({"__export_id": 0})));

	assert!(matches!(result, Err(GridError::Runtime(ref message)) if message == "encoder unavailable"));
}

#[rstest]
#[case(json!({"__export_id": 2}))]
#[case(json!({"__export_id": "1"}))]
#[case(json!({"__export_id": i64::MAX}))]
fn test_unknown_export(
	services: GridServices,
	people_source: StaticSource,
	session: Arc<InMemorySession>,
	#[case] parameters: Value,
) {
	let mut grid = people_grid(services, people_source);
	grid.add_export(shared_export(RecordingExport::new("CSV")));

	let result = grid.handle_request(post(&session, parameters));

	assert!(matches!(result, Err(GridError::OutOfBounds(_))));
}

#[rstest]
#[case(json!(-1))]
#[case(json!(""))]
fn test_unselected_export_is_ignored(
	services: GridServices,
	people_source: StaticSource,
	session: Arc<InMemorySession>,
	#[case] index: Value,
) {
	let mut grid = people_grid(services, people_source);
	grid.add_export(shared_export(RecordingExport::new("CSV")));

	grid.handle_request(post(&session, json!({"__export_id": index, "_page": 1})))
		.unwrap();

	assert!(!grid.is_ready_for_export());
	assert_eq!(stored(&session), Some(json!({"_page": 1})));
}

// ============================================================================
// Tweaks
// ============================================================================

fn tweaked_grid(services: GridServices, source: StaticSource) -> Grid {
	let mut grid = people_grid(services, source);
	grid.add_tweak(
		"Red team",
		TweakSpec::new().filter("team", json!("red")).order("name|desc"),
		Some("red"),
		Some("team"),
	)
	.unwrap();
	grid.add_tweak("Start over", TweakSpec::new().reset(), Some("reset"), None)
		.unwrap();
	grid
}

#[rstest]
fn test_tweak_replaces_state(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	let mut grid = tweaked_grid(services, people_source);

	grid.handle_request(post(&session, json!({"__tweak_id": "red", "_page": 2})))
		.unwrap();

	assert_eq!(
		stored(&session),
		Some(json!({"_order": "name|desc", "team": {"from": "red"}, "tweaks": {"team": "red"}}))
	);
	assert_eq!(grid.active_tweak_group("team"), Some("red"));
}

#[rstest]
fn test_tweak_over_xhr_loads_tweaked_page(
	services: GridServices,
	people_source: StaticSource,
	session: Arc<InMemorySession>,
) {
	let mut grid = tweaked_grid(services, people_source);

	grid.handle_request(
		request(&session)
			.with_grid_parameters(HASH, json!({"__tweak_id": "red"}))
			.xml_http_request()
			.into_shared(),
	)
	.unwrap();

	assert_eq!(grid.total_count(), 13);
	assert_eq!(ids(&grid).first(), Some(&json!(25)));
}

#[rstest]
fn test_reset_tweak(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	session.set(HASH, json!({"_page": 2, "team": {"from": "red"}}));
	let mut grid = tweaked_grid(services, people_source);

	grid.handle_request(post(&session, json!({"__tweak_id": "reset"}))).unwrap();

	assert!(stored(&session).is_none());
}

#[rstest]
fn test_unknown_tweak_falls_back_to_parameters(
	services: GridServices,
	people_source: StaticSource,
	session: Arc<InMemorySession>,
) {
	let mut grid = tweaked_grid(services, people_source);

	grid.handle_request(post(&session, json!({"__tweak_id": "blue", "_page": 1})))
		.unwrap();

	assert_eq!(stored(&session), Some(json!({"_page": 1})));
}

#[rstest]
fn test_default_tweak_applies_on_fresh_session(
	services: GridServices,
	people_source: StaticSource,
	session: Arc<InMemorySession>,
) {
	let mut grid = tweaked_grid(services, people_source);
	grid.set_default_tweak("red");

	grid.handle_request(request(&session).into_shared()).unwrap();

	assert_eq!(grid.total_count(), 13);
	assert_eq!(grid.active_tweaks().get("team").map(String::as_str), Some("red"));
}

#[rstest]
fn test_tweak_running_an_export(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	let mut grid = people_grid(services, people_source);
	grid.add_export(shared_export(RecordingExport::new("CSV")));
	grid.add_tweak("Download", TweakSpec::new().export(0), Some("download"), None)
		.unwrap();

	grid.handle_request(post(&session, json!({"__tweak_id": "download"}))).unwrap();

	assert!(matches!(grid.grid_response().unwrap(), GridResponse::Export(_)));
}

#[rstest]
fn test_tweak_url(services: GridServices, people_source: StaticSource, session: Arc<InMemorySession>) {
	let mut grid = tweaked_grid(services, people_source);
	grid.handle_request(request(&session).into_shared()).unwrap();

	assert_eq!(grid.tweak_url("red").unwrap(), "/people?grid_people[__tweak_id]=red");

	grid.set_route_url("/people?team=1");
	assert_eq!(grid.tweak_url("red").unwrap(), "/people?team=1&grid_people[__tweak_id]=red");
}

// ============================================================================
// Templates
// ============================================================================

#[rstest]
fn test_template_is_persisted_eagerly(people_source: StaticSource, session: Arc<InMemorySession>) {
	let stack = StaticRequestStack::new(request(&session).into_shared());
	let services = GridServices::new(Arc::new(SimpleRouter), Arc::new(stack), Arc::new(GrantedRoles::none()));
	let mut grid = people_grid(services, people_source);

	grid.set_template(None).unwrap();
	assert!(stored(&session).is_none());

	grid.set_template(Some(datagrid_engine::TemplateSpec::handle("people.html")))
		.unwrap();
	assert_eq!(stored(&session), Some(json!({"_template": "__SELF__people.html"})));

	grid.handle_request(request(&session).into_shared()).unwrap();
	assert_eq!(grid.template(), Some("__SELF__people.html"));
}

#[rstest]
fn test_template_keeps_defaults_of_a_fresh_session(people_source: StaticSource, session: Arc<InMemorySession>) {
	let stack = StaticRequestStack::new(request(&session).into_shared());
	let services = GridServices::new(Arc::new(SimpleRouter), Arc::new(stack), Arc::new(GrantedRoles::none()));
	let mut grid = people_grid(services, people_source);
	grid.set_default_limit(25);
	grid.set_default_order("name", "desc");
	grid.set_template(Some(datagrid_engine::TemplateSpec::path("people.html")))
		.unwrap();

	grid.handle_request(request(&session).into_shared()).unwrap();

	assert_eq!(grid.limit(), 25);
	assert_eq!(grid.rows().len(), 25);
	assert_eq!(
		stored(&session),
		Some(json!({"_limit": 25, "_order": "name|desc", "_template": "people.html"}))
	);
}

#[rstest]
fn test_template_keeps_state_of_a_returning_session(people_source: StaticSource, session: Arc<InMemorySession>) {
	session.set(HASH, json!({"_limit": 10}));
	let stack = StaticRequestStack::new(request(&session).into_shared());
	let services = GridServices::new(Arc::new(SimpleRouter), Arc::new(stack), Arc::new(GrantedRoles::none()));
	let mut grid = people_grid(services, people_source);
	grid.set_default_limit(25);
	grid.set_template(Some(datagrid_engine::TemplateSpec::path("people.html")))
		.unwrap();

	assert_eq!(stored(&session), Some(json!({"_limit": 10, "_template": "people.html"})));

	grid.handle_request(request(&session).into_shared()).unwrap();

	assert_eq!(grid.limit(), 10);
	assert_eq!(grid.template(), Some("people.html"));
}

#[rstest]
fn test_template_value_must_be_a_path(services: GridServices, people_source: StaticSource) {
	let mut grid = people_grid(services, people_source);

	assert!(grid.set_template_value(Value::Null).is_ok());
	assert!(matches!(grid.set_template_value(json!(42)), Err(GridError::Template(_))));
}
