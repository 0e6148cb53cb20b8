//! The grid aggregate
//!
//! A [`Grid`] owns its columns, actions, exports and tweaks, the pagination,
//! sort and filter state, and the record it persists in the session. It is
//! configured once, then [`Grid::handle_request`] reconciles the persisted
//! state with the current request and loads the page.

mod load;
mod request;

use datagrid_core::{
	Column, ColumnSet, DataJunction, GridError, GridRequest, GridServices, MassAction, Response,
	Result, RowAction, RowSet, SessionStore, SharedExport, SharedSource,
};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::{GridConfig, LimitsSpec};
use crate::session::SessionData;
use crate::template::TemplateSpec;
use crate::tweak::{Tweak, TweakSpec};

const SOURCE_ALREADY_SET: &str = "The source of the grid is already set.";

/// A column queued before the grid had a source
#[derive(Debug, Clone)]
struct LazyColumn {
	column: Column,
	position: i32,
}

/// Server-side data grid.
///
/// # Examples
///
/// ```
/// use datagrid_core::{Column, GridServices};
/// use datagrid_engine::Grid;
/// use datagrid_test::doubles::{GrantedRoles, SimpleRouter, StaticRequestStack};
/// use std::sync::Arc;
///
/// let services = GridServices::new(
///     Arc::new(SimpleRouter),
///     Arc::new(StaticRequestStack::empty()),
///     Arc::new(GrantedRoles::none()),
/// );
/// let mut grid = Grid::new(services, Some("users"), None);
///
/// grid.add_column(Column::text("name").title("Name"), 0).unwrap();
/// assert!(grid.has_column("name"));
/// assert!(grid.hash().is_none());
/// ```
pub struct Grid {
	services: GridServices,
	request: Option<Arc<dyn GridRequest>>,
	session: Option<Arc<dyn SessionStore>>,
	config: Option<GridConfig>,

	id: Option<String>,
	hash: Option<String>,
	source: Option<SharedSource>,
	columns: ColumnSet,
	lazy_columns: Vec<LazyColumn>,
	columns_filterable: bool,
	columns_sortable: bool,
	rows: RowSet,
	total_count: usize,
	prepared: bool,
	handled: bool,

	persistence: bool,
	new_session: bool,
	/// The session record was created by [`Grid::set_template`]
	template_seeded: bool,
	request_data: serde_json::Map<String, Value>,
	session_data: SessionData,

	route_parameters: IndexMap<String, Value>,
	route_url: Option<String>,

	default_order: Option<String>,
	default_limit: Option<usize>,
	default_tweak: Option<String>,
	default_filters: IndexMap<String, Value>,
	permanent_filters: IndexMap<String, Value>,
	limits: IndexMap<usize, String>,
	limit: usize,
	max_results: Option<usize>,
	page: usize,
	data_junction: DataJunction,

	mass_actions: Vec<MassAction>,
	row_actions: IndexMap<String, Vec<RowAction>>,
	exports: Vec<SharedExport>,
	tweaks: IndexMap<String, Tweak>,
	next_tweak_key: usize,

	lazy_hidden_columns: Vec<String>,
	lazy_visible_columns: Vec<String>,
	lazy_hide_show_columns: IndexMap<String, bool>,

	show_filters: bool,
	show_titles: bool,
	prefix_title: String,
	no_data_message: Option<String>,
	no_result_message: Option<String>,
	actions_column_size: i32,
	actions_column_title: String,

	is_ready_for_export: bool,
	export_response: Option<Response>,
	mass_action_response: Option<Response>,
	redirect: Option<bool>,
}

impl Grid {
	/// Creates a grid.
	///
	/// Without an `id`, the grid hash is derived from the controller, the
	/// column ids and the source. The session is taken from the request
	/// current at construction time; [`Grid::handle_request`] replaces both.
	pub fn new(services: GridServices, id: Option<&str>, config: Option<GridConfig>) -> Self {
		let request = services.current_request();
		let session = request.as_ref().and_then(|r| r.session());
		let columns = ColumnSet::with_authorization(services.authorization.clone());

		Self {
			services,
			request,
			session,
			config,
			id: id.filter(|id| !id.is_empty()).map(str::to_string),
			hash: None,
			source: None,
			columns,
			lazy_columns: Vec::new(),
			columns_filterable: true,
			columns_sortable: true,
			rows: RowSet::new(),
			total_count: 0,
			prepared: false,
			handled: false,
			persistence: false,
			new_session: false,
			template_seeded: false,
			request_data: serde_json::Map::new(),
			session_data: SessionData::default(),
			route_parameters: IndexMap::new(),
			route_url: None,
			default_order: None,
			default_limit: None,
			default_tweak: None,
			default_filters: IndexMap::new(),
			permanent_filters: IndexMap::new(),
			limits: IndexMap::new(),
			limit: 0,
			max_results: None,
			page: 0,
			data_junction: DataJunction::And,
			mass_actions: Vec::new(),
			row_actions: IndexMap::new(),
			exports: Vec::new(),
			tweaks: IndexMap::new(),
			next_tweak_key: 0,
			lazy_hidden_columns: Vec::new(),
			lazy_visible_columns: Vec::new(),
			lazy_hide_show_columns: IndexMap::new(),
			show_filters: true,
			show_titles: true,
			prefix_title: String::new(),
			no_data_message: None,
			no_result_message: None,
			actions_column_size: -1,
			actions_column_title: "Actions".to_string(),
			is_ready_for_export: false,
			export_response: None,
			mass_action_response: None,
			redirect: None,
		}
	}

	/// Applies the deferred configuration. Later calls are no-ops.
	///
	/// # Errors
	///
	/// Fails when the configured route cannot be generated, the source cannot
	/// be attached, or a numeric setting is negative.
	pub fn initialize(&mut self) -> Result<&mut Self> {
		let Some(config) = self.config.take() else {
			return Ok(self);
		};

		self.set_persistence(config.persisted);
		for (name, value) in &config.route_parameters {
			self.set_route_parameter(name.clone(), value.clone());
		}
		if let Some(route) = &config.route {
			let url = self.services.router.generate(route, &config.route_parameters)?;
			self.set_route_url(url);
		}

		if !config.filterable {
			self.columns_filterable = false;
		}
		if !config.sortable {
			self.columns_sortable = false;
		}
		self.apply_column_capabilities();

		if let Some(source) = config.source {
			self.set_source(source.clone())?;
			if let Some(group_by) = config.group_by {
				let mut source = source.lock();
				if source.supports_group_by() {
					source.set_group_by(group_by.into_vec())?;
				}
			}
		}

		if let Some(sort_by) = &config.sort_by {
			self.set_default_order(sort_by, config.order.as_deref().unwrap_or_default());
		}
		if let Some(limits) = config.max_per_page {
			self.set_limits(limits);
		}
		self.set_max_results(config.max_results)?;
		if let Some(page) = config.page {
			self.set_page(page)?;
		}

		Ok(self)
	}

	/// Attaches the data source and merges the queued columns into the
	/// columns it provides.
	///
	/// # Errors
	///
	/// Returns [`GridError::InvalidArgument`] if a source is already attached.
	pub fn set_source(&mut self, source: SharedSource) -> Result<&mut Self> {
		if self.source.is_some() {
			return Err(GridError::InvalidArgument(SOURCE_ALREADY_SET.to_string()));
		}

		{
			let mut guard = source.lock();
			guard.initialise(&self.services)?;
			guard.get_columns(&mut self.columns)?;
		}
		self.source = Some(source);
		self.merge_lazy_columns()?;
		self.apply_column_capabilities();
		Ok(self)
	}

	pub fn source(&self) -> Option<&SharedSource> {
		self.source.as_ref()
	}

	fn merge_lazy_columns(&mut self) -> Result<()> {
		let mut lazy = std::mem::take(&mut self.lazy_columns);
		lazy.sort_by_key(|l| l.position);

		// Positive positions never land before a column queued at a lower or
		// equal position
		let mut next = 0;
		for LazyColumn { column, position } in lazy {
			let position = if position > 0 {
				let at = position.max(next);
				next = at + 1;
				at
			} else {
				position
			};
			self.columns.add_column(column, position)?;
		}
		Ok(())
	}

	fn apply_column_capabilities(&mut self) {
		let (filterable, sortable) = (self.columns_filterable, self.columns_sortable);
		let lazy = self.lazy_columns.iter_mut().map(|l| &mut l.column);
		for column in self.columns.iter_mut().chain(lazy) {
			if !filterable {
				column.set_filterable(false);
			}
			if !sortable {
				column.set_sortable(false);
			}
		}
	}

	pub fn id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
		let id = id.into();
		self.id = (!id.is_empty()).then_some(id);
		self
	}

	/// Session key and request namespace; `None` until a request is handled
	pub fn hash(&self) -> Option<&str> {
		self.hash.as_deref()
	}

	/// Adds a column at a 1-based position (0 appends, negative counts from
	/// the end). Before a source is attached the column is queued.
	pub fn add_column(&mut self, mut column: Column, position: i32) -> Result<&mut Self> {
		if !self.columns_filterable {
			column.set_filterable(false);
		}
		if !self.columns_sortable {
			column.set_sortable(false);
		}

		if self.source.is_none() {
			self.lazy_columns.push(LazyColumn { column, position });
		} else {
			self.columns.add_column(column, position)?;
		}
		Ok(self)
	}

	/// Looks a column up in the queued columns, then in the live ones.
	///
	/// # Errors
	///
	/// Returns [`GridError::InvalidArgument`] if the column is unknown.
	pub fn column(&self, id: &str) -> Result<&Column> {
		match self.lazy_columns.iter().find(|l| l.column.id() == id) {
			Some(lazy) => Ok(&lazy.column),
			None => self.columns.column(id),
		}
	}

	pub fn has_column(&self, id: &str) -> bool {
		self.lazy_columns.iter().any(|l| l.column.id() == id) || self.columns.has_column(id)
	}

	pub fn columns(&self) -> &ColumnSet {
		&self.columns
	}

	pub fn columns_mut(&mut self) -> &mut ColumnSet {
		&mut self.columns
	}

	/// Replaces the live columns
	pub fn set_columns(&mut self, columns: ColumnSet) -> &mut Self {
		self.columns = columns;
		self
	}

	pub fn set_columns_order(&mut self, ids: &[impl AsRef<str>], keep_others: bool) -> &mut Self {
		self.columns.set_columns_order(ids, keep_others);
		self
	}

	/// Registers a prototype column for its type
	pub fn add_column_extension(&mut self, extension: Column) -> &mut Self {
		self.columns.add_extension(extension);
		self
	}

	/// Adds a mass action, unless it requires a role the principal lacks
	pub fn add_mass_action(&mut self, action: MassAction) -> &mut Self {
		if self.services.is_granted(action.get_role()) {
			self.mass_actions.push(action);
		} else {
			debug!(action = action.title(), "Skipping mass action: role not granted");
		}
		self
	}

	pub fn mass_actions(&self) -> &[MassAction] {
		&self.mass_actions
	}

	/// Adds a row action to the actions column it is bound to, unless it
	/// requires a role the principal lacks
	pub fn add_row_action(&mut self, action: RowAction) -> &mut Self {
		if self.services.is_granted(action.get_role()) {
			self.row_actions
				.entry(action.column().to_string())
				.or_default()
				.push(action);
		} else {
			debug!(action = action.title(), "Skipping row action: role not granted");
		}
		self
	}

	/// Row actions grouped by actions column id
	pub fn row_actions(&self) -> &IndexMap<String, Vec<RowAction>> {
		&self.row_actions
	}

	/// Adds an export, unless it requires a role the principal lacks
	pub fn add_export(&mut self, export: SharedExport) -> &mut Self {
		let granted = {
			let guard = export.lock();
			self.services.is_granted(guard.role())
		};
		if granted {
			self.exports.push(export);
		} else {
			debug!("Skipping export: role not granted");
		}
		self
	}

	pub fn exports(&self) -> &[SharedExport] {
		&self.exports
	}

	/// Registers a tweak.
	///
	/// Without an id the tweak is keyed by an incrementing number starting at
	/// 0.
	///
	/// # Errors
	///
	/// Returns [`GridError::InvalidArgument`] for ids starting with `#`.
	pub fn add_tweak(
		&mut self,
		title: impl Into<String>,
		spec: TweakSpec,
		id: Option<&str>,
		group: Option<&str>,
	) -> Result<&mut Self> {
		if let Some(id) = id.filter(|id| id.starts_with('#')) {
			return Err(GridError::InvalidArgument(format!(
				"Tweak id \"{}\" is reserved for internal use, modify the id of your tweak",
				id
			)));
		}

		let key = match id {
			Some(id) => id.to_string(),
			None => self.next_tweak_key(),
		};
		self.tweaks.insert(
			key,
			Tweak {
				title: title.into(),
				id: id.map(str::to_string),
				group: group.map(str::to_string),
				spec,
			},
		);
		Ok(self)
	}

	fn next_tweak_key(&mut self) -> String {
		while self.tweaks.contains_key(&self.next_tweak_key.to_string()) {
			self.next_tweak_key += 1;
		}
		let key = self.next_tweak_key.to_string();
		self.next_tweak_key += 1;
		key
	}

	pub fn tweaks(&self) -> &IndexMap<String, Tweak> {
		&self.tweaks
	}

	pub fn tweak(&self, id: &str) -> Option<&Tweak> {
		self.tweaks.get(id)
	}

	/// Tweaks of one group, keyed by id
	pub fn tweaks_group(&self, group: &str) -> Vec<(&str, &Tweak)> {
		self.tweaks
			.iter()
			.filter(|(_, tweak)| tweak.group.as_deref() == Some(group))
			.map(|(key, tweak)| (key.as_str(), tweak))
			.collect()
	}

	/// Active tweak id per group
	pub fn active_tweaks(&self) -> &IndexMap<String, String> {
		&self.session_data.active_tweaks
	}

	pub fn active_tweak_group(&self, group: &str) -> Option<&str> {
		self.session_data
			.active_tweaks
			.get(group)
			.map(String::as_str)
	}

	/// URL selecting a tweak.
	///
	/// # Errors
	///
	/// Returns [`GridError::Logic`] before a request was handled, and routing
	/// errors from [`Grid::route_url`].
	pub fn tweak_url(&mut self, id: &str) -> Result<String> {
		let hash = self
			.hash
			.clone()
			.ok_or_else(|| GridError::Logic("The grid hash is not created yet".to_string()))?;
		let url = self.route_url()?;
		let separator = if url.contains('?') { '&' } else { '?' };
		Ok(format!(
			"{}{}{}[{}]={}",
			url,
			separator,
			hash,
			crate::keys::TWEAK,
			id
		))
	}

	/// Sets the template override and persists it right away.
	///
	/// `None` is a no-op.
	pub fn set_template(&mut self, template: Option<TemplateSpec>) -> Result<&mut Self> {
		let Some(template) = template else {
			return Ok(self);
		};

		self.session_data.template = Some(template.stored_value());
		if let (Some(session), Some(key)) = (&self.session, self.session_key()) {
			let existing = session.get(&key);
			self.template_seeded |= existing.is_none();
			let mut stored = if self.hash.is_some() {
				self.session_data.clone()
			} else {
				SessionData::from_session(&key, existing)
			};
			stored.template = self.session_data.template.clone();
			session.set(&key, stored.to_value()?);
		}
		Ok(self)
	}

	/// [`Grid::set_template`] for untyped values: `null` clears nothing,
	/// strings are template paths and anything else is rejected with
	/// [`GridError::Template`].
	pub fn set_template_value(&mut self, template: Value) -> Result<&mut Self> {
		match template {
			Value::Null => Ok(self),
			other => self.set_template(Some(TemplateSpec::try_from(other)?)),
		}
	}

	pub fn template(&self) -> Option<&str> {
		self.session_data.template.as_deref()
	}

	fn session_key(&self) -> Option<String> {
		self.hash
			.clone()
			.or_else(|| self.id.as_ref().map(|id| format!("grid_{}", id)))
	}

	pub fn set_route_parameter(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
		self.route_parameters.insert(name.into(), value.into());
		self
	}

	pub fn route_parameters(&self) -> &IndexMap<String, Value> {
		&self.route_parameters
	}

	pub fn set_route_url(&mut self, url: impl Into<String>) -> &mut Self {
		self.route_url = Some(url.into());
		self
	}

	/// URL of the page showing the grid.
	///
	/// Defaults to the route of the current request, generated with the route
	/// parameters.
	pub fn route_url(&mut self) -> Result<String> {
		if let Some(url) = &self.route_url {
			return Ok(url.clone());
		}

		let route = self
			.request
			.as_ref()
			.and_then(|request| request.attribute(crate::keys::ROUTE_ATTRIBUTE))
			.and_then(|route| route.as_str().map(str::to_string))
			.ok_or_else(|| GridError::Routing("The current request has no route".to_string()))?;
		let url = self.services.router.generate(&route, &self.route_parameters)?;
		self.route_url = Some(url.clone());
		Ok(url)
	}

	/// Keeps the persisted state when arriving from another page
	pub fn set_persistence(&mut self, persistence: bool) -> &mut Self {
		self.persistence = persistence;
		self
	}

	pub fn persistence(&self) -> bool {
		self.persistence
	}

	pub fn set_data_junction(&mut self, data_junction: DataJunction) -> &mut Self {
		self.data_junction = data_junction;
		self
	}

	pub fn data_junction(&self) -> DataJunction {
		self.data_junction
	}

	/// Sets the allowed page sizes
	///
	/// # Examples
	///
	/// ```
	/// # use datagrid_core::GridServices;
	/// # use datagrid_engine::Grid;
	/// # use datagrid_test::doubles::{GrantedRoles, SimpleRouter, StaticRequestStack};
	/// # use std::sync::Arc;
	/// # let services = GridServices::new(
	/// #     Arc::new(SimpleRouter),
	/// #     Arc::new(StaticRequestStack::empty()),
	/// #     Arc::new(GrantedRoles::none()),
	/// # );
	/// let mut grid = Grid::new(services, None, None);
	/// grid.set_limits([10, 50]);
	///
	/// let sizes: Vec<_> = grid.limits().keys().copied().collect();
	/// assert_eq!(sizes, vec![10, 50]);
	/// assert_eq!(grid.limits()[&50], "50");
	/// ```
	pub fn set_limits(&mut self, limits: impl Into<LimitsSpec>) -> &mut Self {
		self.limits = limits.into().into_limits();
		self
	}

	pub fn limits(&self) -> &IndexMap<usize, String> {
		&self.limits
	}

	/// Page size applied on a fresh session; must be one of the limits
	pub fn set_default_limit(&mut self, limit: usize) -> &mut Self {
		self.default_limit = Some(limit);
		self
	}

	/// Sets the page shown on a fresh session, counted from 1.
	///
	/// # Errors
	///
	/// Returns [`GridError::InvalidArgument`] for values below 1.
	pub fn set_default_page(&mut self, page: i64) -> Result<&mut Self> {
		if page < 1 {
			return Err(GridError::InvalidArgument(
				"Page must be a positive number".to_string(),
			));
		}
		self.page = (page - 1) as usize;
		Ok(self)
	}

	/// Tweak applied on a fresh session
	pub fn set_default_tweak(&mut self, id: impl Into<String>) -> &mut Self {
		self.default_tweak = Some(id.into());
		self
	}

	pub fn default_tweak(&self) -> Option<&str> {
		self.default_tweak.as_deref()
	}

	/// Sets the zero-based page.
	///
	/// # Errors
	///
	/// Returns [`GridError::InvalidArgument`] for negative values.
	pub fn set_page(&mut self, page: i64) -> Result<&mut Self> {
		if page < 0 {
			return Err(GridError::InvalidArgument(
				"Page must be a positive number".to_string(),
			));
		}
		self.page = page as usize;
		Ok(self)
	}

	pub fn page(&self) -> usize {
		self.page
	}

	/// Caps the number of rows; `None` removes the cap.
	///
	/// # Errors
	///
	/// Returns [`GridError::InvalidArgument`] for negative values.
	pub fn set_max_results(&mut self, max_results: Option<i64>) -> Result<&mut Self> {
		self.max_results = match max_results {
			Some(max) if max < 0 => {
				return Err(GridError::InvalidArgument(
					"Max results must be a positive number.".to_string(),
				));
			}
			Some(max) => Some(max as usize),
			None => None,
		};
		Ok(self)
	}

	pub fn max_results(&self) -> Option<usize> {
		self.max_results
	}

	/// Order applied on a fresh session, as `<columnId>|<direction>`.
	///
	/// The direction is lowercased but not validated here; an invalid one is
	/// rejected when a fresh session is handled.
	pub fn set_default_order(&mut self, column_id: &str, order: &str) -> &mut Self {
		self.default_order = Some(format!("{}|{}", column_id, order.to_lowercase()));
		self
	}

	pub fn default_order(&self) -> Option<&str> {
		self.default_order.as_deref()
	}

	/// Filters applied on a fresh session, by column id
	pub fn set_default_filters(&mut self, filters: IndexMap<String, Value>) -> &mut Self {
		self.default_filters = filters;
		self
	}

	/// Filters applied on every request; the filtered columns can no longer
	/// be filtered by the user
	pub fn set_permanent_filters(&mut self, filters: IndexMap<String, Value>) -> &mut Self {
		self.permanent_filters = filters;
		self
	}

	pub fn is_filtered(&self) -> bool {
		self.columns.iter().any(Column::is_filtered)
	}

	/// True when titles are shown and at least one column has a title
	pub fn is_title_section_visible(&self) -> bool {
		self.show_titles && self.columns.visible_columns().any(|c| !c.get_title().is_empty())
	}

	/// True when filters are shown and at least one data column is filterable
	pub fn is_filter_section_visible(&self) -> bool {
		self.show_filters
			&& self
				.columns
				.visible_columns()
				.any(|c| c.is_filterable() && !c.column_type().is_structural())
	}

	pub fn hide_filters(&mut self) -> &mut Self {
		self.show_filters = false;
		self
	}

	pub fn hide_titles(&mut self) -> &mut Self {
		self.show_titles = false;
		self
	}

	pub fn set_prefix_title(&mut self, prefix: impl Into<String>) -> &mut Self {
		self.prefix_title = prefix.into();
		self
	}

	pub fn prefix_title(&self) -> &str {
		&self.prefix_title
	}

	/// Message shown when the source has no data at all
	pub fn set_no_data_message(&mut self, message: impl Into<String>) -> &mut Self {
		self.no_data_message = Some(message.into());
		self
	}

	pub fn no_data_message(&self) -> Option<&str> {
		self.no_data_message.as_deref()
	}

	/// Message shown when the filters match no row
	pub fn set_no_result_message(&mut self, message: impl Into<String>) -> &mut Self {
		self.no_result_message = Some(message.into());
		self
	}

	pub fn no_result_message(&self) -> Option<&str> {
		self.no_result_message.as_deref()
	}

	/// Hides columns when the request is handled
	pub fn set_hidden_columns<I, S>(&mut self, ids: I) -> &mut Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.lazy_hidden_columns = ids.into_iter().map(Into::into).collect();
		self
	}

	/// Hides every column not listed when the request is handled
	pub fn set_visible_columns<I, S>(&mut self, ids: I) -> &mut Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.lazy_visible_columns = ids.into_iter().map(Into::into).collect();
		self
	}

	pub fn show_columns<I, S>(&mut self, ids: I) -> &mut Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		for id in ids {
			self.lazy_hide_show_columns.insert(id.into(), true);
		}
		self
	}

	pub fn hide_columns<I, S>(&mut self, ids: I) -> &mut Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		for id in ids {
			self.lazy_hide_show_columns.insert(id.into(), false);
		}
		self
	}

	/// Size of the actions columns the grid creates, -1 for automatic
	pub fn set_actions_column_size(&mut self, size: i32) -> &mut Self {
		self.actions_column_size = size;
		self
	}

	pub fn set_actions_column_title(&mut self, title: impl Into<String>) -> &mut Self {
		self.actions_column_title = title.into();
		self
	}
}

impl Clone for Grid {
	/// Copies the configuration and state. The copy owns its own columns;
	/// per-request outcomes (export and mass-action responses) are not
	/// copied.
	fn clone(&self) -> Self {
		Self {
			services: self.services.clone(),
			request: self.request.clone(),
			session: self.session.clone(),
			config: self.config.clone(),
			id: self.id.clone(),
			hash: self.hash.clone(),
			source: self.source.clone(),
			columns: self.columns.clone(),
			lazy_columns: self.lazy_columns.clone(),
			columns_filterable: self.columns_filterable,
			columns_sortable: self.columns_sortable,
			rows: self.rows.clone(),
			total_count: self.total_count,
			prepared: self.prepared,
			handled: self.handled,
			persistence: self.persistence,
			new_session: self.new_session,
			template_seeded: self.template_seeded,
			request_data: self.request_data.clone(),
			session_data: self.session_data.clone(),
			route_parameters: self.route_parameters.clone(),
			route_url: self.route_url.clone(),
			default_order: self.default_order.clone(),
			default_limit: self.default_limit,
			default_tweak: self.default_tweak.clone(),
			default_filters: self.default_filters.clone(),
			permanent_filters: self.permanent_filters.clone(),
			limits: self.limits.clone(),
			limit: self.limit,
			max_results: self.max_results,
			page: self.page,
			data_junction: self.data_junction,
			mass_actions: self.mass_actions.clone(),
			row_actions: self.row_actions.clone(),
			exports: self.exports.clone(),
			tweaks: self.tweaks.clone(),
			next_tweak_key: self.next_tweak_key,
			lazy_hidden_columns: self.lazy_hidden_columns.clone(),
			lazy_visible_columns: self.lazy_visible_columns.clone(),
			lazy_hide_show_columns: self.lazy_hide_show_columns.clone(),
			show_filters: self.show_filters,
			show_titles: self.show_titles,
			prefix_title: self.prefix_title.clone(),
			no_data_message: self.no_data_message.clone(),
			no_result_message: self.no_result_message.clone(),
			actions_column_size: self.actions_column_size,
			actions_column_title: self.actions_column_title.clone(),
			is_ready_for_export: self.is_ready_for_export,
			export_response: None,
			mass_action_response: None,
			redirect: self.redirect,
		}
	}
}

impl fmt::Debug for Grid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Grid")
			.field("id", &self.id)
			.field("hash", &self.hash)
			.field("columns", &self.columns)
			.field("page", &self.page)
			.field("limit", &self.limit)
			.field("total_count", &self.total_count)
			.field("session_data", &self.session_data)
			.finish_non_exhaustive()
	}
}
