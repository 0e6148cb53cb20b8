//! In-memory implementations of the grid collaborators

use bytes::Bytes;
use datagrid_core::{
	AuthorizationChecker, Column, ColumnSet, Export, ExportData, GridData, GridRequest, GridError,
	Operator, QueryParams, RequestStack, Response, Result, Router, Row, RowSet, SessionStore,
	SortDirection, Source, export::cell_text,
};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// Router generating `/<route>` followed by the parameters as a query string
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRouter;

impl Router for SimpleRouter {
	fn generate(&self, route: &str, parameters: &IndexMap<String, Value>) -> Result<String> {
		let query: Vec<String> = parameters
			.iter()
			.map(|(name, value)| format!("{}={}", name, cell_text(value)))
			.collect();
		if query.is_empty() {
			Ok(format!("/{}", route))
		} else {
			Ok(format!("/{}?{}", route, query.join("&")))
		}
	}
}

/// Request stack returning a fixed request
#[derive(Default)]
pub struct StaticRequestStack {
	request: RwLock<Option<Arc<dyn GridRequest>>>,
}

impl StaticRequestStack {
	pub fn new(request: Arc<dyn GridRequest>) -> Self {
		Self {
			request: RwLock::new(Some(request)),
		}
	}

	/// A stack with no current request
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn set(&self, request: Arc<dyn GridRequest>) {
		*self.request.write() = Some(request);
	}
}

impl RequestStack for StaticRequestStack {
	fn current_request(&self) -> Option<Arc<dyn GridRequest>> {
		self.request.read().clone()
	}
}

/// Authorization checker granting a fixed set of roles
#[derive(Debug, Clone, Default)]
pub struct GrantedRoles {
	roles: HashSet<String>,
}

impl GrantedRoles {
	pub fn none() -> Self {
		Self::default()
	}

	pub fn of<I, S>(roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			roles: roles.into_iter().map(Into::into).collect(),
		}
	}
}

impl AuthorizationChecker for GrantedRoles {
	fn is_granted(&self, role: &str) -> bool {
		self.roles.contains(role)
	}
}

/// Request built field by field.
///
/// Defaults to a regular `GET http://localhost/` with no referer.
///
/// # Examples
///
/// ```
/// use datagrid_core::GridRequest;
/// use datagrid_test::doubles::ScriptedRequest;
/// use serde_json::json;
///
/// let request = ScriptedRequest::new()
///     .with_grid_parameters("grid_users", json!({"_page": 2}))
///     .with_referer("http://localhost/other");
///
/// assert_eq!(request.grid_parameters("grid_users").unwrap()["_page"], 2);
/// assert_eq!(request.header("referer").as_deref(), Some("http://localhost/other"));
/// ```
#[derive(Clone, Default)]
pub struct ScriptedRequest {
	session: Option<Arc<dyn SessionStore>>,
	parameters: Map<String, Value>,
	attributes: IndexMap<String, Value>,
	headers: IndexMap<String, String>,
	xml_http_request: bool,
	scheme: Option<String>,
	host: Option<String>,
	base_url: String,
	path_info: Option<String>,
}

impl ScriptedRequest {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
		self.session = Some(session);
		self
	}

	/// Posts `parameters` under the grid `hash`
	pub fn with_grid_parameters(mut self, hash: &str, parameters: Value) -> Self {
		self.parameters.insert(hash.to_string(), parameters);
		self
	}

	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}

	pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
		self.headers.insert(name.to_ascii_lowercase(), value.into());
		self
	}

	pub fn with_referer(self, url: impl Into<String>) -> Self {
		self.with_header("referer", url)
	}

	pub fn xml_http_request(mut self) -> Self {
		self.xml_http_request = true;
		self
	}

	/// Sets the URL the request was made to
	pub fn url(
		mut self,
		scheme: impl Into<String>,
		host: impl Into<String>,
		base_url: impl Into<String>,
		path_info: impl Into<String>,
	) -> Self {
		self.scheme = Some(scheme.into());
		self.host = Some(host.into());
		self.base_url = base_url.into();
		self.path_info = Some(path_info.into());
		self
	}

	pub fn into_shared(self) -> Arc<dyn GridRequest> {
		Arc::new(self)
	}
}

impl GridRequest for ScriptedRequest {
	fn session(&self) -> Option<Arc<dyn SessionStore>> {
		self.session.clone()
	}

	fn grid_parameters(&self, hash: &str) -> Option<Map<String, Value>> {
		match self.parameters.get(hash) {
			Some(Value::Object(parameters)) => Some(parameters.clone()),
			_ => None,
		}
	}

	fn attribute(&self, name: &str) -> Option<Value> {
		self.attributes.get(name).cloned()
	}

	fn is_xml_http_request(&self) -> bool {
		self.xml_http_request
	}

	fn header(&self, name: &str) -> Option<String> {
		self.headers.get(&name.to_ascii_lowercase()).cloned()
	}

	fn scheme(&self) -> String {
		self.scheme.clone().unwrap_or_else(|| "http".to_string())
	}

	fn http_host(&self) -> String {
		self.host.clone().unwrap_or_else(|| "localhost".to_string())
	}

	fn base_url(&self) -> String {
		self.base_url.clone()
	}

	fn path_info(&self) -> String {
		self.path_info.clone().unwrap_or_else(|| "/".to_string())
	}
}

/// Calls a [`StaticSource`] received
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceLog {
	pub initialised: usize,
	pub executions: Vec<QueryParams>,
	pub group_by: Option<Vec<String>>,
	pub deleted: Vec<Value>,
}

/// Source over rows held in memory.
///
/// Filters on source columns are applied with a subset of the operators
/// (equality, inequality, the like family and null checks); the sorted
/// column orders the rows by their text.
///
/// # Examples
///
/// ```
/// use datagrid_core::{Column, ColumnSet, QueryParams, Row, Source};
/// use datagrid_test::doubles::StaticSource;
/// use serde_json::json;
///
/// let mut source = StaticSource::new()
///     .column(Column::text("id").primary(true))
///     .rows((1..=5).map(|id| Row::from_fields([("id", json!(id))])));
///
/// let mut columns = ColumnSet::new();
/// source.get_columns(&mut columns).unwrap();
/// let params = QueryParams { page: 1, limit: 2, ..Default::default() };
/// let rows = source.execute(&columns, &params).unwrap();
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!(source.total_count(None).unwrap(), 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
	columns: Vec<Column>,
	rows: Vec<Row>,
	data_loaded: bool,
	group_by: bool,
	hash: String,
	matched: usize,
	log: Arc<Mutex<SourceLog>>,
}

impl StaticSource {
	pub fn new() -> Self {
		Self {
			hash: "static".to_string(),
			..Self::default()
		}
	}

	pub fn column(mut self, column: Column) -> Self {
		self.columns.push(column);
		self
	}

	pub fn row(mut self, row: Row) -> Self {
		self.rows.push(row);
		self
	}

	pub fn rows(mut self, rows: impl IntoIterator<Item = Row>) -> Self {
		self.rows.extend(rows);
		self
	}

	/// Reports the data as preloaded
	pub fn data_loaded(mut self) -> Self {
		self.data_loaded = true;
		self
	}

	/// Accepts group-by fields
	pub fn with_group_by(mut self) -> Self {
		self.group_by = true;
		self
	}

	pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
		self.hash = hash.into();
		self
	}

	/// Handle on the call log, usable once the source is moved into a grid
	pub fn log(&self) -> Arc<Mutex<SourceLog>> {
		self.log.clone()
	}

	fn matches(columns: &ColumnSet, row: &Row) -> bool {
		columns.source_columns().all(|column| {
			let Some(data) = column.data().filter(|data| data.is_active()) else {
				return true;
			};
			let field = row.field(column.id()).unwrap_or(&Value::Null);
			let text = cell_text(field);
			let operand = data.from.as_ref().map(cell_text).unwrap_or_default();

			match data.operator.unwrap_or(Operator::Like) {
				Operator::Eq => text == operand,
				Operator::Neq => text != operand,
				Operator::IsNull => field.is_null(),
				Operator::IsNotNull => !field.is_null(),
				Operator::NotLike | Operator::NotStrictLike => !text.contains(&operand),
				_ => text.to_lowercase().contains(&operand.to_lowercase()),
			}
		})
	}
}

impl Source for StaticSource {
	fn initialise(&mut self, _services: &datagrid_core::GridServices) -> Result<()> {
		self.log.lock().initialised += 1;
		Ok(())
	}

	fn get_columns(&mut self, columns: &mut ColumnSet) -> Result<()> {
		for column in &self.columns {
			columns.add_column(column.clone(), 0)?;
		}
		Ok(())
	}

	fn is_data_loaded(&self) -> bool {
		self.data_loaded
	}

	fn execute(&mut self, columns: &ColumnSet, params: &QueryParams) -> Result<RowSet> {
		self.log.lock().executions.push(*params);

		let mut rows: Vec<Row> = self
			.rows
			.iter()
			.filter(|row| Self::matches(columns, row))
			.cloned()
			.collect();

		if let Some(column) = columns.iter().find(|column| column.is_sorted()) {
			let id = column.id().to_string();
			rows.sort_by_key(|row| row.field(&id).map(cell_text).unwrap_or_default());
			if column.order() == Some(SortDirection::Desc) {
				rows.reverse();
			}
		}

		if let Some(max) = params.max_results {
			rows.truncate(max);
		}
		self.matched = rows.len();

		let page = rows.into_iter().skip(params.offset());
		let page: Vec<Row> = if params.limit > 0 {
			page.take(params.limit).collect()
		} else {
			page.collect()
		};
		Ok(page.into())
	}

	fn total_count(&self, max_results: Option<usize>) -> Result<usize> {
		Ok(match max_results {
			Some(max) => self.matched.min(max),
			None => self.matched,
		})
	}

	fn hash(&self) -> String {
		self.hash.clone()
	}

	fn supports_group_by(&self) -> bool {
		self.group_by
	}

	fn set_group_by(&mut self, group_by: Vec<String>) -> Result<()> {
		if !self.group_by {
			return Err(GridError::Logic("This source cannot group rows".to_string()));
		}
		self.log.lock().group_by = Some(group_by);
		Ok(())
	}

	fn delete(&mut self, ids: &[Value]) -> Result<()> {
		let Some(primary) = self.columns.iter().find(|column| column.is_primary()) else {
			return Err(GridError::InvalidArgument("Primary column must be defined".to_string()));
		};
		let primary = primary.id().to_string();
		self.rows
			.retain(|row| row.field(&primary).is_none_or(|id| !ids.contains(id)));
		self.log.lock().deleted.extend_from_slice(ids);
		Ok(())
	}
}

/// Export keeping the computed data and answering with it as CSV-like text
#[derive(Debug, Clone, Default)]
pub struct RecordingExport {
	title: String,
	role: Option<String>,
	data: Arc<Mutex<Option<ExportData>>>,
}

impl RecordingExport {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			..Self::default()
		}
	}

	pub fn role(mut self, role: impl Into<String>) -> Self {
		self.role = Some(role.into());
		self
	}

	/// Handle on the computed data, usable once the export is moved into a
	/// grid
	pub fn data(&self) -> Arc<Mutex<Option<ExportData>>> {
		self.data.clone()
	}
}

impl Export for RecordingExport {
	fn title(&self) -> &str {
		&self.title
	}

	fn role(&self) -> Option<&str> {
		self.role.as_deref()
	}

	fn compute_data(&mut self, grid: &dyn GridData) -> Result<()> {
		*self.data.lock() = Some(ExportData::from_grid(grid));
		Ok(())
	}

	fn response(&self) -> Result<Response> {
		let data = self.data.lock();
		let Some(data) = data.as_ref() else {
			return Err(GridError::Logic("Export data is not computed".to_string()));
		};
		let mut lines = vec![data.titles.join(",")];
		lines.extend(data.rows.iter().map(|row| row.join(",")));

		http::Response::builder()
			.header(http::header::CONTENT_TYPE, "text/csv")
			.body(Bytes::from(lines.join("\n")))
			.map_err(|e| GridError::Runtime(e.to_string()))
	}
}
