//! Mass actions and row actions
//!
//! A [`MassAction`] is a bulk operation over the selected rows of a grid (or
//! every row when the "all selected" flag is posted). A [`RowAction`] is a link
//! rendered in an actions column for each row.

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::row::Row;
use crate::services::Response;
use crate::session::SessionStore;

/// Column that row actions are bound to when none is given.
pub const DEFAULT_ACTIONS_COLUMN: &str = "__actions";

/// Signature of an inline mass-action handler.
pub type MassActionFn = dyn Fn(&MassActionContext) -> Result<Option<Response>> + Send + Sync;

/// What runs when a mass action is submitted.
#[derive(Clone)]
pub enum MassActionCallback {
	/// Closure invoked in-process
	Inline(Arc<MassActionFn>),
	/// Sub-request forwarded to a controller through the
	/// [`ActionDispatcher`](crate::services::ActionDispatcher).
	///
	/// `controller` must be a `bundle:controller:action` style reference.
	Delegated {
		controller: String,
		parameters: IndexMap<String, Value>,
	},
}

impl MassActionCallback {
	/// Wraps a closure
	pub fn inline<F>(callback: F) -> Self
	where
		F: Fn(&MassActionContext) -> Result<Option<Response>> + Send + Sync + 'static,
	{
		MassActionCallback::Inline(Arc::new(callback))
	}

	/// References a controller with no extra attributes
	pub fn delegated(controller: impl Into<String>) -> Self {
		MassActionCallback::Delegated {
			controller: controller.into(),
			parameters: IndexMap::new(),
		}
	}
}

impl fmt::Debug for MassActionCallback {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MassActionCallback::Inline(_) => f.write_str("Inline(<fn>)"),
			MassActionCallback::Delegated {
				controller,
				parameters,
			} => f
				.debug_struct("Delegated")
				.field("controller", controller)
				.field("parameters", parameters)
				.finish(),
		}
	}
}

/// Arguments handed to a mass-action handler.
#[derive(Clone)]
pub struct MassActionContext {
	/// Primary keys of the selected rows
	pub primary_keys: Vec<Value>,
	/// True when every row of the unpaginated result set was selected
	pub all_keys: bool,
	/// Session of the current request, if any
	pub session: Option<Arc<dyn SessionStore>>,
	/// Parameters configured on the action
	pub parameters: IndexMap<String, Value>,
}

impl fmt::Debug for MassActionContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MassActionContext")
			.field("primary_keys", &self.primary_keys)
			.field("all_keys", &self.all_keys)
			.field("session", &self.session.is_some())
			.field("parameters", &self.parameters)
			.finish()
	}
}

/// A bulk operation over selected rows.
///
/// # Examples
///
/// ```
/// use datagrid_core::action::{MassAction, MassActionCallback};
///
/// let action = MassAction::new("Delete")
///     .callback(MassActionCallback::inline(|ctx| {
///         assert!(!ctx.primary_keys.is_empty() || ctx.all_keys);
///         Ok(None)
///     }))
///     .confirm(true)
///     .role("ROLE_ADMIN");
///
/// assert_eq!(action.title(), "Delete");
/// assert!(action.is_confirmed());
/// assert_eq!(action.get_role(), Some("ROLE_ADMIN"));
/// ```
#[derive(Debug, Clone)]
pub struct MassAction {
	title: String,
	callback: Option<MassActionCallback>,
	confirm: bool,
	confirm_message: String,
	parameters: IndexMap<String, Value>,
	role: Option<String>,
}

impl MassAction {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			callback: None,
			confirm: false,
			confirm_message: "Do you want to {action} the selected rows?".to_string(),
			parameters: IndexMap::new(),
			role: None,
		}
	}

	pub fn callback(mut self, callback: MassActionCallback) -> Self {
		self.callback = Some(callback);
		self
	}

	pub fn confirm(mut self, confirm: bool) -> Self {
		self.confirm = confirm;
		self
	}

	pub fn confirm_message(mut self, message: impl Into<String>) -> Self {
		self.confirm_message = message.into();
		self
	}

	pub fn parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.parameters.insert(key.into(), value.into());
		self
	}

	/// Restricts the action to principals granted `role`
	pub fn role(mut self, role: impl Into<String>) -> Self {
		self.role = Some(role.into());
		self
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn get_callback(&self) -> Option<&MassActionCallback> {
		self.callback.as_ref()
	}

	pub fn is_confirmed(&self) -> bool {
		self.confirm
	}

	/// Confirmation text with `{action}` replaced by the lowercased title
	pub fn get_confirm_message(&self) -> String {
		self.confirm_message
			.replace("{action}", &self.title.to_lowercase())
	}

	pub fn parameters(&self) -> &IndexMap<String, Value> {
		&self.parameters
	}

	pub fn get_role(&self) -> Option<&str> {
		self.role.as_deref()
	}
}

/// A per-row link rendered in an actions column.
///
/// Route parameters name row fields; their values are read from each row when
/// the link is generated.
///
/// # Examples
///
/// ```
/// use datagrid_core::action::RowAction;
/// use datagrid_core::row::Row;
/// use serde_json::json;
///
/// let action = RowAction::new("Edit", "user_edit").route_parameter("id");
/// let mut row = Row::new();
/// row.set_field("id", json!(7));
///
/// let parameters = action.route_parameters_for(&row);
/// assert_eq!(parameters.get("id"), Some(&json!(7)));
/// assert_eq!(action.column(), "__actions");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RowAction {
	title: String,
	route: String,
	column: String,
	confirm: bool,
	confirm_message: String,
	target: String,
	route_parameters: Vec<String>,
	route_parameters_mapping: IndexMap<String, String>,
	attributes: IndexMap<String, String>,
	role: Option<String>,
}

impl RowAction {
	pub fn new(title: impl Into<String>, route: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			route: route.into(),
			column: DEFAULT_ACTIONS_COLUMN.to_string(),
			confirm: false,
			confirm_message: "Do you want to {action} this row?".to_string(),
			target: "_self".to_string(),
			route_parameters: Vec::new(),
			route_parameters_mapping: IndexMap::new(),
			attributes: IndexMap::new(),
			role: None,
		}
	}

	/// Binds the action to an actions column
	pub fn in_column(mut self, column: impl Into<String>) -> Self {
		self.column = column.into();
		self
	}

	pub fn confirm(mut self, confirm: bool) -> Self {
		self.confirm = confirm;
		self
	}

	pub fn confirm_message(mut self, message: impl Into<String>) -> Self {
		self.confirm_message = message.into();
		self
	}

	pub fn target(mut self, target: impl Into<String>) -> Self {
		self.target = target.into();
		self
	}

	/// Adds a row field passed to the route under its own name
	pub fn route_parameter(mut self, field: impl Into<String>) -> Self {
		self.route_parameters.push(field.into());
		self
	}

	/// Passes the row field `field` to the route as `parameter`
	pub fn route_parameter_mapping(
		mut self,
		field: impl Into<String>,
		parameter: impl Into<String>,
	) -> Self {
		self.route_parameters_mapping
			.insert(field.into(), parameter.into());
		self
	}

	pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}

	pub fn role(mut self, role: impl Into<String>) -> Self {
		self.role = Some(role.into());
		self
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn route(&self) -> &str {
		&self.route
	}

	pub fn column(&self) -> &str {
		&self.column
	}

	pub fn is_confirmed(&self) -> bool {
		self.confirm
	}

	pub fn get_confirm_message(&self) -> String {
		self.confirm_message
			.replace("{action}", &self.title.to_lowercase())
	}

	pub fn get_target(&self) -> &str {
		&self.target
	}

	pub fn attributes(&self) -> &IndexMap<String, String> {
		&self.attributes
	}

	pub fn get_role(&self) -> Option<&str> {
		self.role.as_deref()
	}

	/// Route parameters resolved against a row. Fields missing from the row
	/// are skipped.
	pub fn route_parameters_for(&self, row: &Row) -> IndexMap<String, Value> {
		let mut parameters = IndexMap::new();
		for field in &self.route_parameters {
			if let Some(value) = row.field(field) {
				let name = self
					.route_parameters_mapping
					.get(field)
					.cloned()
					.unwrap_or_else(|| field.clone());
				parameters.insert(name, value.clone());
			}
		}
		parameters
	}
}
