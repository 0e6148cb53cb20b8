//! Column definition

use serde::{Deserialize, Serialize};
use std::fmt;

use super::filter::{FilterData, SortDirection};
use crate::action::RowAction;

/// Identifier of the column that carries the mass-action checkboxes.
pub const MASS_ACTION_COLUMN_ID: &str = "__action";

/// Kind of data a column displays.
///
/// `MassAction` and `Actions` are structural columns added by the grid; they
/// carry no source data and are never filtered or exported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
	Text,
	Number,
	Boolean,
	Date,
	DateTime,
	Array,
	MassAction,
	Actions,
	/// Type provided by a column extension
	#[serde(untagged)]
	Custom(String),
}

impl ColumnType {
	/// Returns the lowercase type name
	pub fn as_str(&self) -> &str {
		match self {
			ColumnType::Text => "text",
			ColumnType::Number => "number",
			ColumnType::Boolean => "boolean",
			ColumnType::Date => "date",
			ColumnType::DateTime => "datetime",
			ColumnType::Array => "array",
			ColumnType::MassAction => "massaction",
			ColumnType::Actions => "actions",
			ColumnType::Custom(name) => name,
		}
	}

	/// Parses a type name; unknown names become [`ColumnType::Custom`].
	pub fn from_name(name: &str) -> Self {
		match name.to_ascii_lowercase().as_str() {
			"text" => ColumnType::Text,
			"number" => ColumnType::Number,
			"boolean" => ColumnType::Boolean,
			"date" => ColumnType::Date,
			"datetime" => ColumnType::DateTime,
			"array" => ColumnType::Array,
			"massaction" => ColumnType::MassAction,
			"actions" => ColumnType::Actions,
			other => ColumnType::Custom(other.to_string()),
		}
	}

	/// Structural columns hold no source data
	pub fn is_structural(&self) -> bool {
		matches!(self, ColumnType::MassAction | ColumnType::Actions)
	}
}

impl fmt::Display for ColumnType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One field of a grid.
///
/// Identity is the `id`, which is unique within a [`ColumnSet`](super::ColumnSet).
/// Everything else is mutable configuration or per-request state (filter data
/// and sort direction).
///
/// # Examples
///
/// ```
/// use datagrid_core::column::{Column, ColumnType};
///
/// let column = Column::new("name", ColumnType::Text)
///     .title("Name")
///     .sortable(false);
///
/// assert_eq!(column.id(), "name");
/// assert_eq!(column.get_title(), "Name");
/// assert!(!column.is_sortable());
/// assert!(column.is_filterable());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
	id: String,
	title: String,
	column_type: ColumnType,
	primary: bool,
	sortable: bool,
	filterable: bool,
	visible: bool,
	visible_for_source: bool,
	exportable: bool,
	size: i32,
	role: Option<String>,
	data: Option<FilterData>,
	order: Option<SortDirection>,
	row_actions: Vec<RowAction>,
}

impl Column {
	/// Creates a sortable, filterable, visible column without a title
	pub fn new(id: impl Into<String>, column_type: ColumnType) -> Self {
		Self {
			id: id.into(),
			title: String::new(),
			column_type,
			primary: false,
			sortable: true,
			filterable: true,
			visible: true,
			visible_for_source: true,
			exportable: true,
			size: -1,
			role: None,
			data: None,
			order: None,
			row_actions: Vec::new(),
		}
	}

	/// Creates a text column
	pub fn text(id: impl Into<String>) -> Self {
		Self::new(id, ColumnType::Text)
	}

	/// Creates the mass-action checkbox column
	pub fn mass_action() -> Self {
		Self::new(MASS_ACTION_COLUMN_ID, ColumnType::MassAction)
			.sortable(false)
			.filterable(false)
			.source_column(false)
			.exportable(false)
			.size(15)
	}

	/// Creates an actions column holding row actions
	pub fn actions(
		id: impl Into<String>,
		title: impl Into<String>,
		row_actions: Vec<RowAction>,
	) -> Self {
		let mut column = Self::new(id, ColumnType::Actions)
			.title(title)
			.sortable(false)
			.filterable(false)
			.source_column(false)
			.exportable(false);
		column.row_actions = row_actions;
		column
	}

	/// Sets the title
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = title.into();
		self
	}

	/// Marks the column as the primary key
	pub fn primary(mut self, primary: bool) -> Self {
		self.primary = primary;
		self
	}

	/// Sets whether the column can be sorted
	pub fn sortable(mut self, sortable: bool) -> Self {
		self.sortable = sortable;
		self
	}

	/// Sets whether the column can be filtered
	pub fn filterable(mut self, filterable: bool) -> Self {
		self.filterable = filterable;
		self
	}

	/// Sets whether the column is displayed
	pub fn visible(mut self, visible: bool) -> Self {
		self.visible = visible;
		self
	}

	/// Sets whether the column is fetched from the source
	pub fn source_column(mut self, visible_for_source: bool) -> Self {
		self.visible_for_source = visible_for_source;
		self
	}

	/// Sets whether the column appears in exports
	pub fn exportable(mut self, exportable: bool) -> Self {
		self.exportable = exportable;
		self
	}

	/// Sets the display size, -1 for automatic
	pub fn size(mut self, size: i32) -> Self {
		self.size = size;
		self
	}

	/// Restricts the column to principals granted `role`
	pub fn role(mut self, role: impl Into<String>) -> Self {
		self.role = Some(role.into());
		self
	}

	/// Returns the column id
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Returns the title, empty when none was set
	pub fn get_title(&self) -> &str {
		&self.title
	}

	/// Returns the column type
	pub fn column_type(&self) -> &ColumnType {
		&self.column_type
	}

	pub fn is_primary(&self) -> bool {
		self.primary
	}

	pub fn is_sortable(&self) -> bool {
		self.sortable
	}

	pub fn is_filterable(&self) -> bool {
		self.filterable
	}

	/// Returns the display flag, regardless of roles
	pub fn is_visible(&self) -> bool {
		self.visible
	}

	pub fn is_visible_for_source(&self) -> bool {
		self.visible_for_source
	}

	pub fn is_exportable(&self) -> bool {
		self.exportable
	}

	pub fn get_size(&self) -> i32 {
		self.size
	}

	pub fn get_role(&self) -> Option<&str> {
		self.role.as_deref()
	}

	pub fn set_title(&mut self, title: impl Into<String>) {
		self.title = title.into();
	}

	pub fn set_sortable(&mut self, sortable: bool) {
		self.sortable = sortable;
	}

	pub fn set_filterable(&mut self, filterable: bool) {
		self.filterable = filterable;
	}

	pub fn set_visible(&mut self, visible: bool) {
		self.visible = visible;
	}

	pub fn set_size(&mut self, size: i32) {
		self.size = size;
	}

	pub fn set_primary(&mut self, primary: bool) {
		self.primary = primary;
	}

	/// Replaces the identifier; used when instantiating an extension prototype
	pub(crate) fn set_id(&mut self, id: impl Into<String>) {
		self.id = id.into();
	}

	/// Current filter data, if any
	pub fn data(&self) -> Option<&FilterData> {
		self.data.as_ref()
	}

	/// Stores the filter data applied to this column
	pub fn set_data(&mut self, data: FilterData) {
		self.data = Some(data);
	}

	/// Removes the filter data
	pub fn clear_data(&mut self) {
		self.data = None;
	}

	/// True when an active filter restricts this column
	pub fn is_filtered(&self) -> bool {
		self.data.as_ref().is_some_and(FilterData::is_active)
	}

	/// Current sort direction, if the grid is ordered by this column
	pub fn order(&self) -> Option<SortDirection> {
		self.order
	}

	pub fn set_order(&mut self, order: Option<SortDirection>) {
		self.order = order;
	}

	pub fn is_sorted(&self) -> bool {
		self.order.is_some()
	}

	/// Row actions rendered by an actions column
	pub fn row_actions(&self) -> &[RowAction] {
		&self.row_actions
	}

	pub fn set_row_actions(&mut self, row_actions: Vec<RowAction>) {
		self.row_actions = row_actions;
	}
}
