//! Exports of the unpaginated grid content

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

use crate::column::ColumnSet;
use crate::error::Result;
use crate::row::RowSet;
use crate::services::Response;

/// Read access to a loaded grid, handed to exports.
pub trait GridData {
	fn columns(&self) -> &ColumnSet;

	fn rows(&self) -> &RowSet;
}

/// Turns the loaded grid into a downloadable response.
///
/// Before [`Export::compute_data`] is called, the grid reloads its source
/// with no page and no limit, so `rows()` holds the whole filtered result.
pub trait Export: Send {
	/// Label shown in the export selector
	fn title(&self) -> &str;

	/// Role required to see the export, if any
	fn role(&self) -> Option<&str> {
		None
	}

	/// Reads the grid content and prepares the response body
	fn compute_data(&mut self, grid: &dyn GridData) -> Result<()>;

	/// Response built by the last `compute_data` call
	fn response(&self) -> Result<Response>;
}

/// Export handle shared between a grid and its clones
pub type SharedExport = Arc<Mutex<dyn Export>>;

/// Wraps an export into a [`SharedExport`]
pub fn shared_export<E: Export + 'static>(export: E) -> SharedExport {
	Arc::new(Mutex::new(export))
}

/// Title row and string cells of the exportable columns.
///
/// Exports build on this and only take care of the file encoding.
///
/// # Examples
///
/// ```
/// use datagrid_core::column::{Column, ColumnSet};
/// use datagrid_core::export::{ExportData, GridData};
/// use datagrid_core::row::{Row, RowSet};
/// use serde_json::json;
///
/// struct Loaded(ColumnSet, RowSet);
///
/// impl GridData for Loaded {
///     fn columns(&self) -> &ColumnSet { &self.0 }
///     fn rows(&self) -> &RowSet { &self.1 }
/// }
///
/// let mut columns = ColumnSet::new();
/// columns.add_column(Column::text("id").title("Id"), 0).unwrap();
/// columns.add_column(Column::text("name").title("Name"), 0).unwrap();
/// let rows = RowSet::from(vec![Row::from_fields([("id", json!(1)), ("name", json!("Ada"))])]);
///
/// let data = ExportData::from_grid(&Loaded(columns, rows));
/// assert_eq!(data.titles, vec!["Id", "Name"]);
/// assert_eq!(data.rows, vec![vec!["1".to_string(), "Ada".to_string()]]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportData {
	pub titles: Vec<String>,
	pub rows: Vec<Vec<String>>,
}

impl ExportData {
	/// Collects the visible, exportable data columns of `grid`
	pub fn from_grid(grid: &dyn GridData) -> Self {
		let columns = grid.columns();
		let exported: Vec<_> = columns
			.visible_columns()
			.filter(|c| c.is_exportable() && !c.column_type().is_structural())
			.collect();

		let titles = exported.iter().map(|c| c.get_title().to_string()).collect();
		let rows = grid
			.rows()
			.iter()
			.map(|row| {
				exported
					.iter()
					.map(|column| row.field(column.id()).map(cell_text).unwrap_or_default())
					.collect()
			})
			.collect();

		Self { titles, rows }
	}
}

/// Renders a cell value as plain text
pub fn cell_text(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(", "),
		other => other.to_string(),
	}
}
