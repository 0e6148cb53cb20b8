//! Ordered, id-unique collection of columns

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

use super::base::{Column, ColumnType};
use crate::error::{GridError, Result};
use crate::services::AuthorizationChecker;

/// Ordered collection of the columns of one grid.
///
/// Positions passed to [`ColumnSet::add_column`] are 1-based: `0` appends,
/// a positive value inserts before the column currently at that position and
/// a negative value counts from the end.
///
/// # Examples
///
/// ```
/// use datagrid_core::column::{Column, ColumnSet};
///
/// let mut columns = ColumnSet::new();
/// columns.add_column(Column::text("id").primary(true), 0).unwrap();
/// columns.add_column(Column::text("name"), 0).unwrap();
/// columns.add_column(Column::text("email"), 2).unwrap();
///
/// let ids: Vec<&str> = columns.iter().map(|c| c.id()).collect();
/// assert_eq!(ids, vec!["id", "email", "name"]);
/// assert_eq!(columns.primary_column().unwrap().id(), "id");
/// ```
#[derive(Clone, Default)]
pub struct ColumnSet {
	columns: Vec<Column>,
	extensions: IndexMap<String, Column>,
	authorization: Option<Arc<dyn AuthorizationChecker>>,
}

impl ColumnSet {
	/// Creates an empty set without role checks
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty set whose role-restricted columns are checked against
	/// `authorization`
	pub fn with_authorization(authorization: Arc<dyn AuthorizationChecker>) -> Self {
		Self {
			authorization: Some(authorization),
			..Self::default()
		}
	}

	/// Inserts a column at a 1-based position (0 appends, negative counts from
	/// the end).
	///
	/// # Errors
	///
	/// Returns [`GridError::InvalidArgument`] if a column with the same id exists.
	pub fn add_column(&mut self, column: Column, position: i32) -> Result<&mut Self> {
		if self.has_column(column.id()) {
			return Err(GridError::InvalidArgument(format!(
				"Column {} already exists",
				column.id()
			)));
		}

		let len = self.columns.len() as i32;
		let index = match position {
			0 => len,
			p if p > 0 => (p - 1).min(len),
			p => (len + p).max(0),
		};
		self.columns.insert(index as usize, column);
		Ok(self)
	}

	/// Returns the column with the given id.
	///
	/// # Errors
	///
	/// Returns [`GridError::InvalidArgument`] if no such column exists.
	pub fn column(&self, id: &str) -> Result<&Column> {
		self.find(id).ok_or_else(|| column_not_found(id))
	}

	/// Mutable variant of [`ColumnSet::column`]
	pub fn column_mut(&mut self, id: &str) -> Result<&mut Column> {
		self.columns
			.iter_mut()
			.find(|c| c.id() == id)
			.ok_or_else(|| column_not_found(id))
	}

	/// Returns the column with the given id, if present
	pub fn find(&self, id: &str) -> Option<&Column> {
		self.columns.iter().find(|c| c.id() == id)
	}

	pub fn has_column(&self, id: &str) -> bool {
		self.find(id).is_some()
	}

	/// Removes and returns a column
	pub fn remove_column(&mut self, id: &str) -> Option<Column> {
		let index = self.columns.iter().position(|c| c.id() == id)?;
		Some(self.columns.remove(index))
	}

	pub fn iter(&self) -> impl Iterator<Item = &Column> {
		self.columns.iter()
	}

	pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Column> {
		self.columns.iter_mut()
	}

	pub fn len(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}

	/// Column ids in display order
	pub fn ids(&self) -> Vec<String> {
		self.columns.iter().map(|c| c.id().to_string()).collect()
	}

	/// Columns backed by source data
	pub fn source_columns(&self) -> impl Iterator<Item = &Column> {
		self.columns.iter().filter(|c| c.is_visible_for_source())
	}

	/// Columns displayed to the current principal
	pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
		self.columns.iter().filter(|c| self.is_column_visible(c))
	}

	/// True if the column is displayed and its role, if any, is granted
	pub fn is_column_visible(&self, column: &Column) -> bool {
		if !column.is_visible() {
			return false;
		}
		match (column.get_role(), &self.authorization) {
			(None, _) => true,
			(Some(role), Some(authorization)) => authorization.is_granted(role),
			(Some(_), None) => false,
		}
	}

	/// Returns the primary-key column.
	///
	/// # Errors
	///
	/// Returns [`GridError::InvalidArgument`] when no column is primary.
	pub fn primary_column(&self) -> Result<&Column> {
		self.columns
			.iter()
			.find(|c| c.is_primary())
			.ok_or_else(|| GridError::InvalidArgument("Primary column must be defined".to_string()))
	}

	/// Reorders the columns.
	///
	/// Named columns come first in the given order. With `keep_others` the
	/// remaining columns follow in their original relative order, otherwise
	/// they are dropped. Unknown ids are ignored.
	pub fn set_columns_order(&mut self, ids: &[impl AsRef<str>], keep_others: bool) {
		let mut remaining = std::mem::take(&mut self.columns);
		let mut reordered = Vec::with_capacity(remaining.len());

		for id in ids {
			match remaining.iter().position(|c| c.id() == id.as_ref()) {
				Some(index) => reordered.push(remaining.remove(index)),
				None => trace!(column = id.as_ref(), "Ignoring unknown column in order"),
			}
		}
		if keep_others {
			reordered.append(&mut remaining);
		}
		self.columns = reordered;
	}

	/// Registers a prototype column for its type. Sources use it to build
	/// columns of custom types.
	pub fn add_extension(&mut self, extension: Column) -> &mut Self {
		let key = extension.column_type().as_str().to_ascii_lowercase();
		self.extensions.insert(key, extension);
		self
	}

	pub fn has_extension_for_type(&self, column_type: &str) -> bool {
		self.extensions.contains_key(&column_type.to_ascii_lowercase())
	}

	/// Returns the prototype registered for a type
	pub fn extension_for_type(&self, column_type: &str) -> Option<&Column> {
		self.extensions.get(&column_type.to_ascii_lowercase())
	}

	/// Instantiates the prototype registered for `column_type` under a new id
	pub fn column_from_extension(&self, column_type: &str, id: impl Into<String>) -> Option<Column> {
		self.extension_for_type(column_type).map(|prototype| {
			let mut column = prototype.clone();
			column.set_id(id);
			column
		})
	}

	/// True if any column is of the given type
	pub fn has_column_of_type(&self, column_type: &ColumnType) -> bool {
		self.columns.iter().any(|c| c.column_type() == column_type)
	}

	/// Structural hash: the concatenated column ids in display order.
	pub fn hash(&self) -> String {
		self.columns.iter().map(Column::id).collect()
	}
}

fn column_not_found(id: &str) -> GridError {
	GridError::InvalidArgument(format!("Column {} doesn't exist", id))
}

impl fmt::Debug for ColumnSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ColumnSet")
			.field("columns", &self.columns)
			.field("extensions", &self.extensions.keys().collect::<Vec<_>>())
			.field("authorization", &self.authorization.is_some())
			.finish()
	}
}

impl PartialEq for ColumnSet {
	fn eq(&self, other: &Self) -> bool {
		self.columns == other.columns && self.extensions == other.extensions
	}
}

impl<'a> IntoIterator for &'a ColumnSet {
	type Item = &'a Column;
	type IntoIter = std::slice::Iter<'a, Column>;

	fn into_iter(self) -> Self::IntoIter {
		self.columns.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::*;

	struct Grants(Vec<&'static str>);

	impl AuthorizationChecker for Grants {
		fn is_granted(&self, role: &str) -> bool {
			self.0.contains(&role)
		}
	}

	#[fixture]
	fn columns() -> ColumnSet {
		let mut columns = ColumnSet::new();
		for id in ["col1", "col2", "col3"] {
			columns.add_column(Column::text(id), 0).unwrap();
		}
		columns
	}

	#[rstest]
	#[case(0, vec!["col1", "col2", "col3", "new"])]
	#[case(1, vec!["new", "col1", "col2", "col3"])]
	#[case(3, vec!["col1", "col2", "new", "col3"])]
	#[case(10, vec!["col1", "col2", "col3", "new"])]
	#[case(-1, vec!["col1", "col2", "new", "col3"])]
	#[case(-10, vec!["new", "col1", "col2", "col3"])]
	fn test_add_column_positions(
		mut columns: ColumnSet,
		#[case] position: i32,
		#[case] expected: Vec<&str>,
	) {
		columns.add_column(Column::text("new"), position).unwrap();
		assert_eq!(columns.ids(), expected);
	}

	#[rstest]
	fn test_add_duplicate_column_fails(mut columns: ColumnSet) {
		let result = columns.add_column(Column::text("col2"), 0);
		assert!(matches!(result, Err(GridError::InvalidArgument(_))));
		assert_eq!(columns.len(), 3);
	}

	#[rstest]
	fn test_unknown_column_fails(columns: ColumnSet) {
		assert!(matches!(columns.column("foo"), Err(GridError::InvalidArgument(_))));
		assert!(!columns.has_column("foo"));
	}

	#[rstest]
	fn test_reorder_keeping_others(mut columns: ColumnSet) {
		columns.add_column(Column::text("col4"), 0).unwrap();
		columns.set_columns_order(&["col3", "col1"], true);
		assert_eq!(columns.ids(), vec!["col3", "col1", "col2", "col4"]);
	}

	#[rstest]
	fn test_reorder_dropping_others(mut columns: ColumnSet) {
		columns.set_columns_order(&["col3", "col1", "missing"], false);
		assert_eq!(columns.ids(), vec!["col3", "col1"]);
	}

	#[rstest]
	fn test_hash_follows_order(mut columns: ColumnSet) {
		assert_eq!(columns.hash(), "col1col2col3");
		columns.set_columns_order(&["col2"], true);
		assert_eq!(columns.hash(), "col2col1col3");
	}

	#[rstest]
	fn test_primary_column_required(mut columns: ColumnSet) {
		assert!(matches!(columns.primary_column(), Err(GridError::InvalidArgument(_))));

		columns.column_mut("col2").unwrap().set_primary(true);
		assert_eq!(columns.primary_column().unwrap().id(), "col2");
	}

	#[rstest]
	fn test_extension_prototype() {
		let mut columns = ColumnSet::new();
		columns.add_extension(Column::new("proto", ColumnType::Custom("rating".into())).size(40));

		assert!(columns.has_extension_for_type("Rating"));
		let column = columns.column_from_extension("rating", "stars").unwrap();
		assert_eq!(column.id(), "stars");
		assert_eq!(column.get_size(), 40);
		assert!(columns.column_from_extension("text", "x").is_none());
	}

	#[rstest]
	fn test_role_restricted_visibility() {
		let mut columns = ColumnSet::with_authorization(Arc::new(Grants(vec!["ROLE_ADMIN"])));
		columns.add_column(Column::text("public"), 0).unwrap();
		columns.add_column(Column::text("admin").role("ROLE_ADMIN"), 0).unwrap();
		columns.add_column(Column::text("super").role("ROLE_SUPER"), 0).unwrap();
		columns.add_column(Column::text("hidden").visible(false), 0).unwrap();

		let visible: Vec<&str> = columns.visible_columns().map(|c| c.id()).collect();
		assert_eq!(visible, vec!["public", "admin"]);
	}

	#[rstest]
	fn test_clone_is_independent(columns: ColumnSet) {
		let mut copy = columns.clone();
		assert_eq!(copy, columns);

		copy.column_mut("col1").unwrap().set_title("changed");
		assert_eq!(columns.column("col1").unwrap().get_title(), "");
	}
}
