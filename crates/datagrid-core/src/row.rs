//! Rows produced by a data source

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One record of the current page.
///
/// Field values are keyed by column id. The primary field names the column
/// whose value identifies the row for mass actions and row-action routes.
///
/// # Examples
///
/// ```
/// use datagrid_core::row::Row;
/// use serde_json::json;
///
/// let mut row = Row::new();
/// row.set_field("id", json!(3)).set_field("name", json!("Ada"));
/// row.set_primary_field("id");
///
/// assert_eq!(row.primary_field_value(), Some(&json!(3)));
/// assert_eq!(row.field("name"), Some(&json!("Ada")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
	fields: IndexMap<String, Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	primary_field: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	class: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	color: Option<String>,
}

impl Row {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a row from `(column id, value)` pairs
	pub fn from_fields<I, K>(fields: I) -> Self
	where
		I: IntoIterator<Item = (K, Value)>,
		K: Into<String>,
	{
		Self {
			fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
			..Self::default()
		}
	}

	pub fn set_field(&mut self, column_id: impl Into<String>, value: Value) -> &mut Self {
		self.fields.insert(column_id.into(), value);
		self
	}

	pub fn field(&self, column_id: &str) -> Option<&Value> {
		self.fields.get(column_id)
	}

	pub fn fields(&self) -> &IndexMap<String, Value> {
		&self.fields
	}

	pub fn set_primary_field(&mut self, column_id: impl Into<String>) {
		self.primary_field = Some(column_id.into());
	}

	pub fn primary_field(&self) -> Option<&str> {
		self.primary_field.as_deref()
	}

	/// Value of the primary field, if one was set and the row carries it
	pub fn primary_field_value(&self) -> Option<&Value> {
		self.primary_field
			.as_deref()
			.and_then(|id| self.fields.get(id))
	}

	/// CSS class applied to the rendered row
	pub fn set_class(&mut self, class: impl Into<String>) {
		self.class = Some(class.into());
	}

	pub fn class(&self) -> Option<&str> {
		self.class.as_deref()
	}

	pub fn set_color(&mut self, color: impl Into<String>) {
		self.color = Some(color.into());
	}

	pub fn color(&self) -> Option<&str> {
		self.color.as_deref()
	}
}

/// Ordered rows of the current page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowSet {
	rows: Vec<Row>,
}

impl RowSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, row: Row) {
		self.rows.push(row);
	}

	pub fn get(&self, index: usize) -> Option<&Row> {
		self.rows.get(index)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Row> {
		self.rows.iter()
	}

	pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Row> {
		self.rows.iter_mut()
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Primary-key values of every row that has one
	pub fn primary_keys(&self) -> Vec<Value> {
		self.rows
			.iter()
			.filter_map(|row| row.primary_field_value().cloned())
			.collect()
	}
}

impl From<Vec<Row>> for RowSet {
	fn from(rows: Vec<Row>) -> Self {
		Self { rows }
	}
}

impl FromIterator<Row> for RowSet {
	fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
		Self {
			rows: iter.into_iter().collect(),
		}
	}
}

impl IntoIterator for RowSet {
	type Item = Row;
	type IntoIter = std::vec::IntoIter<Row>;

	fn into_iter(self) -> Self::IntoIter {
		self.rows.into_iter()
	}
}

impl<'a> IntoIterator for &'a RowSet {
	type Item = &'a Row;
	type IntoIter = std::slice::Iter<'a, Row>;

	fn into_iter(self) -> Self::IntoIter {
		self.rows.iter()
	}
}
