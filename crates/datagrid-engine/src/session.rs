//! Typed record of the state a grid persists in the session

use datagrid_core::{FilterData, SessionStore};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// State of one grid, stored in the session under the grid hash.
///
/// Serialized as a flat object: the reserved keys `_page`, `_limit`,
/// `_order`, `_template` and `tweaks`, plus one entry per filtered column.
///
/// # Examples
///
/// ```
/// use datagrid_engine::session::SessionData;
/// use datagrid_core::FilterData;
/// use serde_json::json;
///
/// let mut data = SessionData::default();
/// data.page = Some(0);
/// data.order = Some("name|desc".to_string());
/// data.set_filter("name", Some(FilterData::value("Ada")));
///
/// assert_eq!(
///     data.to_value().unwrap(),
///     json!({"_page": 0, "_order": "name|desc", "name": {"from": "Ada"}})
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
	#[serde(rename = "_page", default, skip_serializing_if = "Option::is_none")]
	pub page: Option<usize>,
	#[serde(rename = "_limit", default, skip_serializing_if = "Option::is_none")]
	pub limit: Option<usize>,
	#[serde(rename = "_order", default, skip_serializing_if = "Option::is_none")]
	pub order: Option<String>,
	#[serde(rename = "_template", default, skip_serializing_if = "Option::is_none")]
	pub template: Option<String>,
	/// Active tweak id per tweak group
	#[serde(rename = "tweaks", default, skip_serializing_if = "IndexMap::is_empty")]
	pub active_tweaks: IndexMap<String, String>,
	/// Filter data per column id
	#[serde(flatten)]
	pub filters: IndexMap<String, FilterData>,
}

impl SessionData {
	/// Decodes the record read from the session. Data that does not match the
	/// schema is discarded.
	pub fn from_session(hash: &str, value: Option<Value>) -> Self {
		match value {
			None | Some(Value::Null) => Self::default(),
			Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
				warn!(grid = %hash, error = %e, "Discarding unreadable grid session data");
				Self::default()
			}),
		}
	}

	/// Loads the record stored under `hash`
	pub fn load(session: &dyn SessionStore, hash: &str) -> Self {
		Self::from_session(hash, session.get(hash))
	}

	/// Serializes the record for the session store
	pub fn to_value(&self) -> serde_json::Result<Value> {
		serde_json::to_value(self)
	}

	pub fn is_empty(&self) -> bool {
		self == &Self::default()
	}

	/// True when the record carries a template and no other state
	pub fn is_template_only(&self) -> bool {
		self.template.is_some()
			&& self.page.is_none()
			&& self.limit.is_none()
			&& self.order.is_none()
			&& self.active_tweaks.is_empty()
			&& self.filters.is_empty()
	}

	/// Stores or clears the filter of a column.
	///
	/// `None` leaves the record untouched. A filter whose operands were
	/// submitted blank removes the column entry.
	pub fn set_filter(&mut self, column_id: &str, data: Option<FilterData>) {
		match data {
			None => {}
			Some(data) if data.is_empty_range() => {
				self.filters.shift_remove(column_id);
			}
			Some(data) => {
				self.filters.insert(column_id.to_string(), data);
			}
		}
	}

	pub fn filter(&self, column_id: &str) -> Option<&FilterData> {
		self.filters.get(column_id)
	}
}
