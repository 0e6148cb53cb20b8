//! Tweaks: named presets of grid state

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Settings applied when a tweak is selected.
///
/// # Examples
///
/// ```
/// use datagrid_engine::tweak::TweakSpec;
/// use serde_json::json;
///
/// let spec = TweakSpec::new()
///     .filter("status", json!("active"))
///     .order("created|desc")
///     .limit(50);
///
/// assert_eq!(spec.order.as_deref(), Some("created|desc"));
/// assert!(!spec.reset);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweakSpec {
	/// Clears the persisted grid state first
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub reset: bool,
	/// Filters by column id, replacing the default filters
	#[serde(skip_serializing_if = "Option::is_none")]
	pub filters: Option<IndexMap<String, Value>>,
	/// `<columnId>|<asc|desc>`
	#[serde(skip_serializing_if = "Option::is_none")]
	pub order: Option<String>,
	/// Ordinal of a mass action to run
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mass_action: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub limit: Option<usize>,
	/// Ordinal of an export to run
	#[serde(skip_serializing_if = "Option::is_none")]
	pub export: Option<i64>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub remove_active_tweaks_groups: Vec<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub remove_active_tweaks: Vec<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub add_active_tweaks: Vec<String>,
}

impl TweakSpec {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn reset(mut self) -> Self {
		self.reset = true;
		self
	}

	pub fn filter(mut self, column_id: impl Into<String>, value: Value) -> Self {
		self.filters
			.get_or_insert_with(IndexMap::new)
			.insert(column_id.into(), value);
		self
	}

	pub fn order(mut self, order: impl Into<String>) -> Self {
		self.order = Some(order.into());
		self
	}

	pub fn mass_action(mut self, index: i64) -> Self {
		self.mass_action = Some(index);
		self
	}

	/// Zero-based page
	pub fn page(mut self, page: i64) -> Self {
		self.page = Some(page);
		self
	}

	pub fn limit(mut self, limit: usize) -> Self {
		self.limit = Some(limit);
		self
	}

	pub fn export(mut self, index: i64) -> Self {
		self.export = Some(index);
		self
	}

	pub fn remove_active_tweaks_group(mut self, group: impl Into<String>) -> Self {
		self.remove_active_tweaks_groups.push(group.into());
		self
	}

	pub fn remove_active_tweak(mut self, id: impl Into<String>) -> Self {
		self.remove_active_tweaks.push(id.into());
		self
	}

	pub fn add_active_tweak(mut self, id: impl Into<String>) -> Self {
		self.add_active_tweaks.push(id.into());
		self
	}

	/// True when applying the tweak changes which rows are shown, which makes
	/// it the active tweak of its group
	pub fn changes_state(&self) -> bool {
		self.filters.is_some() || self.order.is_some() || self.page.is_some() || self.limit.is_some()
	}
}

/// A registered tweak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweak {
	pub title: String,
	/// Explicit id; `None` when the grid assigned a numeric key
	pub id: Option<String>,
	pub group: Option<String>,
	#[serde(flatten)]
	pub spec: TweakSpec,
}

impl Tweak {
	/// Group key used in the active-tweaks map; ungrouped tweaks share the
	/// empty group.
	pub fn group_key(&self) -> &str {
		self.group.as_deref().unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_serialized_tweak_is_flat() {
		let tweak = Tweak {
			title: "Active".to_string(),
			id: Some("active".to_string()),
			group: Some("status".to_string()),
			spec: TweakSpec::new().filter("status", json!("1")).page(0),
		};

		assert_eq!(
			serde_json::to_value(&tweak).unwrap(),
			json!({
				"title": "Active",
				"id": "active",
				"group": "status",
				"filters": {"status": "1"},
				"page": 0
			})
		);
	}

	#[rstest]
	#[case(TweakSpec::new().order("a|asc"), true)]
	#[case(TweakSpec::new().limit(10), true)]
	#[case(TweakSpec::new().export(0), false)]
	#[case(TweakSpec::new().reset(), false)]
	fn test_changes_state(#[case] spec: TweakSpec, #[case] expected: bool) {
		assert_eq!(spec.changes_state(), expected);
	}

	#[rstest]
	fn test_ungrouped_key() {
		let tweak = Tweak {
			title: "t".to_string(),
			id: None,
			group: None,
			spec: TweakSpec::default(),
		};
		assert_eq!(tweak.group_key(), "");
	}
}
