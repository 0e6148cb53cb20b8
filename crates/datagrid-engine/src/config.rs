//! Deferred grid configuration
//!
//! A [`GridConfig`] is handed to [`Grid::new`](crate::Grid::new) and applied by
//! [`Grid::initialize`](crate::Grid::initialize). It can be built in code or
//! loaded from TOML:
//!
//! ```toml
//! persisted = true
//! route = "user_list"
//! sort_by = "name"
//! order = "DESC"
//! max_per_page = [10, 50, 100]
//! group_by = "account"
//!
//! [route_parameters]
//! account = 12
//! ```

use datagrid_core::{GridError, Result, SharedSource};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Allowed page sizes.
///
/// Converted to an ordered map of page size to display label:
/// a single size `10` gives `{10: "10"}`, a list `[10, 50]` gives
/// `{10: "10", 50: "50"}` and a labelled map is kept as is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub enum LimitsSpec {
	Single(usize),
	List(Vec<usize>),
	Labeled(IndexMap<usize, String>),
}

impl LimitsSpec {
	/// Page size to label map
	pub fn into_limits(self) -> IndexMap<usize, String> {
		match self {
			LimitsSpec::Single(limit) => IndexMap::from([(limit, limit.to_string())]),
			LimitsSpec::List(limits) => limits.into_iter().map(|l| (l, l.to_string())).collect(),
			LimitsSpec::Labeled(limits) => limits,
		}
	}
}

impl From<usize> for LimitsSpec {
	fn from(limit: usize) -> Self {
		LimitsSpec::Single(limit)
	}
}

impl From<Vec<usize>> for LimitsSpec {
	fn from(limits: Vec<usize>) -> Self {
		LimitsSpec::List(limits)
	}
}

impl<const N: usize> From<[usize; N]> for LimitsSpec {
	fn from(limits: [usize; N]) -> Self {
		LimitsSpec::List(limits.to_vec())
	}
}

impl From<IndexMap<usize, String>> for LimitsSpec {
	fn from(limits: IndexMap<usize, String>) -> Self {
		LimitsSpec::Labeled(limits)
	}
}

impl TryFrom<Value> for LimitsSpec {
	type Error = GridError;

	/// Accepts an integer, a list of integers, or an object keyed by integers
	/// whose values are labels.
	fn try_from(value: Value) -> Result<Self> {
		match value {
			Value::Number(n) => n.as_u64().map(|l| LimitsSpec::Single(l as usize)).ok_or_else(not_valid_limit),
			Value::Array(items) => items
				.iter()
				.map(|item| item.as_u64().map(|l| l as usize))
				.collect::<Option<Vec<_>>>()
				.map(LimitsSpec::List)
				.ok_or_else(not_valid_limit),
			Value::Object(map) => {
				let mut limits = IndexMap::new();
				for (key, label) in map {
					let limit = key.parse::<usize>().map_err(|_| not_valid_limit())?;
					let label = match label {
						Value::String(s) => s,
						other => other.to_string(),
					};
					limits.insert(limit, label);
				}
				Ok(LimitsSpec::Labeled(limits))
			}
			_ => Err(not_valid_limit()),
		}
	}
}

fn not_valid_limit() -> GridError {
	GridError::InvalidArgument("Limit has to be array or integer".to_string())
}

/// Group-by fields of an entity source: one field or several.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum GroupBy {
	Single(String),
	Many(Vec<String>),
}

impl GroupBy {
	pub fn into_vec(self) -> Vec<String> {
		match self {
			GroupBy::Single(field) => vec![field],
			GroupBy::Many(fields) => fields,
		}
	}
}

impl From<&str> for GroupBy {
	fn from(field: &str) -> Self {
		GroupBy::Single(field.to_string())
	}
}

impl From<Vec<String>> for GroupBy {
	fn from(fields: Vec<String>) -> Self {
		GroupBy::Many(fields)
	}
}

/// Configuration applied once by [`Grid::initialize`](crate::Grid::initialize).
///
/// # Examples
///
/// ```
/// use datagrid_engine::config::{GridConfig, LimitsSpec};
///
/// let config = GridConfig::from_toml_str(r#"
///     persisted = true
///     sort_by = "name"
///     max_per_page = 20
/// "#).unwrap();
///
/// assert!(config.persisted);
/// assert!(config.filterable);
/// assert_eq!(config.max_per_page, Some(LimitsSpec::Single(20)));
/// ```
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
	pub persisted: bool,
	pub route: Option<String>,
	pub route_parameters: IndexMap<String, Value>,
	/// When false, no column of the grid can be filtered
	pub filterable: bool,
	/// When false, no column of the grid can be sorted
	pub sortable: bool,
	pub group_by: Option<GroupBy>,
	pub sort_by: Option<String>,
	pub order: Option<String>,
	pub max_per_page: Option<LimitsSpec>,
	pub max_results: Option<i64>,
	pub page: Option<i64>,
	#[serde(skip)]
	pub source: Option<SharedSource>,
}

impl Default for GridConfig {
	fn default() -> Self {
		Self {
			persisted: false,
			route: None,
			route_parameters: IndexMap::new(),
			filterable: true,
			sortable: true,
			group_by: None,
			sort_by: None,
			order: None,
			max_per_page: None,
			max_results: None,
			page: None,
			source: None,
		}
	}
}

impl GridConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a configuration from TOML.
	///
	/// # Errors
	///
	/// Returns [`GridError::InvalidArgument`] for malformed TOML or values of
	/// the wrong shape, such as `max_per_page = "foo"`.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		toml::from_str(input)
			.map_err(|e| GridError::InvalidArgument(format!("Invalid grid configuration: {}", e)))
	}

	pub fn source(mut self, source: SharedSource) -> Self {
		self.source = Some(source);
		self
	}

	pub fn persisted(mut self, persisted: bool) -> Self {
		self.persisted = persisted;
		self
	}

	pub fn route(mut self, route: impl Into<String>) -> Self {
		self.route = Some(route.into());
		self
	}

	pub fn route_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.route_parameters.insert(name.into(), value.into());
		self
	}

	pub fn filterable(mut self, filterable: bool) -> Self {
		self.filterable = filterable;
		self
	}

	pub fn sortable(mut self, sortable: bool) -> Self {
		self.sortable = sortable;
		self
	}

	pub fn group_by(mut self, group_by: impl Into<GroupBy>) -> Self {
		self.group_by = Some(group_by.into());
		self
	}

	pub fn sort_by(mut self, column_id: impl Into<String>) -> Self {
		self.sort_by = Some(column_id.into());
		self
	}

	pub fn order(mut self, order: impl Into<String>) -> Self {
		self.order = Some(order.into());
		self
	}

	pub fn max_per_page(mut self, limits: impl Into<LimitsSpec>) -> Self {
		self.max_per_page = Some(limits.into());
		self
	}

	pub fn max_results(mut self, max_results: i64) -> Self {
		self.max_results = Some(max_results);
		self
	}

	pub fn page(mut self, page: i64) -> Self {
		self.page = Some(page);
		self
	}
}

impl fmt::Debug for GridConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GridConfig")
			.field("persisted", &self.persisted)
			.field("route", &self.route)
			.field("route_parameters", &self.route_parameters)
			.field("filterable", &self.filterable)
			.field("sortable", &self.sortable)
			.field("group_by", &self.group_by)
			.field("sort_by", &self.sort_by)
			.field("order", &self.order)
			.field("max_per_page", &self.max_per_page)
			.field("max_results", &self.max_results)
			.field("page", &self.page)
			.field("source", &self.source.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(10), IndexMap::from([(10, "10".to_string())]))]
	#[case(json!([10, 50, 100]), IndexMap::from([(10, "10".to_string()), (50, "50".to_string()), (100, "100".to_string())]))]
	#[case(json!({"10": "ten", "25": "quarter"}), IndexMap::from([(10, "ten".to_string()), (25, "quarter".to_string())]))]
	fn test_limits_from_value(#[case] value: Value, #[case] expected: IndexMap<usize, String>) {
		let limits = LimitsSpec::try_from(value).unwrap().into_limits();
		assert_eq!(limits, expected);
	}

	#[rstest]
	#[case(json!("foo"))]
	#[case(json!(-5))]
	#[case(json!([10, "x"]))]
	#[case(json!({"ten": "10"}))]
	#[case(json!(true))]
	fn test_limits_rejects_invalid_values(#[case] value: Value) {
		let result = LimitsSpec::try_from(value);
		assert!(matches!(result, Err(GridError::InvalidArgument(_))));
	}

	#[rstest]
	fn test_toml_configuration() {
		let config = GridConfig::from_toml_str(
			r#"
			persisted = true
			route = "user_list"
			filterable = false
			sort_by = "name"
			order = "DESC"
			max_per_page = [10, 50]
			max_results = 500
			page = 2
			group_by = ["account", "region"]

			[route_parameters]
			account = 12
			"#,
		)
		.unwrap();

		assert!(config.persisted);
		assert_eq!(config.route.as_deref(), Some("user_list"));
		assert!(!config.filterable);
		assert!(config.sortable);
		assert_eq!(config.order.as_deref(), Some("DESC"));
		assert_eq!(config.max_per_page, Some(LimitsSpec::List(vec![10, 50])));
		assert_eq!(config.max_results, Some(500));
		assert_eq!(config.page, Some(2));
		assert_eq!(
			config.group_by.map(GroupBy::into_vec),
			Some(vec!["account".to_string(), "region".to_string()])
		);
		assert_eq!(config.route_parameters.get("account"), Some(&json!(12)));
		assert!(config.source.is_none());
	}

	#[rstest]
	fn test_toml_rejects_string_limits() {
		let result = GridConfig::from_toml_str(r#"max_per_page = "foo""#);
		assert!(matches!(result, Err(GridError::InvalidArgument(_))));
	}

	#[rstest]
	fn test_scalar_group_by_is_wrapped() {
		assert_eq!(GroupBy::from("account").into_vec(), vec!["account".to_string()]);
	}
}
