//! Filter state attached to columns

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::GridError;

/// Comparison operator applied by a column filter.
///
/// The serialized names are part of the wire contract with the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
	#[serde(rename = "eq")]
	Eq,
	#[serde(rename = "neq")]
	Neq,
	#[serde(rename = "lt")]
	Lt,
	#[serde(rename = "lte")]
	Lte,
	#[serde(rename = "gt")]
	Gt,
	#[serde(rename = "gte")]
	Gte,
	/// Between, bounds excluded
	#[serde(rename = "btw")]
	Btw,
	/// Between, bounds included
	#[serde(rename = "btwe")]
	Btwe,
	#[serde(rename = "like")]
	Like,
	#[serde(rename = "nlike")]
	NotLike,
	#[serde(rename = "rlike")]
	RightLike,
	#[serde(rename = "llike")]
	LeftLike,
	/// Case-sensitive variants
	#[serde(rename = "slike")]
	StrictLike,
	#[serde(rename = "nslike")]
	NotStrictLike,
	#[serde(rename = "rslike")]
	RightStrictLike,
	#[serde(rename = "lslike")]
	LeftStrictLike,
	#[serde(rename = "isNull")]
	IsNull,
	#[serde(rename = "isNotNull")]
	IsNotNull,
}

impl Operator {
	/// Returns the wire name of the operator
	pub fn as_str(&self) -> &'static str {
		match self {
			Operator::Eq => "eq",
			Operator::Neq => "neq",
			Operator::Lt => "lt",
			Operator::Lte => "lte",
			Operator::Gt => "gt",
			Operator::Gte => "gte",
			Operator::Btw => "btw",
			Operator::Btwe => "btwe",
			Operator::Like => "like",
			Operator::NotLike => "nlike",
			Operator::RightLike => "rlike",
			Operator::LeftLike => "llike",
			Operator::StrictLike => "slike",
			Operator::NotStrictLike => "nslike",
			Operator::RightStrictLike => "rslike",
			Operator::LeftStrictLike => "lslike",
			Operator::IsNull => "isNull",
			Operator::IsNotNull => "isNotNull",
		}
	}

	/// Operators that match without any operand
	pub fn is_unary(&self) -> bool {
		matches!(self, Operator::IsNull | Operator::IsNotNull)
	}
}

impl fmt::Display for Operator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// How the filters of several columns are combined by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataJunction {
	/// Every filter must match
	#[default]
	And,
	/// At least one filter must match
	Or,
}

/// Sort direction of an ordered column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
	Asc,
	Desc,
}

impl SortDirection {
	/// Returns the wire name of the direction
	pub fn as_str(&self) -> &'static str {
		match self {
			SortDirection::Asc => "asc",
			SortDirection::Desc => "desc",
		}
	}
}

impl FromStr for SortDirection {
	type Err = GridError;

	/// Parses `asc` / `desc`, case-insensitively.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"asc" => Ok(SortDirection::Asc),
			"desc" => Ok(SortDirection::Desc),
			other => Err(GridError::InvalidArgument(format!(
				"Supported orders are asc and desc, {} given.",
				other
			))),
		}
	}
}

impl fmt::Display for SortDirection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Filter value of one column, as submitted by the filter form and persisted
/// in the session.
///
/// # Examples
///
/// ```
/// use datagrid_core::column::{FilterData, Operator};
/// use serde_json::json;
///
/// let filter = FilterData::value("Alice");
/// assert_eq!(filter.from, Some(json!("Alice")));
/// assert!(filter.is_active());
///
/// let empty = FilterData::range("", "");
/// assert!(empty.is_empty_range());
///
/// let null = FilterData::with_operator(Operator::IsNull);
/// assert!(null.is_active());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterData {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub operator: Option<Operator>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to: Option<Value>,
}

impl FilterData {
	/// Filter on a single value
	pub fn value(from: impl Into<Value>) -> Self {
		Self {
			operator: None,
			from: Some(from.into()),
			to: None,
		}
	}

	/// Filter on a range of values
	pub fn range(from: impl Into<Value>, to: impl Into<Value>) -> Self {
		Self {
			operator: None,
			from: Some(from.into()),
			to: Some(to.into()),
		}
	}

	/// Filter with an operator and no operand yet
	pub fn with_operator(operator: Operator) -> Self {
		Self {
			operator: Some(operator),
			from: None,
			to: None,
		}
	}

	/// Sets the operator
	pub fn operator(mut self, operator: Operator) -> Self {
		self.operator = Some(operator);
		self
	}

	/// Builds filter data from a raw request or configuration value.
	///
	/// Objects are read as `{operator, from, to}`; any other value becomes the
	/// `from` operand. Booleans are stored as `"1"` / `"0"`.
	pub fn from_value(value: Value) -> Self {
		let data = match value {
			Value::Object(ref map)
				if map.contains_key("from")
					|| map.contains_key("to")
					|| map.contains_key("operator") =>
			{
				serde_json::from_value(value.clone()).unwrap_or_else(|_| FilterData {
					operator: map
						.get("operator")
						.and_then(|op| serde_json::from_value(op.clone()).ok()),
					from: map.get("from").cloned(),
					to: map.get("to").cloned(),
				})
			}
			other => FilterData {
				operator: None,
				from: Some(other),
				to: None,
			},
		};
		data.normalize_booleans()
	}

	fn normalize_booleans(mut self) -> Self {
		if let Some(Value::Bool(flag)) = self.from {
			self.from = Some(Value::String(if flag { "1" } else { "0" }.to_string()));
		}
		self
	}

	/// True when the lower bound was submitted blank and no upper bound was
	/// given, which clears the filter. Unary operators never clear.
	pub fn is_empty_range(&self) -> bool {
		if self.operator.is_some_and(|op| op.is_unary()) {
			return false;
		}
		is_blank_operand(self.from.as_ref()) && !has_operand(self.to.as_ref())
	}

	/// True when the filter restricts the data set.
	pub fn is_active(&self) -> bool {
		if self.operator.is_some_and(|op| op.is_unary()) {
			return true;
		}
		has_operand(self.from.as_ref()) || has_operand(self.to.as_ref())
	}
}

fn is_blank_operand(value: Option<&Value>) -> bool {
	match value {
		Some(Value::String(s)) => s.is_empty(),
		Some(Value::Array(items)) => matches!(items.first(), Some(Value::String(s)) if s.is_empty()),
		_ => false,
	}
}

fn has_operand(value: Option<&Value>) -> bool {
	match value {
		None | Some(Value::Null) => false,
		Some(Value::String(s)) => !s.is_empty(),
		Some(Value::Array(items)) => items.iter().any(|item| has_operand(Some(item))),
		Some(_) => true,
	}
}
