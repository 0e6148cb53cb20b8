//! Template overrides

use datagrid_core::GridError;
use serde_json::Value;

use crate::keys::SELF_TEMPLATE_PREFIX;

/// Template a grid should be rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSpec {
	/// Loaded template, referenced by its name
	Handle(String),
	/// Template path resolved by the renderer
	Path(String),
}

impl TemplateSpec {
	pub fn handle(name: impl Into<String>) -> Self {
		TemplateSpec::Handle(name.into())
	}

	pub fn path(path: impl Into<String>) -> Self {
		TemplateSpec::Path(path.into())
	}

	/// Value persisted in the session: `__SELF__<name>` for handles, the path
	/// otherwise.
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_engine::template::TemplateSpec;
	///
	/// assert_eq!(TemplateSpec::handle("grid.html").stored_value(), "__SELF__grid.html");
	/// assert_eq!(TemplateSpec::path("admin/grid.html").stored_value(), "admin/grid.html");
	/// ```
	pub fn stored_value(&self) -> String {
		match self {
			TemplateSpec::Handle(name) => format!("{}{}", SELF_TEMPLATE_PREFIX, name),
			TemplateSpec::Path(path) => path.clone(),
		}
	}
}

impl From<&str> for TemplateSpec {
	fn from(path: &str) -> Self {
		TemplateSpec::Path(path.to_string())
	}
}

impl TryFrom<Value> for TemplateSpec {
	type Error = GridError;

	/// Only strings are usable as template paths.
	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::String(path) => Ok(TemplateSpec::Path(path)),
			other => Err(GridError::Template(format!(
				"Unable to load template {}",
				other
			))),
		}
	}
}
