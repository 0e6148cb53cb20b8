//! The request as seen by a grid
//!
//! [`GridRequest`] is the narrow view of an HTTP request a grid needs: its
//! session, the parameters posted under the grid's hash, a few headers and
//! the URL parts used to detect navigation from another page.
//! [`HttpGridRequest`] implements it over [`http::request::Parts`].

use http::HeaderMap;
use http::Uri;
use http::request::Parts;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::session::SessionStore;

/// Request header set by front-end JS on asynchronous calls
pub const XML_HTTP_REQUEST_HEADER: &str = "x-requested-with";

/// Request consumed by a grid.
pub trait GridRequest: Send + Sync {
	/// Session of the visitor, if the request carries one
	fn session(&self) -> Option<Arc<dyn SessionStore>>;

	/// Parameters submitted under `hash` (`hash[_page]=2`, `hash[name][from]=a`, ...)
	fn grid_parameters(&self, hash: &str) -> Option<Map<String, Value>>;

	/// Routing attribute such as `_controller` or `_route`
	fn attribute(&self, name: &str) -> Option<Value>;

	fn is_xml_http_request(&self) -> bool;

	/// Header value by case-insensitive name
	fn header(&self, name: &str) -> Option<String>;

	fn scheme(&self) -> String;

	/// Host, with the port when it is not the default one
	fn http_host(&self) -> String;

	/// Path prefix the application is mounted under
	fn base_url(&self) -> String;

	/// Path below the base URL
	fn path_info(&self) -> String;
}

/// [`GridRequest`] over the parts of an `http` request.
///
/// Query and form keys use bracket notation; they are expanded into nested
/// JSON objects, with `[]` appending to an array. Query values win over form
/// values under the same top-level key.
///
/// # Examples
///
/// ```
/// use datagrid_core::request::{GridRequest, HttpGridRequest};
/// use serde_json::json;
///
/// let request = http::Request::builder()
///     .uri("https://example.com/admin/users?grid_users[_page]=2&grid_users[name][from]=ada")
///     .header("X-Requested-With", "XMLHttpRequest")
///     .body(())
///     .unwrap();
/// let (parts, _) = request.into_parts();
/// let request = HttpGridRequest::from_parts(parts, None).with_base_url("/admin");
///
/// let parameters = request.grid_parameters("grid_users").unwrap();
/// assert_eq!(parameters["_page"], json!("2"));
/// assert_eq!(parameters["name"], json!({"from": "ada"}));
/// assert!(request.is_xml_http_request());
/// assert_eq!(request.path_info(), "/users");
/// ```
#[derive(Clone)]
pub struct HttpGridRequest {
	uri: Uri,
	headers: HeaderMap,
	parameters: Map<String, Value>,
	attributes: IndexMap<String, Value>,
	base_url: String,
	session: Option<Arc<dyn SessionStore>>,
}

impl HttpGridRequest {
	/// Builds the request from its head and an optional
	/// `application/x-www-form-urlencoded` body.
	pub fn from_parts(parts: Parts, form_body: Option<&[u8]>) -> Self {
		let mut parameters = form_body.map(parse_parameters).unwrap_or_default();
		if let Some(query) = parts.uri.query() {
			for (key, value) in parse_parameters(query.as_bytes()) {
				parameters.insert(key, value);
			}
		}

		Self {
			uri: parts.uri,
			headers: parts.headers,
			parameters,
			attributes: IndexMap::new(),
			base_url: String::new(),
			session: None,
		}
	}

	pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
		self.session = Some(session);
		self
	}

	/// Sets a routing attribute (`_controller`, `_route`, ...)
	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}

	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	/// Every decoded parameter, keyed by top-level name
	pub fn parameters(&self) -> &Map<String, Value> {
		&self.parameters
	}
}

impl GridRequest for HttpGridRequest {
	fn session(&self) -> Option<Arc<dyn SessionStore>> {
		self.session.clone()
	}

	fn grid_parameters(&self, hash: &str) -> Option<Map<String, Value>> {
		match self.parameters.get(hash) {
			Some(Value::Object(map)) => Some(map.clone()),
			_ => None,
		}
	}

	fn attribute(&self, name: &str) -> Option<Value> {
		self.attributes.get(name).cloned()
	}

	fn is_xml_http_request(&self) -> bool {
		self.headers
			.get(XML_HTTP_REQUEST_HEADER)
			.and_then(|v| v.to_str().ok())
			.is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
	}

	fn header(&self, name: &str) -> Option<String> {
		self.headers
			.get(name)
			.and_then(|v| v.to_str().ok())
			.map(str::to_string)
	}

	fn scheme(&self) -> String {
		self.uri.scheme_str().unwrap_or("http").to_string()
	}

	fn http_host(&self) -> String {
		if let Some(host) = self.header(http::header::HOST.as_str()) {
			return host;
		}
		self.uri
			.authority()
			.map(|authority| authority.as_str().to_string())
			.unwrap_or_default()
	}

	fn base_url(&self) -> String {
		self.base_url.clone()
	}

	fn path_info(&self) -> String {
		let path = self.uri.path();
		let path = path.strip_prefix(self.base_url.as_str()).unwrap_or(path);
		if path.is_empty() {
			"/".to_string()
		} else {
			path.to_string()
		}
	}
}

impl fmt::Debug for HttpGridRequest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HttpGridRequest")
			.field("uri", &self.uri)
			.field("parameters", &self.parameters)
			.field("attributes", &self.attributes)
			.field("base_url", &self.base_url)
			.field("session", &self.session.is_some())
			.finish()
	}
}

/// Decodes `application/x-www-form-urlencoded` input with bracketed keys
/// into a JSON object.
pub fn parse_parameters(input: &[u8]) -> Map<String, Value> {
	let mut root = Value::Object(Map::new());
	for (key, value) in url::form_urlencoded::parse(input) {
		let segments = split_key(&key);
		insert_value(&mut root, &segments, value.into_owned());
	}
	match root {
		Value::Object(map) => map,
		_ => Map::new(),
	}
}

fn split_key(key: &str) -> Vec<String> {
	let open = match key.find('[') {
		Some(open) if open > 0 => open,
		_ => return vec![key.to_string()],
	};

	let mut segments = vec![key[..open].to_string()];
	let mut rest = &key[open..];
	while let Some(inner) = rest.strip_prefix('[') {
		match inner.find(']') {
			Some(close) => {
				segments.push(inner[..close].to_string());
				rest = &inner[close + 1..];
			}
			None => break,
		}
	}
	segments
}

fn insert_value(slot: &mut Value, segments: &[String], value: String) {
	let Some((segment, rest)) = segments.split_first() else {
		*slot = Value::String(value);
		return;
	};

	if segment.is_empty() {
		if !slot.is_array() {
			*slot = Value::Array(Vec::new());
		}
		if let Value::Array(items) = slot {
			items.push(Value::Null);
			if let Some(last) = items.last_mut() {
				insert_value(last, rest, value);
			}
		}
	} else {
		if !slot.is_object() {
			*slot = Value::Object(Map::new());
		}
		if let Value::Object(map) = slot {
			let child = map.entry(segment.clone()).or_insert(Value::Null);
			insert_value(child, rest, value);
		}
	}
}
