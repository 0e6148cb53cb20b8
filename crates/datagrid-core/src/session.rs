//! Session storage used to persist grid state between requests

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

/// Key/value session storage of the current visitor.
///
/// Implementations are expected to be internally synchronized; a grid reads
/// and writes its own entry at most a few times per request.
pub trait SessionStore: Send + Sync {
	/// Get a value from the session
	fn get(&self, key: &str) -> Option<Value>;

	/// Set a value in the session
	fn set(&self, key: &str, value: Value);

	/// Remove a value from the session
	fn remove(&self, key: &str);
}

/// In-memory session for testing and development
///
/// # Examples
///
/// ```
/// use datagrid_core::session::{InMemorySession, SessionStore};
/// use serde_json::json;
///
/// let session = InMemorySession::new();
/// session.set("grid_users", json!({"_page": 2}));
/// assert_eq!(session.get("grid_users"), Some(json!({"_page": 2})));
///
/// session.remove("grid_users");
/// assert!(session.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemorySession {
	data: RwLock<HashMap<String, Value>>,
}

impl InMemorySession {
	pub fn new() -> Self {
		Self::default()
	}

	/// Check if session is empty
	pub fn is_empty(&self) -> bool {
		self.data.read().is_empty()
	}

	/// Keys currently stored
	pub fn keys(&self) -> Vec<String> {
		self.data.read().keys().cloned().collect()
	}
}

impl SessionStore for InMemorySession {
	fn get(&self, key: &str) -> Option<Value> {
		self.data.read().get(key).cloned()
	}

	fn set(&self, key: &str, value: Value) {
		self.data.write().insert(key.to_string(), value);
	}

	fn remove(&self, key: &str) {
		self.data.write().remove(key);
	}
}
