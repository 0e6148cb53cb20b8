//! Collaborators injected into a grid
//!
//! A grid never looks services up by name. Everything it talks to is handed
//! over once, at construction, through [`GridServices`].

use bytes::Bytes;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::request::GridRequest;

/// HTTP response produced by exports and mass actions
pub type Response = http::Response<Bytes>;

/// Generates URLs from route names.
pub trait Router: Send + Sync {
	/// Returns the URL of `route` filled with `parameters`.
	///
	/// # Errors
	///
	/// Returns [`GridError::Routing`](crate::GridError::Routing) when the route
	/// is unknown or a required parameter is missing.
	fn generate(&self, route: &str, parameters: &IndexMap<String, Value>) -> Result<String>;
}

/// Gives access to the request currently being served.
pub trait RequestStack: Send + Sync {
	fn current_request(&self) -> Option<Arc<dyn GridRequest>>;
}

/// Answers whether the current principal holds a role.
pub trait AuthorizationChecker: Send + Sync {
	fn is_granted(&self, role: &str) -> bool;
}

/// Forwards a delegated mass action to a controller as a sub-request.
pub trait ActionDispatcher: Send + Sync {
	/// Dispatches to `controller` (a `bundle:controller:action` reference) with
	/// the given request attributes.
	fn dispatch(&self, controller: &str, attributes: IndexMap<String, Value>) -> Result<Response>;
}

/// The services a grid depends on.
#[derive(Clone)]
pub struct GridServices {
	pub router: Arc<dyn Router>,
	pub request_stack: Arc<dyn RequestStack>,
	pub authorization: Arc<dyn AuthorizationChecker>,
	pub dispatcher: Option<Arc<dyn ActionDispatcher>>,
}

impl GridServices {
	pub fn new(
		router: Arc<dyn Router>,
		request_stack: Arc<dyn RequestStack>,
		authorization: Arc<dyn AuthorizationChecker>,
	) -> Self {
		Self {
			router,
			request_stack,
			authorization,
			dispatcher: None,
		}
	}

	/// Enables delegated mass actions
	pub fn with_dispatcher(mut self, dispatcher: Arc<dyn ActionDispatcher>) -> Self {
		self.dispatcher = Some(dispatcher);
		self
	}

	pub fn current_request(&self) -> Option<Arc<dyn GridRequest>> {
		self.request_stack.current_request()
	}

	/// True when no role is required or the role is granted
	pub fn is_granted(&self, role: Option<&str>) -> bool {
		role.is_none_or(|role| self.authorization.is_granted(role))
	}
}

impl fmt::Debug for GridServices {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GridServices")
			.field("dispatcher", &self.dispatcher.is_some())
			.finish_non_exhaustive()
	}
}
