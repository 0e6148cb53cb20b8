//! Outcome of a handled grid request

use bytes::Bytes;
use datagrid_core::{GridError, Response, Result};
use http::{StatusCode, header};

/// What the controller should answer with after the grid handled a request.
#[derive(Debug)]
pub enum GridResponse {
	/// File produced by an export
	Export(Response),
	/// Response returned by a mass action
	MassAction(Response),
	/// Grid parameters were posted; redirect to the grid URL so a reload does
	/// not resubmit them
	Redirect(String),
	/// Render the grid
	Render,
}

impl GridResponse {
	pub fn is_render(&self) -> bool {
		matches!(self, GridResponse::Render)
	}

	/// Converts the outcome into an HTTP response. `Render` yields `None`: the
	/// caller renders the grid itself.
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_engine::GridResponse;
	///
	/// let response = GridResponse::Redirect("/users".to_string())
	///     .into_http()
	///     .unwrap()
	///     .unwrap();
	/// assert_eq!(response.status(), http::StatusCode::FOUND);
	/// assert_eq!(response.headers()["location"], "/users");
	///
	/// assert!(GridResponse::Render.into_http().unwrap().is_none());
	/// ```
	pub fn into_http(self) -> Result<Option<Response>> {
		match self {
			GridResponse::Export(response) | GridResponse::MassAction(response) => Ok(Some(response)),
			GridResponse::Redirect(url) => http::Response::builder()
				.status(StatusCode::FOUND)
				.header(header::LOCATION, url)
				.body(Bytes::new())
				.map(Some)
				.map_err(|e| GridError::Routing(e.to_string())),
			GridResponse::Render => Ok(None),
		}
	}
}
