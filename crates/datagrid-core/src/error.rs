//! Error types for datagrid.
//!
//! The variants follow the grid's failure taxonomy: configuration mistakes made
//! by the caller, missing preconditions, tampered or stale request data, and
//! integration faults in registered callbacks.

use http::StatusCode;
use thiserror::Error;

/// Errors surfaced by grid operations.
#[derive(Debug, Error)]
pub enum GridError {
	/// The caller misused the API (duplicate source, unknown column, bad limits, ...).
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// A required collaborator is missing, e.g. no source before handling a request.
	#[error("Logic error: {0}")]
	Logic(String),

	/// A user-controlled index did not resolve to a registered entry.
	#[error("Out of bounds: {0}")]
	OutOfBounds(String),

	/// A registered callback or delegated target cannot be invoked.
	#[error("Runtime error: {0}")]
	Runtime(String),

	/// A template override value was not usable.
	#[error("Template error: {0}")]
	Template(String),

	/// The data source failed to execute a query.
	#[error("Source error: {0}")]
	Source(String),

	/// URL generation failed.
	#[error("Routing error: {0}")]
	Routing(String),

	/// JSON serialization/deserialization error.
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl GridError {
	/// Returns true if the error was caused by request data rather than by
	/// the application configuration.
	pub fn is_client_error(&self) -> bool {
		matches!(self, GridError::OutOfBounds(_))
	}

	/// HTTP status code to answer with when the error reaches the response
	/// boundary.
	///
	/// # Examples
	///
	/// ```
	/// use datagrid_core::GridError;
	/// use http::StatusCode;
	///
	/// let error = GridError::OutOfBounds("Mass action 10 is not defined".to_string());
	/// assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
	///
	/// let error = GridError::Logic("no source".to_string());
	/// assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
	/// ```
	pub fn status_code(&self) -> StatusCode {
		if self.is_client_error() {
			StatusCode::BAD_REQUEST
		} else {
			StatusCode::INTERNAL_SERVER_ERROR
		}
	}
}

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
