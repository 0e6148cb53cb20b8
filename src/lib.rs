//! # datagrid
//!
//! Server-side data grids: paginated, sortable, filterable and exportable
//! tables bound to the request and session lifecycle of a web application.
//!
//! A grid takes its rows from a [`Source`](core::Source), keeps its state
//! (filters, page, order, page size, active tweaks) in the session under a
//! stable hash, and answers each request by rendering, redirecting, running a
//! mass action or producing an export.
//!
//! ## Crates
//!
//! - [`core`] (`datagrid-core`): columns, rows, actions, exports, sources and
//!   the collaborator traits
//! - [`engine`] (`datagrid-engine`): the [`Grid`](engine::Grid) and its
//!   request handling
//! - `test` (`datagrid-test`, behind the `test` feature): mocks, in-memory
//!   doubles and rstest fixtures
//!
//! ## Feature Flags
//!
//! - `test` - Re-exports `datagrid-test` as [`test`]
//!
//! ## Quick Example
//!
//! ```rust
//! use datagrid::prelude::*;
//! use datagrid_test::doubles::{GrantedRoles, ScriptedRequest, SimpleRouter, StaticRequestStack, StaticSource};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let services = GridServices::new(
//!     Arc::new(SimpleRouter),
//!     Arc::new(StaticRequestStack::empty()),
//!     Arc::new(GrantedRoles::none()),
//! );
//! let source = StaticSource::new()
//!     .column(Column::text("id").primary(true))
//!     .column(Column::text("team"))
//!     .rows((1..=3).map(|id| Row::from_fields([("id", json!(id)), ("team", json!("red"))])));
//!
//! let config = GridConfig::new()
//!     .source(shared_source(source))
//!     .max_per_page([2, 10])
//!     .sort_by("id")
//!     .order("desc");
//! let mut grid = Grid::new(services, Some("teams"), Some(config));
//! grid.initialize().unwrap();
//! grid.handle_request(ScriptedRequest::new().into_shared()).unwrap();
//!
//! assert_eq!(grid.page_count(), 2);
//! assert_eq!(grid.rows().primary_keys(), vec![json!(3), json!(2)]);
//! assert!(grid.grid_response().unwrap().is_render());
//! ```

#![warn(rustdoc::broken_intra_doc_links)]

pub use datagrid_core as core;
pub use datagrid_engine as engine;

#[cfg(feature = "test")]
pub use datagrid_test as test;

// Re-exports for convenience
pub use datagrid_core::{GridError, Result};
pub use datagrid_engine::{Grid, GridConfig, GridResponse};

/// Prelude module for convenient imports
pub mod prelude {
	pub use datagrid_core::{
		ActionDispatcher, AuthorizationChecker, Column, ColumnSet, ColumnType, DataJunction,
		Export, ExportData, FilterData, GridData, GridError, GridRequest, GridServices,
		HttpGridRequest, MassAction, MassActionCallback, MassActionContext, Operator, QueryParams,
		RequestStack, Response, Result, Router, Row, RowAction, RowSet, SessionStore,
		SharedExport, SharedSource, SortDirection, Source, shared_export, shared_source,
	};
	pub use datagrid_engine::{
		Grid, GridConfig, GridResponse, LimitsSpec, SessionData, TemplateSpec, Tweak, TweakSpec,
	};
}
