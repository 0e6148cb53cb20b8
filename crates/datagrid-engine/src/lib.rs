//! Request-handling engine of datagrid
//!
//! A [`Grid`] is configured with columns, actions, exports and tweaks, then
//! handles a request: it reconciles the state persisted in the session with
//! the grid parameters of the request, loads the current page from its
//! source, and tells the controller how to answer through a
//! [`GridResponse`].
//!
//! ## Request lifecycle
//!
//! 1. The grid hash is derived from the grid id, or from the controller, the
//!    column ids and the source.
//! 2. Arriving from another page drops the persisted state unless the grid is
//!    persistent.
//! 3. A fresh session is seeded with the default filters, page, order, limit
//!    and tweak; permanent filters apply on every request.
//! 4. Posted parameters run a mass action, an export or a tweak, or update
//!    the filters, page, order and limit.
//! 5. The page is loaded and the action columns are added.
//!
//! ## Example
//!
//! ```rust
//! use datagrid_core::{Column, GridServices, Row, shared_source};
//! use datagrid_engine::{Grid, GridResponse};
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
//!     .column(Column::text("name"))
//!     .row(Row::from_fields([("id", json!(1)), ("name", json!("Ada"))]))
//!     .row(Row::from_fields([("id", json!(2)), ("name", json!("Grace"))]));
//!
//! let mut grid = Grid::new(services, Some("people"), None);
//! grid.set_source(shared_source(source)).unwrap();
//! grid.set_limits([10, 25]);
//! grid.handle_request(Arc::new(ScriptedRequest::new())).unwrap();
//!
//! assert_eq!(grid.hash(), Some("grid_people"));
//! assert_eq!(grid.total_count(), 2);
//! assert_eq!(grid.limit(), 10);
//! assert!(matches!(grid.grid_response().unwrap(), GridResponse::Render));
//! ```

#![warn(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod grid;
pub mod keys;
pub mod response;
pub mod session;
pub mod template;
pub mod tweak;

pub use config::{GridConfig, GroupBy, LimitsSpec};
pub use grid::Grid;
pub use response::GridResponse;
pub use session::SessionData;
pub use template::TemplateSpec;
pub use tweak::{Tweak, TweakSpec};
