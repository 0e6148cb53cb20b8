//! Core building blocks of datagrid
//!
//! This crate holds the leaf components a grid is assembled from:
//!
//! - **Columns**: [`Column`], [`ColumnSet`] and the filter state attached to them
//! - **Rows**: [`Row`] and [`RowSet`], produced by a source for the current page
//! - **Actions**: [`MassAction`] and [`RowAction`]
//! - **Exports**: the [`Export`] trait and [`ExportData`]
//! - **Sources**: the [`Source`] trait implemented by data backends
//! - **Collaborators**: router, request stack, authorization checker, session
//!   store and the request view, all injected through [`GridServices`]
//!
//! The request-handling engine lives in `datagrid-engine`.
//!
//! # Example
//!
//! ```rust
//! use datagrid_core::{Column, ColumnSet, SortDirection};
//!
//! let mut columns = ColumnSet::new();
//! columns.add_column(Column::text("id").primary(true).title("Id"), 0).unwrap();
//! columns.column_mut("id").unwrap().set_order(Some(SortDirection::Desc));
//!
//! assert!(columns.column("id").unwrap().is_sorted());
//! ```

#![warn(rustdoc::broken_intra_doc_links)]

pub mod action;
pub mod column;
pub mod error;
pub mod export;
pub mod request;
pub mod row;
pub mod services;
pub mod session;
pub mod source;

// Re-exports for convenience
pub use action::{MassAction, MassActionCallback, MassActionContext, RowAction};
pub use column::{
	Column, ColumnSet, ColumnType, DataJunction, FilterData, MASS_ACTION_COLUMN_ID, Operator,
	SortDirection,
};
pub use error::{GridError, Result};
pub use export::{Export, ExportData, GridData, SharedExport, shared_export};
pub use request::{GridRequest, HttpGridRequest};
pub use row::{Row, RowSet};
pub use services::{
	ActionDispatcher, AuthorizationChecker, GridServices, RequestStack, Response, Router,
};
pub use session::{InMemorySession, SessionStore};
pub use source::{QueryParams, SharedSource, Source, shared_source};
