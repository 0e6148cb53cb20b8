//! Column definitions and the ordered column collection of a grid.

pub mod base;
pub mod filter;
pub mod set;

pub use base::{Column, ColumnType, MASS_ACTION_COLUMN_ID};
pub use filter::{DataJunction, FilterData, Operator, SortDirection};
pub use set::ColumnSet;
