//! Pluggable data backend of a grid

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

use crate::column::{ColumnSet, DataJunction};
use crate::error::{GridError, Result};
use crate::row::RowSet;
use crate::services::GridServices;

/// Pagination state passed to a source.
///
/// Ordering and filters are read from the columns: a source looks at
/// [`Column::order`](crate::column::Column::order) and
/// [`Column::data`](crate::column::Column::data) of every source column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryParams {
	/// Zero-based page
	pub page: usize,
	/// Rows per page, 0 for no limit
	pub limit: usize,
	/// Hard cap on the number of rows
	pub max_results: Option<usize>,
	pub data_junction: DataJunction,
}

impl QueryParams {
	/// Offset of the first row of the page
	pub fn offset(&self) -> usize {
		self.page.saturating_mul(self.limit)
	}
}

/// Data backend queried by a grid.
///
/// Group-by support is a capability: a source that can group rows returns
/// `true` from [`Source::supports_group_by`] and implements
/// [`Source::set_group_by`].
pub trait Source: Send {
	/// Called once when the source is attached to a grid
	fn initialise(&mut self, _services: &GridServices) -> Result<()> {
		Ok(())
	}

	/// Adds the columns this source provides to `columns`
	fn get_columns(&mut self, columns: &mut ColumnSet) -> Result<()>;

	/// True when rows were handed over up front instead of being queried
	fn is_data_loaded(&self) -> bool {
		false
	}

	/// Queries one page of rows
	fn execute(&mut self, columns: &ColumnSet, params: &QueryParams) -> Result<RowSet>;

	/// Pages through preloaded rows
	fn execute_from_data(&mut self, columns: &ColumnSet, params: &QueryParams) -> Result<RowSet> {
		self.execute(columns, params)
	}

	/// Number of rows matching the filters of the last execution
	fn total_count(&self, max_results: Option<usize>) -> Result<usize>;

	/// Counterpart of [`Source::total_count`] for preloaded rows
	fn total_count_from_data(&self, max_results: Option<usize>) -> Result<usize> {
		self.total_count(max_results)
	}

	/// Identifies the underlying data (entity name, collection, ...)
	fn hash(&self) -> String;

	fn supports_group_by(&self) -> bool {
		false
	}

	fn set_group_by(&mut self, _group_by: Vec<String>) -> Result<()> {
		Err(GridError::Logic(
			"This source does not support grouping".to_string(),
		))
	}

	/// Deletes the rows with the given primary keys
	fn delete(&mut self, _ids: &[Value]) -> Result<()> {
		Err(GridError::Logic(
			"This source does not support deletion".to_string(),
		))
	}
}

/// Source handle shared between a grid and its clones
pub type SharedSource = Arc<Mutex<dyn Source>>;

/// Wraps a source into a [`SharedSource`]
pub fn shared_source<S: Source + 'static>(source: S) -> SharedSource {
	Arc::new(Mutex::new(source))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::column::Column;
	use rstest::rstest;

	struct Plain;

	impl Source for Plain {
		fn get_columns(&mut self, columns: &mut ColumnSet) -> Result<()> {
			columns.add_column(Column::text("id").primary(true), 0)?;
			Ok(())
		}

		fn execute(&mut self, _columns: &ColumnSet, _params: &QueryParams) -> Result<RowSet> {
			Ok(RowSet::new())
		}

		fn total_count(&self, _max_results: Option<usize>) -> Result<usize> {
			Ok(0)
		}

		fn hash(&self) -> String {
			"plain".to_string()
		}
	}

	#[rstest]
	#[case(0, 10, 0)]
	#[case(3, 20, 60)]
	#[case(5, 0, 0)]
	fn test_offset(#[case] page: usize, #[case] limit: usize, #[case] expected: usize) {
		let params = QueryParams {
			page,
			limit,
			..QueryParams::default()
		};
		assert_eq!(params.offset(), expected);
	}

	#[rstest]
	fn test_default_capabilities() {
		let mut source = Plain;
		assert!(!source.supports_group_by());
		assert!(!source.is_data_loaded());
		assert!(matches!(
			source.set_group_by(vec!["a".into()]),
			Err(GridError::Logic(_))
		));
		assert!(matches!(source.delete(&[]), Err(GridError::Logic(_))));
	}

	#[rstest]
	fn test_shared_source_populates_columns() {
		let source = shared_source(Plain);
		let mut columns = ColumnSet::new();
		source.lock().get_columns(&mut columns).unwrap();
		assert!(columns.has_column("id"));
		assert_eq!(source.lock().hash(), "plain");
	}
}
