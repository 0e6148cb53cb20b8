//! Loading the current page and reading the outcome

use datagrid_core::{
	Column, ColumnSet, FilterData, GridData, GridError, MASS_ACTION_COLUMN_ID, QueryParams,
	Response, Result, RowSet, SharedSource, SortDirection,
};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use super::Grid;
use super::request::split_order;

impl Grid {
	/// Configures the columns and pagination from the session data.
	pub(crate) fn process_session_data(&mut self) -> Result<()> {
		for column in self.columns.iter_mut() {
			if let Some(data) = self.session_data.filter(column.id()) {
				column.set_data(data.clone());
			}
		}

		self.page = self.session_data.page.unwrap_or(0);

		if let Some(order) = &self.session_data.order {
			let (column_id, direction) = split_order(order);
			match (
				self.columns.column_mut(column_id),
				direction.parse::<SortDirection>(),
			) {
				(Ok(column), Ok(direction)) => column.set_order(Some(direction)),
				_ => debug!(order = order.as_str(), "Ignoring stale order from the session"),
			}
		}

		self.limit = self
			.session_data
			.limit
			.or_else(|| self.limits.keys().next().copied())
			.unwrap_or(0);
		Ok(())
	}

	/// Loads the current page from the source and adds the action columns.
	/// Only runs once per request.
	pub(crate) fn prepare(&mut self) -> Result<()> {
		if self.prepared {
			return Ok(());
		}
		let source = self
			.source
			.clone()
			.ok_or_else(|| GridError::Logic("The grid source must be set before loading rows".to_string()))?;

		self.load_rows(&source)?;
		if self.rows.is_empty() && self.page > 0 {
			debug!(page = self.page, "Page past the end of the data, showing the first page");
			self.page = 0;
			self.load_rows(&source)?;
		}

		self.add_action_columns()?;

		let primary = self.columns.primary_column()?.id().to_string();
		for row in self.rows.iter_mut() {
			row.set_primary_field(primary.as_str());
		}

		let count = {
			let source = source.lock();
			if source.is_data_loaded() {
				source.total_count_from_data(self.max_results)?
			} else {
				source.total_count(self.max_results)?
			}
		};
		self.total_count = match self.max_results {
			Some(max) => count.min(max),
			None => count,
		};
		self.prepared = true;
		Ok(())
	}

	fn load_rows(&mut self, source: &SharedSource) -> Result<()> {
		let params = QueryParams {
			page: self.page,
			limit: self.limit,
			max_results: self.max_results,
			data_junction: self.data_junction,
		};
		let mut source = source.lock();
		self.rows = if source.is_data_loaded() {
			source.execute_from_data(&self.columns, &params)?
		} else {
			source.execute(&self.columns, &params)?
		};
		debug!(
			grid = self.hash.as_deref().unwrap_or_default(),
			page = self.page,
			limit = self.limit,
			rows = self.rows.len(),
			"Loaded grid rows"
		);
		Ok(())
	}

	fn add_action_columns(&mut self) -> Result<()> {
		for (column_id, actions) in &self.row_actions {
			if self.columns.has_column(column_id) {
				self.columns
					.column_mut(column_id)?
					.set_row_actions(actions.clone());
			} else {
				let mut column = Column::actions(
					column_id.as_str(),
					self.actions_column_title.as_str(),
					actions.clone(),
				);
				if self.actions_column_size > -1 {
					column.set_size(self.actions_column_size);
				}
				self.columns.add_column(column, 0)?;
			}
		}

		if !self.mass_actions.is_empty() && !self.columns.has_column(MASS_ACTION_COLUMN_ID) {
			self.columns.add_column(Column::mass_action(), 1)?;
		}
		Ok(())
	}

	/// Rows of the current page
	pub fn rows(&self) -> &RowSet {
		&self.rows
	}

	/// Number of rows matching the filters, capped by the max results
	pub fn total_count(&self) -> usize {
		self.total_count
	}

	/// Number of pages; 1 when paging is disabled
	pub fn page_count(&self) -> usize {
		if self.limit > 0 {
			self.total_count.div_ceil(self.limit)
		} else {
			1
		}
	}

	/// Page size in effect; 0 means no limit
	pub fn limit(&self) -> usize {
		self.limit
	}

	/// True when there is a page size to choose or more rows than the
	/// first page size
	pub fn is_pager_section_visible(&self) -> bool {
		match self.limits.keys().next() {
			Some(first) => self.limits.len() > 1 || *first < self.total_count,
			None => false,
		}
	}

	/// Persisted filters by column id.
	///
	/// # Errors
	///
	/// Returns [`GridError::Logic`] before a request was handled.
	pub fn filters(&self) -> Result<&IndexMap<String, FilterData>> {
		if self.hash.is_none() {
			return Err(GridError::Logic(
				"Filters are only available once the request is handled".to_string(),
			));
		}
		Ok(&self.session_data.filters)
	}

	pub fn filter(&self, column_id: &str) -> Result<Option<&FilterData>> {
		Ok(self.filters()?.get(column_id))
	}

	pub fn has_filter(&self, column_id: &str) -> Result<bool> {
		Ok(self.filters()?.contains_key(column_id))
	}

	/// Field values of the loaded rows, restricted to `column_ids` when
	/// given.
	pub fn raw_data(&self, column_ids: Option<&[&str]>) -> Vec<IndexMap<String, Value>> {
		let ids: Vec<String> = match column_ids {
			Some(ids) => ids.iter().map(|id| id.to_string()).collect(),
			None => self.columns.ids(),
		};

		self.rows
			.iter()
			.map(|row| {
				ids.iter()
					.filter_map(|id| row.field(id).map(|value| (id.clone(), value.clone())))
					.collect()
			})
			.collect()
	}

	pub fn is_ready_for_export(&self) -> bool {
		self.is_ready_for_export
	}

	pub fn export_response(&self) -> Option<&Response> {
		self.export_response.as_ref()
	}

	pub fn mass_action_response(&self) -> Option<&Response> {
		self.mass_action_response.as_ref()
	}

	/// True when a mass action answered with its own response
	pub fn is_mass_action_redirect(&self) -> bool {
		self.mass_action_response.is_some()
	}

	/// Deletes rows through the source.
	///
	/// # Errors
	///
	/// Returns [`GridError::Logic`] without a source, or the source error.
	pub fn delete_action(&self, ids: &[Value]) -> Result<()> {
		let source = self
			.source
			.as_ref()
			.ok_or_else(|| GridError::Logic("The grid source must be set before deleting rows".to_string()))?;
		source.lock().delete(ids)
	}
}

impl GridData for Grid {
	fn columns(&self) -> &ColumnSet {
		&self.columns
	}

	fn rows(&self) -> &RowSet {
		&self.rows
	}
}
