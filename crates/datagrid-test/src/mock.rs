use datagrid_core::{
	ActionDispatcher, AuthorizationChecker, ColumnSet, Export, GridData, GridServices, QueryParams,
	Response, Result, Router, RowSet, Source,
};
use indexmap::IndexMap;
use mockall::mock;
use serde_json::Value;

// ============================================================================
// mockall-based collaborator mocks
// ============================================================================

mock! {
	/// Mock of the [`Router`] trait
	///
	/// ```rust
	/// use datagrid_core::Router;
	/// use datagrid_test::mock::MockRouter;
	/// use indexmap::IndexMap;
	///
	/// let mut router = MockRouter::new();
	/// router
	///     .expect_generate()
	///     .withf(|route, _| route == "user_list")
	///     .times(1)
	///     .returning(|_, _| Ok("/users".to_string()));
	///
	/// assert_eq!(router.generate("user_list", &IndexMap::new()).unwrap(), "/users");
	/// ```
	pub Router {}

	impl Router for Router {
		fn generate(&self, route: &str, parameters: &IndexMap<String, Value>) -> Result<String>;
	}
}

mock! {
	/// Mock of the [`AuthorizationChecker`] trait
	pub AuthorizationChecker {}

	impl AuthorizationChecker for AuthorizationChecker {
		fn is_granted(&self, role: &str) -> bool;
	}
}

mock! {
	/// Mock of the [`ActionDispatcher`] trait
	pub ActionDispatcher {}

	impl ActionDispatcher for ActionDispatcher {
		fn dispatch(&self, controller: &str, attributes: IndexMap<String, Value>) -> Result<Response>;
	}
}

mock! {
	/// Mock of the [`Source`] trait
	///
	/// Every method is mocked, so a test must set an expectation for each
	/// call the grid makes. Prefer [`StaticSource`](crate::doubles::StaticSource)
	/// when only the data matters.
	pub Source {}

	impl Source for Source {
		fn initialise(&mut self, services: &GridServices) -> Result<()>;
		fn get_columns(&mut self, columns: &mut ColumnSet) -> Result<()>;
		fn is_data_loaded(&self) -> bool;
		fn execute(&mut self, columns: &ColumnSet, params: &QueryParams) -> Result<RowSet>;
		fn total_count(&self, max_results: Option<usize>) -> Result<usize>;
		fn hash(&self) -> String;
		fn supports_group_by(&self) -> bool;
		fn set_group_by(&mut self, group_by: Vec<String>) -> Result<()>;
		fn delete(&mut self, ids: &[Value]) -> Result<()>;
	}
}

mock! {
	/// Mock of the [`Export`] trait
	///
	/// `role` keeps its default, so the export is always registered.
	pub Export {}

	impl Export for Export {
		fn title(&self) -> &str;
		fn compute_data(&mut self, grid: &dyn GridData) -> Result<()>;
		fn response(&self) -> Result<Response>;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use datagrid_core::Column;
	use rstest::rstest;

	#[rstest]
	fn test_mock_source_populates_columns() {
		let mut source = MockSource::new();
		source
			.expect_get_columns()
			.times(1)
			.returning(|columns| {
				columns.add_column(Column::text("id").primary(true), 0)?;
				Ok(())
			});

		let mut columns = ColumnSet::new();
		source.get_columns(&mut columns).unwrap();

		assert!(columns.has_column("id"));
	}

	#[rstest]
	fn test_mock_authorization() {
		let mut checker = MockAuthorizationChecker::new();
		checker
			.expect_is_granted()
			.returning(|role| role == "ROLE_ADMIN");

		assert!(checker.is_granted("ROLE_ADMIN"));
		assert!(!checker.is_granted("ROLE_USER"));
	}
}
