//! Testing utilities for datagrid
//!
//! - [`mock`]: mockall mocks of the collaborator and source traits
//! - [`doubles`]: in-memory request, request stack, router, authorization and
//!   source implementations
//! - [`fixtures`]: rstest fixtures wiring the doubles together
//! - [`logging`]: one-time test logger initialization

pub mod doubles;
pub mod fixtures;
pub mod logging;
pub mod mock;

pub use doubles::{
	GrantedRoles, RecordingExport, ScriptedRequest, SimpleRouter, StaticRequestStack, StaticSource,
};
pub use fixtures::{people_source, services, session};
pub use logging::init_test_logging;
pub use mock::{
	MockActionDispatcher, MockAuthorizationChecker, MockExport, MockRouter, MockSource,
};
