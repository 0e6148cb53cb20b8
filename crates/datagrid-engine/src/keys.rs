//! Reserved request and session keys
//!
//! These names are shared with the front-end scripts and templates. Request
//! parameters are posted under the grid hash (`grid_users[_page]=2`); the same
//! names key the persisted session record.

/// "All rows selected" flag of a mass action
pub const MASS_ACTION_ALL_KEYS_SELECTED: &str = "__action_all_keys";

/// Ordinal of the submitted mass action, `-1` when none is chosen
pub const MASS_ACTION: &str = "__action_id";

/// Ordinal of the requested export, `-1` when none is chosen
pub const EXPORT: &str = "__export_id";

/// Id of the tweak to apply
pub const TWEAK: &str = "__tweak_id";

/// Zero-based page
pub const PAGE: &str = "_page";

/// Rows per page
pub const LIMIT: &str = "_limit";

/// `<columnId>|<asc|desc>`
pub const ORDER: &str = "_order";

/// Clears the persisted state of the grid
pub const RESET: &str = "_reset";

/// Request attribute naming the controller serving the page
pub const CONTROLLER_ATTRIBUTE: &str = "_controller";

/// Request attribute naming the current route
pub const ROUTE_ATTRIBUTE: &str = "_route";

/// Prefix marking a template given by handle rather than by path
pub const SELF_TEMPLATE_PREFIX: &str = "__SELF__";
