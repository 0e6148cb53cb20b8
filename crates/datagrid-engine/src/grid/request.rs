//! Request handling: hash, persistence, defaults and the request-data
//! pipeline

use datagrid_core::{
	FilterData, GridError, GridRequest, MASS_ACTION_COLUMN_ID, MassActionCallback,
	MassActionContext, Result, SharedSource, SortDirection,
};
use indexmap::IndexMap;
use md5::{Digest, Md5};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};

use super::Grid;
use crate::keys;
use crate::response::GridResponse;
use crate::session::SessionData;

/// Result of applying a tweak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TweakOutcome {
	/// No tweak with that id
	Unknown,
	/// State was updated
	Applied,
	/// A mass action or export ran; the request is complete
	Terminal,
}

impl Grid {
	/// Handles a request: loads the persisted state, applies the defaults and
	/// permanent filters, then the grid parameters of the request, and loads
	/// the current page.
	///
	/// Mass actions, exports and tweaks running one of them complete the
	/// request without loading the page again. When grid parameters were
	/// posted by a regular (non-XHR) request, the page is not loaded either:
	/// [`Grid::grid_response`] answers with a redirect.
	///
	/// # Errors
	///
	/// Returns [`GridError::Logic`] if no source is attached,
	/// [`GridError::OutOfBounds`] for unknown mass-action or export indexes,
	/// and configuration errors from the defaults and permanent filters.
	pub fn handle_request(&mut self, request: Arc<dyn GridRequest>) -> Result<&mut Self> {
		let source = self
			.source
			.clone()
			.ok_or_else(|| GridError::Logic("The grid source must be set before handling a request".to_string()))?;

		self.reset_request_state();
		self.session = request.session();
		self.request = Some(request.clone());

		let hash = self.create_hash(request.as_ref(), &source);
		self.request_data = request.grid_parameters(&hash).unwrap_or_default();
		let template = self.session_data.template.take();
		self.process_persistence(request.as_ref(), &hash);
		self.session_data = match &self.session {
			Some(session) => SessionData::load(session.as_ref(), &hash),
			None => SessionData::default(),
		};
		if self.session_data.template.is_none() {
			self.session_data.template = template;
		}
		self.process_lazy_parameters()?;

		if self.new_session && self.process_default_state()? {
			return self.finish_request(request.as_ref(), true);
		}
		self.process_permanent_filters()?;

		if !self.request_data.is_empty() {
			let terminal = self.process_request_data()?;
			return self.finish_request(request.as_ref(), terminal);
		}

		self.redirect = Some(false);
		self.process_session_data()?;
		self.prepare()?;
		self.handled = true;
		Ok(self)
	}

	fn finish_request(&mut self, request: &dyn GridRequest, terminal: bool) -> Result<&mut Self> {
		let xhr = request.is_xml_http_request();
		self.redirect = Some(!self.request_data.is_empty() && !xhr);
		if !terminal && !self.is_ready_for_redirect() {
			self.process_session_data()?;
			self.prepare()?;
		}
		self.handled = true;
		Ok(self)
	}

	fn reset_request_state(&mut self) {
		self.prepared = false;
		self.handled = false;
		self.is_ready_for_export = false;
		self.export_response = None;
		self.mass_action_response = None;
		self.redirect = None;
	}

	/// Answer for the handled request, handling the current request first if
	/// needed.
	///
	/// Export responses win over mass-action responses, which win over the
	/// redirect after posted grid parameters.
	pub fn grid_response(&mut self) -> Result<GridResponse> {
		if !self.handled {
			let request = self
				.request
				.clone()
				.or_else(|| self.services.current_request())
				.ok_or_else(|| GridError::Logic("There is no request to handle".to_string()))?;
			self.handle_request(request)?;
		}

		if self.is_ready_for_export {
			if let Some(response) = self.export_response.take() {
				return Ok(GridResponse::Export(response));
			}
		}
		if let Some(response) = self.mass_action_response.take() {
			return Ok(GridResponse::MassAction(response));
		}
		if self.is_ready_for_redirect() {
			return Ok(GridResponse::Redirect(self.route_url()?));
		}
		Ok(GridResponse::Render)
	}

	/// True when grid parameters were posted by a regular request
	pub fn is_ready_for_redirect(&self) -> bool {
		self.redirect.unwrap_or(false)
	}

	fn create_hash(&mut self, request: &dyn GridRequest, source: &SharedSource) -> String {
		let hash = match &self.id {
			Some(id) => format!("grid_{}", id),
			None => {
				let controller = request
					.attribute(keys::CONTROLLER_ATTRIBUTE)
					.map(|value| value_to_string(&value))
					.unwrap_or_default();
				let source_hash = source.lock().hash();
				let digest = Md5::digest(format!("{}{}{}", controller, self.columns.hash(), source_hash));
				format!("grid_{}", hex::encode(digest))
			}
		};
		trace!(grid = %hash, "Created grid hash");
		self.hash = Some(hash.clone());
		hash
	}

	/// Drops the persisted state when arriving from another page, unless the
	/// grid is persistent, or when a reset was requested.
	fn process_persistence(&mut self, request: &dyn GridRequest, hash: &str) {
		let referer = request
			.header("referer")
			.filter(|referer| !referer.is_empty())
			.map(|referer| referer.split('?').next().unwrap_or_default().to_string());
		let current = format!(
			"{}://{}{}{}",
			request.scheme(),
			request.http_host(),
			request.base_url(),
			request.path_info()
		);
		let navigated = !request.is_xml_http_request()
			&& !self.persistence
			&& referer.as_deref().is_some_and(|referer| referer != current);
		let reset = self.request_data.contains_key(keys::RESET);

		if let Some(session) = &self.session {
			if navigated || reset {
				debug!(grid = %hash, reset, "Clearing persisted grid state");
				session.remove(hash);
			}
			// A record holding only the template set before this request does
			// not make a returning visit
			self.new_session = match session.get(hash) {
				None => true,
				Some(value) => {
					self.template_seeded
						&& SessionData::from_session(hash, Some(value)).is_template_only()
				}
			};
		} else {
			self.new_session = true;
		}
		self.template_seeded = false;
	}

	fn process_lazy_parameters(&mut self) -> Result<()> {
		for id in &self.lazy_hidden_columns {
			self.columns.column_mut(id)?.set_visible(false);
		}

		if !self.lazy_visible_columns.is_empty() {
			for column in self.columns.iter_mut() {
				if !self.lazy_visible_columns.iter().any(|id| id == column.id()) {
					column.set_visible(false);
				}
			}
		}

		for (id, visible) in &self.lazy_hide_show_columns {
			self.columns.column_mut(id)?.set_visible(*visible);
		}
		Ok(())
	}

	/// Seeds a fresh session with the default filters, page, order, limit
	/// and tweak. Returns true if the default tweak completed the request.
	fn process_default_state(&mut self) -> Result<bool> {
		let filters = self.default_filters.clone();
		self.apply_filters(&filters, false)?;

		if self.page > 0 {
			self.session_data.page = Some(self.page);
		}

		if let Some(order) = self.default_order.clone() {
			let (column_id, direction) = split_order(&order);
			self.columns.column(column_id)?;
			if direction.parse::<SortDirection>().is_err() {
				return Err(GridError::InvalidArgument(format!(
					"Supported default orders are asc and desc, {} given.",
					direction
				)));
			}
			self.session_data.order = Some(order);
		}

		if let Some(limit) = self.default_limit {
			if !self.limits.contains_key(&limit) {
				return Err(GridError::InvalidArgument(format!(
					"Limit {} is not defined in limits.",
					limit
				)));
			}
			self.session_data.limit = Some(limit);
		}

		let mut terminal = false;
		if let Some(tweak) = self.default_tweak.clone() {
			terminal = self.process_tweak(&tweak)? == TweakOutcome::Terminal;
		}

		self.save_session()?;
		Ok(terminal)
	}

	fn process_permanent_filters(&mut self) -> Result<()> {
		let filters = self.permanent_filters.clone();
		self.apply_filters(&filters, true)
	}

	/// Writes filter values into the session data. Permanent filters lock
	/// their column against user filtering.
	fn apply_filters(&mut self, filters: &IndexMap<String, Value>, permanent: bool) -> Result<()> {
		for (column_id, value) in filters {
			let column = self.columns.column_mut(column_id)?;
			if permanent {
				column.set_filterable(false);
			}
			self.session_data
				.set_filter(column_id, Some(FilterData::from_value(value.clone())));
		}
		Ok(())
	}

	/// Returns true if a mass action, export or tweak completed the request
	fn process_request_data(&mut self) -> Result<bool> {
		if self.process_mass_action(self.request_index(keys::MASS_ACTION))? {
			return Ok(true);
		}
		if self.process_export(self.request_index(keys::EXPORT))? {
			return Ok(true);
		}
		if let Some(tweak) = self.request_string(keys::TWEAK) {
			match self.process_tweak(&tweak)? {
				TweakOutcome::Terminal => return Ok(true),
				TweakOutcome::Applied => return Ok(false),
				TweakOutcome::Unknown => {}
			}
		}

		let filtering = self.process_request_filters();
		let page = self.request_index(keys::PAGE).and_then(|page| usize::try_from(page).ok());
		self.process_page(page, filtering);
		let order = self.request_string(keys::ORDER);
		self.process_order(order.as_deref());
		let limit = self.request_index(keys::LIMIT).and_then(|limit| usize::try_from(limit).ok());
		self.process_limit(limit);
		self.save_session()?;
		Ok(false)
	}

	/// Runs the mass action at `index`. Returns false when no action was
	/// selected.
	pub(crate) fn process_mass_action(&mut self, index: Option<i64>) -> Result<bool> {
		let Some(index) = index.filter(|index| *index >= 0) else {
			return Ok(false);
		};
		let action = usize::try_from(index)
			.ok()
			.and_then(|index| self.mass_actions.get(index))
			.cloned()
			.ok_or_else(|| GridError::OutOfBounds(format!("Mass action {} is not defined", index)))?;

		let callback = match action.get_callback() {
			Some(MassActionCallback::Delegated { controller, .. }) if !controller.contains(':') => {
				return Err(GridError::Runtime(format!(
					"Callback {} is not callable or Controller action",
					controller
				)));
			}
			Some(callback) => callback.clone(),
			None => {
				return Err(GridError::Runtime(format!(
					"Mass action {} has no callback",
					action.title()
				)));
			}
		};

		let all_keys = self.request_flag(keys::MASS_ACTION_ALL_KEYS_SELECTED);
		let mut primary_keys = match self.request_data.get(MASS_ACTION_COLUMN_ID) {
			Some(Value::Object(selected)) => selected.keys().cloned().map(Value::String).collect(),
			Some(Value::Array(selected)) => selected.clone(),
			_ => Vec::new(),
		};

		self.session_data.page = Some(0);
		self.save_session()?;
		self.process_session_data()?;
		if all_keys {
			self.page = 0;
			self.limit = 0;
		}
		self.prepare()?;
		if all_keys {
			primary_keys = self.rows.primary_keys();
		}

		debug!(
			grid = self.hash.as_deref().unwrap_or_default(),
			action = action.title(),
			rows = primary_keys.len(),
			all_keys,
			"Running mass action"
		);

		match callback {
			MassActionCallback::Inline(callback) => {
				let context = MassActionContext {
					primary_keys,
					all_keys,
					session: self.session.clone(),
					parameters: action.parameters().clone(),
				};
				self.mass_action_response = callback(&context)?;
			}
			MassActionCallback::Delegated {
				controller,
				parameters,
			} => {
				let dispatcher = self.services.dispatcher.clone().ok_or_else(|| {
					GridError::Runtime(format!(
						"No action dispatcher is available to forward to {}",
						controller
					))
				})?;
				let mut attributes = IndexMap::new();
				attributes.insert("primaryKeys".to_string(), Value::Array(primary_keys));
				attributes.insert("allPrimaryKeys".to_string(), Value::Bool(all_keys));
				attributes.insert(
					keys::CONTROLLER_ATTRIBUTE.to_string(),
					Value::String(controller.clone()),
				);
				for (name, value) in action.parameters().iter().chain(parameters.iter()) {
					attributes.insert(name.clone(), value.clone());
				}
				self.mass_action_response = Some(dispatcher.dispatch(&controller, attributes)?);
			}
		}
		Ok(true)
	}

	/// Produces the export at `index` over the whole filtered result set.
	/// Returns false when no export was selected.
	pub(crate) fn process_export(&mut self, index: Option<i64>) -> Result<bool> {
		let Some(index) = index.filter(|index| *index >= 0) else {
			return Ok(false);
		};
		let export = usize::try_from(index)
			.ok()
			.and_then(|index| self.exports.get(index))
			.cloned()
			.ok_or_else(|| GridError::OutOfBounds(format!("Export {} is not defined", index)))?;

		self.is_ready_for_export = true;
		self.process_session_data()?;
		self.page = 0;
		self.limit = 0;
		self.prepare()?;

		let mut export = export.lock();
		debug!(
			grid = self.hash.as_deref().unwrap_or_default(),
			export = export.title(),
			rows = self.rows.len(),
			"Running export"
		);
		export.compute_data(&*self)?;
		self.export_response = Some(export.response()?);
		Ok(true)
	}

	fn process_tweak(&mut self, id: &str) -> Result<TweakOutcome> {
		let Some(tweak) = self.tweaks.get(id).cloned() else {
			trace!(tweak = id, "Ignoring unknown tweak");
			return Ok(TweakOutcome::Unknown);
		};
		let spec = &tweak.spec;
		debug!(grid = self.hash.as_deref().unwrap_or_default(), tweak = id, "Applying tweak");

		if spec.reset {
			self.session_data = SessionData::default();
			if let (Some(session), Some(hash)) = (&self.session, &self.hash) {
				session.remove(hash);
			}
		}

		if let Some(filters) = &spec.filters {
			self.default_filters = filters.clone();
			self.apply_filters(filters, false)?;
		}
		if let Some(order) = &spec.order {
			self.process_order(Some(order.as_str()));
		}
		if let Some(page) = spec.page.and_then(|page| usize::try_from(page).ok()) {
			self.process_page(Some(page), false);
		}
		if let Some(limit) = spec.limit {
			self.process_limit(Some(limit));
		}

		let active = &mut self.session_data.active_tweaks;
		for group in &spec.remove_active_tweaks_groups {
			active.shift_remove(group);
		}
		for removed in &spec.remove_active_tweaks {
			let group = self.tweaks.get(removed).map(|t| t.group_key().to_string());
			if let Some(group) = group {
				if active.get(&group).is_some_and(|current| current == removed) {
					active.shift_remove(&group);
				}
			}
		}
		for added in &spec.add_active_tweaks {
			if let Some(other) = self.tweaks.get(added) {
				active.insert(other.group_key().to_string(), added.clone());
			}
		}
		if spec.changes_state() {
			active.insert(tweak.group_key().to_string(), id.to_string());
		}
		self.save_session()?;

		if let Some(index) = spec.mass_action {
			if self.process_mass_action(Some(index))? {
				return Ok(TweakOutcome::Terminal);
			}
		}
		if let Some(index) = spec.export {
			if self.process_export(Some(index))? {
				return Ok(TweakOutcome::Terminal);
			}
		}
		Ok(TweakOutcome::Applied)
	}

	/// Reads the filters of filterable columns from the request. Returns true
	/// if any was submitted.
	fn process_request_filters(&mut self) -> bool {
		let mut filtering = false;
		for column in self.columns.iter().filter(|column| column.is_filterable()) {
			if let Some(value) = self.request_data.get(column.id()) {
				self.session_data
					.set_filter(column.id(), Some(FilterData::from_value(value.clone())));
				filtering = true;
			}
		}
		filtering
	}

	/// Changing order, limit, filters or running a mass action goes back to
	/// the first page.
	fn process_page(&mut self, page: Option<usize>, filtering: bool) {
		let resets = filtering
			|| [keys::ORDER, keys::LIMIT, keys::MASS_ACTION]
				.iter()
				.any(|key| self.request_data.contains_key(*key));

		if resets {
			self.session_data.page = Some(0);
		} else if let Some(page) = page {
			self.session_data.page = Some(page);
		}
	}

	fn process_order(&mut self, order: Option<&str>) {
		let Some(order) = order else {
			return;
		};
		let (column_id, direction) = split_order(order);
		let sortable = self
			.columns
			.find(column_id)
			.is_some_and(|column| column.is_sortable());

		if sortable && direction.parse::<SortDirection>().is_ok() {
			self.session_data.order = Some(order.to_string());
		} else {
			trace!(order, "Ignoring order on an unknown or unsortable column");
		}
	}

	fn process_limit(&mut self, limit: Option<usize>) {
		match limit {
			Some(limit) if self.limits.contains_key(&limit) => {
				self.session_data.limit = Some(limit);
			}
			Some(limit) => trace!(limit, "Ignoring limit not defined in limits"),
			None => {}
		}
	}

	fn save_session(&self) -> Result<()> {
		if self.session_data.is_empty() {
			return Ok(());
		}
		if let (Some(session), Some(hash)) = (&self.session, &self.hash) {
			session.set(hash, self.session_data.to_value()?);
		}
		Ok(())
	}

	fn request_string(&self, key: &str) -> Option<String> {
		self.request_data
			.get(key)
			.map(value_to_string)
			.filter(|value| !value.is_empty())
	}

	/// Integer parameter; blank and unparsable values read as absent
	fn request_index(&self, key: &str) -> Option<i64> {
		match self.request_data.get(key)? {
			Value::Number(number) => number.as_i64(),
			Value::String(text) => text.trim().parse().ok(),
			_ => None,
		}
	}

	fn request_flag(&self, key: &str) -> bool {
		match self.request_data.get(key) {
			Some(Value::Bool(flag)) => *flag,
			Some(Value::Number(number)) => number.as_i64().is_some_and(|n| n != 0),
			Some(Value::String(text)) => !matches!(text.as_str(), "" | "0" | "false"),
			_ => false,
		}
	}
}

/// Splits `<columnId>|<direction>`
pub(crate) fn split_order(order: &str) -> (&str, &str) {
	order.split_once('|').unwrap_or((order, ""))
}

fn value_to_string(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		Value::Null => String::new(),
		other => other.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("name|asc", ("name", "asc"))]
	#[case("name|", ("name", ""))]
	#[case("name", ("name", ""))]
	#[case("a|b|c", ("a", "b|c"))]
	fn test_split_order(#[case] order: &str, #[case] expected: (&str, &str)) {
		assert_eq!(split_order(order), expected);
	}

	#[rstest]
	#[case(Value::String("x".to_string()), "x")]
	#[case(Value::from(3), "3")]
	#[case(Value::Null, "")]
	fn test_value_to_string(#[case] value: Value, #[case] expected: &str) {
		assert_eq!(value_to_string(&value), expected);
	}
}
