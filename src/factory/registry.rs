// Copyright © 2025 Stephan Kunz

//! Registry of actions and priority functions.

// region:      --- modules
use std::{boxed::Box, collections::HashMap, sync::Arc};

use crate::{
	ConstString,
	node::{Action, ActionCreationFn, ActionFn, ActionTickFn},
	runtime::Context,
};

use super::error::Error;
// endregion:   --- modules

// region:      --- types
/// A user supplied priority function.
///
/// Receives the context and the number of children, returns the permutation
/// of child indices in which a Priority node ticks its children.
pub type PriorityFn = dyn Fn(&Context, usize) -> Vec<usize> + Send + Sync;
// endregion:   --- types

// region:      --- ActionRegistry
/// Name resolution for `action_ref` and `priority_ref`.
///
/// Creation functions are kept beyond tree construction: the supervisor
/// re-creates an action from its entry whenever a leaf is restarted or
/// reset.
#[derive(Clone, Default)]
pub struct ActionRegistry {
	actions: HashMap<ConstString, Arc<ActionCreationFn>>,
	priorities: HashMap<ConstString, Arc<PriorityFn>>,
}

impl core::fmt::Debug for ActionRegistry {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("ActionRegistry")
			.field("actions", &self.actions.keys())
			.field("priorities", &self.priorities.keys())
			.finish()
	}
}

impl ActionRegistry {
	/// Register an action through its creation function.
	/// # Errors
	/// - if the name is already taken
	pub fn register_action(&mut self, name: &str, creation: Box<ActionCreationFn>) -> Result<(), Error> {
		if self.actions.contains_key(name) {
			return Err(Error::ActionAlreadyRegistered(name.into()));
		}
		self.actions.insert(name.into(), Arc::from(creation));
		Ok(())
	}

	/// Register a default constructible action type.
	/// # Errors
	/// - if the name is already taken
	pub fn register_action_type<T>(&mut self, name: &str) -> Result<(), Error>
	where
		T: Action + Default + 'static,
	{
		self.register_action(name, Box::new(|| -> Box<dyn Action> { Box::new(T::default()) }))
	}

	/// Register a plain function as an action.
	/// # Errors
	/// - if the name is already taken
	pub fn register_action_fn(&mut self, name: &str, func: Arc<ActionTickFn>) -> Result<(), Error> {
		self.register_action(
			name,
			Box::new(move || -> Box<dyn Action> { Box::new(ActionFn::new(func.clone())) }),
		)
	}

	/// Register a priority function.
	/// # Errors
	/// - if the name is already taken
	pub fn register_priority_fn<F>(&mut self, name: &str, func: F) -> Result<(), Error>
	where
		F: Fn(&Context, usize) -> Vec<usize> + Send + Sync + 'static,
	{
		if self.priorities.contains_key(name) {
			return Err(Error::PriorityAlreadyRegistered(name.into()));
		}
		self.priorities.insert(name.into(), Arc::new(func));
		Ok(())
	}

	/// Returns `true` if an action with that name is registered.
	#[must_use]
	pub fn has_action(&self, name: &str) -> bool {
		self.actions.contains_key(name)
	}

	/// Returns `true` if a priority function with that name is registered.
	#[must_use]
	pub fn has_priority(&self, name: &str) -> bool {
		self.priorities.contains_key(name)
	}

	/// The creation function registered under `name`.
	#[must_use]
	pub fn creation_fn(&self, name: &str) -> Option<Arc<ActionCreationFn>> {
		self.actions.get(name).cloned()
	}

	/// The priority function registered under `name`.
	#[must_use]
	pub fn priority_fn(&self, name: &str) -> Option<Arc<PriorityFn>> {
		self.priorities.get(name).cloned()
	}
}
// endregion:   --- ActionRegistry
