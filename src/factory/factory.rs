// Copyright © 2025 Stephan Kunz
//! Factory for creation of supervised [`Tree`]s.
//!
//! The factory couples the [`ActionRegistry`] used to resolve references
//! during compilation with the [`TreeSettings`] handed to every spawned
//! tree.

// region:      --- modules
use std::sync::Arc;

use crate::{
	error::Error,
	runtime::Context,
	spec::{self, ConfigError, NodeConfig, NodeSpec},
	tree::{Tree, TreeSettings},
};

use super::registry::ActionRegistry;
// endregion:   --- modules

// region:      --- TreeFactory
/// Factory for creation of supervised [`Tree`]s.
///
/// ```no_run
/// # use std::sync::Arc;
/// # use ticktree::prelude::*;
/// # fn main() -> Result<(), ticktree::Error> {
/// let mut factory = TreeFactory::new();
/// factory
/// 	.registry_mut()
/// 	.register_action_fn("Succeed", Arc::new(|_ctx| Ok(Status::Success)))?;
///
/// let config = NodeConfig::sequence("root").with_child(NodeConfig::action("leaf", "Succeed"));
/// let spec = factory.compile(&config)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct TreeFactory {
	registry: ActionRegistry,
	settings: TreeSettings,
}

impl TreeFactory {
	/// Create a factory with default [`TreeSettings`] and an empty registry.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a factory with the given settings.
	#[must_use]
	pub fn with_settings(settings: TreeSettings) -> Self {
		Self {
			registry: ActionRegistry::default(),
			settings,
		}
	}

	/// Access the registry.
	#[must_use]
	pub const fn registry(&self) -> &ActionRegistry {
		&self.registry
	}

	/// Access the registry mutable.
	#[must_use]
	pub const fn registry_mut(&mut self) -> &mut ActionRegistry {
		&mut self.registry
	}

	/// Access the settings.
	#[must_use]
	pub const fn settings(&self) -> &TreeSettings {
		&self.settings
	}

	/// Access the settings mutable.
	#[must_use]
	pub const fn settings_mut(&mut self) -> &mut TreeSettings {
		&mut self.settings
	}

	/// Validate `config` against the registry and build its [`NodeSpec`].
	/// # Errors
	/// - one [`ConfigError`] per violated validation rule
	pub fn compile(&self, config: &NodeConfig) -> Result<NodeSpec, ConfigError> {
		spec::compile(config, &self.registry)
	}

	/// Instantiate the supervised tree for `spec`.
	///
	/// Must be called from within a tokio runtime, every node gets its own
	/// task.
	/// # Errors
	/// - if a reference inside `spec` does not resolve against the registry
	pub fn spawn(&self, spec: NodeSpec, context: Context) -> Result<Tree, Error> {
		Tree::spawn(
			Arc::new(spec),
			context,
			Arc::new(self.registry.clone()),
			self.settings.clone(),
		)
	}
}
// endregion:   --- TreeFactory
