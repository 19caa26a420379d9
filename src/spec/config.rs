// Copyright © 2025 Stephan Kunz

//! Declarative tree configuration and the [`compile`] step.

// region:      --- modules
use std::collections::HashSet;

use crate::factory::ActionRegistry;

use super::{
	error::Error,
	node_spec::{NodeKind, NodeSpec, SuccessPolicy},
};
// endregion:   --- modules

// region:      --- NodeConfig
/// One entry of the nested declarative configuration.
///
/// The `kind` is a free string so that configurations coming from outside
/// the type system (deserialized, user edited) are validated by
/// [`compile`] instead of by construction.
#[derive(Clone, Debug, Default)]
pub struct NodeConfig {
	/// Unique id within the tree.
	pub id: String,
	/// Human readable name, defaults to the id.
	pub name: String,
	/// One of `Sequence`, `Selector`, `Parallel`, `Priority`, `Action`.
	pub kind: String,
	/// Milliseconds between successive ticks, defaults to 50.
	pub tick_period_ms: Option<u64>,
	/// Children of a composite entry.
	pub children: Vec<NodeConfig>,
	/// Name of the registered action, Action entries only.
	pub action_ref: Option<String>,
	/// Name of the registered priority function, Priority entries only.
	pub priority_ref: Option<String>,
	/// Termination policy, Parallel entries only.
	pub success_policy: Option<SuccessPolicy>,
}

impl NodeConfig {
	/// An entry of arbitrary kind.
	#[must_use]
	pub fn new(kind: &str, id: &str) -> Self {
		Self {
			id: id.into(),
			kind: kind.into(),
			..Default::default()
		}
	}

	/// A Sequence entry.
	#[must_use]
	pub fn sequence(id: &str) -> Self {
		Self::new(crate::SEQUENCE, id)
	}

	/// A Selector entry.
	#[must_use]
	pub fn selector(id: &str) -> Self {
		Self::new(crate::SELECTOR, id)
	}

	/// A Parallel entry with the given policy.
	#[must_use]
	pub fn parallel(id: &str, policy: SuccessPolicy) -> Self {
		let mut config = Self::new(crate::PARALLEL, id);
		config.success_policy = Some(policy);
		config
	}

	/// A Priority entry using the registered priority function.
	#[must_use]
	pub fn priority(id: &str, priority_ref: &str) -> Self {
		let mut config = Self::new(crate::PRIORITY, id);
		config.priority_ref = Some(priority_ref.into());
		config
	}

	/// An Action entry using the registered action.
	#[must_use]
	pub fn action(id: &str, action_ref: &str) -> Self {
		let mut config = Self::new(crate::ACTION, id);
		config.action_ref = Some(action_ref.into());
		config
	}

	/// Set the name.
	#[must_use]
	pub fn with_name(mut self, name: &str) -> Self {
		self.name = name.into();
		self
	}

	/// Set the tick period.
	#[must_use]
	pub const fn with_tick_period(mut self, period_ms: u64) -> Self {
		self.tick_period_ms = Some(period_ms);
		self
	}

	/// Append a child entry.
	#[must_use]
	pub fn with_child(mut self, child: Self) -> Self {
		self.children.push(child);
		self
	}

	/// Append several child entries.
	#[must_use]
	pub fn with_children<I>(mut self, children: I) -> Self
	where
		I: IntoIterator<Item = Self>,
	{
		self.children.extend(children);
		self
	}
}
// endregion:   --- NodeConfig

// region:      --- compile
/// Validate `config` against `registry` and produce the [`NodeSpec`] tree.
///
/// Pure validation, no workers are allocated here.
/// # Errors
/// - one of the [`Error`](crate::spec::ConfigError) kinds per violated rule
pub fn compile(config: &NodeConfig, registry: &ActionRegistry) -> Result<NodeSpec, Error> {
	let mut seen = HashSet::new();
	compile_entry(config, registry, &mut seen)
}

fn compile_entry(
	config: &NodeConfig,
	registry: &ActionRegistry,
	seen: &mut HashSet<String>,
) -> Result<NodeSpec, Error> {
	let kind: NodeKind = config.kind.parse()?;

	if !seen.insert(config.id.clone()) {
		return Err(Error::DuplicateId(config.id.as_str().into()));
	}

	let tick_period_ms = config
		.tick_period_ms
		.unwrap_or(crate::DEFAULT_TICK_PERIOD_MS);
	if tick_period_ms < 1 {
		return Err(Error::TickPeriodTooLow {
			node: config.id.as_str().into(),
			period_ms: tick_period_ms,
		});
	}

	match kind {
		NodeKind::Action => compile_leaf(config, registry, tick_period_ms),
		_ => compile_composite(config, registry, kind, tick_period_ms, seen),
	}
}

fn compile_leaf(
	config: &NodeConfig,
	registry: &ActionRegistry,
	tick_period_ms: u64,
) -> Result<NodeSpec, Error> {
	if !config.children.is_empty() {
		return Err(Error::LeafWithChildren(config.id.as_str().into()));
	}
	let action_ref = config.action_ref.as_deref().unwrap_or_default();
	if !registry.has_action(action_ref) {
		return Err(Error::ActionMissing {
			node: config.id.as_str().into(),
			action: action_ref.into(),
		});
	}
	Ok(NodeSpec {
		id: config.id.clone(),
		name: name_of(config),
		kind: NodeKind::Action,
		tick_period_ms,
		children: Vec::new(),
		action_ref: Some(action_ref.into()),
		priority_ref: None,
		success_policy: None,
	})
}

fn compile_composite(
	config: &NodeConfig,
	registry: &ActionRegistry,
	kind: NodeKind,
	tick_period_ms: u64,
	seen: &mut HashSet<String>,
) -> Result<NodeSpec, Error> {
	if config.children.is_empty() {
		return Err(Error::CompositeWithoutChildren(config.id.as_str().into()));
	}

	let success_policy = match kind {
		NodeKind::Parallel => {
			let policy = config.success_policy.unwrap_or_default();
			if let SuccessPolicy::K(k) = policy {
				let n = config.children.len();
				if k < 1 || k as usize > n {
					return Err(Error::InvalidSuccessPolicy {
						node: config.id.as_str().into(),
						k,
						n,
					});
				}
			}
			Some(policy)
		}
		// normalized away on every other kind
		_ => None,
	};

	let priority_ref = if kind == NodeKind::Priority {
		if let Some(priority) = config.priority_ref.as_deref() {
			if !registry.has_priority(priority) {
				return Err(Error::PriorityMissing {
					node: config.id.as_str().into(),
					priority: priority.into(),
				});
			}
			Some(priority.to_string())
		} else {
			// without a priority function the node degenerates to a Selector
			None
		}
	} else {
		None
	};

	let mut children = Vec::with_capacity(config.children.len());
	for child in &config.children {
		children.push(compile_entry(child, registry, seen)?);
	}

	Ok(NodeSpec {
		id: config.id.clone(),
		name: name_of(config),
		kind,
		tick_period_ms,
		children,
		action_ref: None,
		priority_ref,
		success_policy,
	})
}

fn name_of(config: &NodeConfig) -> String {
	if config.name.is_empty() {
		config.id.clone()
	} else {
		config.name.clone()
	}
}
// endregion:   --- compile
