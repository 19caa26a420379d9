// Copyright © 2025 Stephan Kunz

//! The compiled, immutable [`NodeSpec`] tree.

// region:      --- modules
use core::str::FromStr;

use nanoserde::{DeJson, SerJson};

use crate::{ACTION, DEFAULT_TICK_PERIOD_MS, PARALLEL, PRIORITY, SELECTOR, SEQUENCE};

use super::error::Error;
// endregion:   --- modules

// region:      --- NodeKind
/// The kind of a tree node.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, SerJson, DeJson)]
pub enum NodeKind {
	/// Ticks children left to right, fails on the first failure.
	Sequence,
	/// Ticks children left to right, succeeds on the first success.
	Selector,
	/// Ticks all children, combines them under a [`SuccessPolicy`].
	Parallel,
	/// A [`Selector`](Self::Selector) over a per tick reordering of its children.
	Priority,
	/// A leaf hosting a user supplied action.
	Action,
}

impl NodeKind {
	/// Returns `true` for the kinds that tick children.
	#[must_use]
	pub const fn is_composite(self) -> bool {
		!matches!(self, Self::Action)
	}
}

impl FromStr for NodeKind {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			SEQUENCE => Ok(Self::Sequence),
			SELECTOR => Ok(Self::Selector),
			PARALLEL => Ok(Self::Parallel),
			PRIORITY => Ok(Self::Priority),
			ACTION => Ok(Self::Action),
			other => Err(Error::UnknownKind(other.into())),
		}
	}
}

impl core::fmt::Display for NodeKind {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let name = match self {
			Self::Sequence => SEQUENCE,
			Self::Selector => SELECTOR,
			Self::Parallel => PARALLEL,
			Self::Priority => PRIORITY,
			Self::Action => ACTION,
		};
		write!(f, "{name}")
	}
}
// endregion:   --- NodeKind

// region:      --- SuccessPolicy
/// How a Parallel composite combines child statuses.
#[derive(Clone, Copy, Debug, Eq, PartialEq, SerJson, DeJson)]
pub enum SuccessPolicy {
	/// Success as soon as any child succeeds, failure only if all fail.
	Any,
	/// Success iff all children succeed, failure on the first failure.
	All,
	/// Success once `k` children succeeded, failure when `k` successes
	/// become unreachable.
	K(u32),
}

impl Default for SuccessPolicy {
	fn default() -> Self {
		Self::All
	}
}

impl SuccessPolicy {
	/// The number of successes needed among `n` children.
	#[must_use]
	pub const fn required(self, n: usize) -> usize {
		match self {
			Self::Any => 1,
			Self::All => n,
			Self::K(k) => k as usize,
		}
	}
}
// endregion:   --- SuccessPolicy

// region:      --- NodeSpec
/// A compiled tree node.
///
/// Produced by [`compile`](crate::spec::compile), immutable afterwards and
/// shared read-only across all workers of the runtime tree.
#[derive(Clone, Debug, PartialEq, SerJson, DeJson)]
pub struct NodeSpec {
	/// Unique id within the tree.
	pub id: String,
	/// Human readable name, defaults to the id.
	pub name: String,
	/// The kind of this node.
	pub kind: NodeKind,
	/// Milliseconds between successive ticks of this node, at least 1.
	pub tick_period_ms: u64,
	/// Children in declaration order, empty for Action nodes.
	pub children: Vec<NodeSpec>,
	/// Name of the registered action, Action nodes only.
	pub action_ref: Option<String>,
	/// Name of the registered priority function, Priority nodes only.
	pub priority_ref: Option<String>,
	/// Termination policy, Parallel nodes only.
	pub success_policy: Option<SuccessPolicy>,
}

impl Default for NodeSpec {
	fn default() -> Self {
		Self {
			id: String::new(),
			name: String::new(),
			kind: NodeKind::Action,
			tick_period_ms: DEFAULT_TICK_PERIOD_MS,
			children: Vec::new(),
			action_ref: None,
			priority_ref: None,
			success_policy: None,
		}
	}
}

impl NodeSpec {
	/// Number of nodes in this (sub)tree including itself.
	#[must_use]
	pub fn node_count(&self) -> usize {
		1 + self
			.children
			.iter()
			.map(Self::node_count)
			.sum::<usize>()
	}

	/// Find a (sub)spec by id.
	#[must_use]
	pub fn find(&self, id: &str) -> Option<&Self> {
		if self.id == id {
			return Some(self);
		}
		self.children.iter().find_map(|child| child.find(id))
	}

	/// Serialize to JSON.
	#[must_use]
	pub fn to_json(&self) -> String {
		self.serialize_json()
	}

	/// Deserialize from JSON.
	/// # Errors
	/// - if the input is not a serialized [`NodeSpec`]
	pub fn from_json(json: &str) -> Result<Self, Error> {
		Self::deserialize_json(json).map_err(|err| Error::Json(err.to_string().into()))
	}
}
// endregion:   --- NodeSpec
