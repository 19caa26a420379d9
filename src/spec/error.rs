// Copyright © 2025 Stephan Kunz

//! [`NodeSpec`](crate::spec::NodeSpec) compiler errors.

// region:      --- modules
use thiserror::Error;

use crate::ConstString;
// endregion:   --- modules

// region:      --- Error
/// `spec` error type
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum Error {
	/// The configured kind is none of
	/// Sequence, Selector, Parallel, Priority, Action.
	#[error("unknown node kind [{0}]")]
	UnknownKind(ConstString),
	/// An Action node carries children.
	#[error("action node [{0}] must not have children")]
	LeafWithChildren(ConstString),
	/// A composite node has no children.
	#[error("composite node [{0}] needs at least one child")]
	CompositeWithoutChildren(ConstString),
	/// An Action node misses its `action_ref` or it does not resolve.
	#[error("action [{action}] of node [{node}] is not registered")]
	ActionMissing {
		/// The affected node.
		node: ConstString,
		/// The unresolved action reference.
		action: ConstString,
	},
	/// A `priority_ref` does not resolve.
	#[error("priority function [{priority}] of node [{node}] is not registered")]
	PriorityMissing {
		/// The affected node.
		node: ConstString,
		/// The unresolved priority reference.
		priority: ConstString,
	},
	/// A tick period below one millisecond.
	#[error("tick period of node [{node}] is {period_ms}ms, minimum is 1ms")]
	TickPeriodTooLow {
		/// The affected node.
		node: ConstString,
		/// The rejected period.
		period_ms: u64,
	},
	/// Two nodes share an id.
	#[error("duplicate node id [{0}]")]
	DuplicateId(ConstString),
	/// A Parallel success policy of `k` outside `[1, n]`.
	#[error("success policy k={k} of node [{node}] is outside [1, {n}]")]
	InvalidSuccessPolicy {
		/// The affected node.
		node: ConstString,
		/// The requested threshold.
		k: u32,
		/// The number of children.
		n: usize,
	},
	/// A serialized spec that does not parse back.
	#[error("deserializing node spec failed: {0}")]
	Json(ConstString),
}
// endregion:   --- Error
