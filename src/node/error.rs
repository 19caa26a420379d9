// Copyright © 2025 Stephan Kunz

//! [`ticktree`](crate) node errors.

// region:      --- modules
use thiserror::Error;

use crate::ConstString;

use super::Status;
// endregion:   --- modules

// region:      --- types
/// Result type definition for node operations.
pub type NodeResult<Output = Status> = Result<Output, Error>;
// endregion:   --- types

// region:      --- Error
/// `node` error type
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum Error {
	/// The user supplied `update` returned an error or panicked.
	#[error("update of [{node}] faulted: {reason}")]
	FaultInUpdate {
		/// The affected node.
		node: ConstString,
		/// What went wrong inside `update`.
		reason: ConstString,
	},
	/// An `update` overran its tick period beyond the leniency factor.
	#[error("update of [{node}] took {elapsed_ms}ms, budget is {budget_ms}ms")]
	TickPeriodViolation {
		/// The affected node.
		node: ConstString,
		/// Measured duration of the `update`.
		elapsed_ms: u64,
		/// Allowed duration, `tick_period_ms` times the leniency factor.
		budget_ms: u64,
	},
	/// A child crashed more often than the restart policy allows.
	#[error("restart budget for [{node}] exceeded")]
	RestartBudgetExceeded {
		/// The affected node.
		node: ConstString,
	},
	/// A status transition outside the automaton was observed. Fatal.
	#[error("impossible status transition [{from} -> {to}] in [{node}]")]
	InvariantBreached {
		/// The affected node.
		node: ConstString,
		/// Status before the transition.
		from: Status,
		/// The invalid target status.
		to: Status,
	},
	/// `reset` was requested while the node is [`Status::Running`].
	#[error("reset of [{node}] rejected while running")]
	ResetWhileRunning {
		/// The affected node.
		node: ConstString,
	},
	/// The node's worker is gone, its channel is closed.
	#[error("node [{node}] is unreachable")]
	NodeUnreachable {
		/// The affected node.
		node: ConstString,
	},
	/// An `action_ref` or `priority_ref` did not resolve at spawn time.
	#[error("reference [{reference}] of node [{node}] is not registered")]
	Unresolved {
		/// The affected node.
		node: ConstString,
		/// The unresolved reference.
		reference: ConstString,
	},
}
// endregion:   --- Error
