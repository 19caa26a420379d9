// Copyright © 2025 Stephan Kunz

//! [`Status`] automaton of a tree node.

// region:      --- modules
use crate::{ABORTED, FAILURE, FRESH, RUNNING, SUCCESS};
// endregion:   --- modules

// region:      --- Status
/// The status of a node. Every node has exactly one at any moment.
///
/// The automaton for one activation is
/// ```text
/// Fresh ──on_init──▶ Running ──update──▶ Running
///                        │                 │
///                        ├──update──▶ Success  (terminal)
///                        ├──update──▶ Failure  (terminal)
///                        └──abort───▶ Aborted  (terminal)
/// Any terminal ──reset──▶ Fresh
/// ```
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Status {
	/// Never ticked, or reset.
	#[default]
	Fresh,
	/// In progress, neither succeeded nor failed yet.
	Running,
	/// Terminal success for this activation.
	Success,
	/// Terminal failure for this activation.
	Failure,
	/// Terminated due to an external abort or an unrecoverable fault.
	Aborted,
}

impl Status {
	/// Returns `true` for [`Status::Success`], [`Status::Failure`] and [`Status::Aborted`].
	#[must_use]
	pub const fn is_terminal(self) -> bool {
		matches!(self, Self::Success | Self::Failure | Self::Aborted)
	}

	/// Returns `true` while the node is in progress.
	#[must_use]
	pub const fn is_active(self) -> bool {
		matches!(self, Self::Running)
	}

	/// Whether `next` is reachable from `self` in the status automaton.
	/// Staying in the same status is always allowed.
	#[must_use]
	pub const fn can_transition_to(self, next: Self) -> bool {
		match self {
			Self::Fresh => matches!(next, Self::Fresh | Self::Running),
			Self::Running => !matches!(next, Self::Fresh),
			// terminal states only leave via reset
			Self::Success => matches!(next, Self::Success | Self::Fresh),
			Self::Failure => matches!(next, Self::Failure | Self::Fresh),
			Self::Aborted => matches!(next, Self::Aborted | Self::Fresh),
		}
	}
}

impl core::fmt::Display for Status {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let name = match self {
			Self::Fresh => FRESH,
			Self::Running => RUNNING,
			Self::Success => SUCCESS,
			Self::Failure => FAILURE,
			Self::Aborted => ABORTED,
		};
		write!(f, "{name}")
	}
}
// endregion:   --- Status
