// Copyright © 2025 Stephan Kunz

//! [`TreeEvent`] record layout.

// region:      --- modules
use crate::{ConstString, node::Status};
// endregion:   --- modules

// region:      --- EventKind
/// What happened to a node.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EventKind {
	/// The node entered [`Status::Running`] for a new activation.
	#[default]
	Started,
	/// The node's status changed.
	StatusChange,
	/// The node was aborted, externally or by a fault escalation.
	Aborted,
	/// A supervisor restarted the node after a fault.
	Restarted,
	/// The node's update faulted.
	Fault,
}

impl core::fmt::Display for EventKind {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let name = match self {
			Self::Started => "started",
			Self::StatusChange => "status_change",
			Self::Aborted => "aborted",
			Self::Restarted => "restarted",
			Self::Fault => "fault",
		};
		write!(f, "{name}")
	}
}
// endregion:   --- EventKind

// region:      --- TreeEvent
/// A lifecycle event, the stable layout handed to [`EventSink`](crate::observer::EventSink)s.
#[derive(Clone, Debug, Default)]
pub struct TreeEvent {
	/// Id of the affected node.
	pub node_id: ConstString,
	/// Timestamp from the configured [`Clock`](crate::clock::Clock).
	pub ts_ms: u64,
	/// What happened.
	pub kind: EventKind,
	/// Status before the event.
	pub from: Status,
	/// Status after the event.
	pub to: Status,
	/// Fault reason, if any.
	pub reason: Option<ConstString>,
}

impl TreeEvent {
	pub(crate) fn started(node_id: ConstString, ts_ms: u64) -> Self {
		Self {
			node_id,
			ts_ms,
			kind: EventKind::Started,
			from: Status::Fresh,
			to: Status::Running,
			reason: None,
		}
	}

	pub(crate) fn status_change(node_id: ConstString, ts_ms: u64, from: Status, to: Status) -> Self {
		Self {
			node_id,
			ts_ms,
			kind: EventKind::StatusChange,
			from,
			to,
			reason: None,
		}
	}

	pub(crate) fn aborted(node_id: ConstString, ts_ms: u64, from: Status) -> Self {
		Self {
			node_id,
			ts_ms,
			kind: EventKind::Aborted,
			from,
			to: Status::Aborted,
			reason: None,
		}
	}

	pub(crate) fn restarted(node_id: ConstString, ts_ms: u64, from: Status, reason: ConstString) -> Self {
		Self {
			node_id,
			ts_ms,
			kind: EventKind::Restarted,
			from,
			to: Status::Fresh,
			reason: Some(reason),
		}
	}

	pub(crate) fn fault(node_id: ConstString, ts_ms: u64, from: Status, reason: ConstString) -> Self {
		Self {
			node_id,
			ts_ms,
			kind: EventKind::Fault,
			from,
			to: Status::Aborted,
			reason: Some(reason),
		}
	}
}

impl core::fmt::Display for TreeEvent {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(
			f,
			"[{}ms] {} {}: {} -> {}",
			self.ts_ms, self.node_id, self.kind, self.from, self.to
		)?;
		if let Some(reason) = &self.reason {
			write!(f, " ({reason})")?;
		}
		Ok(())
	}
}
// endregion:   --- TreeEvent
