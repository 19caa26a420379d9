// Copyright © 2025 Stephan Kunz

//! [`NodeHandle`], a parent's view of a child worker.

// region:      --- modules
use tokio::sync::{mpsc, oneshot, watch};

use crate::{
	ConstString,
	node::{NodeError, NodeResult, Status},
};
// endregion:   --- modules

// region:      --- Command
/// The operations a worker answers, each with a reply channel.
pub(crate) enum Command {
	/// Progress the node by one tick, replies the resulting status.
	Tick {
		/// Reply with the status after the tick, or a fatal error.
		reply: oneshot::Sender<NodeResult>,
	},
	/// Abort the node and its non-terminal descendants.
	Abort {
		/// Acknowledged after `on_terminate(Aborted)` ran on all of them.
		reply: oneshot::Sender<()>,
	},
	/// Return the node and its descendants to [`Status::Fresh`].
	Reset {
		/// Rejected while the node is running.
		reply: oneshot::Sender<Result<(), NodeError>>,
	},
	/// Graceful termination of the worker, children first.
	Stop {
		/// Acknowledged when the subtree finished its teardown.
		reply: oneshot::Sender<()>,
	},
}
// endregion:   --- Command

// region:      --- NodeHandle
/// Communication endpoint of one node worker.
///
/// Owned by the parent composite (the [`Tree`](crate::tree::Tree) for the
/// root). The status is a watched value, readable without a round trip;
/// everything else is a command with a reply.
#[derive(Clone)]
pub(crate) struct NodeHandle {
	id: ConstString,
	tx: mpsc::Sender<Command>,
	status: watch::Receiver<Status>,
}

impl NodeHandle {
	pub(crate) const fn new(id: ConstString, tx: mpsc::Sender<Command>, status: watch::Receiver<Status>) -> Self {
		Self { id, tx, status }
	}

	pub(crate) const fn id(&self) -> &ConstString {
		&self.id
	}

	/// The last status published by the worker.
	pub(crate) fn status(&self) -> Status {
		*self.status.borrow()
	}

	/// Tick the node, returns its status after the tick.
	///
	/// [`NodeError::NodeUnreachable`] signals a crashed worker and routes
	/// into the supervisor's restart handling.
	pub(crate) async fn tick(&self) -> NodeResult {
		let (reply, rx) = oneshot::channel();
		if self.tx.send(Command::Tick { reply }).await.is_err() {
			return Err(self.unreachable());
		}
		rx.await.unwrap_or_else(|_| Err(self.unreachable()))
	}

	/// Abort the node, returns after the whole subtree acknowledged.
	pub(crate) async fn abort(&self) -> Result<(), NodeError> {
		let (reply, rx) = oneshot::channel();
		if self.tx.send(Command::Abort { reply }).await.is_err() {
			return Err(self.unreachable());
		}
		rx.await.map_err(|_| self.unreachable())
	}

	/// Reset the node to [`Status::Fresh`].
	pub(crate) async fn reset(&self) -> Result<(), NodeError> {
		let (reply, rx) = oneshot::channel();
		if self.tx.send(Command::Reset { reply }).await.is_err() {
			return Err(self.unreachable());
		}
		rx.await.map_err(|_| self.unreachable())?
	}

	/// Stop the worker gracefully.
	pub(crate) async fn stop(&self) -> Result<(), NodeError> {
		let (reply, rx) = oneshot::channel();
		if self.tx.send(Command::Stop { reply }).await.is_err() {
			return Err(self.unreachable());
		}
		rx.await.map_err(|_| self.unreachable())
	}

	fn unreachable(&self) -> NodeError {
		NodeError::NodeUnreachable { node: self.id.clone() }
	}
}
// endregion:   --- NodeHandle
