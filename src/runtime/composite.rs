// Copyright © 2025 Stephan Kunz

//! The composite worker: ticks children, combines their statuses and
//! supervises them.

// region:      --- modules
use std::{sync::Arc, time::Duration};

use tokio::{
	sync::{mpsc, watch},
	task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
	ConstString,
	node::{NodeError, NodeResult, Status},
	observer::TreeEvent,
	spec::NodeSpec,
	tree::supervisor::RestartWindow,
};

use super::{Command, NodeHandle, ParallelState, PriorityState, SelectorState, SequenceState, Shared, Spawned, spawn_node};
// endregion:   --- modules

// region:      --- ChildSlot
/// A composite's ownership record of one child.
pub(crate) struct ChildSlot {
	pub(crate) spec: Arc<NodeSpec>,
	pub(crate) handle: NodeHandle,
	pub(crate) join: JoinHandle<()>,
	pub(crate) restarts: RestartWindow,
	/// Set once the restart budget is exhausted, cleared by `reset`.
	pub(crate) pinned_failure: bool,
}

impl ChildSlot {
	pub(crate) fn new(spec: Arc<NodeSpec>, spawned: Spawned, policy: crate::tree::RestartPolicy) -> Self {
		Self {
			spec,
			handle: spawned.handle,
			join: spawned.join,
			restarts: RestartWindow::new(policy),
			pinned_failure: false,
		}
	}

	/// The child's status as the composite sees it.
	pub(crate) fn status_view(&self) -> Status {
		if self.pinned_failure {
			Status::Failure
		} else {
			self.handle.status()
		}
	}
}
// endregion:   --- ChildSlot

// region:      --- supervision
/// Tick one child under supervision.
///
/// A crashed worker or a spontaneous abort is the fault path: the child is
/// restarted within its budget, beyond it the child is pinned failed for
/// this activation. Only an impossible status transition is fatal and
/// propagates as an error.
pub(crate) async fn tick_child(slot: &mut ChildSlot, shared: &Arc<Shared>) -> NodeResult {
	if slot.pinned_failure {
		return Ok(Status::Failure);
	}
	let before = slot.handle.status();
	match slot.handle.tick().await {
		Ok(status) => {
			if status == Status::Aborted && before != Status::Aborted {
				// the child converted a fault into Aborted
				Ok(restart_child(slot, shared, false).await)
			} else if before.can_transition_to(status) {
				Ok(status)
			} else {
				Err(NodeError::InvariantBreached {
					node: slot.handle.id().clone(),
					from: before,
					to: status,
				})
			}
		}
		Err(NodeError::NodeUnreachable { .. }) => Ok(restart_child(slot, shared, true).await),
		Err(error) => Err(error),
	}
}

/// One-for-one bounded restart of a faulted child.
///
/// Returns the status the composite should treat the child as for this
/// step: [`Status::Running`] after a successful restart (the fresh worker
/// is ticked again on a later step), [`Status::Failure`] once pinned.
async fn restart_child(slot: &mut ChildSlot, shared: &Arc<Shared>, crashed: bool) -> Status {
	if shared.killed() {
		slot.pinned_failure = true;
		return Status::Failure;
	}
	let id = slot.handle.id().clone();
	let reason = if crashed {
		let reason = crash_reason(slot).await;
		let error = NodeError::FaultInUpdate {
			node: id.clone(),
			reason: reason.clone(),
		};
		shared.settings.error_sink.fault(&id, &error);
		reason
	} else {
		"update faulted".into()
	};

	let now_ms = shared.settings.clock.now_ms();
	if slot.restarts.record(now_ms) {
		slot.join.abort();
		match spawn_node(&slot.spec, shared) {
			Ok(spawned) => {
				info!(node_id = %id, %reason, "child restarted");
				shared
					.settings
					.event_sink
					.emit(&TreeEvent::restarted(id, now_ms, Status::Aborted, reason));
				slot.handle = spawned.handle;
				slot.join = spawned.join;
				Status::Running
			}
			Err(error) => {
				shared.settings.error_sink.fault(&id, &error);
				slot.pinned_failure = true;
				Status::Failure
			}
		}
	} else {
		let error = NodeError::RestartBudgetExceeded { node: id.clone() };
		warn!(node_id = %id, "restart budget exceeded, child pinned failed");
		shared.settings.error_sink.fault(&id, &error);
		shared
			.settings
			.event_sink
			.emit(&TreeEvent::fault(id, now_ms, Status::Aborted, "restart budget exceeded".into()));
		slot.pinned_failure = true;
		Status::Failure
	}
}

/// Harvest the panic message of a crashed worker, if any.
async fn crash_reason(slot: &mut ChildSlot) -> ConstString {
	match tokio::time::timeout(Duration::from_millis(10), &mut slot.join).await {
		Ok(Err(join_error)) if join_error.is_panic() => {
			let payload = join_error.into_panic();
			payload.downcast_ref::<&str>().map_or_else(
				|| {
					payload
						.downcast_ref::<String>()
						.map_or_else(|| "update panicked".into(), |s| s.as_str().into())
				},
				|s| (*s).into(),
			)
		}
		_ => "worker crashed".into(),
	}
}
// endregion:   --- supervision

// region:      --- KindLogic
/// Per kind tick logic, dispatched by tag.
pub(crate) enum KindLogic {
	Sequence(SequenceState),
	Selector(SelectorState),
	Parallel(ParallelState),
	Priority(PriorityState),
}

impl KindLogic {
	fn enter(&mut self) {
		match self {
			Self::Sequence(state) => state.enter(),
			Self::Selector(state) => state.enter(),
			Self::Parallel(state) => state.enter(),
			Self::Priority(state) => state.enter(),
		}
	}
}
// endregion:   --- KindLogic

// region:      --- CompositeWorker
/// One task per composite.
///
/// Owns its children, combines their statuses per kind and exposes the
/// same command surface as a leaf to its own parent.
pub(crate) struct CompositeWorker {
	spec: Arc<NodeSpec>,
	shared: Arc<Shared>,
	logic: KindLogic,
	children: Vec<ChildSlot>,
	status_tx: watch::Sender<Status>,
	rx: mpsc::Receiver<Command>,
	kill: watch::Receiver<bool>,
	next_due_ms: u64,
}

impl CompositeWorker {
	pub(crate) fn new(
		spec: Arc<NodeSpec>,
		shared: Arc<Shared>,
		logic: KindLogic,
		children: Vec<ChildSlot>,
		status_tx: watch::Sender<Status>,
		rx: mpsc::Receiver<Command>,
	) -> Self {
		let kill = shared.kill.clone();
		Self {
			spec,
			shared,
			logic,
			children,
			status_tx,
			rx,
			kill,
			next_due_ms: 0,
		}
	}

	/// Serve commands until stopped or the tree goes down.
	pub(crate) async fn run(mut self) {
		loop {
			tokio::select! {
				cmd = self.rx.recv() => {
					let Some(cmd) = cmd else { break };
					match cmd {
						Command::Tick { reply } => {
							let result = self.on_tick().await;
							let _ = reply.send(result);
						}
						Command::Abort { reply } => {
							self.on_abort().await;
							let _ = reply.send(());
						}
						Command::Reset { reply } => {
							let result = self.on_reset().await;
							let _ = reply.send(result);
						}
						Command::Stop { reply } => {
							self.on_stop().await;
							let _ = reply.send(());
							break;
						}
					}
				}
				_ = self.kill.changed() => break,
			}
		}
		debug!(node_id = %self.spec.id, "composite worker finished");
	}

	fn id(&self) -> ConstString {
		self.spec.id.as_str().into()
	}

	fn current(&self) -> Status {
		*self.status_tx.borrow()
	}

	fn set_status(&mut self, to: Status) {
		let from = self.current();
		if from == to {
			return;
		}
		let ts_ms = self.shared.settings.clock.now_ms();
		let event = if from == Status::Fresh && to == Status::Running {
			TreeEvent::started(self.id(), ts_ms)
		} else if to == Status::Aborted {
			TreeEvent::aborted(self.id(), ts_ms, from)
		} else {
			TreeEvent::status_change(self.id(), ts_ms, from, to)
		};
		self.status_tx.send_replace(to);
		self.shared.settings.event_sink.emit(&event);
		debug!(node_id = %self.spec.id, %from, %to, "composite status");
	}

	async fn on_tick(&mut self) -> NodeResult {
		let current = self.current();
		if current.is_terminal() {
			return Ok(current);
		}
		let now = self.shared.settings.clock.now_ms();
		if current.is_active() && now < self.next_due_ms {
			return Ok(current);
		}
		if current == Status::Fresh {
			self.logic.enter();
			self.set_status(Status::Running);
		}
		self.next_due_ms = now + self.spec.tick_period_ms;

		let result = match &mut self.logic {
			KindLogic::Sequence(state) => state.step(&mut self.children, &self.shared).await,
			KindLogic::Selector(state) => state.step(&mut self.children, &self.shared).await,
			KindLogic::Parallel(state) => state.step(&mut self.children, &self.shared).await,
			KindLogic::Priority(state) => state.step(&mut self.children, &self.shared).await,
		};

		match result {
			Ok(status) => {
				if status.is_terminal() {
					self.complete(status).await;
				}
				Ok(self.current())
			}
			Err(fatal) => {
				// a breached invariant takes the whole tree down
				self.shared
					.settings
					.error_sink
					.fault(&self.spec.id, &fatal);
				self.abort_subtree().await;
				Err(fatal)
			}
		}
	}

	/// Reach the terminal `status`, aborting children still running.
	async fn complete(&mut self, status: Status) {
		for slot in self.children.iter().rev() {
			if slot.status_view().is_active() {
				let _ = slot.handle.abort().await;
			}
		}
		self.set_status(status);
	}

	/// Abort self and every non-terminal child, children acknowledged
	/// before the own status flips.
	async fn abort_subtree(&mut self) {
		for slot in self.children.iter().rev() {
			let status = slot.status_view();
			if status != Status::Fresh && !status.is_terminal() {
				let _ = slot.handle.abort().await;
			}
		}
		self.set_status(Status::Aborted);
	}

	async fn on_abort(&mut self) {
		let current = self.current();
		// a node that never started has nothing to terminate
		if current == Status::Fresh || current.is_terminal() {
			return;
		}
		self.abort_subtree().await;
	}

	async fn on_reset(&mut self) -> Result<(), NodeError> {
		let current = self.current();
		if current.is_active() {
			return Err(NodeError::ResetWhileRunning { node: self.id() });
		}
		for slot in &mut self.children {
			slot.pinned_failure = false;
			slot.restarts.clear();
			match slot.handle.reset().await {
				Ok(()) => {}
				Err(NodeError::NodeUnreachable { .. }) => {
					// a dead worker resets by being replaced
					slot.join.abort();
					if let Ok(spawned) = spawn_node(&slot.spec, &self.shared) {
						slot.handle = spawned.handle;
						slot.join = spawned.join;
					}
				}
				Err(error) => return Err(error),
			}
		}
		self.logic.enter();
		self.set_status(Status::Fresh);
		Ok(())
	}

	/// LIFO teardown, children before self, each bounded by the ack
	/// deadline and force-terminated beyond it. A composite torn down
	/// mid-activation terminates as aborted.
	async fn on_stop(&mut self) {
		let ack = Duration::from_millis(self.shared.settings.shutdown_deadlines.child_ack_ms);
		for slot in self.children.iter_mut().rev() {
			if tokio::time::timeout(ack, slot.handle.stop()).await.is_err() {
				warn!(node_id = %slot.handle.id(), "child missed stop deadline, forcing termination");
				slot.join.abort();
			}
		}
		if self.current().is_active() {
			self.set_status(Status::Aborted);
		}
	}
}
// endregion:   --- CompositeWorker
