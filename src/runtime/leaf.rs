// Copyright © 2025 Stephan Kunz

//! The leaf worker hosting a user supplied [`Action`].

// region:      --- modules
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::{
	ConstString, MAX_CONSECUTIVE_VIOLATIONS,
	node::{Action, ActionCreationFn, NodeError, NodeResult, Status},
	observer::TreeEvent,
	spec::NodeSpec,
};

use super::{Command, Shared};
// endregion:   --- modules

// region:      --- LeafWorker
/// One task per leaf.
///
/// The action instance is the node's `user_state`, exclusively owned here.
/// The creation function is kept so that `reset` and a supervised restart
/// re-initialize the state from scratch.
pub(crate) struct LeafWorker {
	spec: Arc<NodeSpec>,
	shared: Arc<Shared>,
	action: Box<dyn Action>,
	creation: Arc<ActionCreationFn>,
	status_tx: watch::Sender<Status>,
	rx: mpsc::Receiver<Command>,
	kill: watch::Receiver<bool>,
	/// Deadline gate, ticks arriving earlier do not run `update`.
	next_due_ms: u64,
	/// Consecutive tick period violations.
	violations: u32,
}

impl LeafWorker {
	pub(crate) fn new(
		spec: Arc<NodeSpec>,
		shared: Arc<Shared>,
		creation: Arc<ActionCreationFn>,
		status_tx: watch::Sender<Status>,
		rx: mpsc::Receiver<Command>,
	) -> Self {
		let kill = shared.kill.clone();
		let action = creation();
		Self {
			spec,
			shared,
			action,
			creation,
			status_tx,
			rx,
			kill,
			next_due_ms: 0,
			violations: 0,
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
							let result = self.on_reset();
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
		debug!(node_id = %self.spec.id, "leaf worker finished");
	}

	fn id(&self) -> ConstString {
		self.spec.id.as_str().into()
	}

	fn current(&self) -> Status {
		*self.status_tx.borrow()
	}

	/// Publish `to` and emit the matching event.
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
		debug!(node_id = %self.spec.id, %from, %to, "leaf status");
	}

	async fn terminate(&mut self, status: Status) {
		self.set_status(status);
		self.action
			.on_terminate(status, &self.shared.context)
			.await;
	}

	/// Convert a fault into [`Status::Aborted`], the supervisor decides
	/// about a restart.
	async fn fault(&mut self, error: NodeError) -> Status {
		self.shared
			.settings
			.error_sink
			.fault(&self.spec.id, &error);
		let event = TreeEvent::fault(
			self.id(),
			self.shared.settings.clock.now_ms(),
			self.current(),
			error.to_string().into(),
		);
		self.shared.settings.event_sink.emit(&event);
		self.terminate(Status::Aborted).await;
		Status::Aborted
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
			self.action.on_init(&self.shared.context).await;
			self.set_status(Status::Running);
		}

		let started_ms = self.shared.settings.clock.now_ms();
		let result = self.action.update(&self.shared.context).await;
		let elapsed_ms = self
			.shared
			.settings
			.clock
			.now_ms()
			.saturating_sub(started_ms);

		match result {
			Ok(next) => self.apply(next, started_ms, elapsed_ms).await,
			Err(error) => Ok(self.fault(error).await),
		}
	}

	async fn apply(&mut self, next: Status, started_ms: u64, elapsed_ms: u64) -> NodeResult {
		let period_ms = self.spec.tick_period_ms;
		let budget_ms = self.budget_ms();

		if elapsed_ms > budget_ms {
			self.violations += 1;
			let violation = NodeError::TickPeriodViolation {
				node: self.id(),
				elapsed_ms,
				budget_ms,
			};
			self.shared
				.settings
				.error_sink
				.fault(&self.spec.id, &violation);
			warn!(node_id = %self.spec.id, elapsed_ms, budget_ms, violations = self.violations, "tick period violated");
			if self.violations >= MAX_CONSECUTIVE_VIOLATIONS {
				let error = NodeError::FaultInUpdate {
					node: self.id(),
					reason: "tick period violated three times in a row".into(),
				};
				return Ok(self.fault(error).await);
			}
		} else {
			self.violations = 0;
		}

		// catch up instead of queuing missed ticks
		self.next_due_ms = if elapsed_ms >= period_ms {
			self.shared.settings.clock.now_ms() + period_ms
		} else {
			started_ms + period_ms
		};

		if next == Status::Fresh {
			let error = NodeError::InvariantBreached {
				node: self.id(),
				from: Status::Running,
				to: Status::Fresh,
			};
			self.shared
				.settings
				.error_sink
				.fault(&self.spec.id, &error);
			self.terminate(Status::Aborted).await;
			return Err(error);
		}

		if next.is_terminal() {
			self.terminate(next).await;
		}
		Ok(self.current())
	}

	async fn on_abort(&mut self) {
		let current = self.current();
		// a node that never started has nothing to terminate
		if current == Status::Fresh || current.is_terminal() {
			return;
		}
		self.terminate(Status::Aborted).await;
	}

	/// A teardown mid-activation still owes the action its `on_terminate`.
	async fn on_stop(&mut self) {
		if self.current().is_active() {
			self.terminate(Status::Aborted).await;
		}
	}

	fn on_reset(&mut self) -> Result<(), NodeError> {
		let current = self.current();
		if current.is_active() {
			return Err(NodeError::ResetWhileRunning { node: self.id() });
		}
		self.action = (self.creation)();
		self.violations = 0;
		self.next_due_ms = 0;
		self.set_status(Status::Fresh);
		Ok(())
	}

	#[allow(clippy::cast_precision_loss)]
	#[allow(clippy::cast_possible_truncation)]
	#[allow(clippy::cast_sign_loss)]
	fn budget_ms(&self) -> u64 {
		let factor = self.shared.settings.tick_leniency_factor;
		(self.spec.tick_period_ms as f64 * factor) as u64
	}
}
// endregion:   --- LeafWorker
