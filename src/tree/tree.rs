// Copyright © 2025 Stephan Kunz

//! [`Tree`] implementation.

// region:      --- modules
use std::{sync::Arc, time::Duration};

use tokio::{
	sync::watch,
	task::JoinHandle,
	time::{MissedTickBehavior, timeout},
};
use tracing::debug;
use uuid::Uuid;

use crate::{
	error::Error,
	factory::ActionRegistry,
	node::Status,
	runtime::{Context, NodeHandle, Shared, spawn_node},
	spec::NodeSpec,
};

use super::supervisor::{TickSource, TreeSettings};
// endregion:   --- modules

// region:      --- Tree
/// A spawned, supervised tree of node workers.
///
/// The handle exclusively owns the root worker. Dropping it takes the whole
/// worker hierarchy down, [`shutdown`](Self::shutdown) does the same
/// gracefully and bounded.
pub struct Tree {
	/// The trees unique id.
	uuid: Uuid,
	spec: Arc<NodeSpec>,
	root: NodeHandle,
	root_join: JoinHandle<()>,
	/// The ambient tick timer, [`TickSource::Timer`] only.
	driver: Option<JoinHandle<()>>,
	/// Force shutdown signal into every worker.
	kill: watch::Sender<bool>,
	settings: TreeSettings,
	context: Context,
}

impl Tree {
	/// Instantiate the supervised worker hierarchy for `spec`.
	pub(crate) fn spawn(
		spec: Arc<NodeSpec>,
		context: Context,
		registry: Arc<ActionRegistry>,
		settings: TreeSettings,
	) -> Result<Self, Error> {
		let (kill, kill_rx) = watch::channel(false);
		let shared = Arc::new(Shared {
			context: context.clone(),
			registry,
			settings: settings.clone(),
			kill: kill_rx,
		});
		let spawned = spawn_node(&spec, &shared)?;

		let driver = match settings.tick_source {
			TickSource::Timer => {
				let handle = spawned.handle.clone();
				let period = Duration::from_millis(spec.tick_period_ms);
				Some(tokio::spawn(async move {
					let mut interval = tokio::time::interval(period);
					interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
					loop {
						interval.tick().await;
						if handle.tick().await.is_err() {
							break;
						}
					}
				}))
			}
			TickSource::External => None,
		};

		Ok(Self {
			uuid: Uuid::new_v4(),
			spec,
			root: spawned.handle,
			root_join: spawned.join,
			driver,
			kill,
			settings,
			context,
		})
	}

	/// The tree's unique id.
	#[must_use]
	pub const fn uuid(&self) -> Uuid {
		self.uuid
	}

	/// The compiled spec this tree was built from.
	#[must_use]
	pub fn spec(&self) -> &NodeSpec {
		&self.spec
	}

	/// The context shared with every `update`.
	#[must_use]
	pub const fn context(&self) -> &Context {
		&self.context
	}

	/// Current root status, read without a round trip.
	#[must_use]
	pub fn status(&self) -> Status {
		self.root.status()
	}

	/// Progress the root by one tick and return its status afterwards.
	///
	/// Not needed in [`TickSource::Timer`] mode, where the root ticks
	/// itself on its own period.
	/// # Errors
	/// - if an invariant was breached, which aborts the whole tree
	/// - if the root worker is gone
	pub async fn tick(&mut self) -> Result<Status, Error> {
		Ok(self.root.tick().await?)
	}

	/// Abort the tree.
	///
	/// Returns once `on_terminate(Aborted)` ran on the root and all its
	/// live descendants. Aborting a terminal or never started tree is a
	/// no-op.
	/// # Errors
	/// - if the root worker is gone
	pub async fn abort(&mut self) -> Result<(), Error> {
		Ok(self.root.abort().await?)
	}

	/// Return every node to [`Status::Fresh`] for a new activation.
	///
	/// Accepted from [`Status::Fresh`] or a terminal status.
	/// # Errors
	/// - [`NodeError::ResetWhileRunning`](crate::node::NodeError::ResetWhileRunning)
	///   while the tree is running
	pub async fn reset(&mut self) -> Result<(), Error> {
		Ok(self.root.reset().await?)
	}

	/// Bounded, graceful teardown.
	///
	/// Every parent stops its children LIFO, waiting up to the child ack
	/// deadline each; the whole teardown is bounded by the force deadline,
	/// beyond which remaining workers are terminated forcefully.
	/// # Errors
	/// - [`ShutdownDeadlineExceeded`](crate::tree::error::Error::ShutdownDeadlineExceeded)
	///   if the force deadline passed
	pub async fn shutdown(mut self) -> Result<(), Error> {
		if let Some(driver) = self.driver.take() {
			driver.abort();
		}
		let force_ms = self.settings.shutdown_deadlines.force_ms;
		let graceful = timeout(Duration::from_millis(force_ms), self.root.stop()).await;
		match graceful {
			Ok(_ack) => {
				debug!(uuid = %self.uuid, "tree shut down");
				Ok(())
			}
			Err(_elapsed) => {
				let _ = self.kill.send(true);
				self.root_join.abort();
				Err(Error::Tree(super::error::Error::ShutdownDeadlineExceeded { force_ms }))
			}
		}
	}
}

impl Drop for Tree {
	fn drop(&mut self) {
		if let Some(driver) = self.driver.take() {
			driver.abort();
		}
		let _ = self.kill.send(true);
	}
}
// endregion:   --- Tree
