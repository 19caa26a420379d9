// Copyright © 2025 Stephan Kunz

//! [`MockAction`] implementation.

// region:      --- modules
use std::sync::{
	Arc,
	atomic::{AtomicU32, Ordering},
};

use spin::Mutex;

use crate::{ConstString, runtime::Context};

use super::{Action, ActionCreationFn, NodeError, NodeResult, Status};
// endregion:   --- modules

// region:      --- MockProbe
/// Counters shared between a [`MockAction`] and the test observing it.
///
/// The probe survives restarts of the action, lifecycle invocations keep
/// accumulating across re-creations.
#[derive(Debug, Default)]
pub struct MockProbe {
	inits: AtomicU32,
	updates: AtomicU32,
	terminates: AtomicU32,
	last_terminal: Mutex<Option<Status>>,
}

impl MockProbe {
	/// Number of `on_init` invocations so far.
	#[must_use]
	pub fn inits(&self) -> u32 {
		self.inits.load(Ordering::SeqCst)
	}

	/// Number of `update` invocations so far.
	#[must_use]
	pub fn updates(&self) -> u32 {
		self.updates.load(Ordering::SeqCst)
	}

	/// Number of `on_terminate` invocations so far.
	#[must_use]
	pub fn terminates(&self) -> u32 {
		self.terminates.load(Ordering::SeqCst)
	}

	/// The status passed to the most recent `on_terminate`.
	#[must_use]
	pub fn last_terminal(&self) -> Option<Status> {
		*self.last_terminal.lock()
	}
}
// endregion:   --- MockProbe

// region:      --- MockActionConfig
/// Configuration for the [`MockAction`].
#[derive(Clone)]
pub struct MockActionConfig {
	/// The [`Status`] returned by the `ticks_to_complete`th update.
	pub final_status: Status,
	/// Which update returns `final_status`, earlier ones return
	/// [`Status::Running`]. `1` completes on the first update.
	pub ticks_to_complete: u32,
	/// Panic inside this update, counted per activation.
	pub panic_on_tick: Option<u32>,
	/// Return an error from this update, counted per activation.
	pub error_on_tick: Option<u32>,
	/// Shared lifecycle counters.
	pub probe: Option<Arc<MockProbe>>,
}

impl Default for MockActionConfig {
	fn default() -> Self {
		Self {
			final_status: Status::Success,
			ticks_to_complete: 1,
			panic_on_tick: None,
			error_on_tick: None,
			probe: None,
		}
	}
}

impl core::fmt::Debug for MockActionConfig {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("MockActionConfig")
			.field("final_status", &self.final_status)
			.field("ticks_to_complete", &self.ticks_to_complete)
			.field("panic_on_tick", &self.panic_on_tick)
			.field("error_on_tick", &self.error_on_tick)
			.finish_non_exhaustive()
	}
}

impl MockActionConfig {
	/// Creates a configuration completing with `final_status` after
	/// `ticks_to_complete` updates.
	#[must_use]
	pub fn new(final_status: Status, ticks_to_complete: u32) -> Self {
		Self {
			final_status,
			ticks_to_complete,
			..Default::default()
		}
	}

	/// Attach a [`MockProbe`].
	#[must_use]
	pub fn with_probe(mut self, probe: Arc<MockProbe>) -> Self {
		self.probe = Some(probe);
		self
	}
}
// endregion:   --- MockActionConfig

// region:      --- MockAction
/// A configurable action usable for mocking et. al.
///
/// Gated behind feature `mock_action`.
#[derive(Debug, Default)]
pub struct MockAction {
	config: MockActionConfig,
	tick_count: u32,
}

impl MockAction {
	/// Constructor with configuration.
	#[must_use]
	pub const fn new(config: MockActionConfig) -> Self {
		Self { config, tick_count: 0 }
	}

	/// A creation function for registering this mock with a factory.
	#[must_use]
	pub fn creation_fn(config: MockActionConfig) -> Box<ActionCreationFn> {
		Box::new(move || Box::new(Self::new(config.clone())))
	}

	fn name(&self) -> ConstString {
		"MockAction".into()
	}
}

#[async_trait::async_trait]
impl Action for MockAction {
	async fn on_init(&mut self, _ctx: &Context) {
		self.tick_count = 0;
		if let Some(probe) = &self.config.probe {
			probe.inits.fetch_add(1, Ordering::SeqCst);
		}
	}

	#[allow(clippy::panic)]
	async fn update(&mut self, _ctx: &Context) -> NodeResult {
		self.tick_count += 1;
		if let Some(probe) = &self.config.probe {
			probe.updates.fetch_add(1, Ordering::SeqCst);
		}
		if self.config.panic_on_tick == Some(self.tick_count) {
			panic!("mock action panicked on tick {}", self.tick_count);
		}
		if self.config.error_on_tick == Some(self.tick_count) {
			return Err(NodeError::FaultInUpdate {
				node: self.name(),
				reason: "mock action error".into(),
			});
		}
		Ok(if self.tick_count >= self.config.ticks_to_complete {
			self.config.final_status
		} else {
			Status::Running
		})
	}

	async fn on_terminate(&mut self, status: Status, _ctx: &Context) {
		if let Some(probe) = &self.config.probe {
			probe.terminates.fetch_add(1, Ordering::SeqCst);
			let mut guard = probe.last_terminal.lock();
			*guard = Some(status);
		}
	}
}
// endregion:   --- MockAction
