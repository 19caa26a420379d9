// Copyright © 2025 Stephan Kunz
//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::{
	Arc,
	atomic::{AtomicU32, Ordering},
};

use spin::Mutex;
use ticktree::prelude::*;

// region:      --- CollectingSink
/// Records every event and fault for later assertions.
#[derive(Default)]
pub struct CollectingSink {
	events: Mutex<Vec<TreeEvent>>,
	faults: Mutex<Vec<(String, NodeError)>>,
}

impl EventSink for CollectingSink {
	fn emit(&self, event: &TreeEvent) {
		self.events.lock().push(event.clone());
	}
}

impl ErrorSink for CollectingSink {
	fn fault(&self, node_id: &str, error: &NodeError) {
		self.faults.lock().push((node_id.into(), error.clone()));
	}
}

impl CollectingSink {
	pub fn events(&self) -> Vec<TreeEvent> {
		self.events.lock().clone()
	}

	pub fn faults(&self) -> Vec<(String, NodeError)> {
		self.faults.lock().clone()
	}

	/// How many events of `kind` the node emitted.
	pub fn count(&self, node_id: &str, kind: EventKind) -> usize {
		self.events
			.lock()
			.iter()
			.filter(|event| event.kind == kind && event.node_id.as_ref() == node_id)
			.count()
	}

	/// Position of the first event of `kind` for the node.
	pub fn index_of(&self, node_id: &str, kind: EventKind) -> Option<usize> {
		self.events
			.lock()
			.iter()
			.position(|event| event.kind == kind && event.node_id.as_ref() == node_id)
	}

	/// Position of the first transition of the node to `to`.
	pub fn index_of_transition(&self, node_id: &str, to: Status) -> Option<usize> {
		self.events
			.lock()
			.iter()
			.position(|event| event.node_id.as_ref() == node_id && event.to == to && event.from != to)
	}
}
// endregion:   --- CollectingSink

// region:      --- Harness
/// A factory wired for deterministic tests: manual clock, collecting
/// sinks, externally driven ticks.
pub struct Harness {
	pub clock: Arc<ManualClock>,
	pub sink: Arc<CollectingSink>,
	pub factory: TreeFactory,
}

impl Harness {
	pub fn new() -> Self {
		let clock = Arc::new(ManualClock::default());
		let sink = Arc::new(CollectingSink::default());
		let settings = TreeSettings::default()
			.with_clock(clock.clone())
			.with_event_sink(sink.clone())
			.with_error_sink(sink.clone())
			.with_tick_source(TickSource::External);
		Self {
			clock,
			sink,
			factory: TreeFactory::with_settings(settings),
		}
	}

	/// Tick the tree, advancing the clock by `step_ms` between ticks,
	/// until it reaches a terminal status.
	pub async fn run_until_terminal(
		&self,
		tree: &mut Tree,
		step_ms: u64,
		max_ticks: u32,
	) -> Result<Status, Error> {
		let mut status = tree.status();
		for _ in 0..max_ticks {
			status = tree.tick().await?;
			if status.is_terminal() {
				return Ok(status);
			}
			self.clock.advance(step_ms);
		}
		Ok(status)
	}
}
// endregion:   --- Harness

// region:      --- FlakyAction
/// Panics on one specific update counted across restarts, otherwise
/// succeeds after a per-activation amount of updates.
pub struct FlakyAction {
	global_updates: Arc<AtomicU32>,
	panic_on_global: u32,
	succeed_after: u32,
	instance_updates: u32,
}

impl FlakyAction {
	pub fn new(global_updates: Arc<AtomicU32>, panic_on_global: u32, succeed_after: u32) -> Self {
		Self {
			global_updates,
			panic_on_global,
			succeed_after,
			instance_updates: 0,
		}
	}
}

#[async_trait]
impl Action for FlakyAction {
	async fn update(&mut self, _ctx: &Context) -> NodeResult {
		let global = self.global_updates.fetch_add(1, Ordering::SeqCst) + 1;
		self.instance_updates += 1;
		assert!(global != self.panic_on_global, "flaky action blew up");
		Ok(if self.instance_updates >= self.succeed_after {
			Status::Success
		} else {
			Status::Running
		})
	}
}
// endregion:   --- FlakyAction
