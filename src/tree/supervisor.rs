// Copyright © 2025 Stephan Kunz

//! Supervision policies and the per-tree settings.

// region:      --- modules
use std::{collections::VecDeque, sync::Arc};

use crate::{
	DEFAULT_CHILD_ACK_MS, DEFAULT_FORCE_MS, DEFAULT_MAX_RESTARTS, DEFAULT_RESTART_WINDOW_MS, DEFAULT_TICK_LENIENCY,
	clock::{Clock, MonotonicClock},
	observer::{ErrorSink, EventSink, TracingSink},
};
// endregion:   --- modules

// region:      --- RestartPolicy
/// Bound on supervisor driven restarts of a child within a rolling window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RestartPolicy {
	/// Maximum restarts within the window.
	pub max_restarts: u32,
	/// Length of the rolling window in milliseconds.
	pub within_ms: u64,
}

impl Default for RestartPolicy {
	fn default() -> Self {
		Self {
			max_restarts: DEFAULT_MAX_RESTARTS,
			within_ms: DEFAULT_RESTART_WINDOW_MS,
		}
	}
}
// endregion:   --- RestartPolicy

// region:      --- RestartWindow
/// Rolling-window bookkeeping for one supervised child.
#[derive(Debug)]
pub(crate) struct RestartWindow {
	policy: RestartPolicy,
	times: VecDeque<u64>,
}

impl RestartWindow {
	pub(crate) const fn new(policy: RestartPolicy) -> Self {
		Self {
			policy,
			times: VecDeque::new(),
		}
	}

	/// Record a restart attempt at `now_ms`.
	/// Returns `false` once the budget within the window is exhausted.
	pub(crate) fn record(&mut self, now_ms: u64) -> bool {
		let horizon = now_ms.saturating_sub(self.policy.within_ms);
		while self.times.front().is_some_and(|&t| t < horizon) {
			self.times.pop_front();
		}
		if self.times.len() < self.policy.max_restarts as usize {
			self.times.push_back(now_ms);
			true
		} else {
			false
		}
	}

	/// Forget all recorded restarts, used on `reset` for a new activation.
	pub(crate) fn clear(&mut self) {
		self.times.clear();
	}
}
// endregion:   --- RestartWindow

// region:      --- ShutdownDeadlines
/// The two deadlines bounding a tree teardown.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ShutdownDeadlines {
	/// How long a parent waits for one child to acknowledge its stop
	/// before force-terminating it.
	pub child_ack_ms: u64,
	/// Global bound on the whole teardown.
	pub force_ms: u64,
}

impl Default for ShutdownDeadlines {
	fn default() -> Self {
		Self {
			child_ack_ms: DEFAULT_CHILD_ACK_MS,
			force_ms: DEFAULT_FORCE_MS,
		}
	}
}
// endregion:   --- ShutdownDeadlines

// region:      --- TickSource
/// Who originates the ticks at the root.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TickSource {
	/// The root ticks itself on its own period.
	#[default]
	Timer,
	/// Ticks only happen through [`Tree::tick`](crate::tree::Tree::tick).
	External,
}
// endregion:   --- TickSource

// region:      --- TreeSettings
/// Per-tree configuration shared immutably by all workers.
#[derive(Clone)]
pub struct TreeSettings {
	/// Receiver of lifecycle events.
	pub event_sink: Arc<dyn EventSink>,
	/// Receiver of structured faults.
	pub error_sink: Arc<dyn ErrorSink>,
	/// The monotonic time source.
	pub clock: Arc<dyn Clock>,
	/// Restart bound applied per supervised child.
	pub restart_policy: RestartPolicy,
	/// Teardown deadlines.
	pub shutdown_deadlines: ShutdownDeadlines,
	/// Factor on `tick_period_ms` before an update counts as a violation.
	pub tick_leniency_factor: f64,
	/// Who drives the root.
	pub tick_source: TickSource,
}

impl Default for TreeSettings {
	fn default() -> Self {
		Self {
			event_sink: Arc::new(TracingSink),
			error_sink: Arc::new(TracingSink),
			clock: Arc::new(MonotonicClock::default()),
			restart_policy: RestartPolicy::default(),
			shutdown_deadlines: ShutdownDeadlines::default(),
			tick_leniency_factor: DEFAULT_TICK_LENIENCY,
			tick_source: TickSource::default(),
		}
	}
}

impl core::fmt::Debug for TreeSettings {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("TreeSettings")
			.field("restart_policy", &self.restart_policy)
			.field("shutdown_deadlines", &self.shutdown_deadlines)
			.field("tick_leniency_factor", &self.tick_leniency_factor)
			.field("tick_source", &self.tick_source)
			.finish_non_exhaustive()
	}
}

impl TreeSettings {
	/// Replace the event sink.
	#[must_use]
	pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
		self.event_sink = sink;
		self
	}

	/// Replace the error sink.
	#[must_use]
	pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
		self.error_sink = sink;
		self
	}

	/// Replace the clock.
	#[must_use]
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;
		self
	}

	/// Replace the restart policy.
	#[must_use]
	pub const fn with_restart_policy(mut self, policy: RestartPolicy) -> Self {
		self.restart_policy = policy;
		self
	}

	/// Replace the shutdown deadlines.
	#[must_use]
	pub const fn with_shutdown_deadlines(mut self, deadlines: ShutdownDeadlines) -> Self {
		self.shutdown_deadlines = deadlines;
		self
	}

	/// Replace the tick leniency factor.
	#[must_use]
	pub const fn with_tick_leniency_factor(mut self, factor: f64) -> Self {
		self.tick_leniency_factor = factor;
		self
	}

	/// Replace the tick source.
	#[must_use]
	pub const fn with_tick_source(mut self, source: TickSource) -> Self {
		self.tick_source = source;
		self
	}
}
// endregion:   --- TreeSettings
