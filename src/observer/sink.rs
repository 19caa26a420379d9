// Copyright © 2025 Stephan Kunz

//! Event and error sinks.

// region:      --- modules
use std::sync::atomic::{AtomicU64, Ordering};

use thingbuf::mpsc::{Receiver, Sender, channel};
use tracing::{error, info, warn};

use crate::node::NodeError;

use super::event::TreeEvent;
// endregion:   --- modules

// region:      --- traits
/// Receiver of lifecycle events.
///
/// Implementations must tolerate concurrent emission from many workers and
/// must not block, a slow consumer belongs behind a queue.
pub trait EventSink: Send + Sync {
	/// Called once per lifecycle event.
	fn emit(&self, event: &TreeEvent);
}

/// Receiver of structured faults.
pub trait ErrorSink: Send + Sync {
	/// Called once per fault.
	fn fault(&self, node_id: &str, error: &NodeError);
}
// endregion:   --- traits

// region:      --- TracingSink
/// The default sink, forwards everything to [`tracing`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
	fn emit(&self, event: &TreeEvent) {
		info!(
			node_id = %event.node_id,
			kind = %event.kind,
			from = %event.from,
			to = %event.to,
			ts_ms = event.ts_ms,
			"tree event"
		);
	}
}

impl ErrorSink for TracingSink {
	fn fault(&self, node_id: &str, error: &NodeError) {
		error!(node_id = %node_id, %error, "node fault");
	}
}
// endregion:   --- TracingSink

// region:      --- NullSink
/// A sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
	fn emit(&self, _event: &TreeEvent) {}
}

impl ErrorSink for NullSink {
	fn fault(&self, _node_id: &str, _error: &NodeError) {}
}
// endregion:   --- NullSink

// region:      --- QueueSink
/// A bounded queue sink for out of band consumers.
///
/// Emission never blocks a worker. When the consumer falls behind, events
/// are dropped and counted.
pub struct QueueSink {
	tx: Sender<TreeEvent>,
	dropped: AtomicU64,
}

impl core::fmt::Debug for QueueSink {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("QueueSink")
			.field("dropped", &self.dropped)
			.finish_non_exhaustive()
	}
}

impl QueueSink {
	/// Create a sink with room for `capacity` undelivered events together
	/// with the receiving end for the consumer.
	#[must_use]
	pub fn bounded(capacity: usize) -> (Self, Receiver<TreeEvent>) {
		let (tx, rx) = channel(capacity);
		(
			Self {
				tx,
				dropped: AtomicU64::new(0),
			},
			rx,
		)
	}

	/// Number of events dropped because the queue was full or closed.
	#[must_use]
	pub fn dropped(&self) -> u64 {
		self.dropped.load(Ordering::Relaxed)
	}
}

impl EventSink for QueueSink {
	fn emit(&self, event: &TreeEvent) {
		if self.tx.try_send(event.clone()).is_err() {
			let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
			warn!(node_id = %event.node_id, dropped, "event queue full, event dropped");
		}
	}
}
// endregion:   --- QueueSink
