// Copyright © 2025 Stephan Kunz

//! Observation surface of [`ticktree`](crate).
//!
//! Lifecycle events and structured faults leave the runtime through
//! pluggable sinks, safe for concurrent emission from many workers.

mod event;
mod sink;

// flatten
pub use event::{EventKind, TreeEvent};
pub use sink::{ErrorSink, EventSink, NullSink, QueueSink, TracingSink};
