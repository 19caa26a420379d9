// Copyright © 2025 Stephan Kunz

//! Most commonly used interface of `ticktree`.
//!
//! Typically it is sufficient to include the prelude with
//!
//! ```use ticktree::prelude::*;```

// re-exports
pub use async_trait::async_trait;

// public exports
// error handling
pub use crate::error::{Error, TickTreeResult};
// registration macro
pub use crate::register_action;
// clock
pub use crate::clock::{Clock, ManualClock, MonotonicClock};
// node
pub use crate::node::{Action, ActionFn, NodeError, NodeResult, Status};
#[cfg(feature = "mock_action")]
pub use crate::node::{MockAction, MockActionConfig, MockProbe};
// spec
pub use crate::spec::{ConfigError, NodeConfig, NodeKind, NodeSpec, SuccessPolicy, compile};
// factory
pub use crate::factory::{ActionRegistry, TreeFactory};
// observer
pub use crate::observer::{ErrorSink, EventKind, EventSink, NullSink, QueueSink, TracingSink, TreeEvent};
// runtime
pub use crate::runtime::Context;
// tree
pub use crate::tree::{RestartPolicy, ShutdownDeadlines, TickSource, Tree, TreeSettings};
