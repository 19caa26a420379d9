// Copyright © 2025 Stephan Kunz
#![doc = include_str!("../README.md")]

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

// mostly needed stuff
pub mod prelude;

// modules
pub mod clock;
mod error;
pub mod factory;
pub mod node;
pub mod observer;
pub mod runtime;
pub mod spec;
mod tree;

// flatten:
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::{Error, TickTreeResult};
pub use factory::{ActionRegistry, TreeFactory};
#[cfg(feature = "mock_action")]
pub use node::{MockAction, MockActionConfig, MockProbe};
pub use node::{Action, ActionFn, NodeError, NodeResult, Status};
pub use observer::{ErrorSink, EventKind, EventSink, NullSink, QueueSink, TracingSink, TreeEvent};
pub use runtime::Context;
pub use spec::{ConfigError, NodeConfig, NodeKind, NodeSpec, SuccessPolicy, compile};
pub use tree::{RestartPolicy, ShutdownDeadlines, TickSource, Tree, TreeSettings};

// region:		--- modules
use std::sync::Arc;
// endregion:	--- modules

// region		--- types
/// An immutable thread safe `String` type
/// see: [Logan Smith](https://www.youtube.com/watch?v=A4cKi7PTJSs).
pub type ConstString = Arc<str>;
// endregion:   --- types

// region:		--- literal constants
/// Node kinds
const SEQUENCE: &str = "Sequence";
const SELECTOR: &str = "Selector";
const PARALLEL: &str = "Parallel";
const PRIORITY: &str = "Priority";
const ACTION: &str = "Action";

/// Node statuses
const FRESH: &str = "Fresh";
const RUNNING: &str = "Running";
const SUCCESS: &str = "Success";
const FAILURE: &str = "Failure";
const ABORTED: &str = "Aborted";

/// Depth of a worker's command queue.
const COMMAND_QUEUE_DEPTH: usize = 8;

/// Default tick period of a node in milliseconds.
pub const DEFAULT_TICK_PERIOD_MS: u64 = 50;
/// Default maximum restarts of a child within the restart window.
pub const DEFAULT_MAX_RESTARTS: u32 = 3;
/// Default length of the rolling restart window in milliseconds.
pub const DEFAULT_RESTART_WINDOW_MS: u64 = 5_000;
/// Default deadline for a child to acknowledge its stop in milliseconds.
pub const DEFAULT_CHILD_ACK_MS: u64 = 1_000;
/// Default global bound on a tree teardown in milliseconds.
pub const DEFAULT_FORCE_MS: u64 = 10_000;
/// Default factor on the tick period before an update counts as violation.
pub const DEFAULT_TICK_LENIENCY: f64 = 2.0;
/// Consecutive tick period violations that demote a node to `Aborted`.
pub const MAX_CONSECUTIVE_VIOLATIONS: u32 = 3;
// endregion:	--- literal constants

// region:		---macros
/// Macro to register an action with a factory.
///
/// # Usage:
///
/// Register a default constructible [`Action`] struct:
/// ```no-test
/// register_action!(<mutable (reference to) factory>, <struct to register>, <"identifying name">)
/// ```
///
/// Register an [`Action`] struct with additional arguments for construction:
/// ```no-test
/// register_action!(<mutable (reference to) factory>, <struct to register>, <"identifying name">, <arg1>, <arg2>, ...)
/// ```
///
/// # Example:
///
/// ```no-test
/// let mut factory = TreeFactory::new();
///
/// register_action!(factory, ActionA, "Action_A", 42, "hello world".into())?;
/// ```
#[macro_export]
macro_rules! register_action {
	// a default constructible action struct
	($factory:expr, $tp:ty, $name:literal $(,)?) => {{
		$factory
			.registry_mut()
			.register_action_type::<$tp>($name)
	}};
	// an action struct with arguments for construction
	($factory:expr, $tp:ty, $name:literal, $($arg:expr),* $(,)?) => {{
		let creation_fn = ::std::boxed::Box::new(move || -> ::std::boxed::Box<dyn $crate::node::Action> {
			::std::boxed::Box::new(<$tp>::new($($arg),*))
		});
		$factory
			.registry_mut()
			.register_action($name, creation_fn)
	}};
}
// endregion:	---macros
