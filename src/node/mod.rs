// Copyright © 2025 Stephan Kunz

//! The uniform node contract of [`ticktree`](crate).
//!
//! Every element of a tree, leaf or composite, runs the same status
//! automaton and answers the same lifecycle operations. Leaves additionally
//! carry a user supplied [`Action`].

mod action;
pub mod error;
#[cfg(feature = "mock_action")]
mod mock;
mod status;

// flatten
pub use action::{Action, ActionCreationFn, ActionFn, ActionTickFn};
pub use error::{Error as NodeError, NodeResult};
#[cfg(feature = "mock_action")]
pub use mock::{MockAction, MockActionConfig, MockProbe};
pub use status::Status;
