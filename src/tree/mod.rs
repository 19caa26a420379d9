// Copyright © 2025 Stephan Kunz

//! Supervised tree lifecycle of [`ticktree`](crate).

pub mod error;
pub(crate) mod supervisor;
#[allow(clippy::module_inception)]
mod tree;

// flatten
pub use supervisor::{RestartPolicy, ShutdownDeadlines, TickSource, TreeSettings};
pub use tree::Tree;
