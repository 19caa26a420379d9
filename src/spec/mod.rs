// Copyright © 2025 Stephan Kunz

//! [`ticktree`](crate) node spec compiler.
//!
//! Translates the declarative [`NodeConfig`] into the validated, immutable
//! [`NodeSpec`] tree the runtime is built from.

mod config;
pub mod error;
mod node_spec;

// flatten
pub use config::{NodeConfig, compile};
pub use error::Error as ConfigError;
pub use node_spec::{NodeKind, NodeSpec, SuccessPolicy};
