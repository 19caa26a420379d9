// Copyright © 2025 Stephan Kunz

//! [`ticktree`](crate) errors.

// region:      --- modules
use thiserror::Error;
// endregion:   --- modules

// region:      --- types
/// Result type definition for behavior trees.
pub type TickTreeResult<Output = ()> = Result<Output, Error>;
// endregion:   --- types

// region:      --- Error
/// `ticktree` error type
#[derive(Error, Debug)]
pub enum Error {
	/// Pass through from `crate::spec::ConfigError`
	#[error("{0}")]
	Config(#[from] crate::spec::error::Error),
	/// Pass through from `crate::factory::Error`
	#[error("{0}")]
	Factory(#[from] crate::factory::error::Error),
	/// Pass through from `crate::node::NodeError`
	#[error("{0}")]
	Node(#[from] crate::node::error::Error),
	/// Pass through from `crate::tree::Error`
	#[error("{0}")]
	Tree(#[from] crate::tree::error::Error),
}
// endregion:   --- Error
