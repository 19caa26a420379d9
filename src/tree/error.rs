// Copyright © 2025 Stephan Kunz

//! [`Tree`](crate::tree::Tree) errors.

// region:      --- modules
use thiserror::Error;
// endregion:   --- modules

// region:      --- Error
/// `tree` error type
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum Error {
	/// The tree did not tear down within the global force deadline.
	#[error("shutdown deadline of {force_ms}ms exceeded")]
	ShutdownDeadlineExceeded {
		/// The exceeded deadline.
		force_ms: u64,
	},
}
// endregion:   --- Error
