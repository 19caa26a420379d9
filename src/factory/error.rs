// Copyright © 2025 Stephan Kunz

//! [`TreeFactory`](crate::factory::TreeFactory) errors.

// region:      --- modules
use thiserror::Error;

use crate::ConstString;
// endregion:   --- modules

// region:      --- Error
/// `factory` error type
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum Error {
	/// Action is already registered
	#[error("action [{0}] is already registered")]
	ActionAlreadyRegistered(ConstString),
	/// Priority function is already registered
	#[error("priority function [{0}] is already registered")]
	PriorityAlreadyRegistered(ConstString),
}
// endregion:   --- Error
