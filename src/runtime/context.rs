// Copyright © 2025 Stephan Kunz

//! The opaque [`Context`] handed to every `update`.

// region:      --- modules
use std::{any::Any, sync::Arc};
// endregion:   --- modules

// region:      --- Context
/// Opaque carrier of collaborator state (blackboard, effectors, whatever the
/// host system provides) handed to each leaf `update` and to priority
/// functions.
///
/// The runtime never inspects it. Concurrent access discipline is the
/// collaborator's own contract, the runtime only clones the handle.
#[derive(Clone)]
pub struct Context {
	inner: Arc<dyn Any + Send + Sync>,
}

impl Default for Context {
	fn default() -> Self {
		Self::empty()
	}
}

impl core::fmt::Debug for Context {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Context").finish_non_exhaustive()
	}
}

impl Context {
	/// Wrap a collaborator value.
	#[must_use]
	pub fn new<T>(value: T) -> Self
	where
		T: Any + Send + Sync,
	{
		Self { inner: Arc::new(value) }
	}

	/// A context carrying nothing.
	#[must_use]
	pub fn empty() -> Self {
		Self { inner: Arc::new(()) }
	}

	/// Borrow the carried value, if it is a `T`.
	#[must_use]
	pub fn downcast_ref<T>(&self) -> Option<&T>
	where
		T: Any + Send + Sync,
	{
		(*self.inner).downcast_ref::<T>()
	}
}
// endregion:   --- Context
