// Copyright © 2025 Stephan Kunz

//! User supplied [`Action`]s, the leaves where real work happens.

// region:      --- modules
use std::{boxed::Box, sync::Arc};

use crate::runtime::Context;

use super::{NodeResult, Status};
// endregion:   --- modules

// region:      --- types
/// Creation function for an [`Action`].
///
/// Kept by the leaf worker beyond construction: `reset` and a supervised
/// restart both re-create the action so its state starts over from scratch.
pub type ActionCreationFn = dyn Fn() -> Box<dyn Action> + Send + Sync;

/// Signature of a plain function usable as an [`Action`] via [`ActionFn`].
pub type ActionTickFn = dyn Fn(&Context) -> NodeResult + Send + Sync;
// endregion:   --- types

// region:      --- Action
/// The contract of a leaf action.
///
/// `update` is called once per tick while the leaf is non terminal and must
/// return control promptly. Long running activity returns
/// [`Status::Running`] and keeps its in-flight state in `self`, or goes
/// through a side channel provided by the [`Context`].
///
/// The [`Context`] reference must not be retained beyond the call.
#[async_trait::async_trait]
pub trait Action: Send {
	/// Called exactly once per activation, on the transition from
	/// [`Status::Fresh`] to [`Status::Running`].
	async fn on_init(&mut self, _ctx: &Context) {}

	/// Called on each tick while non terminal.
	/// # Errors
	/// - an error is converted into [`Status::Aborted`] with the reason
	///   carried to the error sink, the supervisor decides about a restart
	async fn update(&mut self, ctx: &Context) -> NodeResult;

	/// Called exactly once per activation when a terminal status is reached.
	async fn on_terminate(&mut self, _status: Status, _ctx: &Context) {}
}
// endregion:   --- Action

// region:      --- ActionFn
/// Adapter that lifts a plain function into an [`Action`].
///
/// The function is the whole behavior, there is no per activation state.
pub struct ActionFn {
	func: Arc<ActionTickFn>,
}

impl ActionFn {
	/// Wrap `func` as an [`Action`].
	#[must_use]
	pub fn new(func: Arc<ActionTickFn>) -> Self {
		Self { func }
	}
}

#[async_trait::async_trait]
impl Action for ActionFn {
	async fn update(&mut self, ctx: &Context) -> NodeResult {
		(self.func)(ctx)
	}
}
// endregion:   --- ActionFn
