// Copyright © 2025 Stephan Kunz

//! `Parallel` tick logic.

// region:      --- modules
use std::sync::Arc;

use crate::{
	node::{NodeResult, Status},
	spec::SuccessPolicy,
};

use super::{
	Shared,
	composite::{ChildSlot, tick_child},
};
// endregion:   --- modules

// region:      --- ParallelState
/// A `Parallel` ticks all non-terminal children in index order each step
/// and combines their statuses under a [`SuccessPolicy`].
///
/// Success is checked before failure within the same step. Children still
/// running when the composite completes are aborted by the composite
/// worker.
#[derive(Debug)]
pub(crate) struct ParallelState {
	policy: SuccessPolicy,
}

impl ParallelState {
	pub(crate) const fn new(policy: SuccessPolicy) -> Self {
		Self { policy }
	}

	pub(crate) fn enter(&mut self) {}

	pub(crate) async fn step(&mut self, children: &mut [ChildSlot], shared: &Arc<Shared>) -> NodeResult {
		for slot in children.iter_mut() {
			if slot.status_view().is_terminal() {
				continue;
			}
			let _ = tick_child(slot, shared).await?;
		}

		let count = children.len();
		let mut successes = 0_usize;
		let mut failures = 0_usize;
		for slot in children.iter() {
			match slot.status_view() {
				Status::Success => successes += 1,
				Status::Failure | Status::Aborted => failures += 1,
				Status::Fresh | Status::Running => {}
			}
		}

		let required = self.policy.required(count);
		if successes >= required {
			Ok(Status::Success)
		} else if failures > count - required {
			Ok(Status::Failure)
		} else {
			Ok(Status::Running)
		}
	}
}
// endregion:   --- ParallelState
