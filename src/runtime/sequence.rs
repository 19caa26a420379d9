// Copyright © 2025 Stephan Kunz

//! `Sequence` tick logic.

// region:      --- modules
use std::sync::Arc;

use crate::node::{NodeResult, Status};

use super::{
	Shared,
	composite::{ChildSlot, tick_child},
};
// endregion:   --- modules

// region:      --- SequenceState
/// A `Sequence` ticks its children left to right, one child per step.
///
/// - a failing child fails the sequence, later children stay `Fresh`
/// - a succeeding child advances the cursor, past the end the sequence
///   succeeds
/// - a running child keeps the cursor, the same child is ticked on the
///   next step
#[derive(Debug, Default)]
pub(crate) struct SequenceState {
	cursor: usize,
}

impl SequenceState {
	pub(crate) fn enter(&mut self) {
		self.cursor = 0;
	}

	pub(crate) async fn step(&mut self, children: &mut [ChildSlot], shared: &Arc<Shared>) -> NodeResult {
		let count = children.len();
		if self.cursor >= count {
			return Ok(Status::Success);
		}
		let slot = &mut children[self.cursor];
		let status = tick_child(slot, shared).await?;
		match status {
			Status::Success => {
				self.cursor += 1;
				if self.cursor >= count {
					Ok(Status::Success)
				} else {
					Ok(Status::Running)
				}
			}
			Status::Failure => Ok(Status::Failure),
			// a freshly restarted child is in progress again
			Status::Running | Status::Fresh => Ok(Status::Running),
			Status::Aborted => Ok(Status::Aborted),
		}
	}
}
// endregion:   --- SequenceState
