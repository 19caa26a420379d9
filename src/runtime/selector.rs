// Copyright © 2025 Stephan Kunz

//! `Selector` tick logic.

// region:      --- modules
use std::sync::Arc;

use crate::node::{NodeResult, Status};

use super::{
	Shared,
	composite::{ChildSlot, tick_child},
};
// endregion:   --- modules

// region:      --- SelectorState
/// A `Selector` is the [`Sequence`](super::SequenceState) with the roles of
/// success and failure swapped.
///
/// - the first succeeding child succeeds the selector
/// - a failing child advances the cursor, all children failed fails the
///   selector
#[derive(Debug, Default)]
pub(crate) struct SelectorState {
	cursor: usize,
}

impl SelectorState {
	pub(crate) fn enter(&mut self) {
		self.cursor = 0;
	}

	pub(crate) async fn step(&mut self, children: &mut [ChildSlot], shared: &Arc<Shared>) -> NodeResult {
		let count = children.len();
		if self.cursor >= count {
			return Ok(Status::Failure);
		}
		let slot = &mut children[self.cursor];
		let status = tick_child(slot, shared).await?;
		match status {
			Status::Success => Ok(Status::Success),
			Status::Failure => {
				self.cursor += 1;
				if self.cursor >= count {
					Ok(Status::Failure)
				} else {
					Ok(Status::Running)
				}
			}
			// a freshly restarted child is in progress again
			Status::Running | Status::Fresh => Ok(Status::Running),
			Status::Aborted => Ok(Status::Aborted),
		}
	}
}
// endregion:   --- SelectorState
