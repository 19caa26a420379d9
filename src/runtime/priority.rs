// Copyright © 2025 Stephan Kunz

//! `Priority` tick logic.

// region:      --- modules
use std::sync::Arc;

use tracing::warn;

use crate::{
	factory::PriorityFn,
	node::{NodeResult, Status},
};

use super::{
	Shared,
	composite::{ChildSlot, tick_child},
};
// endregion:   --- modules

// region:      --- PriorityState
/// A `Priority` asks its priority function for a permutation of child
/// indices on every step, then behaves like a
/// [`Selector`](super::SelectorState) over the reordered list: the first
/// non-terminal child in the ordering is ticked, one per step.
///
/// A running child not reached by the current ordering keeps its state and
/// is only resumed once the traversal reaches it again. Without a priority
/// function the ordering is static.
pub(crate) struct PriorityState {
	priority: Option<Arc<PriorityFn>>,
}

impl PriorityState {
	pub(crate) const fn new(priority: Option<Arc<PriorityFn>>) -> Self {
		Self { priority }
	}

	pub(crate) fn enter(&mut self) {}

	pub(crate) async fn step(&mut self, children: &mut [ChildSlot], shared: &Arc<Shared>) -> NodeResult {
		let count = children.len();
		let order = self.permutation(shared, count);

		// exactly one child is ticked per step, terminal ones are only
		// skipped over on the way to it
		for index in order {
			let slot = &mut children[index];
			match slot.status_view() {
				Status::Success => return Ok(Status::Success),
				Status::Failure | Status::Aborted => {}
				Status::Fresh | Status::Running => {
					return match tick_child(slot, shared).await? {
						Status::Success => Ok(Status::Success),
						// a freshly restarted child is in progress again
						Status::Running | Status::Fresh => Ok(Status::Running),
						Status::Failure | Status::Aborted => {
							// children behind this one are tried on later steps
							if children
								.iter()
								.all(|slot| slot.status_view().is_terminal())
							{
								Ok(Status::Failure)
							} else {
								Ok(Status::Running)
							}
						}
					};
				}
			}
		}

		// every child was already terminal without a success
		Ok(Status::Failure)
	}

	/// The ordering for this step, falling back to the static one when the
	/// priority function misbehaves.
	fn permutation(&self, shared: &Arc<Shared>, count: usize) -> Vec<usize> {
		self.priority.as_ref().map_or_else(
			|| (0..count).collect(),
			|func| {
				let order = func(&shared.context, count);
				if is_permutation(&order, count) {
					order
				} else {
					warn!(?order, count, "invalid priority permutation, using static order");
					(0..count).collect()
				}
			},
		)
	}
}

fn is_permutation(order: &[usize], count: usize) -> bool {
	if order.len() != count {
		return false;
	}
	let mut seen = vec![false; count];
	for &index in order {
		if index >= count || seen[index] {
			return false;
		}
		seen[index] = true;
	}
	true
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn permutation_validation() {
		assert!(is_permutation(&[0, 1, 2], 3));
		assert!(is_permutation(&[2, 0, 1], 3));
		assert!(!is_permutation(&[0, 1], 3));
		assert!(!is_permutation(&[0, 1, 1], 3));
		assert!(!is_permutation(&[0, 1, 3], 3));
	}
}
