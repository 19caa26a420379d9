// Copyright © 2025 Stephan Kunz

//! The live, ticking side of [`ticktree`](crate).
//!
//! Every node of a spawned tree runs as its own tokio task. Composites own
//! and supervise their children, leaves host the user supplied actions.
//! Parents reach children through [`NodeHandle`]s, a command channel plus a
//! watched status.

// region:      --- modules
mod composite;
mod context;
mod handle;
mod leaf;
mod parallel;
mod priority;
mod selector;
mod sequence;

use std::sync::Arc;

use tokio::{
	sync::{mpsc, watch},
	task::JoinHandle,
};

use crate::{
	ConstString,
	factory::ActionRegistry,
	node::{NodeError, Status},
	spec::{NodeKind, NodeSpec},
	tree::TreeSettings,
};

pub use context::Context;

pub(crate) use composite::{ChildSlot, CompositeWorker, KindLogic};
pub(crate) use handle::{Command, NodeHandle};
pub(crate) use leaf::LeafWorker;
pub(crate) use parallel::ParallelState;
pub(crate) use priority::PriorityState;
pub(crate) use selector::SelectorState;
pub(crate) use sequence::SequenceState;
// endregion:   --- modules

// region:      --- Shared
/// State shared by every worker of one tree.
pub(crate) struct Shared {
	/// The opaque collaborator state handed to each `update`.
	pub(crate) context: Context,
	/// Resolves `action_ref` and `priority_ref`, also at restart time.
	pub(crate) registry: Arc<ActionRegistry>,
	/// Sinks, clock, policies.
	pub(crate) settings: TreeSettings,
	/// Force shutdown signal, flipped exactly once.
	pub(crate) kill: watch::Receiver<bool>,
}

impl Shared {
	pub(crate) fn killed(&self) -> bool {
		*self.kill.borrow()
	}
}
// endregion:   --- Shared

// region:      --- spawn_node
/// A freshly spawned node worker.
pub(crate) struct Spawned {
	pub(crate) handle: NodeHandle,
	pub(crate) join: JoinHandle<()>,
}

/// Build the worker for `spec` and, recursively, for its children.
///
/// The tree is built top-down, each composite owns the workers of its
/// children. Also the re-entry point for supervised restarts.
pub(crate) fn spawn_node(spec: &Arc<NodeSpec>, shared: &Arc<Shared>) -> Result<Spawned, NodeError> {
	let (tx, rx) = mpsc::channel(crate::COMMAND_QUEUE_DEPTH);
	let (status_tx, status_rx) = watch::channel(Status::Fresh);
	let id: ConstString = spec.id.as_str().into();
	let handle = NodeHandle::new(id.clone(), tx, status_rx);

	let join = match spec.kind {
		NodeKind::Action => {
			let reference = spec.action_ref.as_deref().unwrap_or_default();
			let creation = shared
				.registry
				.creation_fn(reference)
				.ok_or_else(|| NodeError::Unresolved {
					node: id.clone(),
					reference: reference.into(),
				})?;
			let worker = LeafWorker::new(spec.clone(), shared.clone(), creation, status_tx, rx);
			tokio::spawn(worker.run())
		}
		NodeKind::Sequence => spawn_composite(spec, shared, KindLogic::Sequence(SequenceState::default()), status_tx, rx)?,
		NodeKind::Selector => spawn_composite(spec, shared, KindLogic::Selector(SelectorState::default()), status_tx, rx)?,
		NodeKind::Parallel => {
			let policy = spec.success_policy.unwrap_or_default();
			spawn_composite(spec, shared, KindLogic::Parallel(ParallelState::new(policy)), status_tx, rx)?
		}
		NodeKind::Priority => {
			let priority = match spec.priority_ref.as_deref() {
				Some(name) => Some(shared.registry.priority_fn(name).ok_or_else(|| NodeError::Unresolved {
					node: id.clone(),
					reference: name.into(),
				})?),
				None => None,
			};
			spawn_composite(spec, shared, KindLogic::Priority(PriorityState::new(priority)), status_tx, rx)?
		}
	};

	Ok(Spawned { handle, join })
}

fn spawn_composite(
	spec: &Arc<NodeSpec>,
	shared: &Arc<Shared>,
	logic: KindLogic,
	status_tx: watch::Sender<Status>,
	rx: mpsc::Receiver<Command>,
) -> Result<JoinHandle<()>, NodeError> {
	let mut children = Vec::with_capacity(spec.children.len());
	for child_spec in &spec.children {
		let child_spec = Arc::new(child_spec.clone());
		let spawned = spawn_node(&child_spec, shared)?;
		children.push(ChildSlot::new(child_spec, spawned, shared.settings.restart_policy));
	}
	let worker = CompositeWorker::new(spec.clone(), shared.clone(), logic, children, status_tx, rx);
	Ok(tokio::spawn(worker.run()))
}
// endregion:   --- spawn_node
