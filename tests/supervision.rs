// Copyright © 2025 Stephan Kunz

//! Tests of fault containment, restarts and tick period policing.

mod common;

use std::sync::{Arc, atomic::AtomicU32};

use common::{FlakyAction, Harness};
use ticktree::prelude::*;
use ticktree::register_action;

#[tokio::test]
async fn crashed_leaf_is_restarted_within_budget() -> Result<(), Error> {
	let mut harness = Harness::new();
	let updates = Arc::new(AtomicU32::new(0));
	// panics once on its second update overall, then completes in two
	register_action!(harness.factory, FlakyAction, "Flaky", updates.clone(), 2, 2)?;
	harness
		.factory
		.registry_mut()
		.register_action("Succeeds", MockAction::creation_fn(MockActionConfig::new(Status::Success, 1)))?;

	let config = NodeConfig::sequence("root")
		.with_child(NodeConfig::action("a", "Flaky"))
		.with_child(NodeConfig::action("b", "Succeeds"));
	let spec = harness.factory.compile(&config)?;
	let mut tree = harness.factory.spawn(spec, Context::empty())?;

	let status = harness.run_until_terminal(&mut tree, 50, 16).await?;
	assert_eq!(status, Status::Success);

	// one restart, the fresh worker went through a full activation
	assert_eq!(harness.sink.count("a", EventKind::Restarted), 1);
	assert_eq!(harness.sink.count("a", EventKind::Started), 2);
	assert!(
		harness
			.sink
			.faults()
			.iter()
			.any(|(node, error)| node == "a" && matches!(error, NodeError::FaultInUpdate { .. }))
	);
	Ok(())
}

#[tokio::test]
async fn exhausted_restart_budget_pins_the_child_failed() -> Result<(), Error> {
	let mut harness = Harness::new();
	// panics on the second update of every activation
	let mut config = MockActionConfig::new(Status::Success, 3);
	config.panic_on_tick = Some(2);
	harness
		.factory
		.registry_mut()
		.register_action("Crashy", MockAction::creation_fn(config))?;

	let tree_config = NodeConfig::sequence("root").with_child(NodeConfig::action("a", "Crashy"));
	let spec = harness.factory.compile(&tree_config)?;
	let mut tree = harness.factory.spawn(spec, Context::empty())?;

	// small steps keep all crashes inside the restart window
	let status = harness.run_until_terminal(&mut tree, 10, 32).await?;
	assert_eq!(status, Status::Failure);

	assert_eq!(harness.sink.count("a", EventKind::Restarted), 3);
	assert!(
		harness
			.sink
			.faults()
			.iter()
			.any(|(node, error)| node == "a" && matches!(error, NodeError::RestartBudgetExceeded { .. }))
	);
	Ok(())
}

#[tokio::test]
async fn faulting_update_is_restarted_like_a_crash() -> Result<(), Error> {
	let mut harness = Harness::new();
	// returns an error on the first update of every activation
	let mut config = MockActionConfig::new(Status::Success, 3);
	config.error_on_tick = Some(1);
	harness
		.factory
		.registry_mut()
		.register_action("Faulty", MockAction::creation_fn(config))?;

	let tree_config = NodeConfig::sequence("root").with_child(NodeConfig::action("a", "Faulty"));
	let spec = harness.factory.compile(&tree_config)?;
	let mut tree = harness.factory.spawn(spec, Context::empty())?;

	let status = harness.run_until_terminal(&mut tree, 10, 32).await?;
	assert_eq!(status, Status::Failure);

	assert_eq!(harness.sink.count("a", EventKind::Restarted), 3);
	assert!(
		harness
			.sink
			.faults()
			.iter()
			.any(|(node, error)| node == "a" && matches!(error, NodeError::FaultInUpdate { .. }))
	);
	assert!(
		harness
			.sink
			.faults()
			.iter()
			.any(|(node, error)| node == "a" && matches!(error, NodeError::RestartBudgetExceeded { .. }))
	);
	Ok(())
}

#[tokio::test]
async fn three_consecutive_tick_violations_demote_the_node() -> Result<(), Error> {
	let harness = Harness::new();
	let mut factory = harness.factory.clone();
	let clock = harness.clock.clone();
	// every update takes a simulated 50ms against a 20ms budget
	factory.registry_mut().register_action_fn(
		"Sluggish",
		Arc::new(move |_ctx| {
			clock.advance(50);
			Ok(Status::Running)
		}),
	)?;

	let config = NodeConfig::action("root", "Sluggish").with_tick_period(10);
	let spec = factory.compile(&config)?;
	let mut tree = factory.spawn(spec, Context::empty())?;

	let first = tree.tick().await?;
	assert_eq!(first, Status::Running);
	harness.clock.advance(60);
	let second = tree.tick().await?;
	assert_eq!(second, Status::Running);
	harness.clock.advance(60);
	let third = tree.tick().await?;
	assert_eq!(third, Status::Aborted);

	let violations = harness
		.sink
		.faults()
		.iter()
		.filter(|(_, error)| matches!(error, NodeError::TickPeriodViolation { .. }))
		.count();
	assert_eq!(violations, 3);
	assert!(
		harness
			.sink
			.faults()
			.iter()
			.any(|(_, error)| matches!(error, NodeError::FaultInUpdate { .. }))
	);
	Ok(())
}

#[tokio::test]
async fn a_single_violation_is_logged_but_not_fatal() -> Result<(), Error> {
	let harness = Harness::new();
	let mut factory = harness.factory.clone();
	let clock = harness.clock.clone();
	let slow_once = Arc::new(std::sync::atomic::AtomicBool::new(true));
	factory.registry_mut().register_action_fn(
		"SlowStart",
		Arc::new(move |_ctx| {
			if slow_once.swap(false, std::sync::atomic::Ordering::SeqCst) {
				clock.advance(50);
			}
			Ok(Status::Running)
		}),
	)?;

	let config = NodeConfig::action("root", "SlowStart").with_tick_period(10);
	let spec = factory.compile(&config)?;
	let mut tree = factory.spawn(spec, Context::empty())?;

	for _ in 0..4 {
		let status = tree.tick().await?;
		assert_eq!(status, Status::Running);
		harness.clock.advance(60);
	}

	let violations = harness
		.sink
		.faults()
		.iter()
		.filter(|(_, error)| matches!(error, NodeError::TickPeriodViolation { .. }))
		.count();
	assert_eq!(violations, 1);
	Ok(())
}
