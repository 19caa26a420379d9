// Copyright © 2025 Stephan Kunz

//! Tests of abort propagation, reset, shutdown and the ambient timer.

mod common;

use std::{sync::Arc, time::Duration};

use common::Harness;
use ticktree::prelude::*;

fn register_mock(factory: &mut TreeFactory, name: &str, config: MockActionConfig) -> Result<(), Error> {
	factory
		.registry_mut()
		.register_action(name, MockAction::creation_fn(config))?;
	Ok(())
}

#[tokio::test]
async fn abort_reaches_every_started_descendant() -> Result<(), Error> {
	let mut harness = Harness::new();
	let probe_a = Arc::new(MockProbe::default());
	let probe_b = Arc::new(MockProbe::default());
	let probe_c = Arc::new(MockProbe::default());
	register_mock(
		&mut harness.factory,
		"SlowA",
		MockActionConfig::new(Status::Success, 10).with_probe(probe_a.clone()),
	)?;
	register_mock(
		&mut harness.factory,
		"SlowB",
		MockActionConfig::new(Status::Success, 10).with_probe(probe_b.clone()),
	)?;
	register_mock(
		&mut harness.factory,
		"NeverReached",
		MockActionConfig::new(Status::Success, 1).with_probe(probe_c.clone()),
	)?;

	let config = NodeConfig::parallel("root", SuccessPolicy::All)
		.with_child(NodeConfig::action("a", "SlowA"))
		.with_child(
			NodeConfig::sequence("seq")
				.with_child(NodeConfig::action("b", "SlowB"))
				.with_child(NodeConfig::action("c", "NeverReached")),
		);
	let spec = harness.factory.compile(&config)?;
	let mut tree = harness.factory.spawn(spec, Context::empty())?;

	// get A and B running, C stays Fresh behind the sequence cursor
	for _ in 0..2 {
		let status = tree.tick().await?;
		assert_eq!(status, Status::Running);
		harness.clock.advance(50);
	}

	tree.abort().await?;
	assert_eq!(tree.status(), Status::Aborted);

	// on_terminate(Aborted) fired exactly once per started node
	assert_eq!(probe_a.terminates(), 1);
	assert_eq!(probe_a.last_terminal(), Some(Status::Aborted));
	assert_eq!(probe_b.terminates(), 1);
	assert_eq!(probe_b.last_terminal(), Some(Status::Aborted));
	// the never started leaf is left untouched
	assert_eq!(probe_c.inits(), 0);
	assert_eq!(probe_c.terminates(), 0);

	assert_eq!(harness.sink.count("root", EventKind::Aborted), 1);
	assert_eq!(harness.sink.count("seq", EventKind::Aborted), 1);
	assert_eq!(harness.sink.count("a", EventKind::Aborted), 1);
	assert_eq!(harness.sink.count("b", EventKind::Aborted), 1);
	assert_eq!(harness.sink.count("c", EventKind::Aborted), 0);

	// a second abort changes nothing
	tree.abort().await?;
	assert_eq!(harness.sink.count("root", EventKind::Aborted), 1);
	assert_eq!(probe_a.terminates(), 1);
	Ok(())
}

#[tokio::test]
async fn aborting_a_never_started_tree_is_a_noop() -> Result<(), Error> {
	let mut harness = Harness::new();
	register_mock(&mut harness.factory, "Succeeds", MockActionConfig::new(Status::Success, 1))?;

	let config = NodeConfig::sequence("root").with_child(NodeConfig::action("a", "Succeeds"));
	let spec = harness.factory.compile(&config)?;
	let mut tree = harness.factory.spawn(spec, Context::empty())?;

	tree.abort().await?;
	assert_eq!(tree.status(), Status::Fresh);
	assert!(harness.sink.events().is_empty());
	Ok(())
}

#[tokio::test]
async fn reset_is_rejected_while_running() -> Result<(), Error> {
	let mut harness = Harness::new();
	register_mock(&mut harness.factory, "Slow", MockActionConfig::new(Status::Success, 5))?;

	let config = NodeConfig::sequence("root").with_child(NodeConfig::action("a", "Slow"));
	let spec = harness.factory.compile(&config)?;
	let mut tree = harness.factory.spawn(spec, Context::empty())?;

	let status = tree.tick().await?;
	assert_eq!(status, Status::Running);

	let result = tree.reset().await;
	assert!(matches!(
		result,
		Err(Error::Node(NodeError::ResetWhileRunning { .. }))
	));
	Ok(())
}

#[tokio::test]
async fn reset_reactivates_like_a_fresh_tree() -> Result<(), Error> {
	let mut harness = Harness::new();
	let probe_a = Arc::new(MockProbe::default());
	let probe_b = Arc::new(MockProbe::default());
	register_mock(
		&mut harness.factory,
		"TwoSteps",
		MockActionConfig::new(Status::Success, 2).with_probe(probe_a.clone()),
	)?;
	register_mock(
		&mut harness.factory,
		"OneStep",
		MockActionConfig::new(Status::Success, 1).with_probe(probe_b.clone()),
	)?;

	let config = NodeConfig::sequence("root")
		.with_child(NodeConfig::action("a", "TwoSteps"))
		.with_child(NodeConfig::action("b", "OneStep"));
	let spec = harness.factory.compile(&config)?;
	let mut tree = harness.factory.spawn(spec, Context::empty())?;

	let first = harness.run_until_terminal(&mut tree, 50, 16).await?;
	assert_eq!(first, Status::Success);
	assert_eq!(probe_a.inits(), 1);
	assert_eq!(probe_a.updates(), 2);

	tree.reset().await?;
	assert_eq!(tree.status(), Status::Fresh);
	// reset re-creates user state without further lifecycle calls
	assert_eq!(probe_a.inits(), 1);
	assert_eq!(probe_a.terminates(), 1);

	harness.clock.advance(50);
	let second = harness.run_until_terminal(&mut tree, 50, 16).await?;
	assert_eq!(second, Status::Success);

	// the second activation repeats the first one's lifecycle
	assert_eq!(probe_a.inits(), 2);
	assert_eq!(probe_a.updates(), 4);
	assert_eq!(probe_a.terminates(), 2);
	assert_eq!(probe_b.inits(), 2);
	assert_eq!(harness.sink.count("root", EventKind::Started), 2);
	Ok(())
}

#[tokio::test]
async fn reset_after_abort_allows_reactivation() -> Result<(), Error> {
	let mut harness = Harness::new();
	register_mock(&mut harness.factory, "Slow", MockActionConfig::new(Status::Success, 3))?;

	let config = NodeConfig::sequence("root").with_child(NodeConfig::action("a", "Slow"));
	let spec = harness.factory.compile(&config)?;
	let mut tree = harness.factory.spawn(spec, Context::empty())?;

	let status = tree.tick().await?;
	assert_eq!(status, Status::Running);
	tree.abort().await?;
	assert_eq!(tree.status(), Status::Aborted);

	tree.reset().await?;
	assert_eq!(tree.status(), Status::Fresh);

	harness.clock.advance(50);
	let rerun = harness.run_until_terminal(&mut tree, 50, 16).await?;
	assert_eq!(rerun, Status::Success);
	Ok(())
}

#[tokio::test]
async fn graceful_shutdown_within_deadlines() -> Result<(), Error> {
	let mut harness = Harness::new();
	register_mock(&mut harness.factory, "Succeeds", MockActionConfig::new(Status::Success, 1))?;

	let config = NodeConfig::sequence("root")
		.with_child(NodeConfig::action("a", "Succeeds"))
		.with_child(NodeConfig::action("b", "Succeeds"));
	let spec = harness.factory.compile(&config)?;
	let mut tree = harness.factory.spawn(spec, Context::empty())?;

	let status = harness.run_until_terminal(&mut tree, 50, 8).await?;
	assert_eq!(status, Status::Success);

	tree.shutdown().await?;
	Ok(())
}

#[tokio::test]
async fn shutdown_terminates_running_nodes_as_aborted() -> Result<(), Error> {
	let mut harness = Harness::new();
	let probe_a = Arc::new(MockProbe::default());
	let probe_b = Arc::new(MockProbe::default());
	let probe_c = Arc::new(MockProbe::default());
	register_mock(
		&mut harness.factory,
		"SlowA",
		MockActionConfig::new(Status::Success, 10).with_probe(probe_a.clone()),
	)?;
	register_mock(
		&mut harness.factory,
		"SlowB",
		MockActionConfig::new(Status::Success, 10).with_probe(probe_b.clone()),
	)?;
	register_mock(
		&mut harness.factory,
		"NeverReached",
		MockActionConfig::new(Status::Success, 1).with_probe(probe_c.clone()),
	)?;

	let config = NodeConfig::parallel("root", SuccessPolicy::All)
		.with_child(NodeConfig::action("a", "SlowA"))
		.with_child(
			NodeConfig::sequence("seq")
				.with_child(NodeConfig::action("b", "SlowB"))
				.with_child(NodeConfig::action("c", "NeverReached")),
		);
	let spec = harness.factory.compile(&config)?;
	let mut tree = harness.factory.spawn(spec, Context::empty())?;

	// get A and B running, C stays Fresh behind the sequence cursor
	for _ in 0..2 {
		let status = tree.tick().await?;
		assert_eq!(status, Status::Running);
		harness.clock.advance(50);
	}

	tree.shutdown().await?;

	// a teardown mid-activation still honors on_terminate(Aborted)
	assert_eq!(probe_a.terminates(), 1);
	assert_eq!(probe_a.last_terminal(), Some(Status::Aborted));
	assert_eq!(probe_b.terminates(), 1);
	assert_eq!(probe_b.last_terminal(), Some(Status::Aborted));
	// the never started leaf is left untouched
	assert_eq!(probe_c.inits(), 0);
	assert_eq!(probe_c.terminates(), 0);

	assert_eq!(harness.sink.count("root", EventKind::Aborted), 1);
	assert_eq!(harness.sink.count("seq", EventKind::Aborted), 1);
	assert_eq!(harness.sink.count("a", EventKind::Aborted), 1);
	assert_eq!(harness.sink.count("b", EventKind::Aborted), 1);
	assert_eq!(harness.sink.count("c", EventKind::Aborted), 0);
	Ok(())
}

#[tokio::test]
async fn queue_sink_delivers_lifecycle_events() -> Result<(), Error> {
	let (queue, events) = QueueSink::bounded(64);
	let clock = Arc::new(ManualClock::default());
	let settings = TreeSettings::default()
		.with_clock(clock.clone())
		.with_event_sink(Arc::new(queue))
		.with_tick_source(TickSource::External);
	let mut factory = TreeFactory::with_settings(settings);
	factory
		.registry_mut()
		.register_action("Succeeds", MockAction::creation_fn(MockActionConfig::new(Status::Success, 1)))?;

	let config = NodeConfig::action("solo", "Succeeds");
	let spec = factory.compile(&config)?;
	let mut tree = factory.spawn(spec, Context::empty())?;

	let status = tree.tick().await?;
	assert_eq!(status, Status::Success);

	let started = tokio::time::timeout(Duration::from_secs(1), events.recv())
		.await
		.ok()
		.flatten();
	assert!(started.is_some());
	if let Some(event) = started {
		assert_eq!(event.kind, EventKind::Started);
		assert_eq!(event.node_id.as_ref(), "solo");
	}

	let finished = tokio::time::timeout(Duration::from_secs(1), events.recv())
		.await
		.ok()
		.flatten();
	assert!(finished.is_some());
	if let Some(event) = finished {
		assert_eq!(event.kind, EventKind::StatusChange);
		assert_eq!(event.to, Status::Success);
	}
	Ok(())
}

#[tokio::test]
async fn ambient_timer_drives_the_tree_to_completion() -> Result<(), Error> {
	let probe = Arc::new(MockProbe::default());
	let mut factory = TreeFactory::new();
	factory.registry_mut().register_action(
		"TwoSteps",
		MockAction::creation_fn(MockActionConfig::new(Status::Success, 2).with_probe(probe.clone())),
	)?;

	let config = NodeConfig::sequence("root")
		.with_tick_period(5)
		.with_child(NodeConfig::action("a", "TwoSteps").with_tick_period(5));
	let spec = factory.compile(&config)?;
	let tree = factory.spawn(spec, Context::empty())?;

	let mut status = tree.status();
	for _ in 0..200 {
		status = tree.status();
		if status.is_terminal() {
			break;
		}
		tokio::time::sleep(Duration::from_millis(5)).await;
	}
	assert_eq!(status, Status::Success);
	assert_eq!(probe.inits(), 1);
	assert_eq!(probe.updates(), 2);

	tree.shutdown().await?;
	Ok(())
}
