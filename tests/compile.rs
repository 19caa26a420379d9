// Copyright © 2025 Stephan Kunz

//! Tests of the [`NodeSpec`] compiler.

mod common;

use std::sync::Arc;

use common::Harness;
use rstest::rstest;
use ticktree::prelude::*;

fn factory_with_actions() -> Result<TreeFactory, Error> {
	let mut factory = TreeFactory::new();
	factory
		.registry_mut()
		.register_action_fn("Succeed", Arc::new(|_ctx| Ok(Status::Success)))?;
	factory
		.registry_mut()
		.register_action_fn("Fail", Arc::new(|_ctx| Ok(Status::Failure)))?;
	Ok(factory)
}

#[test]
fn compiles_a_nested_tree() -> Result<(), Error> {
	let factory = factory_with_actions()?;
	let config = NodeConfig::sequence("root")
		.with_child(NodeConfig::action("a", "Succeed"))
		.with_child(
			NodeConfig::parallel("par", SuccessPolicy::Any)
				.with_child(NodeConfig::action("b", "Succeed"))
				.with_child(NodeConfig::action("c", "Fail").with_tick_period(7)),
		);
	let spec = factory.compile(&config)?;

	assert_eq!(spec.kind, NodeKind::Sequence);
	assert_eq!(spec.node_count(), 5);
	assert_eq!(spec.tick_period_ms, 50);
	let c = spec.find("c").ok_or(ConfigError::DuplicateId("c".into()))?;
	assert_eq!(c.tick_period_ms, 7);
	assert_eq!(c.action_ref.as_deref(), Some("Fail"));
	let par = spec
		.find("par")
		.ok_or(ConfigError::DuplicateId("par".into()))?;
	assert_eq!(par.success_policy, Some(SuccessPolicy::Any));
	Ok(())
}

#[test]
fn unknown_kind_is_rejected() -> Result<(), Error> {
	let factory = factory_with_actions()?;
	let config = NodeConfig::new("Decorator", "root").with_child(NodeConfig::action("a", "Succeed"));
	let result = factory.compile(&config);
	assert!(matches!(result, Err(ConfigError::UnknownKind(_))));
	Ok(())
}

#[test]
fn leaf_with_children_is_rejected() -> Result<(), Error> {
	let factory = factory_with_actions()?;
	let config = NodeConfig::action("root", "Succeed").with_child(NodeConfig::action("a", "Succeed"));
	assert!(matches!(
		factory.compile(&config),
		Err(ConfigError::LeafWithChildren(_))
	));
	Ok(())
}

#[test]
fn composite_without_children_is_rejected() -> Result<(), Error> {
	let factory = factory_with_actions()?;
	assert!(matches!(
		factory.compile(&NodeConfig::sequence("root")),
		Err(ConfigError::CompositeWithoutChildren(_))
	));
	Ok(())
}

#[test]
fn missing_action_is_rejected() -> Result<(), Error> {
	let factory = factory_with_actions()?;
	let config = NodeConfig::sequence("root").with_child(NodeConfig::action("a", "NotThere"));
	assert!(matches!(
		factory.compile(&config),
		Err(ConfigError::ActionMissing { .. })
	));
	Ok(())
}

#[test]
fn missing_priority_function_is_rejected() -> Result<(), Error> {
	let factory = factory_with_actions()?;
	let config = NodeConfig::priority("root", "NotThere").with_child(NodeConfig::action("a", "Succeed"));
	assert!(matches!(
		factory.compile(&config),
		Err(ConfigError::PriorityMissing { .. })
	));
	Ok(())
}

#[test]
fn zero_tick_period_is_rejected() -> Result<(), Error> {
	let factory = factory_with_actions()?;
	let config = NodeConfig::sequence("root").with_child(NodeConfig::action("a", "Succeed").with_tick_period(0));
	assert!(matches!(
		factory.compile(&config),
		Err(ConfigError::TickPeriodTooLow { .. })
	));
	Ok(())
}

#[test]
fn one_millisecond_period_is_permitted() -> Result<(), Error> {
	let factory = factory_with_actions()?;
	let config = NodeConfig::sequence("root").with_child(NodeConfig::action("a", "Succeed").with_tick_period(1));
	assert!(factory.compile(&config).is_ok());
	Ok(())
}

#[test]
fn duplicate_ids_are_rejected() -> Result<(), Error> {
	let factory = factory_with_actions()?;
	let config = NodeConfig::sequence("root")
		.with_child(NodeConfig::action("a", "Succeed"))
		.with_child(NodeConfig::action("a", "Fail"));
	assert!(matches!(
		factory.compile(&config),
		Err(ConfigError::DuplicateId(_))
	));
	Ok(())
}

#[rstest]
#[case(0)]
#[case(3)]
fn out_of_range_success_policy_is_rejected(#[case] k: u32) -> Result<(), Error> {
	let factory = factory_with_actions()?;
	let config = NodeConfig::parallel("root", SuccessPolicy::K(k))
		.with_child(NodeConfig::action("a", "Succeed"))
		.with_child(NodeConfig::action("b", "Succeed"));
	assert!(matches!(
		factory.compile(&config),
		Err(ConfigError::InvalidSuccessPolicy { .. })
	));
	Ok(())
}

#[test]
fn policy_on_non_parallel_is_normalized_away() -> Result<(), Error> {
	let factory = factory_with_actions()?;
	let mut config = NodeConfig::sequence("root").with_child(NodeConfig::action("a", "Succeed"));
	config.success_policy = Some(SuccessPolicy::Any);
	let spec = factory.compile(&config)?;
	assert_eq!(spec.success_policy, None);
	Ok(())
}

#[test]
fn spec_serialization_round_trips() -> Result<(), Error> {
	let factory = factory_with_actions()?;
	let config = NodeConfig::selector("root")
		.with_child(NodeConfig::action("a", "Fail").with_name("first try"))
		.with_child(
			NodeConfig::parallel("par", SuccessPolicy::K(2))
				.with_tick_period(25)
				.with_child(NodeConfig::action("b", "Succeed"))
				.with_child(NodeConfig::action("c", "Succeed")),
		);
	let spec = factory.compile(&config)?;
	let restored = NodeSpec::from_json(&spec.to_json())?;
	assert_eq!(spec, restored);
	Ok(())
}

#[tokio::test]
async fn spawning_an_unresolved_spec_fails() -> Result<(), Error> {
	let harness = Harness::new();
	let mut spec = NodeSpec::default();
	spec.id = "lonely".into();
	spec.action_ref = Some("NotThere".into());
	let result = harness.factory.spawn(spec, Context::empty());
	assert!(matches!(result, Err(Error::Node(NodeError::Unresolved { .. }))));
	Ok(())
}
