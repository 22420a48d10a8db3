//! Tests for tier composition and the rule registry contract

use std::collections::HashSet;
use std::sync::Arc;

use a11ycrawl::rules::{RuleCheck, TierRegistry};
use a11ycrawl::schema::Violation;
use a11ycrawl::session::RenderingSession;
use futures::future::BoxFuture;

#[test]
fn standard_registry_has_both_tiers() {
    let registry = TierRegistry::standard();
    let names: Vec<&str> = registry.tier_names().collect();
    assert!(names.contains(&"baseline"));
    assert!(names.contains(&"extended"));
    assert!(registry.get("nonexistent").is_none());
}

#[test]
fn extended_tier_is_a_superset_of_baseline() {
    let registry = TierRegistry::standard();
    let baseline: HashSet<&str> = registry
        .rule_ids("baseline")
        .expect("baseline tier exists")
        .into_iter()
        .collect();
    let extended: HashSet<&str> = registry
        .rule_ids("extended")
        .expect("extended tier exists")
        .into_iter()
        .collect();

    assert!(baseline.is_subset(&extended));
    assert!(extended.len() > baseline.len());
}

#[test]
fn baseline_tier_runs_the_engine_first() {
    let registry = TierRegistry::standard();
    let ids = registry.rule_ids("extended").expect("extended tier exists");
    assert_eq!(ids.first(), Some(&"axe-core"));
}

struct NoopRule;

impl RuleCheck for NoopRule {
    fn id(&self) -> &'static str {
        "noop"
    }

    fn run<'a>(
        &'a self,
        _session: &'a RenderingSession,
    ) -> BoxFuture<'a, anyhow::Result<Vec<Violation>>> {
        Box::pin(async { Ok(Vec::new()) })
    }
}

#[test]
fn registering_a_rule_touches_only_the_registry() {
    let mut registry = TierRegistry::standard();
    registry.register("extended", Arc::new(NoopRule));
    let ids = registry.rule_ids("extended").expect("extended tier exists");
    assert_eq!(ids.last(), Some(&"noop"));

    // a brand-new tier can be assembled the same way
    registry.register("experimental", Arc::new(NoopRule));
    assert_eq!(
        registry.rule_ids("experimental"),
        Some(vec!["noop"])
    );
}
