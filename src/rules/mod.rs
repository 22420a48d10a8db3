//! Rule registry and tiers.
//!
//! Every check shares one contract: given the rendering session, produce
//! zero or more Violations. Rules are evaluated independently and their
//! results concatenated in tier-list order; no rule may depend on another's
//! output or touch crawl state. Tiers are named, ordered bundles of rules -
//! selecting a tier is the only lever controlling which checks run, and
//! adding a rule means touching the registry, never the orchestrator.

pub mod axe;
pub mod bespoke;

use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::schema::Violation;
use crate::session::RenderingSession;

pub use axe::AxeRule;
pub use bespoke::{AutoplayMediaRule, MissingAltTextRule, PointerTargetSizeRule};

/// One accessibility check against a rendered page.
pub trait RuleCheck: Send + Sync {
    /// Stable identifier, used in logs and as the violation id prefix
    fn id(&self) -> &'static str;

    /// Run the check against the session's current document
    fn run<'a>(
        &'a self,
        session: &'a RenderingSession,
    ) -> BoxFuture<'a, anyhow::Result<Vec<Violation>>>;
}

/// Registry mapping tier names to ordered rule bundles.
pub struct TierRegistry {
    tiers: BTreeMap<String, Vec<Arc<dyn RuleCheck>>>,
}

impl TierRegistry {
    /// The built-in tiers: `baseline` wraps the axe-core engine alone,
    /// `extended` adds every bespoke heuristic after it.
    #[must_use]
    pub fn standard() -> Self {
        let baseline: Vec<Arc<dyn RuleCheck>> = vec![Arc::new(AxeRule::wcag_aa())];

        let mut extended = baseline.clone();
        extended.push(Arc::new(AutoplayMediaRule));
        extended.push(Arc::new(PointerTargetSizeRule));
        extended.push(Arc::new(MissingAltTextRule::new()));

        let mut tiers = BTreeMap::new();
        tiers.insert("baseline".to_string(), baseline);
        tiers.insert("extended".to_string(), extended);
        Self { tiers }
    }

    /// Append a rule to a tier, creating the tier if needed.
    pub fn register(&mut self, tier: &str, rule: Arc<dyn RuleCheck>) {
        self.tiers.entry(tier.to_string()).or_default().push(rule);
    }

    #[must_use]
    pub fn get(&self, tier: &str) -> Option<&[Arc<dyn RuleCheck>]> {
        self.tiers.get(tier).map(Vec::as_slice)
    }

    pub fn tier_names(&self) -> impl Iterator<Item = &str> {
        self.tiers.keys().map(String::as_str)
    }

    /// Rule identifiers of a tier in evaluation order.
    #[must_use]
    pub fn rule_ids(&self, tier: &str) -> Option<Vec<&'static str>> {
        self.tiers
            .get(tier)
            .map(|rules| rules.iter().map(|r| r.id()).collect())
    }
}

impl Default for TierRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
