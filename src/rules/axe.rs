//! Baseline rule: the axe-core engine.
//!
//! Injects the pinned axe-core bundle into the rendered page, runs it
//! restricted to the WCAG 2.x A/AA tag families, and maps its native
//! violation records 1:1 into the Violation/NodeResult shape, truncating
//! node markup so markup-heavy pages stay storage-friendly.

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::Value;

use crate::schema::{Impact, NodeResult, Violation};
use crate::session::RenderingSession;
use crate::session::js_scripts::{AXE_BOOTSTRAP_SCRIPT, AXE_RUN_SCRIPT};
use crate::utils::{AXE_CORE_CDN_URL, MAX_NODE_HTML_LEN, WCAG_AA_TAGS, truncate_on_char_boundary};

use super::RuleCheck;

pub struct AxeRule {
    tags: &'static [&'static str],
}

impl AxeRule {
    /// Engine restricted to the WCAG 2.0/2.1/2.2 Level A and AA families.
    #[must_use]
    pub fn wcag_aa() -> Self {
        Self {
            tags: &WCAG_AA_TAGS,
        }
    }
}

impl RuleCheck for AxeRule {
    fn id(&self) -> &'static str {
        "axe-core"
    }

    fn run<'a>(&'a self, session: &'a RenderingSession) -> BoxFuture<'a, Result<Vec<Violation>>> {
        Box::pin(async move {
            let bootstrap = AXE_BOOTSTRAP_SCRIPT.replace("__AXE_SRC__", AXE_CORE_CDN_URL);
            let ready: bool = session
                .evaluate(&bootstrap)
                .await
                .context("axe-core injection failed")?;
            anyhow::ensure!(ready, "axe-core not available after injection");

            let run_script = axe_run_script(self.tags)?;
            let raw: Vec<RawAxeViolation> = session
                .evaluate(&run_script)
                .await
                .context("axe-core run failed")?;

            Ok(raw.into_iter().map(map_axe_violation).collect())
        })
    }
}

fn axe_run_script(tags: &[&str]) -> Result<String> {
    let tags_json = serde_json::to_string(tags).context("failed to encode runOnly tags")?;
    Ok(AXE_RUN_SCRIPT.replace("__RUN_ONLY_TAGS__", &tags_json))
}

/// Native axe violation record, reduced page-side to the fields we keep
#[derive(Debug, Deserialize)]
struct RawAxeViolation {
    id: String,
    description: String,
    impact: Option<String>,
    #[serde(default)]
    nodes: Vec<RawAxeNode>,
}

#[derive(Debug, Deserialize)]
struct RawAxeNode {
    html: String,
    #[serde(default)]
    target: Vec<Value>,
    #[serde(rename = "failureSummary", default)]
    failure_summary: Option<String>,
}

fn map_axe_violation(raw: RawAxeViolation) -> Violation {
    Violation {
        id: raw.id,
        description: raw.description,
        impact: raw.impact.as_deref().and_then(Impact::parse),
        nodes: raw
            .nodes
            .into_iter()
            .map(|node| NodeResult {
                html: truncate_on_char_boundary(&node.html, MAX_NODE_HTML_LEN),
                target: flatten_targets(node.target),
                failure_summary: node.failure_summary,
            })
            .collect(),
    }
}

/// axe reports selectors inside iframes as nested arrays; keep the
/// innermost entry, which resolves within the document that produced the
/// node.
fn flatten_targets(raw: Vec<Value>) -> Vec<String> {
    raw.into_iter()
        .filter_map(|value| match value {
            Value::String(selector) => Some(selector),
            Value::Array(parts) => parts
                .into_iter()
                .rev()
                .find_map(|part| part.as_str().map(str::to_string)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canned_axe_violation() -> RawAxeViolation {
        serde_json::from_value(serde_json::json!({
            "id": "image-alt",
            "description": "Ensures <img> elements have alternate text or a role of none or presentation",
            "impact": "critical",
            "nodes": [
                {
                    "html": "<img src=\"hero.png\">",
                    "target": ["#content > img:nth-of-type(1)"],
                    "failureSummary": "Fix any of the following:\n  Element does not have an alt attribute"
                },
                {
                    "html": "<img src=\"chart.png\">",
                    "target": [["iframe#embed", "img.chart"]],
                    "failureSummary": null
                }
            ]
        }))
        .expect("canned violation parses")
    }

    #[test]
    fn maps_native_records_one_to_one() {
        let violation = map_axe_violation(canned_axe_violation());
        assert_eq!(violation.id, "image-alt");
        assert_eq!(violation.impact, Some(Impact::Critical));
        assert_eq!(violation.nodes.len(), 2);
        assert_eq!(
            violation.nodes[0].target,
            vec!["#content > img:nth-of-type(1)".to_string()]
        );
        assert!(violation.nodes[0]
            .failure_summary
            .as_deref()
            .is_some_and(|s| s.contains("alt attribute")));
    }

    #[test]
    fn iframe_targets_keep_innermost_selector() {
        let violation = map_axe_violation(canned_axe_violation());
        assert_eq!(violation.nodes[1].target, vec!["img.chart".to_string()]);
    }

    #[test]
    fn unknown_impact_becomes_absent() {
        let raw: RawAxeViolation = serde_json::from_value(serde_json::json!({
            "id": "color-contrast",
            "description": "Ensures sufficient contrast",
            "impact": "devastating",
            "nodes": []
        }))
        .expect("parses");
        assert_eq!(map_axe_violation(raw).impact, None);
    }

    #[test]
    fn node_html_is_truncated() {
        let long_markup = format!("<div>{}</div>", "x".repeat(1000));
        let raw: RawAxeViolation = serde_json::from_value(serde_json::json!({
            "id": "region",
            "description": "All page content should be contained by landmarks",
            "impact": "moderate",
            "nodes": [{ "html": long_markup, "target": ["div"] }]
        }))
        .expect("parses");
        let violation = map_axe_violation(raw);
        assert!(violation.nodes[0].html.len() <= MAX_NODE_HTML_LEN);
    }

    #[test]
    fn run_script_embeds_conformance_tags() {
        let script = axe_run_script(&WCAG_AA_TAGS).expect("script builds");
        assert!(script.contains("\"wcag22aa\""));
        assert!(!script.contains("__RUN_ONLY_TAGS__"));
    }
}
