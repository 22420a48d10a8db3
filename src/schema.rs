//! Violation and page-result records.
//!
//! This schema is a cross-system contract: the report renderer, the AI
//! explanation layer, and the live-page highlighter all parse these records
//! directly from the output file. Field names and casing must stay stable
//! (`failureSummary` is camelCase on the wire, impact levels are lowercase).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity assigned to a violation by the engine or rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Minor,
    Moderate,
    Serious,
    Critical,
}

impl Impact {
    /// Parse an impact string from a native engine record. Unknown levels
    /// map to `None` rather than failing the whole violation.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "minor" => Some(Self::Minor),
            "moderate" => Some(Self::Moderate),
            "serious" => Some(Self::Serious),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// One offending DOM location within a violation.
///
/// The `target` selectors must re-resolve via `document.querySelectorAll`
/// against the same document state that produced them - the downstream
/// highlighter re-queries the live page to draw overlays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeResult {
    /// Truncated outer markup of the offending element
    pub html: String,
    /// CSS selector strings identifying the element(s)
    pub target: Vec<String>,
    #[serde(
        rename = "failureSummary",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub failure_summary: Option<String>,
}

/// One accessibility failure pattern found on a page, with every DOM
/// location where it occurs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule identifier, stable across runs
    pub id: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub impact: Option<Impact>,
    pub nodes: Vec<NodeResult>,
}

/// The complete scan record for one visited URL.
///
/// Created exactly once per visited URL and immutable once recorded. A page
/// whose navigation failed still gets a record, with `error` set and an
/// empty violation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub violations: Vec<Violation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl PageResult {
    #[must_use]
    pub fn scanned(url: String, violations: Vec<Violation>) -> Self {
        Self {
            url,
            timestamp: Utc::now(),
            violations,
            error: None,
        }
    }

    /// Record for a page that could not be scanned. Counts as visited.
    #[must_use]
    pub fn failed(url: String, error: String) -> Self {
        Self {
            url,
            timestamp: Utc::now(),
            violations: Vec::new(),
            error: Some(error),
        }
    }
}
