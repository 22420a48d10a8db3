//! Core configuration types for accessibility crawling
//!
//! This module contains the main `CrawlConfig` struct that defines the
//! parameters of one crawl run. Construction goes through the type-safe
//! builder, which validates the seed URL and derives the crawl domain.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration struct for one crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Seed URL in normalized form.
    ///
    /// **INVARIANT:** Always a parseable absolute URL with the crawl's
    /// `strip_www` policy already applied (normalized in the builder), so
    /// frontier dedup never compares mixed forms.
    pub(crate) seed_url: String,

    /// Domain that bounds the crawl. Defaults to the seed host; links
    /// outside it (and outside its subdomains) are never enqueued.
    pub(crate) domain: String,

    /// Ceiling on pages visited in this run
    pub(crate) max_pages: usize,

    /// Name of the rule tier to evaluate on every page
    pub(crate) tier: String,

    /// Path the JSON result array is written to
    pub(crate) output_path: PathBuf,

    /// Strip a leading `www.` host label during URL normalization.
    ///
    /// Applied consistently to the seed and to every discovered link
    /// within the run.
    pub(crate) strip_www: bool,

    /// Budget in seconds for navigation plus the network-idle settle
    pub(crate) navigation_timeout_secs: u64,

    pub(crate) headless: bool,

    /// When set, a full-page screenshot of every scanned page is saved
    /// here for the downstream annotator
    pub(crate) screenshot_dir: Option<PathBuf>,
}
