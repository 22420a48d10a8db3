//! Rendering session: one browser page for the whole crawl.
//!
//! The session owns a single long-lived page instance (not re-created per
//! URL, avoiding per-navigation startup cost) and is the only component
//! that touches the browser. It is also the failure boundary for rules: a
//! rule that errors degrades to zero violations with a logged warning so
//! one broken check cannot abort the page scan or the crawl.

pub mod js_scripts;

use anyhow::{Context, Result};
use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::{CrawlError, CrawlResult};
use crate::rules::RuleCheck;
use crate::schema::Violation;
use crate::utils::{NETWORK_IDLE_POLL_MS, NETWORK_IDLE_SETTLE_MS};

use js_scripts::{LINKS_SCRIPT, PAGE_STATE_SCRIPT, SCROLL_TO_BOTTOM_SCRIPT};

/// Wrap an async page operation with an explicit timeout.
///
/// Prevents indefinite hangs on CDP calls; the error message distinguishes
/// a timeout from an operation failure.
async fn with_page_timeout<F, T>(operation: F, timeout: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "{operation_name} timeout after {} seconds",
            timeout.as_secs()
        )),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageState {
    ready_state: String,
    resource_count: u64,
    body_exists: bool,
}

/// Exclusive handle on the crawl's browser page.
pub struct RenderingSession {
    page: Page,
    navigation_timeout: Duration,
}

impl RenderingSession {
    /// Open the session's page. Called once per crawl run.
    pub async fn open(browser: &Browser, navigation_timeout: Duration) -> CrawlResult<Self> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| CrawlError::Browser(format!("failed to create page: {e}")))?;
        Ok(Self {
            page,
            navigation_timeout,
        })
    }

    /// Navigate to a URL and wait for the network to settle.
    ///
    /// The whole sequence - `goto`, the load event, and the network-idle
    /// settle window - shares one deadline. A page that has not gone idle
    /// by then is a `Navigation` error: recorded by the caller, never
    /// retried.
    pub async fn navigate(&self, url: &str) -> CrawlResult<()> {
        let deadline = Instant::now() + self.navigation_timeout;
        let nav_err = |message: String| CrawlError::Navigation {
            url: url.to_string(),
            message,
        };

        with_page_timeout(
            async {
                self.page
                    .goto(url)
                    .await
                    .map(|_| ())
                    .map_err(|e| anyhow::anyhow!("{e}"))
            },
            remaining(deadline),
            "Page navigation",
        )
        .await
        .map_err(|e| nav_err(format!("{e:#}")))?;

        with_page_timeout(
            async {
                self.page
                    .wait_for_navigation()
                    .await
                    .map(|_| ())
                    .map_err(|e| anyhow::anyhow!("{e}"))
            },
            remaining(deadline),
            "Page load",
        )
        .await
        .map_err(|e| nav_err(format!("{e:#}")))?;

        self.wait_for_network_idle(deadline)
            .await
            .map_err(|e| nav_err(format!("{e:#}")))?;

        Ok(())
    }

    /// Poll the page until it reports a stable resource count.
    ///
    /// Idle means `readyState === 'complete'`, a body, and no new resource
    /// entries for the settle window. `wait_for_navigation` only covers the
    /// HTTP response; JS-heavy pages keep fetching well past it.
    async fn wait_for_network_idle(&self, deadline: Instant) -> Result<()> {
        let poll_interval = Duration::from_millis(NETWORK_IDLE_POLL_MS);
        let settle_window = Duration::from_millis(NETWORK_IDLE_SETTLE_MS);

        let mut last_count: Option<u64> = None;
        let mut stable_since = Instant::now();

        loop {
            if Instant::now() >= deadline {
                anyhow::bail!(
                    "network did not reach idle within {} seconds",
                    self.navigation_timeout.as_secs()
                );
            }

            match self.evaluate::<PageState>(PAGE_STATE_SCRIPT).await {
                Ok(state) => {
                    if last_count != Some(state.resource_count) {
                        last_count = Some(state.resource_count);
                        stable_since = Instant::now();
                    }
                    if state.ready_state == "complete"
                        && state.body_exists
                        && stable_since.elapsed() >= settle_window
                    {
                        debug!(
                            resources = state.resource_count,
                            "page reached network idle"
                        );
                        return Ok(());
                    }
                }
                Err(e) => {
                    // Transient during cross-document navigation, retry
                    debug!("page state probe failed, retrying: {e:#}");
                }
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Evaluate a script and deserialize its JSON result.
    ///
    /// All in-page inspection funnels through here: promises are awaited
    /// and results come back by value, so callers only ever see plain
    /// serializable records.
    pub async fn evaluate<T: DeserializeOwned>(&self, script: &str) -> Result<T> {
        let params = EvaluateParams::builder()
            .expression(script)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build evaluate params: {e}"))?;

        let result = self
            .page
            .evaluate(params)
            .await
            .context("JavaScript evaluation failed")?;

        result
            .into_value::<T>()
            .context("failed to parse evaluation result")
    }

    /// Execute one rule against the currently loaded document.
    ///
    /// A rule failure is caught here and converted into an empty violation
    /// list plus a warning; the rest of the tier still runs.
    pub async fn run_rule(&self, rule: &dyn RuleCheck) -> Vec<Violation> {
        match rule.run(self).await {
            Ok(violations) => {
                debug!(
                    rule = rule.id(),
                    count = violations.len(),
                    "rule completed"
                );
                violations
            }
            Err(e) => {
                warn!(
                    rule = rule.id(),
                    "rule execution failed, recording zero violations: {e:#}"
                );
                Vec::new()
            }
        }
    }

    /// Collect every anchor's resolved href from the current document.
    ///
    /// Extraction failure is treated as "no links found" for this page.
    pub async fn extract_links(&self) -> Vec<String> {
        match self.evaluate::<Vec<String>>(LINKS_SCRIPT).await {
            Ok(links) => links,
            Err(e) => {
                warn!("link extraction failed, treating as no links: {e:#}");
                Vec::new()
            }
        }
    }

    /// Scroll through the page to trigger lazy-loaded content, best effort.
    pub async fn scroll_to_bottom(&self) {
        if let Err(e) = self.evaluate::<bool>(SCROLL_TO_BOTTOM_SCRIPT).await {
            debug!("scroll-through failed: {e:#}");
        }
    }

    /// Capture a full-page PNG screenshot for the downstream annotator.
    pub async fn capture_screenshot(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .context("failed to create screenshot directory")?;
        }

        let params = CaptureScreenshotParams {
            format: Some(CaptureScreenshotFormat::Png),
            capture_beyond_viewport: Some(true),
            ..Default::default()
        };

        let screenshot_data = self
            .page
            .screenshot(params)
            .await
            .map_err(|e| anyhow::anyhow!("failed to capture screenshot: {e}"))?;

        tokio::fs::write(path, screenshot_data)
            .await
            .context("failed to write screenshot")?;

        debug!("screenshot saved to {}", path.display());
        Ok(())
    }

    /// Release the page. The crawl is over once this runs.
    pub async fn close(self) {
        if let Err(e) = self.page.close().await {
            warn!("failed to close page: {e}");
        }
    }
}

fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}
