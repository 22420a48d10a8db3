//! Page scan orchestration.
//!
//! Drives the crawl loop: dequeue, navigate, run the active tier's rules,
//! extract same-domain links, enqueue, repeat until the frontier is empty
//! or the page ceiling is reached. The orchestrator exclusively owns the
//! frontier and the single rendering session for the run's lifetime; links
//! found on a page are enqueued only after the page is fully processed,
//! which is what makes the traversal breadth-first.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use chromiumoxide::browser::Browser;

use crate::browser_setup::launch_browser;
use crate::config::CrawlConfig;
use crate::error::{CrawlError, CrawlResult};
use crate::frontier::CrawlFrontier;
use crate::rules::{RuleCheck, TierRegistry};
use crate::schema::PageResult;
use crate::session::RenderingSession;
use crate::urls;

/// Crawl the configured domain and return one PageResult per visited URL,
/// in visitation order.
///
/// A page whose navigation fails still counts as visited and gets an error
/// record; the crawl continues with the next queued URL. Only browser
/// acquisition and an unknown tier are fatal.
pub async fn crawl(config: &CrawlConfig, registry: &TierRegistry) -> CrawlResult<Vec<PageResult>> {
    let tier = registry
        .get(config.tier())
        .ok_or_else(|| CrawlError::UnknownTier(config.tier().to_string()))?;

    let (browser, handler_task, user_data_dir) = launch_browser(config.headless())
        .await
        .map_err(|e| CrawlError::Browser(format!("{e:#}")))?;
    let session = RenderingSession::open(&browser, config.navigation_timeout()).await?;

    let mut frontier = CrawlFrontier::new(config.max_pages());
    frontier.enqueue(config.seed_url());

    let mut results = Vec::new();
    while let Some(url) = frontier.dequeue_next() {
        info!(
            "scanning [{}/{}]: {}",
            frontier.visited_count(),
            frontier.max_pages(),
            url
        );

        if let Err(e) = session.navigate(&url).await {
            warn!("navigation failed, recording error result: {e}");
            results.push(PageResult::failed(url, e.to_string()));
            continue;
        }

        results.push(scan_current_page(&session, &url, tier, config).await);

        for raw in session.extract_links().await {
            if !urls::is_crawlable(&raw) {
                continue;
            }
            let Ok(normalized) = urls::normalize(&raw, config.strip_www()) else {
                debug!("skipping unparsable link: {raw}");
                continue;
            };
            if !urls::same_domain(&normalized, config.domain()) {
                continue;
            }
            if frontier.enqueue(&normalized) {
                debug!("queued: {normalized}");
            }
        }
        debug!(
            "frontier: {} visited, {} pending",
            frontier.visited_count(),
            frontier.pending_count()
        );
    }

    release_session(session, browser, handler_task, user_data_dir).await;
    Ok(results)
}

/// Scan exactly one URL and return its PageResult.
///
/// The single-URL variant of the crawl loop; used by the CLI's `--single`
/// mode so one page can be checked without frontier bookkeeping.
pub async fn scan_single(config: &CrawlConfig, registry: &TierRegistry) -> CrawlResult<PageResult> {
    let tier = registry
        .get(config.tier())
        .ok_or_else(|| CrawlError::UnknownTier(config.tier().to_string()))?;

    let (browser, handler_task, user_data_dir) = launch_browser(config.headless())
        .await
        .map_err(|e| CrawlError::Browser(format!("{e:#}")))?;
    let session = RenderingSession::open(&browser, config.navigation_timeout()).await?;

    let url = config.seed_url().to_string();
    let result = match session.navigate(&url).await {
        Err(e) => {
            warn!("navigation failed, recording error result: {e}");
            PageResult::failed(url, e.to_string())
        }
        Ok(()) => scan_current_page(&session, &url, tier, config).await,
    };

    release_session(session, browser, handler_task, user_data_dir).await;
    Ok(result)
}

/// Run the active tier against the session's loaded document.
///
/// Rules are evaluated strictly in tier-list order and their violations
/// concatenated; a failing rule was already degraded to an empty list at
/// the session boundary.
async fn scan_current_page(
    session: &RenderingSession,
    url: &str,
    tier: &[Arc<dyn RuleCheck>],
    config: &CrawlConfig,
) -> PageResult {
    session.scroll_to_bottom().await;

    let mut violations = Vec::new();
    for rule in tier {
        violations.extend(session.run_rule(rule.as_ref()).await);
    }
    info!("{url}: {} violation(s)", violations.len());

    if let Some(dir) = config.screenshot_dir()
        && let Err(e) = session
            .capture_screenshot(&screenshot_path(dir, url))
            .await
    {
        warn!("screenshot capture failed for {url}: {e:#}");
    }

    PageResult::scanned(url.to_string(), violations)
}

async fn release_session(
    session: RenderingSession,
    mut browser: Browser,
    handler_task: JoinHandle<()>,
    user_data_dir: PathBuf,
) {
    session.close().await;

    debug!("closing browser");
    if let Err(e) = browser.close().await {
        warn!("failed to close browser: {e}");
    }
    // Wait for the process to fully exit before tearing down the handler
    if let Err(e) = browser.wait().await {
        warn!("failed to wait for browser exit: {e}");
    }
    handler_task.abort();

    if let Err(e) = std::fs::remove_dir_all(&user_data_dir) {
        warn!("failed to clean up browser data directory: {e}");
    }
}

static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w.-]").expect("filename pattern is a valid regex"));

/// Derive a screenshot file path from a page URL.
fn screenshot_path(dir: &Path, url: &str) -> PathBuf {
    let trimmed = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    let name = UNSAFE_FILENAME_CHARS.replace_all(trimmed, "_");
    dir.join(format!("{name}.png"))
}
