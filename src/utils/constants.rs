//! Shared configuration constants for a11ycrawl
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Default maximum number of pages visited per crawl run: 25
///
/// Bounds both runtime and output size. A federal agency landing page plus
/// two levels of section pages typically fits inside this ceiling; raise it
/// via `--max-pages` for full-site sweeps.
pub const DEFAULT_MAX_PAGES: usize = 25;

/// Default navigation timeout: 30 seconds
///
/// Covers `page.goto()`, the load event, and the network-idle settle window
/// together. A page that has not reached network idle by then is recorded
/// as a navigation failure and the crawl moves on.
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 30;

/// Settle window for the network-idle check: 500 milliseconds
///
/// Navigation is judged complete when `document.readyState` is `complete`
/// and the page's resource-entry count has not changed for this long.
pub const NETWORK_IDLE_SETTLE_MS: u64 = 500;

/// Poll interval for the network-idle check: 250 milliseconds
pub const NETWORK_IDLE_POLL_MS: u64 = 250;

/// Maximum stored length of a node's outer markup: 300 bytes
///
/// Violation records embed a snippet of the offending element so downstream
/// consumers can show context without re-fetching the page. Unbounded
/// `outerHTML` would bloat the output file on markup-heavy pages.
pub const MAX_NODE_HTML_LEN: usize = 300;

/// Minimum pointer-target edge length: 24 CSS pixels
///
/// WCAG 2.2 success criterion 2.5.8 (Target Size, Minimum). Interactive
/// elements rendered smaller than 24x24 are flagged unless they fall under
/// the inline-flow or visually-hidden exceptions.
pub const MIN_POINTER_TARGET_PX: f64 = 24.0;

/// Rendered size at or below which an image is treated as an icon
///
/// Icon-sized images are assumed decorative by the alt-text heuristic to
/// keep the false-positive rate low.
pub const ICON_IMAGE_MAX_PX: f64 = 24.0;

/// Filename fragments that mark an image as decorative
///
/// Compiled once into a case-insensitive regex; applied to the `src`
/// attribute by the alt-text rule.
pub const DECORATIVE_NAME_PATTERN: &str =
    r"(?i)(icon|logo|sprite|spacer|bullet|arrow|divider|decorative|bg[-_.])";

/// WCAG conformance tags the baseline engine is restricted to
///
/// Level A and AA families only; AAA rules produce too many findings that
/// sites never committed to fixing.
pub const WCAG_AA_TAGS: [&str; 5] = ["wcag2a", "wcag2aa", "wcag21a", "wcag21aa", "wcag22aa"];

/// Pinned axe-core bundle injected into pages for the baseline rule
pub const AXE_CORE_CDN_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/axe-core/4.10.2/axe.min.js";
