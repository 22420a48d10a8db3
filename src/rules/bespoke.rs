//! Bespoke heuristic rules.
//!
//! Each rule scans the rendered DOM for one specific failure pattern the
//! baseline engine does not reliably catch. The in-page script only
//! collects candidate records; the flagging decision happens here, on
//! plain data, where it can be unit-tested without a browser. Heuristics
//! are tuned to positively identify true offenders - an uncertain
//! candidate is skipped, not flagged.

use futures::future::BoxFuture;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::schema::{Impact, NodeResult, Violation};
use crate::session::RenderingSession;
use crate::session::js_scripts::{autoplay_media_script, image_alt_script, pointer_target_script};
use crate::utils::{
    DECORATIVE_NAME_PATTERN, ICON_IMAGE_MAX_PX, MAX_NODE_HTML_LEN, MIN_POINTER_TARGET_PX,
    truncate_on_char_boundary,
};

use super::RuleCheck;

static DECORATIVE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DECORATIVE_NAME_PATTERN).expect("decorative-name pattern is a valid regex")
});

// ---------------------------------------------------------------------------
// Media auto-play control

/// Flags `<audio>`/`<video>` elements that start automatically without an
/// exposed pause or volume control (WCAG 1.4.2, Audio Control).
pub struct AutoplayMediaRule;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MediaCandidate {
    pub selector: String,
    pub html: String,
    pub tag: String,
    pub has_controls: bool,
    pub muted: bool,
}

impl RuleCheck for AutoplayMediaRule {
    fn id(&self) -> &'static str {
        "media-autoplay-control"
    }

    fn run<'a>(
        &'a self,
        session: &'a RenderingSession,
    ) -> BoxFuture<'a, anyhow::Result<Vec<Violation>>> {
        Box::pin(async move {
            let candidates: Vec<MediaCandidate> =
                session.evaluate(&autoplay_media_script()).await?;
            Ok(flag_autoplay_media(candidates))
        })
    }
}

pub(crate) fn flag_autoplay_media(candidates: Vec<MediaCandidate>) -> Vec<Violation> {
    let nodes: Vec<NodeResult> = candidates
        .into_iter()
        // muted autoplay video is exempt; audio is flagged regardless
        .filter(|c| !c.has_controls && (c.tag == "audio" || !c.muted))
        .map(|c| NodeResult {
            html: truncate_on_char_boundary(&c.html, MAX_NODE_HTML_LEN),
            target: vec![c.selector],
            failure_summary: Some(format!(
                "<{}> starts automatically but exposes no pause or volume control",
                c.tag
            )),
        })
        .collect();

    if nodes.is_empty() {
        return Vec::new();
    }
    vec![Violation {
        id: "media-autoplay-control".to_string(),
        description: "Auto-playing media must expose a control to pause or mute it".to_string(),
        impact: Some(Impact::Serious),
        nodes,
    }]
}

// ---------------------------------------------------------------------------
// Minimum pointer-target size

/// Flags interactive elements rendered below the 24x24 CSS-pixel minimum
/// (WCAG 2.5.8, Target Size Minimum). Inline-flow elements, invisible
/// elements, and visually-hidden-but-focusable elements are valid
/// exceptions under the criterion and are skipped.
pub struct PointerTargetSizeRule;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TargetCandidate {
    pub selector: String,
    pub html: String,
    pub width: f64,
    pub height: f64,
    pub display: String,
    pub visible: bool,
    pub clipped: bool,
}

impl RuleCheck for PointerTargetSizeRule {
    fn id(&self) -> &'static str {
        "pointer-target-size"
    }

    fn run<'a>(
        &'a self,
        session: &'a RenderingSession,
    ) -> BoxFuture<'a, anyhow::Result<Vec<Violation>>> {
        Box::pin(async move {
            let candidates: Vec<TargetCandidate> =
                session.evaluate(&pointer_target_script()).await?;
            Ok(flag_small_targets(candidates))
        })
    }
}

pub(crate) fn flag_small_targets(candidates: Vec<TargetCandidate>) -> Vec<Violation> {
    let nodes: Vec<NodeResult> = candidates
        .into_iter()
        .filter(|c| {
            c.visible
                && !c.clipped
                && c.display != "inline"
                // zero-by-zero means the element never rendered
                && (c.width > 0.0 || c.height > 0.0)
                && (c.width < MIN_POINTER_TARGET_PX || c.height < MIN_POINTER_TARGET_PX)
        })
        .map(|c| NodeResult {
            failure_summary: Some(format!(
                "Rendered target is {:.0}x{:.0}px, below the {:.0}x{:.0}px minimum",
                c.width, c.height, MIN_POINTER_TARGET_PX, MIN_POINTER_TARGET_PX
            )),
            html: truncate_on_char_boundary(&c.html, MAX_NODE_HTML_LEN),
            target: vec![c.selector],
        })
        .collect();

    if nodes.is_empty() {
        return Vec::new();
    }
    vec![Violation {
        id: "pointer-target-size".to_string(),
        description: "Interactive targets must be at least 24x24 CSS pixels".to_string(),
        impact: Some(Impact::Serious),
        nodes,
    }]
}

// ---------------------------------------------------------------------------
// Missing meaningful alternative text

/// Flags `<img>` elements that are not clearly decorative yet lack
/// non-empty alternative text, weighted toward images inside `<figure>` or
/// content containers.
pub struct MissingAltTextRule {
    decorative_name: &'static Regex,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageCandidate {
    pub selector: String,
    pub html: String,
    pub src: String,
    pub has_alt: bool,
    pub alt: String,
    pub role: String,
    pub aria_hidden: bool,
    pub width: f64,
    pub height: f64,
    pub in_figure: bool,
    pub in_content: bool,
}

impl MissingAltTextRule {
    #[must_use]
    pub fn new() -> Self {
        Self {
            decorative_name: Lazy::force(&DECORATIVE_NAME),
        }
    }
}

impl Default for MissingAltTextRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleCheck for MissingAltTextRule {
    fn id(&self) -> &'static str {
        "image-meaningful-alt"
    }

    fn run<'a>(
        &'a self,
        session: &'a RenderingSession,
    ) -> BoxFuture<'a, anyhow::Result<Vec<Violation>>> {
        Box::pin(async move {
            let candidates: Vec<ImageCandidate> = session.evaluate(&image_alt_script()).await?;
            Ok(flag_missing_alt(candidates, self.decorative_name))
        })
    }
}

/// Whether an image is clearly decorative and exempt from the alt check.
fn is_decorative(candidate: &ImageCandidate, decorative_name: &Regex) -> bool {
    if candidate.role == "presentation" || candidate.role == "none" || candidate.aria_hidden {
        return true;
    }
    // an explicit alt="" is the author marking the image decorative
    if candidate.has_alt && candidate.alt.is_empty() {
        return true;
    }
    // icon-sized or not rendered at all
    if candidate.width <= ICON_IMAGE_MAX_PX && candidate.height <= ICON_IMAGE_MAX_PX {
        return true;
    }
    let filename = candidate.src.rsplit('/').next().unwrap_or(&candidate.src);
    decorative_name.is_match(filename)
}

pub(crate) fn flag_missing_alt(
    candidates: Vec<ImageCandidate>,
    decorative_name: &Regex,
) -> Vec<Violation> {
    let mut in_content_context = false;
    let nodes: Vec<NodeResult> = candidates
        .into_iter()
        .filter(|c| !is_decorative(c, decorative_name))
        .filter(|c| !c.has_alt || c.alt.trim().is_empty())
        .map(|c| {
            in_content_context |= c.in_figure || c.in_content;
            let context = if c.in_figure {
                " inside a <figure>"
            } else if c.in_content {
                " inside page content"
            } else {
                ""
            };
            NodeResult {
                failure_summary: Some(format!(
                    "Image{context} has no alternative text and no decorative marker"
                )),
                html: truncate_on_char_boundary(&c.html, MAX_NODE_HTML_LEN),
                target: vec![c.selector],
            }
        })
        .collect();

    if nodes.is_empty() {
        return Vec::new();
    }
    vec![Violation {
        id: "image-meaningful-alt".to_string(),
        description: "Content images must have meaningful alternative text".to_string(),
        impact: Some(if in_content_context {
            Impact::Serious
        } else {
            Impact::Moderate
        }),
        nodes,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(tag: &str, has_controls: bool, muted: bool) -> MediaCandidate {
        MediaCandidate {
            selector: format!("{tag}:nth-of-type(1)"),
            html: format!("<{tag} autoplay></{tag}>"),
            tag: tag.to_string(),
            has_controls,
            muted,
        }
    }

    #[test]
    fn autoplay_without_controls_is_flagged() {
        let violations = flag_autoplay_media(vec![media("video", false, false)]);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].id, "media-autoplay-control");
        assert_eq!(violations[0].nodes.len(), 1);
    }

    #[test]
    fn controls_and_muted_video_are_exempt() {
        let violations = flag_autoplay_media(vec![
            media("video", true, false),
            media("video", false, true),
        ]);
        assert!(violations.is_empty());
    }

    #[test]
    fn muted_audio_is_still_flagged() {
        let violations = flag_autoplay_media(vec![media("audio", false, true)]);
        assert_eq!(violations.len(), 1);
    }

    fn target(display: &str, width: f64, height: f64) -> TargetCandidate {
        TargetCandidate {
            selector: "a.cta".to_string(),
            html: "<a class=\"cta\" href=\"/apply\">Apply</a>".to_string(),
            width,
            height,
            display: display.to_string(),
            visible: true,
            clipped: false,
        }
    }

    #[test]
    fn small_block_anchor_is_flagged() {
        let violations = flag_small_targets(vec![target("block", 16.0, 16.0)]);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].nodes[0]
            .failure_summary
            .as_deref()
            .is_some_and(|s| s.contains("16x16px")));
    }

    #[test]
    fn inline_anchor_is_exempt() {
        let violations = flag_small_targets(vec![target("inline", 16.0, 16.0)]);
        assert!(violations.is_empty());
    }

    #[test]
    fn hidden_and_clipped_targets_are_exempt() {
        let mut invisible = target("block", 16.0, 16.0);
        invisible.visible = false;
        let mut skip_link = target("block", 1.0, 1.0);
        skip_link.clipped = true;
        assert!(flag_small_targets(vec![invisible, skip_link]).is_empty());
    }

    #[test]
    fn adequate_targets_are_not_flagged() {
        let violations = flag_small_targets(vec![target("block", 44.0, 44.0)]);
        assert!(violations.is_empty());
    }

    fn image(src: &str, has_alt: bool, alt: &str) -> ImageCandidate {
        ImageCandidate {
            selector: "#main img:nth-of-type(1)".to_string(),
            html: format!("<img src=\"{src}\">"),
            src: src.to_string(),
            has_alt,
            alt: alt.to_string(),
            role: String::new(),
            aria_hidden: false,
            width: 320.0,
            height: 240.0,
            in_figure: false,
            in_content: true,
        }
    }

    #[test]
    fn content_image_without_alt_is_flagged_serious() {
        let violations = flag_missing_alt(vec![image("hero.png", false, "")], &DECORATIVE_NAME);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].impact, Some(Impact::Serious));
    }

    #[test]
    fn explicit_empty_alt_is_decorative() {
        let violations = flag_missing_alt(vec![image("hero.png", true, "")], &DECORATIVE_NAME);
        assert!(violations.is_empty());
    }

    #[test]
    fn decorative_filename_is_exempt() {
        let violations = flag_missing_alt(
            vec![image("https://a.gov/assets/logo-footer.svg", false, "")],
            &DECORATIVE_NAME,
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn icon_sized_image_is_exempt() {
        let mut icon = image("glyph.png", false, "");
        icon.width = 16.0;
        icon.height = 16.0;
        assert!(flag_missing_alt(vec![icon], &DECORATIVE_NAME).is_empty());
    }

    #[test]
    fn presentation_role_and_aria_hidden_are_exempt() {
        let mut presentational = image("chart.png", false, "");
        presentational.role = "presentation".to_string();
        let mut hidden = image("chart.png", false, "");
        hidden.aria_hidden = true;
        assert!(flag_missing_alt(vec![presentational, hidden], &DECORATIVE_NAME).is_empty());
    }

    #[test]
    fn outside_content_context_is_moderate() {
        let mut chrome_img = image("banner.jpeg", false, "");
        chrome_img.in_content = false;
        let violations = flag_missing_alt(vec![chrome_img], &DECORATIVE_NAME);
        assert_eq!(violations[0].impact, Some(Impact::Moderate));
    }

    #[test]
    fn meaningful_alt_passes() {
        let violations = flag_missing_alt(
            vec![image("hero.png", true, "Students crossing the quad")],
            &DECORATIVE_NAME,
        );
        assert!(violations.is_empty());
    }
}
