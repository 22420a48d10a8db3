//! JavaScript evaluation scripts
//!
//! In-page inspection is a serialization boundary: every script here
//! returns plain, structurally-typed records (strings, numbers, booleans),
//! never live DOM handles, because the rules execute in a different context
//! than the orchestrator. Scripts that need per-element selectors embed the
//! same `selectorFor` helper so that the `target` strings they emit can be
//! re-resolved later with `document.querySelectorAll` against the same
//! document state.

/// JavaScript script reporting document readiness and network activity
///
/// Polled by the navigation settle loop: the page counts as idle once
/// `readyState` is `complete` and `resourceCount` stops growing.
pub const PAGE_STATE_SCRIPT: &str = r"
    (() => {
        return {
            readyState: document.readyState,
            resourceCount: performance.getEntriesByType('resource').length,
            bodyExists: document.body !== null
        };
    })()
";

/// JavaScript script to scroll through the page and trigger lazy loading
///
/// Steps down in 500px increments, then returns to the top so bounding
/// boxes reflect the initial viewport. Capped so infinite-scroll feeds
/// cannot wedge the scan.
pub const SCROLL_TO_BOTTOM_SCRIPT: &str = r"
    (async () => {
        let totalHeight = 0;
        const distance = 500;
        while (totalHeight < document.body.scrollHeight && totalHeight < 40000) {
            window.scrollBy(0, distance);
            totalHeight += distance;
            await new Promise(resolve => setTimeout(resolve, 100));
        }
        window.scrollTo(0, 0);
        return true;
    })()
";

/// JavaScript script to extract links
///
/// Resolves every anchor's href against the document URL, keeps http(s)
/// only, and dedups page-side so the frontier sees each raw URL once.
pub const LINKS_SCRIPT: &str = r"
    (() => {
        const seen = new Set();
        const links = [];
        for (const anchor of document.querySelectorAll('a[href]')) {
            const href = anchor.getAttribute('href');
            if (!href) continue;
            try {
                const absolute = new URL(href, window.location.href);
                if (!['http:', 'https:'].includes(absolute.protocol)) continue;
                if (!seen.has(absolute.href)) {
                    seen.add(absolute.href);
                    links.push(absolute.href);
                }
            } catch (e) {
                // unresolvable href, skip
            }
        }
        return links;
    })()
";

/// JavaScript script to inject the axe-core engine into the page
///
/// `__AXE_SRC__` is replaced with the pinned bundle URL before evaluation.
/// Resolves once `window.axe.run` is callable; a page whose CSP blocks the
/// script tag rejects, which the session degrades to a rule failure.
pub const AXE_BOOTSTRAP_SCRIPT: &str = r"
    (async () => {
        if (window.axe && typeof window.axe.run === 'function') return true;
        await new Promise((resolve, reject) => {
            const script = document.createElement('script');
            script.src = '__AXE_SRC__';
            script.onload = () => resolve(true);
            script.onerror = () => reject(new Error('failed to load the axe-core bundle'));
            document.head.appendChild(script);
        });
        return typeof window.axe !== 'undefined' && typeof window.axe.run === 'function';
    })()
";

/// JavaScript script to run the injected axe-core engine
///
/// `__RUN_ONLY_TAGS__` is replaced with a JSON array of WCAG conformance
/// tags. Returns the engine's violation records reduced to the fields the
/// Violation schema keeps.
pub const AXE_RUN_SCRIPT: &str = r"
    (async () => {
        const results = await window.axe.run(document, {
            runOnly: { type: 'tag', values: __RUN_ONLY_TAGS__ },
            resultTypes: ['violations']
        });
        return results.violations.map(violation => ({
            id: violation.id,
            description: violation.description,
            impact: violation.impact || null,
            nodes: violation.nodes.map(node => ({
                html: node.html,
                target: node.target,
                failureSummary: node.failureSummary || null
            }))
        }));
    })()
";

/// Shared selector helper embedded in the bespoke-rule scripts.
///
/// Prefers a unique id, then a tag+class selector when it matches exactly
/// one element, and otherwise falls back to an `:nth-of-type` path rooted
/// at the nearest ancestor with an id. Keeps downstream re-queries from
/// wildly over-matching.
const SELECTOR_FOR_JS: &str = r"
        const selectorFor = (el) => {
            if (el.id) return '#' + CSS.escape(el.id);
            const tag = el.tagName.toLowerCase();
            const classes = (el.getAttribute('class') || '').trim().split(/\s+/).filter(Boolean);
            if (classes.length) {
                const sel = tag + classes.slice(0, 3).map(c => '.' + CSS.escape(c)).join('');
                if (document.querySelectorAll(sel).length === 1) return sel;
            }
            const parts = [];
            let node = el;
            while (node && node.nodeType === 1 && node !== document.documentElement) {
                if (node.id) { parts.unshift('#' + CSS.escape(node.id)); break; }
                let nth = 1;
                let sibling = node;
                while ((sibling = sibling.previousElementSibling)) {
                    if (sibling.tagName === node.tagName) nth++;
                }
                parts.unshift(node.tagName.toLowerCase() + ':nth-of-type(' + nth + ')');
                node = node.parentElement;
            }
            return parts.length ? parts.join(' > ') : tag;
        };
";

const AUTOPLAY_MEDIA_BODY: &str = r"
        return Array.from(document.querySelectorAll('audio[autoplay], video[autoplay]')).map(el => ({
            selector: selectorFor(el),
            html: el.outerHTML,
            tag: el.tagName.toLowerCase(),
            hasControls: el.hasAttribute('controls'),
            muted: el.muted === true || el.hasAttribute('muted')
        }));
";

const POINTER_TARGET_BODY: &str = r#"
        const query = "a[href], button, input[type='button'], input[type='submit'], input[type='reset'], [role='button'], [role='link'], [onclick]";
        const records = [];
        for (const el of document.querySelectorAll(query)) {
            const style = window.getComputedStyle(el);
            const rect = el.getBoundingClientRect();
            const clipped =
                style.position === 'absolute' &&
                (style.clip === 'rect(0px, 0px, 0px, 0px)' ||
                 style.clipPath === 'inset(50%)' ||
                 (rect.width <= 1 && rect.height <= 1));
            records.push({
                selector: selectorFor(el),
                html: el.outerHTML,
                width: rect.width,
                height: rect.height,
                display: style.display,
                visible: style.display !== 'none'
                    && style.visibility !== 'hidden'
                    && parseFloat(style.opacity) > 0,
                clipped: clipped
            });
        }
        return records;
"#;

const IMAGE_ALT_BODY: &str = r#"
        return Array.from(document.images).map(img => {
            const rect = img.getBoundingClientRect();
            return {
                selector: selectorFor(img),
                html: img.outerHTML,
                src: img.getAttribute('src') || '',
                hasAlt: img.hasAttribute('alt'),
                alt: img.getAttribute('alt') || '',
                role: img.getAttribute('role') || '',
                ariaHidden: img.closest('[aria-hidden="true"]') !== null,
                width: rect.width,
                height: rect.height,
                inFigure: img.closest('figure') !== null,
                inContent: img.closest('main, article, section, [role="main"]') !== null
            };
        });
"#;

fn wrap_with_selector_helper(body: &str) -> String {
    format!("(() => {{\n{SELECTOR_FOR_JS}\n{body}\n    }})()")
}

/// Script collecting every auto-playing media element with its control state
#[must_use]
pub fn autoplay_media_script() -> String {
    wrap_with_selector_helper(AUTOPLAY_MEDIA_BODY)
}

/// Script collecting every interactive element with its rendered geometry
/// and the computed-style facts the pointer-target rule decides on
#[must_use]
pub fn pointer_target_script() -> String {
    wrap_with_selector_helper(POINTER_TARGET_BODY)
}

/// Script collecting every image with the attributes and context the
/// alternative-text rule decides on
#[must_use]
pub fn image_alt_script() -> String {
    wrap_with_selector_helper(IMAGE_ALT_BODY)
}
