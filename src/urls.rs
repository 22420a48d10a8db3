//! URL normalization and domain membership.
//!
//! Two raw URLs are duplicates iff their normalized forms are string-equal,
//! so every URL entering the frontier goes through `normalize` first and the
//! same `strip_www` policy must be applied to the seed and to discovered
//! links within one crawl run.

use url::Url;

use crate::error::CrawlError;

/// Canonicalize a raw URL string.
///
/// Parses the input as an absolute URL, clears the fragment component, and
/// optionally strips a leading `www.` host label. Idempotent:
/// `normalize(normalize(x)) == normalize(x)`.
///
/// # Errors
///
/// Returns `CrawlError::InvalidUrl` if the input does not parse as an
/// absolute URL.
pub fn normalize(raw: &str, strip_www: bool) -> Result<String, CrawlError> {
    let mut parsed = Url::parse(raw).map_err(|source| CrawlError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    parsed.set_fragment(None);

    if strip_www {
        let stripped = parsed
            .host_str()
            .and_then(|host| host.strip_prefix("www."))
            .filter(|rest| !rest.is_empty())
            .map(str::to_string);
        if let Some(host) = stripped {
            parsed
                .set_host(Some(&host))
                .map_err(|source| CrawlError::InvalidUrl {
                    url: raw.to_string(),
                    source,
                })?;
        }
    }

    Ok(parsed.to_string())
}

/// Whether a URL belongs to the crawl domain.
///
/// True iff the URL's host equals `base` or is a subdomain of it. The
/// suffix check requires a full `"." + base` match so that
/// `evilagency.gov` is never accepted for base `agency.gov`. Malformed
/// URLs return false rather than failing.
#[must_use]
pub fn same_domain(url: &str, base: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    host == base || host.ends_with(&format!(".{base}"))
}

/// Whether a discovered href is worth crawling at all.
///
/// Filters non-HTTP schemes before they reach the normalizer, mirroring the
/// page-side filter in the link extraction script.
#[must_use]
pub fn is_crawlable(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_fragments() {
        let a = normalize("https://a.gov/x#frag", false).expect("parse");
        let b = normalize("https://a.gov/x", false).expect("parse");
        assert_eq!(a, b);
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in [
            "https://www.agency.gov/services#top",
            "https://agency.gov/a%20b?q=1#s",
            "http://sub.agency.gov",
        ] {
            for strip in [true, false] {
                let once = normalize(raw, strip).expect("parse");
                let twice = normalize(&once, strip).expect("parse");
                assert_eq!(once, twice, "not idempotent for {raw}");
            }
        }
    }

    #[test]
    fn normalize_strips_www_only_when_asked() {
        let stripped = normalize("https://www.agency.gov/x", true).expect("parse");
        assert_eq!(stripped, "https://agency.gov/x");
        let kept = normalize("https://www.agency.gov/x", false).expect("parse");
        assert_eq!(kept, "https://www.agency.gov/x");
    }

    #[test]
    fn normalize_rejects_relative_urls() {
        assert!(normalize("/about", false).is_err());
        assert!(normalize("not a url", true).is_err());
    }

    #[test]
    fn same_domain_accepts_subdomains() {
        assert!(same_domain("https://agency.gov/x", "agency.gov"));
        assert!(same_domain("https://sub.agency.gov/y", "agency.gov"));
    }

    #[test]
    fn same_domain_rejects_lookalikes_and_garbage() {
        assert!(!same_domain("https://other.com", "agency.gov"));
        assert!(!same_domain("https://evilagency.gov", "agency.gov"));
        assert!(!same_domain("::not-a-url::", "agency.gov"));
    }

    #[test]
    fn is_crawlable_filters_schemes() {
        assert!(is_crawlable("https://a.gov/doc"));
        assert!(is_crawlable("http://a.gov"));
        assert!(!is_crawlable("mailto:info@a.gov"));
        assert!(!is_crawlable("javascript:void(0)"));
        assert!(!is_crawlable("relative/path"));
    }
}
