//! Normalization and domain-membership properties the frontier's dedup
//! correctness rests on.

use a11ycrawl::urls::{is_crawlable, normalize, same_domain};

#[test]
fn fragments_never_survive_normalization() {
    assert_eq!(
        normalize("https://a.gov/x#frag", false).unwrap(),
        normalize("https://a.gov/x", false).unwrap()
    );
    assert_eq!(
        normalize("https://a.gov/#", true).unwrap(),
        normalize("https://a.gov/", true).unwrap()
    );
}

#[test]
fn normalization_is_idempotent() {
    let inputs = [
        "https://www.agency.gov/services?page=2#results",
        "http://agency.gov",
        "https://sub.www.agency.gov/x",
    ];
    for raw in inputs {
        for strip_www in [true, false] {
            let once = normalize(raw, strip_www).unwrap();
            assert_eq!(once, normalize(&once, strip_www).unwrap());
        }
    }
}

#[test]
fn www_policy_applies_only_to_the_leading_label() {
    assert_eq!(
        normalize("https://www.agency.gov/x", true).unwrap(),
        "https://agency.gov/x"
    );
    // an interior www label is part of the host, not a prefix
    assert_eq!(
        normalize("https://sub.www.agency.gov/x", true).unwrap(),
        "https://sub.www.agency.gov/x"
    );
}

#[test]
fn duplicates_are_detected_by_string_equality() {
    // the three spellings of the same page collapse to one normalized form
    let forms = [
        "https://www.agency.gov/contact",
        "https://agency.gov/contact#phone",
        "https://agency.gov/contact",
    ];
    let normalized: Vec<String> = forms
        .iter()
        .map(|raw| normalize(raw, true).unwrap())
        .collect();
    assert_eq!(normalized[0], normalized[1]);
    assert_eq!(normalized[1], normalized[2]);
}

#[test]
fn domain_membership_includes_subdomains_only() {
    assert!(same_domain("https://agency.gov/", "agency.gov"));
    assert!(same_domain("https://sub.agency.gov/y", "agency.gov"));
    assert!(same_domain("https://deep.sub.agency.gov/", "agency.gov"));
    assert!(!same_domain("https://other.com", "agency.gov"));
    assert!(!same_domain("https://evilagency.gov", "agency.gov"));
    assert!(!same_domain("not a url", "agency.gov"));
}

#[test]
fn discovered_links_pass_the_same_filter_chain_as_the_orchestrator() {
    let domain = "agency.gov";
    let discovered = [
        ("https://agency.gov/a", true),
        ("https://agency.gov/a#section", true),
        ("https://sub.agency.gov/b", true),
        ("https://partner.org/offsite", false),
        ("mailto:info@agency.gov", false),
        ("javascript:void(0)", false),
    ];

    for (raw, expected) in discovered {
        let kept = is_crawlable(raw)
            && normalize(raw, true)
                .map(|n| same_domain(&n, domain))
                .unwrap_or(false);
        assert_eq!(kept, expected, "unexpected filter decision for {raw}");
    }
}
