//! Type-safe builder for `CrawlConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time
//! validation ensuring the seed URL is set before a `CrawlConfig` can be
//! built. `build()` is also where the seed is parsed and the crawl domain
//! derived, so an invalid seed fails before any browser is launched.

use std::marker::PhantomData;
use std::path::PathBuf;

use crate::error::{CrawlError, CrawlResult};
use crate::urls;
use crate::utils::{DEFAULT_MAX_PAGES, DEFAULT_NAVIGATION_TIMEOUT_SECS};

use super::types::CrawlConfig;

/// Type state marking that the required seed URL has been provided
pub struct WithSeedUrl;

pub struct CrawlConfigBuilder<State = ()> {
    pub(crate) seed_url: Option<String>,
    pub(crate) domain: Option<String>,
    pub(crate) max_pages: usize,
    pub(crate) tier: String,
    pub(crate) output_path: PathBuf,
    pub(crate) strip_www: bool,
    pub(crate) navigation_timeout_secs: u64,
    pub(crate) headless: bool,
    pub(crate) screenshot_dir: Option<PathBuf>,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for CrawlConfigBuilder<()> {
    fn default() -> Self {
        Self {
            seed_url: None,
            domain: None,
            max_pages: DEFAULT_MAX_PAGES,
            tier: "extended".to_string(),
            output_path: PathBuf::from("violations.json"),
            strip_www: true,
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
            headless: true,
            screenshot_dir: None,
            _phantom: PhantomData,
        }
    }
}

impl CrawlConfig {
    /// Create a builder for configuring a `CrawlConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> CrawlConfigBuilder<()> {
        CrawlConfigBuilder::default()
    }
}

impl CrawlConfigBuilder<()> {
    pub fn seed_url(self, url: impl Into<String>) -> CrawlConfigBuilder<WithSeedUrl> {
        let url_string = url.into();

        // Bare domains from agency inventories arrive without a scheme
        let with_scheme = if url_string.starts_with("http://") || url_string.starts_with("https://")
        {
            url_string
        } else {
            format!("https://{url_string}")
        };

        CrawlConfigBuilder {
            seed_url: Some(with_scheme),
            domain: self.domain,
            max_pages: self.max_pages,
            tier: self.tier,
            output_path: self.output_path,
            strip_www: self.strip_www,
            navigation_timeout_secs: self.navigation_timeout_secs,
            headless: self.headless,
            screenshot_dir: self.screenshot_dir,
            _phantom: PhantomData,
        }
    }
}

// Optional setters, available in any state
impl<State> CrawlConfigBuilder<State> {
    /// Override the crawl domain instead of deriving it from the seed host
    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    #[must_use]
    pub fn tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = tier.into();
        self
    }

    #[must_use]
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Whether a leading `www.` host label is stripped during
    /// normalization. Must stay fixed for the lifetime of a run.
    #[must_use]
    pub fn strip_www(mut self, strip: bool) -> Self {
        self.strip_www = strip;
        self
    }

    #[must_use]
    pub fn navigation_timeout_secs(mut self, secs: u64) -> Self {
        self.navigation_timeout_secs = secs;
        self
    }

    /// Set browser headless mode. Headed mode shows a browser window and
    /// is useful when debugging a rule against a live page.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = Some(dir.into());
        self
    }
}

// Build method only available once the seed URL is set
impl CrawlConfigBuilder<WithSeedUrl> {
    /// Validate and assemble the configuration.
    ///
    /// # Errors
    ///
    /// `CrawlError::InvalidUrl` when the seed does not parse as an absolute
    /// URL or has no host; `CrawlError::Config` when numeric options are
    /// out of range.
    pub fn build(self) -> CrawlResult<CrawlConfig> {
        let raw_seed = self.seed_url.ok_or_else(|| CrawlError::Config {
            message: "seed_url is required".to_string(),
        })?;

        let seed_url = urls::normalize(&raw_seed, self.strip_www)?;

        let domain = match self.domain {
            Some(domain) => domain,
            None => url::Url::parse(&seed_url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
                .ok_or_else(|| CrawlError::InvalidUrl {
                    url: raw_seed.clone(),
                    source: url::ParseError::EmptyHost,
                })?,
        };

        if self.max_pages == 0 {
            return Err(CrawlError::Config {
                message: "max_pages must be at least 1".to_string(),
            });
        }
        if self.navigation_timeout_secs == 0 {
            return Err(CrawlError::Config {
                message: "navigation_timeout_secs must be at least 1".to_string(),
            });
        }

        Ok(CrawlConfig {
            seed_url,
            domain,
            max_pages: self.max_pages,
            tier: self.tier,
            output_path: self.output_path,
            strip_www: self.strip_www,
            navigation_timeout_secs: self.navigation_timeout_secs,
            headless: self.headless,
            screenshot_dir: self.screenshot_dir,
        })
    }
}
