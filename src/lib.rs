pub mod browser_setup;
pub mod config;
pub mod error;
pub mod frontier;
pub mod orchestrator;
pub mod report;
pub mod rules;
pub mod schema;
pub mod session;
pub mod urls;
pub mod utils;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::CrawlConfig;
pub use error::{CrawlError, CrawlResult};
pub use frontier::CrawlFrontier;
pub use orchestrator::{crawl, scan_single};
pub use report::ResultWriter;
pub use rules::{
    AutoplayMediaRule, AxeRule, MissingAltTextRule, PointerTargetSizeRule, RuleCheck, TierRegistry,
};
pub use schema::{Impact, NodeResult, PageResult, Violation};
pub use session::RenderingSession;
