// a11ycrawl: crawl a domain in headless Chrome and record accessibility
// violations for every rendered page.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use a11ycrawl::config::CrawlConfig;
use a11ycrawl::report::ResultWriter;
use a11ycrawl::rules::TierRegistry;
use a11ycrawl::schema::PageResult;
use a11ycrawl::utils::{DEFAULT_MAX_PAGES, DEFAULT_NAVIGATION_TIMEOUT_SECS};
use a11ycrawl::{crawl, scan_single};

#[derive(Debug, Parser)]
#[command(name = "a11ycrawl", version, about = "Scan a web domain for accessibility violations")]
struct Cli {
    /// Seed URL the crawl starts from (bare domains get https://)
    seed_url: String,

    /// Restrict the crawl to this domain instead of the seed host
    #[arg(long)]
    domain: Option<String>,

    /// Maximum number of pages to visit
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// Path the JSON result array is written to
    #[arg(long, default_value = "violations.json")]
    output: PathBuf,

    /// Rule tier to evaluate on every page
    #[arg(long, default_value = "extended")]
    tier: String,

    /// Scan only the seed URL, writing its result immediately
    #[arg(long)]
    single: bool,

    /// Keep a leading `www.` instead of stripping it during normalization
    #[arg(long)]
    keep_www: bool,

    /// Save a full-page screenshot of every scanned page into this directory
    #[arg(long)]
    screenshot_dir: Option<PathBuf>,

    /// Seconds to wait for a page to reach network idle
    #[arg(long, default_value_t = DEFAULT_NAVIGATION_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Show the browser window instead of running headless
    #[arg(long)]
    headed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("a11ycrawl=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut builder = CrawlConfig::builder()
        .seed_url(cli.seed_url.as_str())
        .max_pages(cli.max_pages)
        .tier(cli.tier.as_str())
        .output_path(&cli.output)
        .strip_www(!cli.keep_www)
        .navigation_timeout_secs(cli.timeout_secs)
        .headless(!cli.headed);
    if let Some(domain) = &cli.domain {
        builder = builder.domain(domain.as_str());
    }
    if let Some(dir) = &cli.screenshot_dir {
        builder = builder.screenshot_dir(dir);
    }
    let config = builder.build().context("invalid crawl configuration")?;

    let registry = TierRegistry::standard();
    let mut writer = ResultWriter::new();

    if cli.single {
        // The single-URL variant still leaves a record behind when the
        // scan itself dies, so batch callers can tell "scanned, no
        // findings" from "never scanned".
        match scan_single(&config, &registry).await {
            Ok(result) => writer.record(result),
            Err(e) => {
                writer.record(PageResult::failed(
                    config.seed_url().to_string(),
                    format!("{e:#}"),
                ));
                if let Err(write_err) = writer.write(config.output_path()).await {
                    warn!("failed to write error record: {write_err}");
                }
                return Err(e.into());
            }
        }
    } else {
        for result in crawl(&config, &registry).await? {
            writer.record(result);
        }
    }

    writer.write(config.output_path()).await?;
    info!(
        "wrote {} page result(s) to {}",
        writer.len(),
        config.output_path().display()
    );
    Ok(())
}
