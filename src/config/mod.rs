//! Configuration module for accessibility crawling
//!
//! This module provides the `CrawlConfig` struct and its type-safe builder
//! for configuring crawl runs with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{CrawlConfigBuilder, WithSeedUrl};
pub use types::CrawlConfig;
