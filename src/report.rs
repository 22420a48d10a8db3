//! Result accumulation and serialization.
//!
//! PageResults are collected in visitation order and written once, as a
//! UTF-8 JSON array with 2-space indentation. The encoding is part of the
//! cross-system contract: the report renderer and the lookup service parse
//! this file directly.

use std::path::Path;

use crate::error::CrawlResult;
use crate::schema::PageResult;

#[derive(Debug, Default)]
pub struct ResultWriter {
    results: Vec<PageResult>,
}

impl ResultWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed record. Records arrive in visitation order and
    /// are never modified afterwards.
    pub fn record(&mut self, result: PageResult) {
        self.results.push(result);
    }

    #[must_use]
    pub fn results(&self) -> &[PageResult] {
        &self.results
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Serialize the full result sequence to `path`, creating parent
    /// directories as needed.
    pub async fn write(&self, path: &Path) -> CrawlResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut json = serde_json::to_vec_pretty(&self.results)?;
        json.push(b'\n');
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
