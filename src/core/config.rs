use serde::{Deserialize, Serialize};

use super::CrawlResult;

pub const DEFAULT_START_ADDRESS: &str = "https://golang.org/";
pub const DEFAULT_MAX_DEPTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub start_address: String,
    /// Remaining hop budget for the start address. Zero fetches nothing.
    pub max_depth: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_address: DEFAULT_START_ADDRESS.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CrawlConfig {
    pub fn from_json(json: &str) -> CrawlResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_start_address(mut self, address: impl Into<String>) -> Self {
        self.start_address = address.into();
        self
    }

    pub fn with_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
