#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub address: String,
    pub depth: usize,
}

impl CrawlTask {
    pub fn new(address: impl Into<String>, depth: usize) -> Self {
        Self {
            address: address.into(),
            depth,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.depth == 0
    }

    /// Task for a link found on this page. Only called on tasks that still
    /// have depth left.
    pub fn child(&self, link: impl Into<String>) -> Self {
        Self::new(link, self.depth.saturating_sub(1))
    }
}
