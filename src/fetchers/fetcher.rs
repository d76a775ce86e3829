use async_trait::async_trait;

use crate::{FetchError, FetchedPage};

/// Resolves an address to its body and the addresses it links to.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, address: &str) -> Result<FetchedPage, FetchError>;
}
