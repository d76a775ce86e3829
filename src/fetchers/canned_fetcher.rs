use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::Fetcher;
use crate::{FetchError, FetchedPage};

#[derive(Debug, Clone)]
pub struct CannedPage {
    pub body: String,
    pub links: Vec<String>,
}

/// Fetcher that answers from an in-memory table. Addresses missing from the
/// table fail with [`FetchCause::NotFound`](crate::FetchCause::NotFound).
#[derive(Debug, Clone, Default)]
pub struct CannedFetcher {
    pages: HashMap<String, CannedPage>,
    delay: Option<Duration>,
    fetch_counts: Arc<Mutex<HashMap<String, usize>>>,
}

impl CannedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The golang.org link graph: four pages, and a `/cmd/` link that has no
    /// entry.
    pub fn golang() -> Self {
        Self::new()
            .with_page(
                "https://golang.org/",
                "The Go Programming Language",
                &["https://golang.org/pkg/", "https://golang.org/cmd/"],
            )
            .with_page(
                "https://golang.org/pkg/",
                "Packages",
                &[
                    "https://golang.org/",
                    "https://golang.org/cmd/",
                    "https://golang.org/pkg/fmt/",
                    "https://golang.org/pkg/os/",
                ],
            )
            .with_page(
                "https://golang.org/pkg/fmt/",
                "Package fmt",
                &["https://golang.org/", "https://golang.org/pkg/"],
            )
            .with_page(
                "https://golang.org/pkg/os/",
                "Package os",
                &["https://golang.org/", "https://golang.org/pkg/"],
            )
    }

    pub fn with_page(mut self, address: &str, body: &str, links: &[&str]) -> Self {
        self.pages.insert(
            address.to_string(),
            CannedPage {
                body: body.to_string(),
                links: links.iter().map(|link| link.to_string()).collect(),
            },
        );
        self
    }

    /// Simulated latency applied to every fetch, found or not.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fetch_count(&self, address: &str) -> usize {
        self.fetch_counts.lock().get(address).copied().unwrap_or(0)
    }

    pub fn fetch_counts(&self) -> HashMap<String, usize> {
        self.fetch_counts.lock().clone()
    }

    pub fn total_fetches(&self) -> usize {
        self.fetch_counts.lock().values().sum()
    }
}

#[async_trait]
impl Fetcher for CannedFetcher {
    async fn fetch(&self, address: &str) -> Result<FetchedPage, FetchError> {
        *self
            .fetch_counts
            .lock()
            .entry(address.to_string())
            .or_insert(0) += 1;

        if let Some(delay) = self.delay {
            sleep(delay).await;
        }

        match self.pages.get(address) {
            Some(page) => {
                debug!("Canned hit for {} ({} links)", address, page.links.len());
                Ok(FetchedPage::new(address, page.body.clone(), page.links.clone()))
            }
            None => Err(FetchError::not_found(address)),
        }
    }
}
