use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use super::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkipReason {
    DepthExhausted,
    AlreadyVisited,
}

#[derive(Debug, Clone, Serialize)]
pub struct FoundPage {
    pub address: String,
    pub body: String,
    pub depth: usize,
    pub link_count: usize,
    pub fetched_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// Emitted by crawl tasks as they finish with an address.
#[derive(Debug, Clone, Serialize)]
pub enum CrawlEvent {
    Found(FoundPage),
    Failed { error: FetchError, depth: usize },
    Skipped { address: String, reason: SkipReason },
}

impl CrawlEvent {
    pub fn address(&self) -> &str {
        match self {
            CrawlEvent::Found(page) => &page.address,
            CrawlEvent::Failed { error, .. } => &error.address,
            CrawlEvent::Skipped { address, .. } => address,
        }
    }

    /// The line printed for this event, if any.
    pub fn render(&self) -> Option<String> {
        match self {
            CrawlEvent::Found(page) => Some(format!("found: {} {:?}", page.address, page.body)),
            CrawlEvent::Failed { error, .. } => Some(error.to_string()),
            CrawlEvent::Skipped { .. } => None,
        }
    }
}

/// Writes one line per renderable event until every sender is gone. Returns
/// the number of lines written.
pub async fn print_events<W: Write>(
    mut events: UnboundedReceiver<CrawlEvent>,
    mut out: W,
) -> io::Result<usize> {
    let mut printed = 0;
    while let Some(event) = events.recv().await {
        if let Some(line) = event.render() {
            writeln!(out, "{}", line)?;
            out.flush()?;
            printed += 1;
        }
    }
    Ok(printed)
}
