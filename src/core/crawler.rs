use chrono::Utc;
use futures::future::BoxFuture;
use futures::FutureExt;
use log::{debug, info, trace, warn};
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedSender};
use uuid::Uuid;

use super::{
    CrawlConfig, CrawlError, CrawlEvent, CrawlResult, FetchError, FoundPage, SkipReason,
    TaskGroup, VisitState, VisitedSet,
};
use crate::stats::{CrawlStats, StatsTracker};
use crate::{CrawlTask, Fetcher};

#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub crawl_id: Uuid,
    pub start_address: String,
    pub max_depth: usize,
    pub pages: Vec<FoundPage>,
    pub errors: Vec<FetchError>,
    pub stats: CrawlStats,
}

impl CrawlReport {
    pub fn found(&self, address: &str) -> bool {
        self.pages.iter().any(|page| page.address == address)
    }

    pub fn to_json(&self) -> CrawlResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// State shared by every task of one crawl. Dropped once the last task is done,
/// which closes the event channel.
struct CrawlContext {
    fetcher: Arc<dyn Fetcher>,
    visited: Arc<VisitedSet>,
    group: TaskGroup,
    events: UnboundedSender<CrawlEvent>,
}

impl CrawlContext {
    fn emit(&self, event: CrawlEvent) {
        // The collector outlives every task, so a send can only fail if the
        // caller's future was dropped mid-crawl.
        if self.events.send(event).is_err() {
            trace!("Event dropped, collector is gone");
        }
    }
}

pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    sink: Option<UnboundedSender<CrawlEvent>>,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        info!("Initializing crawler");
        Self {
            fetcher,
            sink: None,
        }
    }

    /// Forwards every event to `sink` as soon as it is produced.
    pub fn with_event_sink(mut self, sink: UnboundedSender<CrawlEvent>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub async fn run(&self, config: &CrawlConfig) -> CrawlResult<CrawlReport> {
        self.crawl(&config.start_address, config.max_depth).await
    }

    pub async fn crawl(&self, address: &str, max_depth: usize) -> CrawlResult<CrawlReport> {
        self.crawl_with(address, max_depth, Arc::new(VisitedSet::new()))
            .await
    }

    /// Crawls from `address` using a caller supplied visited set. Addresses
    /// already in `visited` are not fetched again. Returns once every task
    /// spawned for this crawl, directly or transitively, has finished.
    pub async fn crawl_with(
        &self,
        address: &str,
        max_depth: usize,
        visited: Arc<VisitedSet>,
    ) -> CrawlResult<CrawlReport> {
        if address.is_empty() {
            return Err(CrawlError::EmptyAddress);
        }

        let crawl_id = Uuid::now_v7();
        info!("Starting crawl {} at {}", crawl_id, address);
        debug!("Max depth: {}", max_depth);

        let (events, mut receiver) = mpsc::unbounded_channel();
        let group = TaskGroup::new();
        let context = Arc::new(CrawlContext {
            fetcher: Arc::clone(&self.fetcher),
            visited,
            group: group.clone(),
            events,
        });

        group.spawn(visit(
            Arc::clone(&context),
            CrawlTask::new(address, max_depth),
        ));
        drop(context);

        let mut stats = StatsTracker::new();
        let mut pages = Vec::new();
        let mut errors = Vec::new();

        while let Some(event) = receiver.recv().await {
            if let Some(sink) = &self.sink {
                if sink.send(event.clone()).is_err() {
                    trace!("Event sink closed");
                }
            }

            match event {
                CrawlEvent::Found(page) => {
                    stats.record_page(page.body.len(), page.elapsed);
                    pages.push(page);
                }
                CrawlEvent::Failed { error, .. } => {
                    stats.record_error();
                    errors.push(error);
                }
                CrawlEvent::Skipped { reason, .. } => stats.record_skip(reason),
            }
        }

        group.wait().await;
        stats.finish();

        info!(
            "Crawl {} completed. Pages found: {}, errors: {}",
            crawl_id,
            pages.len(),
            errors.len()
        );
        stats.log_summary();

        Ok(CrawlReport {
            crawl_id,
            start_address: address.to_string(),
            max_depth,
            pages,
            errors,
            stats: stats.get_stats(),
        })
    }
}

fn visit(context: Arc<CrawlContext>, task: CrawlTask) -> BoxFuture<'static, ()> {
    async move {
        if task.is_exhausted() {
            debug!("Skipping {} - max depth reached", task.address);
            context.emit(CrawlEvent::Skipped {
                address: task.address,
                reason: SkipReason::DepthExhausted,
            });
            return;
        }

        if !context.visited.claim(&task.address) {
            debug!("Skipping {} - already visited", task.address);
            context.emit(CrawlEvent::Skipped {
                address: task.address,
                reason: SkipReason::AlreadyVisited,
            });
            return;
        }

        debug!("Fetching {} at depth {}", task.address, task.depth);
        let started = Instant::now();
        // A panicking fetch still has to leave its address in a final state.
        let fetched = AssertUnwindSafe(context.fetcher.fetch(&task.address))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(FetchError::other(&task.address, "fetch panicked")));

        let page = match fetched {
            Ok(page) => page,
            Err(error) => {
                warn!("Fetch failed for {}: {}", task.address, error);
                context.visited.complete(&task.address, VisitState::Failed);
                context.emit(CrawlEvent::Failed {
                    error,
                    depth: task.depth,
                });
                return;
            }
        };

        context.visited.complete(&task.address, VisitState::Fetched);
        context.emit(CrawlEvent::Found(FoundPage {
            address: task.address.clone(),
            body: page.body,
            depth: task.depth,
            link_count: page.links.len(),
            fetched_at: Utc::now(),
            elapsed: started.elapsed(),
        }));

        for link in page.links {
            let child = task.child(link);
            trace!("Spawning {} at depth {}", child.address, child.depth);
            context.group.spawn(visit(Arc::clone(&context), child));
        }
    }
    .boxed()
}
