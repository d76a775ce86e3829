use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::SkipReason;

#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub pages_found: usize,
    pub fetch_errors: usize,
    pub skipped: HashMap<SkipReason, usize>,
    pub bytes_downloaded: usize,
    pub average_fetch_time: f64, // in milliseconds
}

/// Folds crawl events into [`CrawlStats`]. Owned by the crawl collector, so
/// it needs no locking.
#[derive(Debug, Clone)]
pub struct StatsTracker {
    stats: CrawlStats,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            stats: CrawlStats {
                start_time: Utc::now(),
                end_time: None,
                pages_found: 0,
                fetch_errors: 0,
                skipped: HashMap::new(),
                bytes_downloaded: 0,
                average_fetch_time: 0.0,
            },
        }
    }

    pub fn record_page(&mut self, size: usize, elapsed: Duration) {
        let stats = &mut self.stats;
        stats.pages_found += 1;
        stats.bytes_downloaded += size;

        let current_total = stats.average_fetch_time * (stats.pages_found - 1) as f64;
        let new_duration = elapsed.as_secs_f64() * 1000.0;
        stats.average_fetch_time = (current_total + new_duration) / stats.pages_found as f64;
    }

    pub fn record_error(&mut self) {
        self.stats.fetch_errors += 1;
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        *self.stats.skipped.entry(reason).or_insert(0) += 1;
    }

    pub fn finish(&mut self) {
        self.stats.end_time = Some(Utc::now());
    }

    pub fn get_stats(&self) -> CrawlStats {
        self.stats.clone()
    }

    pub fn log_summary(&self) {
        let stats = &self.stats;
        let duration = stats
            .end_time
            .unwrap_or_else(Utc::now)
            .signed_duration_since(stats.start_time);

        info!("Crawl statistics:");
        info!("  Duration: {} ms", duration.num_milliseconds());
        info!("  Pages found: {}", stats.pages_found);
        info!("  Fetch errors: {}", stats.fetch_errors);
        info!("  Data downloaded: {} bytes", stats.bytes_downloaded);
        info!("  Average fetch time: {:.2}ms", stats.average_fetch_time);

        for (reason, count) in &stats.skipped {
            info!("  Skipped ({:?}): {}", reason, count);
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
