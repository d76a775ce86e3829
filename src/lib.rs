pub mod core;
pub mod fetchers;
pub mod page;
pub mod stats;

pub use crate::core::{
    print_events, CrawlConfig, CrawlError, CrawlEvent, CrawlReport, CrawlResult, Crawler,
    FetchCause, FetchError, FoundPage, SkipReason, TaskGroup, VisitState, VisitedSet,
};
pub use fetchers::{CannedFetcher, Fetcher};
pub use page::{CrawlTask, FetchedPage};
pub use stats::{CrawlStats, StatsTracker};
