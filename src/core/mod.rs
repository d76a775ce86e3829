mod config;
mod crawler;
mod errors;
mod event;
pub mod task_group;
pub mod visited;

pub use config::CrawlConfig;
pub use crawler::{CrawlReport, Crawler};
pub use errors::{CrawlError, CrawlResult, FetchCause, FetchError};
pub use event::{print_events, CrawlEvent, FoundPage, SkipReason};
pub use task_group::TaskGroup;
pub use visited::{VisitState, VisitedSet};

#[cfg(test)]
mod tests;
