pub(crate) mod page;
pub(crate) mod task;

pub use page::FetchedPage;
pub use task::CrawlTask;
