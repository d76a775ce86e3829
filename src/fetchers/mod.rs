pub mod canned_fetcher;

mod fetcher;
pub use canned_fetcher::{CannedFetcher, CannedPage};
pub use fetcher::Fetcher;
