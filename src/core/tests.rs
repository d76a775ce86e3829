use crate::fetchers::{CannedFetcher, Fetcher};
use crate::{
    CrawlConfig, CrawlError, CrawlEvent, Crawler, FetchCause, FetchError, FetchedPage, VisitState,
    VisitedSet,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const ROOT: &str = "https://golang.org/";
const PKG: &str = "https://golang.org/pkg/";
const CMD: &str = "https://golang.org/cmd/";
const FMT: &str = "https://golang.org/pkg/fmt/";
const OS: &str = "https://golang.org/pkg/os/";

fn crawler_for(fetcher: &CannedFetcher) -> Crawler {
    Crawler::new(Arc::new(fetcher.clone()))
}

fn found_set(report: &crate::CrawlReport) -> HashSet<String> {
    report.pages.iter().map(|page| page.address.clone()).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crawler_depth_one_fetches_only_start() {
    let fetcher = CannedFetcher::golang();
    let report = crawler_for(&fetcher).crawl(ROOT, 1).await.unwrap();

    assert_eq!(found_set(&report), HashSet::from([ROOT.to_string()]));
    assert!(report.errors.is_empty());
    assert_eq!(fetcher.total_fetches(), 1);
    assert_eq!(fetcher.fetch_count(ROOT), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crawler_depth_four_fetches_each_page_once() {
    let fetcher = CannedFetcher::golang();
    let report = crawler_for(&fetcher).crawl(ROOT, 4).await.unwrap();

    let expected: HashSet<String> = [ROOT, PKG, FMT, OS].iter().map(|a| a.to_string()).collect();
    assert_eq!(found_set(&report), expected);
    assert_eq!(report.pages.len(), 4, "No page may be reported twice");

    let counts = fetcher.fetch_counts();
    assert_eq!(counts.len(), 5);
    for address in [ROOT, PKG, FMT, OS, CMD] {
        assert_eq!(
            counts[address],
            1,
            "{} should be fetched exactly once",
            address
        );
    }

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].address, CMD);
    assert_eq!(report.errors[0].cause, FetchCause::NotFound);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crawler_zero_depth_does_nothing() {
    let fetcher = CannedFetcher::golang();
    let (sink, mut events) = mpsc::unbounded_channel();
    let crawler = crawler_for(&fetcher).with_event_sink(sink);

    let report = crawler.crawl(ROOT, 0).await.unwrap();
    drop(crawler);

    assert!(report.pages.is_empty());
    assert!(report.errors.is_empty());
    assert_eq!(fetcher.total_fetches(), 0);

    while let Some(event) = events.recv().await {
        assert!(event.render().is_none(), "Unexpected output: {:?}", event);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crawler_terminates_on_cycle() {
    let fetcher = CannedFetcher::new()
        .with_page("a", "A", &["b"])
        .with_page("b", "B", &["a", "a", "b"]);

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        crawler_for(&fetcher).crawl("a", 50),
    )
    .await
    .expect("Crawl on a cyclic graph must terminate")
    .unwrap();

    assert_eq!(report.pages.len(), 2);
    assert_eq!(fetcher.fetch_count("a"), 1);
    assert_eq!(fetcher.fetch_count("b"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crawler_duplicate_links_fetched_once() {
    let fetcher = CannedFetcher::new()
        .with_page("root", "Root", &["leaf", "leaf", "leaf", "mid"])
        .with_page("mid", "Mid", &["leaf"])
        .with_page("leaf", "Leaf", &[]);

    let report = crawler_for(&fetcher).crawl("root", 3).await.unwrap();

    assert_eq!(report.pages.len(), 3);
    assert_eq!(fetcher.fetch_count("leaf"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crawler_error_isolated_to_branch() {
    let fetcher = CannedFetcher::golang().with_delay(Duration::from_millis(2));
    let report = crawler_for(&fetcher).crawl(ROOT, 4).await.unwrap();

    assert!(report.found(FMT), "Sibling of the failing branch must complete");
    assert!(report.found(OS));
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].to_string(), "not found: https://golang.org/cmd/");

    for page in &report.pages {
        assert!(page.elapsed >= Duration::from_millis(2), "{:?}", page.elapsed);
    }
    assert!(report.stats.average_fetch_time >= 2.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crawler_depth_bound_by_distance() {
    let fetcher = CannedFetcher::new()
        .with_page("0", "zero", &["1"])
        .with_page("1", "one", &["2"])
        .with_page("2", "two", &["3"])
        .with_page("3", "three", &[]);

    let report = crawler_for(&fetcher).crawl("0", 2).await.unwrap();

    assert!(report.found("0"));
    assert!(report.found("1"));
    assert!(!report.found("2"));
    assert_eq!(fetcher.fetch_count("2"), 0);
    assert_eq!(fetcher.fetch_count("3"), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crawler_completion_barrier_repeated() {
    for run in 0..25 {
        let fetcher = CannedFetcher::golang().with_delay(Duration::from_millis((run % 3) as u64));
        let (sink, mut events) = mpsc::unbounded_channel();
        let crawler = crawler_for(&fetcher).with_event_sink(sink);

        let report = crawler.crawl(ROOT, 4).await.unwrap();

        // Everything the crawl produced must already be in the sink.
        let mut observed = HashSet::new();
        while let Ok(event) = events.try_recv() {
            if let CrawlEvent::Found(page) = event {
                observed.insert(page.address);
            }
        }

        let expected: HashSet<String> =
            [ROOT, PKG, FMT, OS].iter().map(|a| a.to_string()).collect();
        assert_eq!(observed, expected, "run {}", run);
        assert_eq!(found_set(&report), expected, "run {}", run);
        assert_eq!(fetcher.total_fetches(), 5, "run {}", run);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crawler_with_existing_visited_set() {
    let fetcher = CannedFetcher::golang();
    let visited = Arc::new(VisitedSet::new());
    visited.claim(PKG);

    let report = crawler_for(&fetcher)
        .crawl_with(ROOT, 4, Arc::clone(&visited))
        .await
        .unwrap();

    assert_eq!(found_set(&report), HashSet::from([ROOT.to_string()]));
    assert_eq!(fetcher.fetch_count(PKG), 0);
    assert_eq!(visited.state(ROOT), Some(VisitState::Fetched));
    assert_eq!(visited.state(CMD), Some(VisitState::Failed));
    assert_eq!(visited.state(PKG), Some(VisitState::Claimed));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crawler_visited_set_records_final_states() {
    let fetcher = CannedFetcher::golang();
    let visited = Arc::new(VisitedSet::new());

    crawler_for(&fetcher)
        .crawl_with(ROOT, 4, Arc::clone(&visited))
        .await
        .unwrap();

    assert_eq!(visited.len(), 5);
    for address in [ROOT, PKG, FMT, OS] {
        assert_eq!(visited.state(address), Some(VisitState::Fetched));
    }
    assert_eq!(visited.state(CMD), Some(VisitState::Failed));
}

#[tokio::test]
async fn test_crawler_rejects_empty_address() {
    let fetcher = CannedFetcher::golang();
    let result = crawler_for(&fetcher).crawl("", 4).await;
    assert!(matches!(result, Err(CrawlError::EmptyAddress)));
    assert_eq!(fetcher.total_fetches(), 0);
}

#[tokio::test]
async fn test_crawler_run_with_config() {
    let fetcher = CannedFetcher::golang();
    let config = CrawlConfig::default().with_depth(2);
    let report = crawler_for(&fetcher).run(&config).await.unwrap();

    assert_eq!(report.start_address, ROOT);
    assert_eq!(report.max_depth, 2);
    assert_eq!(found_set(&report), HashSet::from([ROOT.to_string(), PKG.to_string()]));
    assert_eq!(report.stats.pages_found, 2);
    assert_eq!(report.stats.fetch_errors, 1);
    assert!(report.stats.end_time.is_some());

    let json = report.to_json().unwrap();
    assert!(json.contains("\"pages_found\": 2"));
}

struct PanickingFetcher {
    inner: CannedFetcher,
    panics_on: &'static str,
}

#[async_trait]
impl Fetcher for PanickingFetcher {
    async fn fetch(&self, address: &str) -> Result<FetchedPage, FetchError> {
        if address == self.panics_on {
            panic!("fetcher blew up on {}", address);
        }
        self.inner.fetch(address).await
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crawler_panicking_fetch_marks_failed() {
    let fetcher = PanickingFetcher {
        inner: CannedFetcher::new()
            .with_page("root", "Root", &["bad", "good"])
            .with_page("bad", "Bad", &[])
            .with_page("good", "Good", &[]),
        panics_on: "bad",
    };
    let visited = Arc::new(VisitedSet::new());

    let report = Crawler::new(Arc::new(fetcher))
        .crawl_with("root", 3, Arc::clone(&visited))
        .await
        .unwrap();

    assert!(report.found("root"));
    assert!(report.found("good"), "Sibling of the panicking fetch must complete");
    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.errors, vec![FetchError::other("bad", "fetch panicked")]);
    assert_eq!(report.errors[0].to_string(), "fetch panicked: bad");
    assert_eq!(visited.state("bad"), Some(VisitState::Failed));
}
