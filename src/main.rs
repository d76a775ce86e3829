use log::error;
use std::sync::Arc;
use tokio::sync::mpsc;
use turbocrawl::{print_events, CannedFetcher, CrawlConfig, CrawlEvent, Crawler};

#[tokio::main]
async fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let config = CrawlConfig::default();
    let (sink, events) = mpsc::unbounded_channel::<CrawlEvent>();
    let printer = tokio::spawn(print_events(events, std::io::stdout()));

    let crawler = Crawler::new(Arc::new(CannedFetcher::golang())).with_event_sink(sink);
    if let Err(e) = crawler.run(&config).await {
        error!("Crawl failed: {}", e);
    }

    // Closes the sink so the printer drains and exits.
    drop(crawler);
    match printer.await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => error!("Failed to write crawl output: {}", e),
        Err(e) => error!("Printer task error: {}", e),
    }
}
