//! Pipeline entry points for crawl operations.
//!
//! - `run_crawl`: Crawl one site end to end and persist the snapshot
//! - `CrawlController`: the page-by-page crawl state machine

pub mod crawl;

pub use crawl::{CrawlController, CrawlOutcome, run_crawl};
