//! Crawler module for catalog ingestion
//!
//! This module contains the scraping pipeline, including:
//! - Page fetching behind the [`PageFetcher`] seam
//! - Category discovery on the landing page
//! - Tolerant product extraction from category pages
//! - Overall crawl coordination

mod coordinator;
mod discovery;
mod extractor;
mod fetcher;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use discovery::{discover_categories, Discovery};
pub use extractor::{extract_products, Extraction};
pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher};
