//! Run report generation
//!
//! Summarizes one crawl (or a loaded catalog) for the terminal: skip and
//! drop counters, per-category product counts, and rating coverage.

use crate::catalog::{AssemblyStats, Catalog};
use crate::crawler::CrawlOutcome;
use crate::search::SearchResult;
use chrono::{DateTime, Utc};

/// Summary of one catalog build
#[derive(Debug, Clone)]
pub struct RunReport {
    pub built_at: DateTime<Utc>,

    /// Present for a live crawl, absent for a catalog loaded from disk
    pub stats: Option<AssemblyStats>,

    /// Product count per category, in discovery order
    pub products_by_category: Vec<(String, usize)>,

    pub total_products: usize,
    pub unrated_products: usize,
}

impl RunReport {
    /// Builds a report for a fresh crawl
    pub fn from_outcome(outcome: &CrawlOutcome) -> Self {
        let mut report = Self::from_catalog(&outcome.catalog);
        report.stats = Some(outcome.stats);
        report
    }

    /// Builds a report for an existing catalog snapshot
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            built_at: catalog.built_at(),
            stats: None,
            products_by_category: catalog.counts_by_category(),
            total_products: catalog.len(),
            unrated_products: catalog.unrated_count(),
        }
    }

    /// Share of products that carry a rating, as a percentage
    pub fn rated_percentage(&self) -> f64 {
        if self.total_products == 0 {
            return 0.0;
        }
        let rated = self.total_products - self.unrated_products;
        (rated as f64 / self.total_products as f64) * 100.0
    }
}

/// Prints the report to stdout
pub fn print_report(report: &RunReport) {
    println!("=== Catalog Report ===\n");
    println!("Built at: {}", report.built_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!();

    if let Some(stats) = &report.stats {
        println!("Crawl:");
        println!("  Category links skipped: {}", stats.category_links_skipped);
        println!("  Categories attempted: {}", stats.categories_attempted);
        println!("  Categories failed to fetch: {}", stats.categories_fetch_failed);
        println!("  Products extracted: {}", stats.products_extracted);
        println!("  Product cards dropped: {}", stats.products_dropped);
        println!();
    }

    println!("Products by Category:");
    for (category, count) in &report.products_by_category {
        println!("  {}: {}", category, count);
    }
    println!();

    println!(
        "Total: {} products, {:.1}% rated ({} unrated)",
        report.total_products,
        report.rated_percentage(),
        report.unrated_products
    );
}

/// Prints ranked search results as a table
pub fn print_search_results(query: &str, results: &[SearchResult]) {
    if results.is_empty() {
        println!("No products match '{}'.", query);
        return;
    }

    println!("{} match(es) for '{}':\n", results.len(), query);
    println!(
        "{:<5}  {:<20}  {:<40}  {:<12}  {}",
        "Score", "Category", "Name", "Price", "Rating"
    );
    for result in results {
        let record = &result.record;
        println!(
            "{:<5}  {:<20}  {:<40}  {:<12}  {}",
            result.score,
            record.category,
            record.name,
            record.price,
            record.rating.as_deref().unwrap_or("-")
        );
    }
}
