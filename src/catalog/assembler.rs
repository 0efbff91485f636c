//! Merges per-category extraction results into one catalog snapshot

use crate::catalog::types::{Catalog, Category};
use crate::crawler::{Extraction, FetchError};

/// Result of fetching and extracting one category page
#[derive(Debug)]
pub struct CategoryResult {
    /// Position of the category in discovery order
    pub index: usize,

    pub category: Category,

    pub outcome: Result<Extraction, FetchError>,
}

/// Skip and drop counters of one assembly run
///
/// These never change whether the run succeeded; they are reported only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    /// Category anchors on the landing page skipped for a missing name or href
    pub category_links_skipped: usize,
    pub categories_attempted: usize,
    pub categories_fetch_failed: usize,
    pub products_extracted: usize,
    pub products_dropped: usize,
}

impl AssemblyStats {
    /// Categories whose page was fetched, regardless of how many products it had
    pub fn categories_succeeded(&self) -> usize {
        self.categories_attempted - self.categories_fetch_failed
    }
}

/// Concatenates category results into a catalog
///
/// Results may arrive in any order (e.g. from parallel fetches); they are
/// merged by `index` so the catalog order is always discovery order, then
/// document order within each category.
pub fn assemble(mut results: Vec<CategoryResult>) -> (Catalog, AssemblyStats) {
    results.sort_by_key(|result| result.index);

    let mut stats = AssemblyStats {
        categories_attempted: results.len(),
        ..AssemblyStats::default()
    };
    let mut categories = Vec::with_capacity(results.len());
    let mut records = Vec::new();

    for result in results {
        categories.push(result.category.name.clone());

        match result.outcome {
            Ok(extraction) => {
                stats.products_extracted += extraction.records.len();
                stats.products_dropped += extraction.dropped;
                records.extend(extraction.records);
            }
            Err(e) => {
                tracing::warn!(
                    "Skipping category {} due to fetch error: {}",
                    result.category.name,
                    e
                );
                stats.categories_fetch_failed += 1;
            }
        }
    }

    (Catalog::new(categories, records), stats)
}
