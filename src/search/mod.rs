//! Fuzzy name search over a catalog snapshot
//!
//! Queries and product names are normalized the same way, scored with
//! [`similarity`], filtered by a [`Threshold`] and ranked by descending
//! score. Ties keep catalog order.

mod normalize;
mod score;

pub use normalize::normalize;
pub use score::{partial_ratio, ratio, similarity, token_set_ratio, token_sort_ratio};

use crate::catalog::{Catalog, CatalogStore, ProductRecord};
use crate::SearchError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Minimum score a product needs to appear in search results
///
/// Always within 0..=100; out-of-range values are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Threshold(u8);

impl Threshold {
    pub const DEFAULT: Threshold = Threshold(70);

    pub fn new(value: i64) -> Result<Self, SearchError> {
        if (0..=100).contains(&value) {
            Ok(Threshold(value as u8))
        } else {
            Err(SearchError::InvalidThreshold(value.to_string()))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for Threshold {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| SearchError::InvalidThreshold(s.to_string()))?;
        Threshold::new(value)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A ranked match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub record: ProductRecord,
    pub score: u8,
}

/// Ranks the catalog against a free-text query
///
/// Returns every record whose name scores at least `threshold`, best first;
/// equal scores keep catalog order. Duplicate names each produce their own
/// result. An empty query (after normalization) or an empty catalog yields
/// no results.
///
/// # Arguments
///
/// * `catalog` - Snapshot to search
/// * `query` - Free-text query, normalized before scoring
/// * `threshold` - Minimum score a record needs to be returned
///
/// # Returns
///
/// Matching records with their scores, highest score first
///
/// # Example
///
/// ```
/// use catalog_scout::{search, Catalog, ProductRecord, Threshold};
///
/// let catalog = Catalog::new(
///     vec!["Hair".to_string()],
///     vec![ProductRecord {
///         category: "Hair".to_string(),
///         name: "Hair Conditioner".to_string(),
///         price: "₹ 199".to_string(),
///         rating: None,
///     }],
/// );
///
/// let results = search(&catalog, "conditioner", Threshold::default());
/// assert_eq!(results[0].score, 100);
/// ```
pub fn search(catalog: &Catalog, query: &str, threshold: Threshold) -> Vec<SearchResult> {
    let query = normalize(query);
    if query.is_empty() || catalog.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResult> = catalog
        .records()
        .iter()
        .filter_map(|record| {
            let score = similarity(&query, &normalize(&record.name));
            (score >= threshold.value()).then(|| SearchResult {
                record: record.clone(),
                score,
            })
        })
        .collect();

    // Stable sort: ties stay in catalog order
    results.sort_by(|a, b| b.score.cmp(&a.score));

    tracing::debug!(
        "Query '{}' matched {} of {} products (threshold {})",
        query,
        results.len(),
        catalog.len(),
        threshold
    );

    results
}

/// Search front-end bound to a [`CatalogStore`]
///
/// Each query captures the snapshot active when it starts; a rebuild that
/// publishes mid-query does not affect it.
#[derive(Debug, Clone)]
pub struct FuzzySearchEngine {
    store: Arc<CatalogStore>,
    default_threshold: Threshold,
}

impl FuzzySearchEngine {
    pub fn new(store: Arc<CatalogStore>, default_threshold: Threshold) -> Self {
        Self {
            store,
            default_threshold,
        }
    }

    pub fn default_threshold(&self) -> Threshold {
        self.default_threshold
    }

    /// Searches with an explicit threshold, or the engine default
    pub fn search(&self, query: &str, threshold: Option<Threshold>) -> Vec<SearchResult> {
        let snapshot = self.store.snapshot();
        search(&snapshot, query, threshold.unwrap_or(self.default_threshold))
    }

    /// Searches with a raw threshold string, as received from a user
    pub fn search_raw(
        &self,
        query: &str,
        threshold: Option<&str>,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let threshold = threshold.map(str::parse::<Threshold>).transpose()?;
        Ok(self.search(query, threshold))
    }
}
