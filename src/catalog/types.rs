use chrono::{DateTime, Utc};
use std::sync::Arc;
use url::Url;

/// A top-level catalog section discovered on the landing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Link text, trimmed and non-empty
    pub name: String,

    /// Absolute URL of the category listing page
    pub url: Url,
}

/// One product as extracted from a category page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub category: String,
    pub name: String,
    pub price: String,

    /// `None` for unrated products
    pub rating: Option<String>,
}

/// Immutable, ordered snapshot of every product of one assembly run
///
/// Records are ordered by category discovery order, then document order
/// within the category page. A rebuild produces a new `Catalog`; existing
/// snapshots are never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Arc<[String]>,
    records: Arc<[ProductRecord]>,
    built_at: DateTime<Utc>,
}

impl Catalog {
    /// Builds a snapshot from category names and records
    ///
    /// Records whose category is not among `categories` are discarded with a
    /// warning so every record always belongs to the same discovery run.
    pub fn new(categories: Vec<String>, records: Vec<ProductRecord>) -> Self {
        let records: Vec<ProductRecord> = records
            .into_iter()
            .filter(|record| {
                let known = categories.iter().any(|c| c == &record.category);
                if !known {
                    tracing::warn!(
                        "Discarding '{}': unknown category '{}'",
                        record.name,
                        record.category
                    );
                }
                known
            })
            .collect();

        Self {
            categories: categories.into(),
            records: records.into(),
            built_at: Utc::now(),
        }
    }

    /// An empty snapshot, used before the first build is published
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Number of records per category, in category order
    pub fn counts_by_category(&self) -> Vec<(String, usize)> {
        self.categories
            .iter()
            .map(|category| {
                let count = self
                    .records
                    .iter()
                    .filter(|r| &r.category == category)
                    .count();
                (category.clone(), count)
            })
            .collect()
    }

    /// Number of records without a rating
    pub fn unrated_count(&self) -> usize {
        self.records.iter().filter(|r| r.rating.is_none()).count()
    }
}
