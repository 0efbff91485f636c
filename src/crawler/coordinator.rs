//! Crawl coordinator - runs one catalog build end to end
//!
//! This module ties the pipeline together:
//! - Fetching the landing page and discovering categories
//! - Fetching and extracting category pages concurrently
//! - Assembling the results into a catalog snapshot
//!
//! Fetch failures never abort the run. A failed landing page yields an empty
//! catalog; a failed category page is skipped and counted.

use crate::catalog::{assemble, AssemblyStats, Catalog, Category, CategoryResult};
use crate::config::Config;
use crate::crawler::discovery::{discover_categories, Discovery};
use crate::crawler::extractor::{extract_products, Extraction};
use crate::crawler::fetcher::{FetchError, HttpFetcher, PageFetcher};
use crate::selectors::SelectorTable;
use crate::ScoutError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Everything one crawl run produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Categories discovered on the landing page, in document order
    pub categories: Vec<Category>,

    pub catalog: Catalog,

    pub stats: AssemblyStats,
}

/// Main crawl coordinator structure
pub struct Coordinator<F> {
    fetcher: Arc<F>,
    selectors: Arc<SelectorTable>,
    base_url: Url,
    max_categories: usize,
    max_concurrent_fetches: usize,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator that fetches over HTTP
    pub fn new(config: &Config) -> Result<Self, ScoutError> {
        let fetcher = HttpFetcher::new(&config.fetcher)?;
        Self::with_fetcher(config, fetcher)
    }
}

impl<F> Coordinator<F>
where
    F: PageFetcher + 'static,
{
    /// Creates a coordinator around any page source
    pub fn with_fetcher(config: &Config, fetcher: F) -> Result<Self, ScoutError> {
        let selectors = SelectorTable::from_config(&config.selectors)?;
        let base_url = Url::parse(&config.site.base_url)?;

        Ok(Self {
            fetcher: Arc::new(fetcher),
            selectors: Arc::new(selectors),
            base_url,
            max_categories: config.site.max_categories,
            max_concurrent_fetches: config.fetcher.max_concurrent_fetches.max(1),
        })
    }

    /// Runs the crawl and assembles a new catalog
    ///
    /// This never fails: every fetch or extraction problem is logged and
    /// reflected in the returned [`AssemblyStats`].
    pub async fn run(&self) -> CrawlOutcome {
        let start_time = std::time::Instant::now();
        tracing::info!("Starting crawl of {}", self.base_url);

        let Discovery { categories, skipped } = match self.discover().await {
            Ok(discovery) => discovery,
            Err(e) => {
                tracing::error!("Failed to retrieve the landing page: {}", e);
                return CrawlOutcome {
                    categories: Vec::new(),
                    catalog: Catalog::empty(),
                    stats: AssemblyStats::default(),
                };
            }
        };

        tracing::info!(
            "Categories found: {:?}",
            categories.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );

        let results = self.crawl_categories(&categories).await;
        let (catalog, mut stats) = assemble(results);
        stats.category_links_skipped = skipped;

        tracing::info!(
            "Crawl completed: {} products from {}/{} categories ({} dropped) in {:?}",
            stats.products_extracted,
            stats.categories_succeeded(),
            stats.categories_attempted,
            stats.products_dropped,
            start_time.elapsed()
        );

        CrawlOutcome {
            categories,
            catalog,
            stats,
        }
    }

    async fn discover(&self) -> Result<Discovery, FetchError> {
        let markup = self.fetcher.fetch(&self.base_url).await?;
        Ok(discover_categories(
            &markup,
            &self.base_url,
            &self.selectors,
            self.max_categories,
        ))
    }

    /// Fetches and extracts every category page, at most
    /// `max_concurrent_fetches` at a time
    async fn crawl_categories(&self, categories: &[Category]) -> Vec<CategoryResult> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_fetches));
        let mut tasks = JoinSet::new();

        for (index, category) in categories.iter().cloned().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let selectors = Arc::clone(&self.selectors);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let outcome = fetch_and_extract(fetcher.as_ref(), &selectors, &category).await;
                CategoryResult {
                    index,
                    category,
                    outcome,
                }
            });
        }

        // Categories whose task has not reported back yet, by index
        let mut pending: Vec<Option<&Category>> = categories.iter().map(Some).collect();
        let mut results = Vec::with_capacity(categories.len());

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => {
                    if let Ok(extraction) = &result.outcome {
                        tracing::info!(
                            "Fetched {} products from {}",
                            extraction.records.len(),
                            result.category.name
                        );
                    }
                    pending[result.index] = None;
                    results.push(result);
                }
                Err(e) => tracing::error!("Category task failed: {}", e),
            }
        }

        // A task that panicked or was cancelled still counts as a failed fetch
        for (index, category) in pending.into_iter().enumerate() {
            if let Some(category) = category {
                results.push(CategoryResult {
                    index,
                    category: category.clone(),
                    outcome: Err(FetchError::Aborted {
                        url: category.url.to_string(),
                        message: "task did not return a result".to_string(),
                    }),
                });
            }
        }

        results
    }
}

async fn fetch_and_extract<F: PageFetcher>(
    fetcher: &F,
    selectors: &SelectorTable,
    category: &Category,
) -> Result<Extraction, FetchError> {
    let markup = fetcher.fetch(&category.url).await?;
    Ok(extract_products(&markup, &category.name, selectors))
}

/// Runs a complete crawl over HTTP
///
/// # Example
///
/// ```no_run
/// use catalog_scout::config::Config;
/// use catalog_scout::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = run_crawl(&Config::default()).await?;
/// println!("{} products", outcome.catalog.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlOutcome, ScoutError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Serves canned pages; unknown URLs fail with 404
    struct StaticFetcher {
        pages: HashMap<String, String>,
        delays: HashMap<String, u64>,
        panic_on: Option<String>,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl StaticFetcher {
        fn new(pages: &[(&str, String)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.clone()))
                    .collect(),
                delays: HashMap::new(),
                panic_on: None,
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, url: &str, millis: u64) -> Self {
            self.delays.insert(url.to_string(), millis);
            self
        }

        fn panicking_on(mut self, url: &str) -> Self {
            self.panic_on = Some(url.to_string());
            self
        }
    }

    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

            if self.panic_on.as_deref() == Some(url.as_str()) {
                panic!("fetcher blew up on {}", url);
            }

            let delay = self.delays.get(url.as_str()).copied().unwrap_or(5);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status_code: 404,
                })
        }
    }

    const BASE: &str = "https://shop.example.com/";

    fn config(max_concurrent: usize) -> Config {
        let mut config = Config::default();
        config.site.base_url = BASE.to_string();
        config.fetcher.max_concurrent_fetches = max_concurrent;
        config
    }

    fn landing(links: &[(&str, &str)]) -> String {
        links
            .iter()
            .enumerate()
            .map(|(i, (name, href))| {
                format!(
                    r#"<a class="ctsm_headinglink{}" href="{}">{}</a>"#,
                    i % 5 + 1,
                    href,
                    name
                )
            })
            .collect()
    }

    fn product_page(names: &[&str]) -> String {
        names
            .iter()
            .map(|name| {
                format!(
                    r#"<div class="ProductItem__Wrapper"><h2><a href="/p">{}</a></h2><span class="ProductItem__Price 3">₹ 100</span></div>"#,
                    name
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_run_preserves_category_order_despite_arrival() {
        let fetcher = StaticFetcher::new(&[
            (BASE, landing(&[("Lips", "/lips"), ("Eyes", "/eyes")])),
            ("https://shop.example.com/lips", product_page(&["Lipstick", "Gloss"])),
            ("https://shop.example.com/eyes", product_page(&["Kajal"])),
        ])
        // Lips finishes last
        .with_delay("https://shop.example.com/lips", 50);

        let coordinator = Coordinator::with_fetcher(&config(4), fetcher).unwrap();
        let outcome = coordinator.run().await;

        let names: Vec<_> = outcome
            .catalog
            .records()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Lipstick", "Gloss", "Kajal"]);
        assert_eq!(outcome.stats.categories_attempted, 2);
        assert_eq!(outcome.stats.products_extracted, 3);
    }

    #[tokio::test]
    async fn test_failed_category_is_skipped() {
        let fetcher = StaticFetcher::new(&[
            (BASE, landing(&[("Lips", "/lips"), ("Eyes", "/eyes")])),
            ("https://shop.example.com/eyes", product_page(&["Kajal"])),
        ]);

        let coordinator = Coordinator::with_fetcher(&config(2), fetcher).unwrap();
        let outcome = coordinator.run().await;

        assert_eq!(outcome.catalog.len(), 1);
        assert_eq!(outcome.stats.categories_fetch_failed, 1);
        assert_eq!(outcome.categories.len(), 2);
    }

    #[tokio::test]
    async fn test_skipped_category_links_are_reported() {
        let mut page = landing(&[("Lips", "/lips")]);
        page.push_str(r#"<a class="ctsm_headinglink2">No href</a>"#);
        let fetcher = StaticFetcher::new(&[
            (BASE, page),
            ("https://shop.example.com/lips", product_page(&["Lipstick"])),
        ]);

        let coordinator = Coordinator::with_fetcher(&config(2), fetcher).unwrap();
        let outcome = coordinator.run().await;

        assert_eq!(outcome.stats.category_links_skipped, 1);
        assert_eq!(outcome.stats.categories_attempted, 1);
    }

    #[tokio::test]
    async fn test_panicked_category_task_counts_as_failed() {
        let fetcher = StaticFetcher::new(&[
            (BASE, landing(&[("Lips", "/lips"), ("Eyes", "/eyes")])),
            ("https://shop.example.com/lips", product_page(&["Lipstick"])),
            ("https://shop.example.com/eyes", product_page(&["Kajal"])),
        ])
        .panicking_on("https://shop.example.com/lips");

        let coordinator = Coordinator::with_fetcher(&config(2), fetcher).unwrap();
        let outcome = coordinator.run().await;

        assert_eq!(outcome.stats.categories_attempted, 2);
        assert_eq!(outcome.stats.categories_fetch_failed, 1);
        assert_eq!(outcome.stats.categories_succeeded(), 1);
        assert_eq!(outcome.catalog.categories().to_vec(), vec!["Lips", "Eyes"]);
        assert_eq!(outcome.catalog.len(), 1);
        assert_eq!(outcome.catalog.records()[0].name, "Kajal");
    }

    #[tokio::test]
    async fn test_failed_landing_page_yields_empty_catalog() {
        let fetcher = StaticFetcher::new(&[]);
        let coordinator = Coordinator::with_fetcher(&config(2), fetcher).unwrap();
        let outcome = coordinator.run().await;

        assert!(outcome.categories.is_empty());
        assert!(outcome.catalog.is_empty());
        assert_eq!(outcome.stats, AssemblyStats::default());
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let links: Vec<(String, String)> = (0..5)
            .map(|i| (format!("Cat {}", i), format!("/c{}", i)))
            .collect();
        let link_refs: Vec<(&str, &str)> = links
            .iter()
            .map(|(n, h)| (n.as_str(), h.as_str()))
            .collect();

        let urls: Vec<String> = (0..5)
            .map(|i| format!("https://shop.example.com/c{}", i))
            .collect();
        let mut pages = vec![(BASE, landing(&link_refs))];
        for url in &urls {
            pages.push((url.as_str(), product_page(&["Item"])));
        }

        let mut fetcher = StaticFetcher::new(&pages);
        for url in &urls {
            fetcher = fetcher.with_delay(url, 20);
        }

        let coordinator = Coordinator::with_fetcher(&config(2), fetcher).unwrap();
        let outcome = coordinator.run().await;

        assert_eq!(outcome.catalog.len(), 5);
        assert!(coordinator.fetcher.peak_in_flight.load(Ordering::SeqCst) <= 2);
    }
}
