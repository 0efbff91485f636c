//! Category discovery on the landing page

use crate::catalog::Category;
use crate::config::MAX_CATEGORIES;
use crate::selectors::{text_field, Field, SelectorTable};
use scraper::Html;
use url::Url;

/// Categories found on the landing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Usable categories, in document order
    pub categories: Vec<Category>,

    /// Matching anchors skipped for a missing name or href
    pub skipped: usize,
}

/// Extracts the top-level category links from the landing page
///
/// Anchors are taken in document order when their class attribute matches
/// the category-link rule. At most `limit` categories are returned (never
/// more than [`MAX_CATEGORIES`]); fewer, including none, is not an error.
/// Anchors without a usable href or name are skipped and do not count
/// toward the limit. Scanning stops once the limit is reached, so only
/// anchors before that point are counted as skipped.
///
/// # Arguments
///
/// * `markup` - Raw HTML of the landing page
/// * `base_url` - URL the landing page was fetched from, for relative hrefs
/// * `rules` - Compiled selector table
/// * `limit` - Maximum number of categories wanted
///
/// # Returns
///
/// A [`Discovery`] with the categories and the number of skipped anchors
///
/// # Example
///
/// ```
/// use catalog_scout::config::SelectorConfig;
/// use catalog_scout::crawler::discover_categories;
/// use catalog_scout::selectors::SelectorTable;
/// use url::Url;
///
/// let html = r#"<a class="ctsm_headinglink1" href="/lips"> Lips </a>"#;
/// let base = Url::parse("https://shop.example.com").unwrap();
/// let rules = SelectorTable::from_config(&SelectorConfig::default()).unwrap();
///
/// let discovery = discover_categories(html, &base, &rules, 5);
/// assert_eq!(discovery.categories[0].name, "Lips");
/// assert_eq!(discovery.categories[0].url.as_str(), "https://shop.example.com/lips");
/// ```
pub fn discover_categories(
    markup: &str,
    base_url: &Url,
    rules: &SelectorTable,
    limit: usize,
) -> Discovery {
    let document = Html::parse_document(markup);
    let limit = limit.min(MAX_CATEGORIES);
    let mut discovery = Discovery::default();

    for anchor in rules.category_link.select_all(&document) {
        if discovery.categories.len() >= limit {
            break;
        }

        let name = match text_field(&anchor.text().collect::<String>()) {
            Field::Present(name) => name,
            Field::Missing => {
                tracing::warn!("Skipping category link without text");
                discovery.skipped += 1;
                continue;
            }
        };

        let url = anchor
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .and_then(|href| base_url.join(href).ok());

        match url {
            Some(url) => discovery.categories.push(Category { name, url }),
            None => {
                tracing::warn!("Skipping category '{}': missing or invalid href", name);
                discovery.skipped += 1;
            }
        }
    }

    discovery
}
