use serde::Deserialize;

/// Main configuration structure for Catalog Scout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// The retailer site being scraped
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Landing page URL; relative category links are resolved against it
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Maximum number of categories taken from the landing page
    #[serde(rename = "max-categories", default = "default_max_categories")]
    pub max_categories: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_categories: default_max_categories(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.lakmeindia.com".to_string()
}

fn default_max_categories() -> usize {
    5
}

/// HTTP fetching behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of category pages fetched at once
    #[serde(
        rename = "max-concurrent-fetches",
        default = "default_max_concurrent_fetches"
    )]
    pub max_concurrent_fetches: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
        }
    }
}

fn default_user_agent() -> String {
    format!("catalog-scout/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent_fetches() -> usize {
    4
}

/// Search defaults
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Minimum score (0-100) for a product to appear in results
    #[serde(default = "default_threshold")]
    pub threshold: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

fn default_threshold() -> i64 {
    70
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the exported catalog CSV
    #[serde(rename = "catalog-path", default = "default_catalog_path")]
    pub catalog_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> String {
    "lakme_products.csv".to_string()
}

/// Markup contract between the scraper and the site
///
/// These are raw strings; they are compiled into a
/// [`SelectorTable`](crate::selectors::SelectorTable) at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// Regex matched against the class attribute of category `<a>` elements
    #[serde(
        rename = "category-link-pattern",
        default = "default_category_link_pattern"
    )]
    pub category_link_pattern: String,

    /// Class token identifying a product card `<div>`
    #[serde(rename = "product-card-class", default = "default_product_card_class")]
    pub product_card_class: String,

    /// Class token of the `<div>` holding the rating `<span>`
    #[serde(rename = "rating-class", default = "default_rating_class")]
    pub rating_class: String,

    /// Price rules, tried in ascending priority
    #[serde(default = "default_price_rules")]
    pub price: Vec<PriceRuleEntry>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            category_link_pattern: default_category_link_pattern(),
            product_card_class: default_product_card_class(),
            rating_class: default_rating_class(),
            price: default_price_rules(),
        }
    }
}

/// How a price rule matches the class attribute of a `<span>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRuleKind {
    /// Regex search over the class attribute
    Pattern,
    /// Literal class attribute
    Exact,
}

/// One entry of the price fallback list
#[derive(Debug, Clone, Deserialize)]
pub struct PriceRuleEntry {
    pub kind: PriceRuleKind,
    pub value: String,
    #[serde(default)]
    pub priority: u8,
    /// Human-readable label used in logs
    #[serde(default)]
    pub label: Option<String>,
}

fn default_category_link_pattern() -> String {
    r"ctsm_headinglink[1-5]".to_string()
}

fn default_product_card_class() -> String {
    "ProductItem__Wrapper".to_string()
}

fn default_rating_class() -> String {
    "rating__stars".to_string()
}

fn default_price_rules() -> Vec<PriceRuleEntry> {
    vec![
        PriceRuleEntry {
            kind: PriceRuleKind::Pattern,
            value: r"\bProductItem__Price 3\b".to_string(),
            priority: 0,
            label: Some("regular".to_string()),
        },
        PriceRuleEntry {
            kind: PriceRuleKind::Exact,
            value: "ProductItem__Price Price--highlight 7 Price Text--subdued".to_string(),
            priority: 1,
            label: Some("highlighted".to_string()),
        },
    ]
}
