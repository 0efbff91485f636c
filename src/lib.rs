//! Catalog Scout: a tolerant product catalog scraper with fuzzy search
//!
//! This crate crawls a retailer's category pages, extracts product records
//! despite inconsistent markup, and ranks the resulting catalog against
//! free-text queries.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod output;
pub mod search;
pub mod selectors;

use thiserror::Error;

/// Main error type for Catalog Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Export error: {0}")]
    Export(#[from] output::ExportError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector pattern: {0}")]
    InvalidPattern(String),
}

/// Errors surfaced at the search boundary
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Invalid threshold '{0}': must be an integer between 0 and 100")]
    InvalidThreshold(String),
}

/// Result type alias for Catalog Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogStore, Category, ProductRecord};
pub use config::Config;
pub use search::{search, SearchResult, Threshold};
