//! Configuration module for Catalog Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; an empty file yields the built-in defaults for the
//! Lakmé storefront.
//!
//! # Example
//!
//! ```no_run
//! use catalog_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Search threshold: {}", config.search.threshold);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetcherConfig, OutputConfig, PriceRuleEntry, PriceRuleKind, SearchConfig,
    SelectorConfig, SiteConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MAX_CATEGORIES};
