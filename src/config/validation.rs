use crate::config::types::{
    Config, FetcherConfig, OutputConfig, SearchConfig, SelectorConfig, SiteConfig,
};
use crate::search::Threshold;
use crate::selectors::SelectorTable;
use crate::ConfigError;
use url::Url;

/// Upper bound on categories taken from the landing page
pub const MAX_CATEGORIES: usize = 5;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_search_config(&config.search)?;
    validate_output_config(&config.output)?;
    validate_selector_config(&config.selectors)?;
    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.max_categories < 1 || config.max_categories > MAX_CATEGORIES {
        return Err(ConfigError::Validation(format!(
            "max-categories must be between 1 and {}, got {}",
            MAX_CATEGORIES, config.max_categories
        )));
    }

    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 32 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-fetches must be between 1 and 32, got {}",
            config.max_concurrent_fetches
        )));
    }

    Ok(())
}

fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    Threshold::new(config.threshold).map_err(|e| ConfigError::Validation(e.to_string()))?;
    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.catalog_path.is_empty() {
        return Err(ConfigError::Validation(
            "catalog-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Selector strings are validated by compiling them
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    SelectorTable::from_config(config)?;
    Ok(())
}
