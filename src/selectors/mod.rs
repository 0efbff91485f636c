//! Markup contract between the scraper and the storefront
//!
//! Category links, product cards, prices and ratings are located through a
//! [`SelectorTable`] compiled from configuration, so new markup variants are
//! added as data rather than as extra branches in the extractor.

mod field;
mod rules;

pub use field::{text_field, Field};
pub use rules::{ClassMatcher, SelectorRule, SelectorTable};
