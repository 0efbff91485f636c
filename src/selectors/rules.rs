//! Declarative selector rules
//!
//! A rule is an element name plus a class matcher. Rules never encode
//! control flow; the price fallback order is just the rule list sorted by
//! priority.

use crate::config::{PriceRuleEntry, PriceRuleKind, SelectorConfig};
use crate::ConfigError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// How a rule matches an element's `class` attribute
#[derive(Debug, Clone)]
pub enum ClassMatcher {
    /// One of the whitespace-separated class tokens equals the value
    Token(String),

    /// The regex matches a single class token or the whole attribute with
    /// its tokens joined by single spaces
    Pattern(Regex),

    /// The whole attribute equals the value (whitespace-normalized), or a
    /// single token equals it when the value has no spaces
    Exact(String),
}

impl ClassMatcher {
    pub fn matches(&self, class_attr: &str) -> bool {
        match self {
            ClassMatcher::Token(token) => class_attr.split_whitespace().any(|c| c == token),
            ClassMatcher::Pattern(regex) => {
                let normalized = class_attr.split_whitespace().collect::<Vec<_>>().join(" ");
                regex.is_match(&normalized)
                    || class_attr.split_whitespace().any(|c| regex.is_match(c))
            }
            ClassMatcher::Exact(value) => {
                let normalized = class_attr.split_whitespace().collect::<Vec<_>>().join(" ");
                let expected = value.split_whitespace().collect::<Vec<_>>().join(" ");
                if normalized == expected {
                    return true;
                }
                !expected.contains(' ') && class_attr.split_whitespace().any(|c| c == expected)
            }
        }
    }
}

/// A single selector rule: `<element class=...>`
#[derive(Debug, Clone)]
pub struct SelectorRule {
    /// Name used in log lines
    pub label: String,

    /// Element name the rule applies to
    pub element: String,

    pub matcher: ClassMatcher,

    /// Lower values are tried first
    pub priority: u8,

    selector: Selector,
}

impl SelectorRule {
    pub fn new(
        label: impl Into<String>,
        element: &str,
        matcher: ClassMatcher,
        priority: u8,
    ) -> Result<Self, ConfigError> {
        let selector = compile(&format!("{}[class]", element))?;
        Ok(Self {
            label: label.into(),
            element: element.to_string(),
            matcher,
            priority,
            selector,
        })
    }

    fn accepts(&self, element: &ElementRef<'_>) -> bool {
        element
            .value()
            .attr("class")
            .map(|class| self.matcher.matches(class))
            .unwrap_or(false)
    }

    /// All matching elements of a document, in document order
    pub fn select_all<'a>(
        &'a self,
        document: &'a Html,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        document
            .select(&self.selector)
            .filter(move |element| self.accepts(element))
    }

    /// All matching descendants of `scope`, in document order
    pub fn select_within<'a>(
        &'a self,
        scope: ElementRef<'a>,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        scope
            .select(&self.selector)
            .filter(move |element| self.accepts(element))
    }

    /// First matching descendant of `scope`
    pub fn find_within<'a>(&'a self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.select_within(scope).next()
    }
}

/// The complete markup contract, compiled once per run
#[derive(Debug, Clone)]
pub struct SelectorTable {
    /// Heading-level category links on the landing page
    pub category_link: SelectorRule,

    /// Product card wrapper
    pub product_card: SelectorRule,

    /// Heading containing the product name link
    pub name_heading: Selector,

    /// Link inside the heading carrying the product name
    pub name_link: Selector,

    /// Price rules, sorted by ascending priority
    pub price: Vec<SelectorRule>,

    /// Container of the rating value
    pub rating: SelectorRule,

    /// Element inside the rating container carrying the value
    pub rating_value: Selector,
}

impl SelectorTable {
    /// Compiles the raw selector configuration
    ///
    /// Fails with [`ConfigError::InvalidPattern`] if a regex does not compile
    /// or no price rule is configured.
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        let category_regex = compile_regex(&config.category_link_pattern)?;

        if config.price.is_empty() {
            return Err(ConfigError::InvalidPattern(
                "at least one price selector rule is required".to_string(),
            ));
        }

        let mut price = config
            .price
            .iter()
            .enumerate()
            .map(|(index, entry)| price_rule(index, entry))
            .collect::<Result<Vec<_>, _>>()?;
        // Stable: equal priorities keep their configured order
        price.sort_by_key(|rule| rule.priority);

        Ok(Self {
            category_link: SelectorRule::new(
                "category-link",
                "a",
                ClassMatcher::Pattern(category_regex),
                0,
            )?,
            product_card: SelectorRule::new(
                "product-card",
                "div",
                ClassMatcher::Token(config.product_card_class.clone()),
                0,
            )?,
            name_heading: compile("h2")?,
            name_link: compile("a")?,
            price,
            rating: SelectorRule::new(
                "rating",
                "div",
                ClassMatcher::Token(config.rating_class.clone()),
                0,
            )?,
            rating_value: compile("span")?,
        })
    }
}

fn price_rule(index: usize, entry: &PriceRuleEntry) -> Result<SelectorRule, ConfigError> {
    let matcher = match entry.kind {
        PriceRuleKind::Pattern => ClassMatcher::Pattern(compile_regex(&entry.value)?),
        PriceRuleKind::Exact => {
            if entry.value.trim().is_empty() {
                return Err(ConfigError::InvalidPattern(
                    "exact price rule cannot be empty".to_string(),
                ));
            }
            ClassMatcher::Exact(entry.value.clone())
        }
    };
    let label = entry
        .label
        .clone()
        .unwrap_or_else(|| format!("price-{}", index));
    SelectorRule::new(label, "span", matcher, entry.priority)
}

fn compile_regex(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern)
        .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {:?}", selector, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_table() -> SelectorTable {
        SelectorTable::from_config(&SelectorConfig::default()).unwrap()
    }

    #[test]
    fn test_token_matcher() {
        let matcher = ClassMatcher::Token("ProductItem__Wrapper".to_string());
        assert!(matcher.matches("ProductItem__Wrapper"));
        assert!(matcher.matches("Grid__Cell ProductItem__Wrapper"));
        assert!(!matcher.matches("ProductItem__WrapperX"));
    }

    #[test]
    fn test_pattern_matcher_on_tokens() {
        let matcher = ClassMatcher::Pattern(Regex::new(r"ctsm_headinglink[1-5]").unwrap());
        assert!(matcher.matches("ctsm_headinglink1"));
        assert!(matcher.matches("nav-item ctsm_headinglink5"));
        assert!(!matcher.matches("ctsm_headinglink9"));
        assert!(!matcher.matches("ctsm_link1"));
    }

    #[test]
    fn test_pattern_matcher_spanning_tokens() {
        let matcher = ClassMatcher::Pattern(Regex::new(r"\bProductItem__Price 3\b").unwrap());
        assert!(matcher.matches("ProductItem__Price 3 Price"));
        assert!(!matcher.matches("ProductItem__Price Price--highlight 7"));
    }

    #[test]
    fn test_pattern_matcher_irregular_whitespace() {
        let matcher = ClassMatcher::Pattern(Regex::new(r"\bProductItem__Price 3\b").unwrap());
        assert!(matcher.matches("ProductItem__Price\n    3 Price"));
        assert!(matcher.matches("ProductItem__Price  3"));
        assert!(matcher.matches("\tProductItem__Price\t3\t"));
    }

    #[test]
    fn test_exact_matcher() {
        let matcher = ClassMatcher::Exact(
            "ProductItem__Price Price--highlight 7 Price Text--subdued".to_string(),
        );
        assert!(matcher.matches("ProductItem__Price Price--highlight 7 Price Text--subdued"));
        assert!(matcher.matches("  ProductItem__Price  Price--highlight 7 Price Text--subdued "));
        assert!(!matcher.matches("ProductItem__Price Price--highlight 7 Price"));
    }

    #[test]
    fn test_default_table_price_order() {
        let table = default_table();
        let labels: Vec<_> = table.price.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["regular", "highlighted"]);
    }

    #[test]
    fn test_price_rules_sorted_by_priority() {
        let mut config = SelectorConfig::default();
        config.price[0].priority = 5;
        let table = SelectorTable::from_config(&config).unwrap();
        assert_eq!(table.price[0].label, "highlighted");
        assert_eq!(table.price[1].label, "regular");
    }

    #[test]
    fn test_select_all_document_order() {
        let html = Html::parse_document(
            r#"<a class="ctsm_headinglink2" href="/b">B</a>
               <a class="other" href="/x">X</a>
               <a class="ctsm_headinglink1" href="/a">A</a>"#,
        );
        let table = default_table();
        let texts: Vec<String> = table
            .category_link
            .select_all(&html)
            .map(|e| e.text().collect())
            .collect();
        assert_eq!(texts, vec!["B", "A"]);
    }
}
