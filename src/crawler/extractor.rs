//! Product extraction from a category page
//!
//! Each product card is read independently. A card that lacks a name or a
//! price is dropped and counted; the rest of the page is unaffected. A
//! missing rating is the normal case for unrated products and yields `None`.

use crate::catalog::ProductRecord;
use crate::search::normalize;
use crate::selectors::{text_field, Field, SelectorRule, SelectorTable};
use scraper::{ElementRef, Html};

/// Products read from one category page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Usable records, in document order
    pub records: Vec<ProductRecord>,

    /// Cards dropped for a missing name or price
    pub dropped: usize,
}

/// Required field a card was missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MissingField {
    Name,
    Price,
}

/// Parses a category page into product records
///
/// Cards are read in document order. A card is dropped when it has no name,
/// when its name has no letters or digits, or when no price rule yields a
/// non-empty price.
///
/// # Arguments
///
/// * `markup` - Raw HTML of the category page
/// * `category` - Name of the category the page belongs to
/// * `rules` - Compiled selector table
///
/// # Returns
///
/// An [`Extraction`] with the usable records and the number of dropped cards
///
/// # Example
///
/// ```
/// use catalog_scout::config::SelectorConfig;
/// use catalog_scout::crawler::extract_products;
/// use catalog_scout::selectors::SelectorTable;
///
/// let html = r#"
///     <div class="ProductItem__Wrapper">
///         <h2><a href="/p/1">Kajal</a></h2>
///         <span class="ProductItem__Price 3">₹ 199</span>
///     </div>"#;
/// let rules = SelectorTable::from_config(&SelectorConfig::default()).unwrap();
///
/// let extraction = extract_products(html, "Eyes", &rules);
/// assert_eq!(extraction.records[0].price, "₹ 199");
/// assert_eq!(extraction.records[0].rating, None);
/// ```
pub fn extract_products(markup: &str, category: &str, rules: &SelectorTable) -> Extraction {
    let document = Html::parse_document(markup);
    let mut extraction = Extraction::default();

    for (position, card) in rules.product_card.select_all(&document).enumerate() {
        match extract_card(card, category, rules) {
            Ok(record) => extraction.records.push(record),
            Err(missing) => {
                tracing::warn!(
                    "Dropping product card #{} in {}: missing {:?}",
                    position + 1,
                    category,
                    missing
                );
                extraction.dropped += 1;
            }
        }
    }

    tracing::debug!(
        "Extracted {} products from {} ({} dropped)",
        extraction.records.len(),
        category,
        extraction.dropped
    );

    extraction
}

fn extract_card(
    card: ElementRef<'_>,
    category: &str,
    rules: &SelectorTable,
) -> Result<ProductRecord, MissingField> {
    // A name with nothing searchable in it could never be found again
    let name = read_name(card, rules)
        .into_option()
        .filter(|name| !normalize(name).is_empty())
        .ok_or(MissingField::Name)?;

    let price = read_price(card, rules)
        .into_option()
        .ok_or(MissingField::Price)?;

    let rating = read_rating(card, rules).into_option();

    Ok(ProductRecord {
        category: category.to_string(),
        name,
        price,
        rating,
    })
}

/// Text of the first link inside the first heading
fn read_name(card: ElementRef<'_>, rules: &SelectorTable) -> Field<String> {
    card.select(&rules.name_heading)
        .next()
        .and_then(|heading| heading.select(&rules.name_link).next())
        .map(|link| text_field(&link.text().collect::<String>()))
        .unwrap_or(Field::Missing)
}

/// First price found by the rule list, in priority order
fn read_price(card: ElementRef<'_>, rules: &SelectorTable) -> Field<String> {
    rules.price.iter().fold(Field::Missing, |found, rule| {
        found.or_else(|| price_by_rule(card, rule))
    })
}

fn price_by_rule(card: ElementRef<'_>, rule: &SelectorRule) -> Field<String> {
    let price = rule
        .find_within(card)
        .map(|span| text_field(&span.text().collect::<String>()))
        .unwrap_or(Field::Missing);

    if price.is_present() {
        tracing::trace!("Price matched rule '{}'", rule.label);
    }
    price
}

/// Text of the first value element inside the rating container
fn read_rating(card: ElementRef<'_>, rules: &SelectorTable) -> Field<String> {
    rules
        .rating
        .find_within(card)
        .and_then(|container| container.select(&rules.rating_value).next())
        .map(|value| text_field(&value.text().collect::<String>()))
        .unwrap_or(Field::Missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorConfig;

    fn rules() -> SelectorTable {
        SelectorTable::from_config(&SelectorConfig::default()).unwrap()
    }

    fn card(name: &str, price_html: &str, rating_html: &str) -> String {
        format!(
            r#"<div class="ProductItem__Wrapper">
                <h2 class="ProductItem__Title"><a href="/products/x">{}</a></h2>
                {}
                {}
            </div>"#,
            name, price_html, rating_html
        )
    }

    const REGULAR_PRICE: &str = r#"<span class="ProductItem__Price 3 Price">₹ 250</span>"#;
    const HIGHLIGHTED_PRICE: &str = r#"<span class="ProductItem__Price Price--highlight 7 Price Text--subdued">₹ 199</span>"#;
    const RATING: &str = r#"<div class="rating__stars"><span>4.3</span></div>"#;

    #[test]
    fn test_second_price_rule_without_rating() {
        let html = card("Hair Conditioner 200ml", HIGHLIGHTED_PRICE, "");
        let extraction = extract_products(&html, "Hair", &rules());

        assert_eq!(extraction.dropped, 0);
        assert_eq!(
            extraction.records,
            vec![ProductRecord {
                category: "Hair".to_string(),
                name: "Hair Conditioner 200ml".to_string(),
                price: "₹ 199".to_string(),
                rating: None,
            }]
        );
    }

    #[test]
    fn test_first_price_rule_wins() {
        let html = card(
            "Lipstick",
            &format!("{}{}", HIGHLIGHTED_PRICE, REGULAR_PRICE),
            RATING,
        );
        let extraction = extract_products(&html, "Lips", &rules());

        assert_eq!(extraction.records[0].price, "₹ 250");
        assert_eq!(extraction.records[0].rating.as_deref(), Some("4.3"));
    }

    #[test]
    fn test_missing_price_drops_card_only() {
        let html = format!(
            "{}{}{}",
            card("First", REGULAR_PRICE, ""),
            card("No Price", r#"<span class="Price">₹ 10</span>"#, RATING),
            card("Third", HIGHLIGHTED_PRICE, RATING),
        );
        let extraction = extract_products(&html, "Face", &rules());

        let names: Vec<_> = extraction.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Third"]);
        assert_eq!(extraction.dropped, 1);
    }

    #[test]
    fn test_missing_rating_is_not_a_drop() {
        let html = card("Compact", REGULAR_PRICE, "");
        let extraction = extract_products(&html, "Face", &rules());
        assert_eq!(extraction.dropped, 0);
        assert_eq!(extraction.records[0].rating, None);
    }

    #[test]
    fn test_rating_container_without_value() {
        let html = card("Compact", REGULAR_PRICE, r#"<div class="rating__stars"></div>"#);
        let extraction = extract_products(&html, "Face", &rules());
        assert_eq!(extraction.records[0].rating, None);
    }

    #[test]
    fn test_missing_name_drops_card() {
        let html = format!(
            r#"<div class="ProductItem__Wrapper"><h2>No link</h2>{}</div>
               <div class="ProductItem__Wrapper">{}</div>
               <div class="ProductItem__Wrapper"><h2><a href="/x">  </a></h2>{}</div>
               {}"#,
            REGULAR_PRICE,
            REGULAR_PRICE,
            REGULAR_PRICE,
            card("Kept", REGULAR_PRICE, "")
        );
        let extraction = extract_products(&html, "Eyes", &rules());
        assert_eq!(extraction.dropped, 3);
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].name, "Kept");
    }

    #[test]
    fn test_symbol_only_name_drops_card() {
        let html = format!(
            "{}{}{}",
            card("💄✨", REGULAR_PRICE, ""),
            card("—", REGULAR_PRICE, ""),
            card("Kajal 💄", REGULAR_PRICE, "")
        );
        let extraction = extract_products(&html, "Eyes", &rules());
        assert_eq!(extraction.dropped, 2);
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].name, "Kajal 💄");
    }

    #[test]
    fn test_price_classes_split_across_lines() {
        let html = card(
            "Kajal",
            "<span class=\"ProductItem__Price\n    3 Price\">₹ 199</span>",
            "",
        );
        let extraction = extract_products(&html, "Eyes", &rules());
        assert_eq!(extraction.dropped, 0);
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].price, "₹ 199");
    }

    #[test]
    fn test_empty_price_text_falls_back() {
        let html = card(
            "Serum",
            &format!(
                r#"<span class="ProductItem__Price 3">  </span>{}"#,
                HIGHLIGHTED_PRICE
            ),
            "",
        );
        let extraction = extract_products(&html, "Skin", &rules());
        assert_eq!(extraction.records[0].price, "₹ 199");
    }

    #[test]
    fn test_document_order_and_trimming() {
        let html = format!(
            "{}{}",
            card("  Kajal\n", REGULAR_PRICE, ""),
            card("Eyeliner", REGULAR_PRICE, "")
        );
        let extraction = extract_products(&html, "Eyes", &rules());
        let names: Vec<_> = extraction.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Kajal", "Eyeliner"]);
    }

    #[test]
    fn test_page_without_cards() {
        let html = "<html><body>Nothing here</body></html>";
        let extraction = extract_products(html, "Eyes", &rules());
        assert_eq!(extraction, Extraction::default());
    }

    #[test]
    fn test_custom_price_rule_from_config() {
        let config: SelectorConfig = toml::from_str(
            r#"
[[price]]
kind = "exact"
value = "sale-price"
"#,
        )
        .unwrap();
        let rules = SelectorTable::from_config(&config).unwrap();
        let html = card("Toner", r#"<span class="money sale-price">₹ 99</span>"#, "");

        let extraction = extract_products(&html, "Skin", &rules);
        assert_eq!(extraction.records[0].price, "₹ 99");
    }
}
