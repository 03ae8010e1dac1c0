//! Product filter pipeline
//!
//! Derives the displayed product list from a fetched catalog and the
//! current search text, category selection, and sort key. The pipeline
//! is pure and re-run in full on every input change; it holds no state
//! of its own.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::Product;

/// Display ordering for the product list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Name A-Z.
    #[default]
    NameAsc,

    /// Name Z-A.
    NameDesc,

    /// Price low to high.
    PriceAsc,

    /// Price high to low.
    PriceDesc,
}

/// Error parsing a [`SortKey`] from its wire name.
#[derive(Debug, Error)]
#[error("unknown sort key {0:?}, expected one of name_asc, name_desc, price_asc, price_desc")]
pub struct ParseSortKeyError(String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name_asc" => Ok(Self::NameAsc),
            "name_desc" => Ok(Self::NameDesc),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

/// Current filter and sort selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Free-text search; blank matches everything.
    pub search: String,

    /// Category id to restrict to; `None` means no restriction.
    pub category: Option<u64>,

    /// Display ordering.
    pub sort: SortKey,
}

impl ProductQuery {
    /// Derive the display list from the full catalog.
    ///
    /// Text matching is a case-insensitive substring test against the
    /// product name, description, and category name. The sort is
    /// stable, so ties keep their prior relative order.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let needle = self.search.trim().to_lowercase();

        let mut filtered: Vec<Product> = products
            .iter()
            .filter(|product| needle.is_empty() || matches_text(product, &needle))
            .filter(|product| {
                self.category.is_none_or(|wanted| {
                    product
                        .category
                        .as_ref()
                        .is_some_and(|category| category.id == wanted)
                })
            })
            .cloned()
            .collect();

        match self.sort {
            SortKey::NameAsc => filtered.sort_by(|a, b| folded(&a.name).cmp(&folded(&b.name))),
            SortKey::NameDesc => filtered.sort_by(|a, b| folded(&b.name).cmp(&folded(&a.name))),
            SortKey::PriceAsc => filtered.sort_by(|a, b| a.price.cmp(&b.price)),
            SortKey::PriceDesc => filtered.sort_by(|a, b| b.price.cmp(&a.price)),
        }

        filtered
    }
}

fn folded(name: &str) -> String {
    name.to_lowercase()
}

fn matches_text(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product
            .description
            .as_ref()
            .is_some_and(|description| description.to_lowercase().contains(needle))
        || product
            .category
            .as_ref()
            .is_some_and(|category| category.name.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::products::Category;

    use super::*;

    fn product(id: u64, name: &str, price: Decimal) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: None,
            price,
            stock_quantity: 10,
            image_url: None,
            is_active: true,
            category: None,
        }
    }

    fn grocery_catalog() -> Vec<Product> {
        let mut apple = product(1, "Apple", dec!(2));
        apple.description = Some("Crisp red apples".to_string());
        apple.category = Some(Category {
            id: 1,
            name: "Fruit".to_string(),
            description: None,
        });

        let mut banana = product(2, "Banana", dec!(1));
        banana.category = Some(Category {
            id: 1,
            name: "Fruit".to_string(),
            description: None,
        });

        vec![apple, banana]
    }

    #[test]
    fn blank_query_matches_all() {
        let catalog = grocery_catalog();

        let result = ProductQuery::default().apply(&catalog);

        assert_eq!(result.len(), 2);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let catalog = grocery_catalog();
        let query = ProductQuery {
            search: "app".to_string(),
            ..ProductQuery::default()
        };

        let result = query.apply(&catalog);

        assert_eq!(result.len(), 1);
        assert_eq!(result.first().map(|p| p.name.as_str()), Some("Apple"));
    }

    #[test]
    fn search_matches_description_and_category_name() {
        let catalog = grocery_catalog();

        let by_description = ProductQuery {
            search: "crisp".to_string(),
            ..ProductQuery::default()
        };
        assert_eq!(by_description.apply(&catalog).len(), 1);

        let by_category = ProductQuery {
            search: "fruit".to_string(),
            ..ProductQuery::default()
        };
        assert_eq!(by_category.apply(&catalog).len(), 2);
    }

    #[test]
    fn category_filter_is_exact_id_match() {
        let catalog = grocery_catalog();

        let matching = ProductQuery {
            category: Some(1),
            ..ProductQuery::default()
        };
        assert_eq!(matching.apply(&catalog).len(), 2);

        let non_matching = ProductQuery {
            category: Some(42),
            ..ProductQuery::default()
        };
        assert!(non_matching.apply(&catalog).is_empty());
    }

    #[test]
    fn price_ascending_puts_banana_first() {
        let catalog = grocery_catalog();
        let query = ProductQuery {
            sort: SortKey::PriceAsc,
            ..ProductQuery::default()
        };

        let names: Vec<String> = query
            .apply(&catalog)
            .into_iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, vec!["Banana".to_string(), "Apple".to_string()]);
    }

    #[test]
    fn name_sort_ignores_case() {
        let catalog = vec![
            product(1, "banana", dec!(1)),
            product(2, "Apple", dec!(2)),
        ];
        let query = ProductQuery {
            sort: SortKey::NameAsc,
            ..ProductQuery::default()
        };

        let names: Vec<String> = query
            .apply(&catalog)
            .into_iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, vec!["Apple".to_string(), "banana".to_string()]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let catalog = vec![
            product(1, "Rice 5kg", dec!(3)),
            product(2, "Beans 2kg", dec!(3)),
            product(3, "Lentils 2kg", dec!(3)),
        ];
        let query = ProductQuery {
            sort: SortKey::PriceAsc,
            ..ProductQuery::default()
        };

        let ids: Vec<u64> = query.apply(&catalog).into_iter().map(|p| p.id).collect();

        assert_eq!(ids, vec![1, 2, 3], "ties keep prior relative order");
    }

    #[test]
    fn sort_key_parses_wire_names() -> TestResult {
        assert_eq!("price_desc".parse::<SortKey>()?, SortKey::PriceDesc);
        assert!("cheapest".parse::<SortKey>().is_err());

        Ok(())
    }
}
