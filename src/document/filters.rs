use serde::{Deserialize, Serialize};
use crate::document::parser::Product;

/// Structured constraints recovered from a query. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        *self == Filters::default()
    }

    pub fn accepts(&self, product: &Product) -> bool {
        if let Some(brand) = &self.brand {
            if !product.brand.eq_ignore_ascii_case(brand) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !product.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(color) = &self.color {
            let color = color.to_lowercase();
            if !product.name.to_lowercase().contains(&color)
                && !product.description.to_lowercase().contains(&color)
            {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headphones() -> Product {
        Product {
            id: 3,
            name: "Black Wireless Headphones".into(),
            brand: "Sony".into(),
            category: "Audio".into(),
            description: "Noise cancelling over-ear headphones".into(),
            price: 199.99,
            rating: 4.6,
        }
    }

    #[test]
    fn empty_filters_accept_everything() {
        assert!(Filters::default().is_empty());
        assert!(Filters::default().accepts(&headphones()));
    }

    #[test]
    fn brand_and_category_ignore_case() {
        let filters = Filters {
            brand: Some("sony".into()),
            category: Some("AUDIO".into()),
            ..Filters::default()
        };
        assert!(filters.accepts(&headphones()));
        let filters = Filters { brand: Some("bose".into()), ..Filters::default() };
        assert!(!filters.accepts(&headphones()));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let filters = Filters {
            min_price: Some(199.99),
            max_price: Some(199.99),
            ..Filters::default()
        };
        assert!(filters.accepts(&headphones()));
        let filters = Filters { max_price: Some(150.0), ..Filters::default() };
        assert!(!filters.accepts(&headphones()));
    }

    #[test]
    fn color_matches_name_or_description() {
        let filters = Filters { color: Some("black".into()), ..Filters::default() };
        assert!(filters.accepts(&headphones()));
        let filters = Filters { color: Some("red".into()), ..Filters::default() };
        assert!(!filters.accepts(&headphones()));
    }
}
