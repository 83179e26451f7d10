use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
}

impl Product {
    /// Text the vocabulary and similarity search are built from.
    pub fn full_text(&self) -> String {
        format!("{} {} {} {}", self.name, self.brand, self.category, self.description)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    pub score: f64,
}

/// Parses a JSON array of products. Entries without a usable name or with a
/// negative price are rejected so a bad catalogue fails before it is stored.
pub fn parse_catalogue(content: &str) -> Result<Vec<Product>> {
    let products: Vec<Product> = serde_json::from_str(content)?;

    for (i, product) in products.iter().enumerate() {
        if product.name.trim().is_empty() {
            return Err(Error::InvalidArgument(format!("product #{} has no name", i)));
        }
        if !product.price.is_finite() || product.price < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "product '{}' has invalid price {}",
                product.name, product.price
            )));
        }
    }

    Ok(products)
}

pub fn load_catalogue(path: &Path) -> Result<Vec<Product>> {
    let content = fs::read_to_string(path)?;
    let products = parse_catalogue(&content)?;
    log::info!("Loaded {} products from {}", products.len(), path.display());
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_products_with_optional_fields() {
        let json = r#"[
            {"name": "Trail Runner", "brand": "Stride", "price": 89.5},
            {"id": 7, "name": "Desk Lamp", "category": "Lighting", "description": "LED", "price": 20, "rating": 4.1}
        ]"#;
        let products = parse_catalogue(json).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, 0);
        assert_eq!(products[0].category, "");
        assert_eq!(products[1].id, 7);
        assert_eq!(products[1].rating, 4.1);
    }

    #[test]
    fn rejects_nameless_and_negative_price() {
        assert!(matches!(
            parse_catalogue(r#"[{"name": "  ", "price": 1}]"#),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_catalogue(r#"[{"name": "Cable", "price": -3}]"#),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(parse_catalogue("{"), Err(Error::Json(_))));
    }

    #[test]
    fn loads_catalogue_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "Mouse", "brand": "Logi", "price": 25}}]"#).unwrap();
        let products = load_catalogue(file.path()).unwrap();
        assert_eq!(products[0].brand, "Logi");
    }

    #[test]
    fn scored_product_serializes_flat() {
        let scored = ScoredProduct {
            product: Product {
                id: 1,
                name: "Mouse".into(),
                brand: "Logi".into(),
                category: "Accessories".into(),
                description: String::new(),
                price: 25.0,
                rating: 4.0,
            },
            score: 2.5,
        };
        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["name"], "Mouse");
        assert_eq!(value["score"], 2.5);
    }
}
