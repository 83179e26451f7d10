use regex::{Regex, RegexBuilder};
use crate::document::parser::{Product, ScoredProduct};
use crate::error::Result;

/// Static per-field weights for keyword hits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    pub name: f64,
    pub brand: f64,
    pub category: f64,
    pub description: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 3.0,
            brand: 2.0,
            category: 2.0,
            description: 1.0,
        }
    }
}

/// Scores a product by counting case-insensitive keyword occurrences in each
/// field and weighting them by field.
pub struct RelevanceScorer {
    patterns: Vec<Regex>,
    weights: FieldWeights,
}

impl RelevanceScorer {
    pub fn new(keywords: &[String], weights: FieldWeights) -> Result<Self> {
        let patterns = keywords
            .iter()
            .filter(|k| !k.is_empty())
            .map(|k| {
                RegexBuilder::new(&regex::escape(k))
                    .case_insensitive(true)
                    .build()
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns, weights })
    }

    pub fn score(&self, product: &Product) -> f64 {
        let fields = [
            (&product.name, self.weights.name),
            (&product.brand, self.weights.brand),
            (&product.category, self.weights.category),
            (&product.description, self.weights.description),
        ];

        self.patterns
            .iter()
            .map(|re| {
                fields
                    .iter()
                    .map(|(text, weight)| re.find_iter(text).count() as f64 * weight)
                    .sum::<f64>()
            })
            .sum()
    }

    /// Scores every product and drops the ones no keyword hit.
    pub fn rank(&self, products: Vec<Product>) -> Vec<ScoredProduct> {
        products
            .into_iter()
            .filter_map(|product| {
                let score = self.score(&product);
                (score > 0.0).then_some(ScoredProduct { product, score })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, brand: &str, category: &str, description: &str) -> Product {
        Product {
            id: 1,
            name: name.into(),
            brand: brand.into(),
            category: category.into(),
            description: description.into(),
            price: 10.0,
            rating: 4.0,
        }
    }

    fn scorer(keywords: &[&str]) -> RelevanceScorer {
        let keywords: Vec<String> = keywords.iter().map(|s| s.to_string()).collect();
        RelevanceScorer::new(&keywords, FieldWeights::default()).unwrap()
    }

    #[test]
    fn weights_hits_by_field() {
        let p = product("Laptop Stand", "Laptopia", "Accessories", "Stand for any laptop, laptop riser");
        // name 1x3 + brand 1x2 (substring) + description 2x1
        assert_eq!(scorer(&["laptop"]).score(&p), 7.0);
        assert_eq!(scorer(&["LAPTOP", "stand"]).score(&p), 7.0 + 3.0 + 1.0);
    }

    #[test]
    fn keywords_are_literal_not_patterns() {
        let p = product("USB-C Hub", "", "", "works with c++ tools");
        assert_eq!(scorer(&["c++"]).score(&p), 1.0);
        assert_eq!(scorer(&[".*"]).score(&p), 0.0);
    }

    #[test]
    fn rank_drops_misses() {
        let products = vec![
            product("Desk Lamp", "", "Lighting", ""),
            product("Gaming Mouse", "", "Accessories", "RGB mouse"),
        ];
        let ranked = scorer(&["mouse"]).rank(products);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].product.name, "Gaming Mouse");
        assert_eq!(ranked[0].score, 4.0);
    }

    #[test]
    fn custom_weights() {
        let weights = FieldWeights {
            name: 10.0,
            ..FieldWeights::default()
        };
        let keywords = vec!["lamp".to_string()];
        let scorer = RelevanceScorer::new(&keywords, weights).unwrap();
        assert_eq!(scorer.score(&product("Lamp", "", "", "lamp")), 11.0);
    }
}
