use std::sync::Arc;
use crate::extractor::{BasicExtractor, ExtractedQuery, ExtractorKind, KeywordExtractor};
use crate::matrix::TfIdfMatrix;

/// Keeps the `top_n` basic keywords that carry the most TF-IDF weight
/// against the catalogue.
pub struct TfIdfExtractor {
    basic: BasicExtractor,
    matrix: Arc<TfIdfMatrix>,
    top_n: usize,
}

impl TfIdfExtractor {
    pub fn new(basic: BasicExtractor, matrix: Arc<TfIdfMatrix>, top_n: usize) -> Self {
        Self {
            basic,
            matrix,
            top_n: top_n.max(1),
        }
    }

    pub fn keywords(&self, text: &str) -> Vec<String> {
        let keywords = self.basic.quantity_keywords(text);
        if self.matrix.n_docs() == 0 {
            return keywords;
        }

        let mut weights = self.matrix.weigh(&keywords);
        if weights.is_empty() {
            log::debug!("No query keyword is in the catalogue vocabulary, keeping {:?}", keywords);
            return keywords;
        }

        // Stable: equal weights stay in query order.
        weights.sort_by(|a, b| b.1.total_cmp(&a.1));
        weights
            .into_iter()
            .take(self.top_n)
            .map(|(keyword, _)| keyword)
            .collect()
    }
}

impl KeywordExtractor for TfIdfExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Tfidf
    }

    fn extract(&self, text: &str) -> ExtractedQuery {
        ExtractedQuery::from_keywords(self.keywords(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::Product;
    use crate::preprocessing::stop_words::StopWords;
    use crate::preprocessing::tokenizer::build_vocabulary;

    fn product(name: &str) -> Product {
        Product {
            id: 0,
            name: name.into(),
            brand: String::new(),
            category: String::new(),
            description: String::new(),
            price: 1.0,
            rating: 0.0,
        }
    }

    fn extractor(products: &[Product], top_n: usize) -> TfIdfExtractor {
        let stop_words = Arc::new(StopWords::english());
        let terms = build_vocabulary(products, &stop_words);
        let matrix = Arc::new(TfIdfMatrix::build(products, &terms, &stop_words));
        TfIdfExtractor::new(BasicExtractor::new(stop_words), matrix, top_n)
    }

    #[test]
    fn keeps_heaviest_known_keywords() {
        let products = vec![
            product("wireless mouse"),
            product("wireless keyboard"),
            product("wireless charger"),
            product("ergonomic keyboard"),
        ];
        let extractor = extractor(&products, 2);
        // "wireless" is everywhere, "mouse" is rare, "cheap" is unknown.
        assert_eq!(
            extractor.keywords("cheap wireless ergonomic mouse"),
            vec!["ergonomic", "mouse"]
        );
    }

    #[test]
    fn falls_back_to_basic_keywords() {
        let extractor = extractor(&[product("desk lamp")], 5);
        assert_eq!(extractor.keywords("gaming chair"), vec!["gaming", "chair"]);

        let empty = extractor_for_empty();
        assert_eq!(empty.keywords("gaming chair"), vec!["gaming", "chair"]);
    }

    fn extractor_for_empty() -> TfIdfExtractor {
        extractor(&[], 5)
    }
}
