use std::sync::Arc;
use crate::extractor::{ExtractedQuery, ExtractorKind, KeywordExtractor};
use crate::preprocessing::stop_words::StopWords;
use crate::preprocessing::tokenizer::{content_tokens, merge_numbers, merge_quantities};

/// Tokenize, drop stop words and punctuation, join numbers with the next token.
#[derive(Clone)]
pub struct BasicExtractor {
    stop_words: Arc<StopWords>,
}

impl BasicExtractor {
    pub fn new(stop_words: Arc<StopWords>) -> Self {
        Self { stop_words }
    }

    pub fn keywords(&self, text: &str) -> Vec<String> {
        merge_numbers(content_tokens(text, &self.stop_words))
    }

    /// Like [`keywords`](Self::keywords) but a number only absorbs a unit,
    /// the way catalogue text is indexed.
    pub fn quantity_keywords(&self, text: &str) -> Vec<String> {
        merge_quantities(content_tokens(text, &self.stop_words))
    }
}

impl KeywordExtractor for BasicExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Basic
    }

    fn extract(&self, text: &str) -> ExtractedQuery {
        ExtractedQuery::from_keywords(self.keywords(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> BasicExtractor {
        BasicExtractor::new(Arc::new(StopWords::english()))
    }

    #[test]
    fn extracts_product_terms() {
        let keywords = extractor().keywords("I'm looking for a laptop with 16 GB RAM and a 512 GB SSD");
        assert_eq!(keywords, vec!["laptop", "16gb", "ram", "512gb", "ssd"]);
    }

    #[test]
    fn numbers_absorb_the_next_keyword() {
        let basic = extractor();
        assert_eq!(basic.keywords("500 16 GB"), vec!["50016", "gb"]);
        assert_eq!(basic.keywords("2 cases for a phone"), vec!["2cases", "phone"]);
        assert_eq!(basic.quantity_keywords("500 16 GB"), vec!["500", "16gb"]);
        assert_eq!(basic.quantity_keywords("2 cases"), vec!["2", "cases"]);
    }

    #[test]
    fn keeps_duplicates_and_order() {
        let keywords = extractor().keywords("Blue shirt, blue jeans");
        assert_eq!(keywords, vec!["blue", "shirt", "blue", "jeans"]);
    }

    #[test]
    fn drops_non_alphanumeric_tokens() {
        let keywords = extractor().keywords("wi-fi camera rated 4.5 stars!!!");
        assert_eq!(keywords, vec!["camera", "rated", "stars"]);
    }

    #[test]
    fn empty_and_stop_word_only_queries() {
        assert!(extractor().keywords("").is_empty());
        assert!(extractor().keywords("I want it with the").is_empty());
    }

    #[test]
    fn extract_carries_no_entities() {
        let extracted = extractor().extract("sony headphones");
        assert_eq!(extracted.keywords, vec!["sony", "headphones"]);
        assert!(extracted.entities.is_empty());
        assert!(extracted.filters.is_empty());
    }
}
