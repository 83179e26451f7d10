use crate::extractor::{BasicExtractor, ExtractedQuery, ExtractorKind, KeywordExtractor};
use crate::preprocessing::lemmatizer::lemmatize_all;

/// Unit-merged keywords reduced to singular nouns, repeats removed.
#[derive(Clone)]
pub struct LemmaExtractor {
    basic: BasicExtractor,
}

impl LemmaExtractor {
    pub fn new(basic: BasicExtractor) -> Self {
        Self { basic }
    }

    pub fn keywords(&self, text: &str) -> Vec<String> {
        lemmatize_all(&self.basic.quantity_keywords(text))
    }
}

impl KeywordExtractor for LemmaExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Lemma
    }

    fn extract(&self, text: &str) -> ExtractedQuery {
        ExtractedQuery::from_keywords(self.keywords(text))
    }
}
