use crate::extractor::{ExtractedQuery, ExtractorKind, KeywordExtractor, LemmaExtractor};
use crate::preprocessing::entities::{extract_prices, EntityRecognizer};

/// Price phrases become filters and are removed, the rest is lemmatized and
/// matched against the catalogue's brands and categories.
pub struct EntityExtractor {
    lemma: LemmaExtractor,
    recognizer: EntityRecognizer,
}

impl EntityExtractor {
    pub fn new(lemma: LemmaExtractor, recognizer: EntityRecognizer) -> Self {
        Self { lemma, recognizer }
    }
}

impl KeywordExtractor for EntityExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Entities
    }

    fn extract(&self, text: &str) -> ExtractedQuery {
        let prices = extract_prices(text);
        let keywords = self.lemma.keywords(&prices.remaining);
        let (found, mut filters) = self.recognizer.recognize(&prices.remaining, &keywords);

        filters.min_price = prices.min_price;
        filters.max_price = prices.max_price;

        let mut entities = prices.entities;
        entities.extend(found);

        ExtractedQuery {
            keywords,
            entities,
            filters,
        }
    }
}
