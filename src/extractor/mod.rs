//! Keyword extraction strategies.
//!
//! Every extractor turns a free-text query into an [`ExtractedQuery`]. They
//! build on each other: `lemma` and `tfidf` post-process the `basic`
//! keywords, `entities` runs price and gazetteer recognition first.

pub mod basic;
pub mod entities;
pub mod lemma;
pub mod tfidf;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::document::filters::Filters;
use crate::error::Error;
use crate::matrix::TfIdfMatrix;
use crate::preprocessing::entities::{Entity, EntityRecognizer, Gazetteer};
use crate::preprocessing::stop_words::StopWords;

pub use basic::BasicExtractor;
pub use entities::EntityExtractor;
pub use lemma::LemmaExtractor;
pub use tfidf::TfIdfExtractor;

pub const DEFAULT_TFIDF_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    #[default]
    Basic,
    Tfidf,
    Lemma,
    Entities,
}

impl ExtractorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractorKind::Basic => "basic",
            ExtractorKind::Tfidf => "tfidf",
            ExtractorKind::Lemma => "lemma",
            ExtractorKind::Entities => "entities",
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(ExtractorKind::Basic),
            "tfidf" | "tf-idf" => Ok(ExtractorKind::Tfidf),
            "lemma" => Ok(ExtractorKind::Lemma),
            "entities" | "ner" => Ok(ExtractorKind::Entities),
            other => Err(Error::InvalidArgument(format!("unknown extractor '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedQuery {
    pub keywords: Vec<String>,
    pub entities: Vec<Entity>,
    pub filters: Filters,
}

impl ExtractedQuery {
    pub fn from_keywords(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            ..Self::default()
        }
    }
}

pub trait KeywordExtractor: Send + Sync {
    fn kind(&self) -> ExtractorKind;

    fn extract(&self, text: &str) -> ExtractedQuery;
}

/// One extractor of each kind, sharing the stop words and catalogue statistics.
pub struct ExtractorSet {
    basic: BasicExtractor,
    lemma: LemmaExtractor,
    tfidf: TfIdfExtractor,
    entities: EntityExtractor,
}

impl ExtractorSet {
    pub fn new(
        stop_words: Arc<StopWords>,
        matrix: Arc<TfIdfMatrix>,
        gazetteer: Gazetteer,
        tfidf_top_n: usize,
    ) -> Self {
        let basic = BasicExtractor::new(stop_words);
        Self {
            lemma: LemmaExtractor::new(basic.clone()),
            tfidf: TfIdfExtractor::new(basic.clone(), matrix, tfidf_top_n),
            entities: EntityExtractor::new(
                LemmaExtractor::new(basic.clone()),
                EntityRecognizer::new(gazetteer),
            ),
            basic,
        }
    }

    pub fn get(&self, kind: ExtractorKind) -> &dyn KeywordExtractor {
        match kind {
            ExtractorKind::Basic => &self.basic,
            ExtractorKind::Tfidf => &self.tfidf,
            ExtractorKind::Lemma => &self.lemma,
            ExtractorKind::Entities => &self.entities,
        }
    }

    pub fn extract(&self, kind: ExtractorKind, text: &str) -> ExtractedQuery {
        self.get(kind).extract(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn kind_parses_aliases_and_rejects_unknown() {
        assert_eq!("TF-IDF".parse::<ExtractorKind>().unwrap(), ExtractorKind::Tfidf);
        assert_eq!("ner".parse::<ExtractorKind>().unwrap(), ExtractorKind::Entities);
        assert_eq!(" lemma ".parse::<ExtractorKind>().unwrap(), ExtractorKind::Lemma);
        assert!(matches!(
            "bert".parse::<ExtractorKind>(),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(ExtractorKind::default().to_string(), "basic");
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&ExtractorKind::Entities).unwrap();
        assert_eq!(json, "\"entities\"");
        let kind: ExtractorKind = serde_json::from_str("\"tfidf\"").unwrap();
        assert_eq!(kind, ExtractorKind::Tfidf);
    }

    #[test]
    fn set_dispatches_by_kind() {
        let stop_words = Arc::new(StopWords::english());
        let matrix = Arc::new(TfIdfMatrix::build(&[], &HashMap::new(), &stop_words));
        let set = ExtractorSet::new(stop_words, matrix, Gazetteer::default(), 5);

        for kind in [
            ExtractorKind::Basic,
            ExtractorKind::Tfidf,
            ExtractorKind::Lemma,
            ExtractorKind::Entities,
        ] {
            assert_eq!(set.get(kind).kind(), kind);
        }
        assert_eq!(set.extract(ExtractorKind::Lemma, "red phones").keywords, vec!["red", "phone"]);
    }
}
