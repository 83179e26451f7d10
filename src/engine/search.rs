use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::document::filters::Filters;
use crate::document::parser::{Product, ScoredProduct};
use crate::engine::scoring::{FieldWeights, RelevanceScorer};
use crate::error::{Error, Result};
use crate::extractor::{ExtractedQuery, ExtractorKind, ExtractorSet, DEFAULT_TFIDF_TOP_N};
use crate::matrix::TfIdfMatrix;
use crate::preprocessing::entities::{Entity, Gazetteer};
use crate::preprocessing::stop_words::StopWords;
use crate::preprocessing::tokenizer::build_vocabulary;
use crate::store::{ProductStore, SortOrder, StoreQuery};

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_MAX_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Text index first, regex scan when it finds nothing.
    #[default]
    Auto,
    Text,
    Regex,
    Similarity,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Auto => "auto",
            SearchMode::Text => "text",
            SearchMode::Regex => "regex",
            SearchMode::Similarity => "similarity",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(SearchMode::Auto),
            "text" => Ok(SearchMode::Text),
            "regex" => Ok(SearchMode::Regex),
            "similarity" | "cosine" => Ok(SearchMode::Similarity),
            other => Err(Error::InvalidArgument(format!("unknown search mode '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default)]
    pub extractor: ExtractorKind,
    #[serde(default)]
    pub sort: SortOrder,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub extractor: ExtractorKind,
    pub mode: SearchMode,
    pub sort: SortOrder,
    pub keywords: Vec<String>,
    pub entities: Vec<Entity>,
    pub filters: Filters,
    pub count: usize,
    pub results: Vec<ScoredProduct>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogueStats {
    pub product_count: usize,
    pub vocabulary_size: usize,
    pub brands: Vec<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub default_limit: usize,
    pub max_limit: usize,
    pub tfidf_top_n: usize,
    pub weights: FieldWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_LIMIT,
            tfidf_top_n: DEFAULT_TFIDF_TOP_N,
            weights: FieldWeights::default(),
        }
    }
}

/// Keyword extraction, store queries and ranking over one product catalogue.
pub struct SearchEngine {
    store: Box<dyn ProductStore>,
    stop_words: Arc<StopWords>,
    config: EngineConfig,
    catalogue: Vec<Product>,
    matrix: Arc<TfIdfMatrix>,
    extractors: ExtractorSet,
    brands: Vec<String>,
    categories: Vec<String>,
}

impl SearchEngine {
    pub fn new(store: Box<dyn ProductStore>, stop_words: StopWords, config: EngineConfig) -> Result<Self> {
        let stop_words = Arc::new(stop_words);
        let matrix = Arc::new(TfIdfMatrix::build(&[], &Default::default(), &stop_words));
        let extractors = ExtractorSet::new(
            stop_words.clone(),
            matrix.clone(),
            Gazetteer::default(),
            config.tfidf_top_n,
        );
        let mut engine = Self {
            store,
            stop_words,
            config,
            catalogue: Vec::new(),
            matrix,
            extractors,
            brands: Vec::new(),
            categories: Vec::new(),
        };
        engine.reload()?;
        Ok(engine)
    }

    /// Rebuilds vocabulary, TF-IDF matrix and gazetteers from the store.
    pub fn reload(&mut self) -> Result<()> {
        let catalogue = self.store.all()?;
        let brands = self.store.brands()?;
        let categories = self.store.categories()?;

        let terms = build_vocabulary(&catalogue, &self.stop_words);
        let matrix = Arc::new(TfIdfMatrix::build(&catalogue, &terms, &self.stop_words));
        let gazetteer = Gazetteer::new(&brands, &categories)?;

        log::info!(
            "Search index ready: {} products, {} terms, {} brands, {} categories",
            catalogue.len(),
            matrix.vocabulary_size(),
            gazetteer.brand_count(),
            gazetteer.category_count()
        );

        self.extractors = ExtractorSet::new(
            self.stop_words.clone(),
            matrix.clone(),
            gazetteer,
            self.config.tfidf_top_n,
        );
        self.matrix = matrix;
        self.catalogue = catalogue;
        self.brands = brands;
        self.categories = categories;
        Ok(())
    }

    /// Writes products to the store, optionally replacing the catalogue, and reloads.
    pub fn seed(&mut self, products: &[Product], reset: bool) -> Result<usize> {
        if reset {
            self.store.clear()?;
        }
        let written = self.store.insert(products)?;
        self.reload()?;
        Ok(written)
    }

    pub fn extract(&self, kind: ExtractorKind, text: &str) -> ExtractedQuery {
        self.extractors.extract(kind, text)
    }

    pub fn stats(&self) -> CatalogueStats {
        CatalogueStats {
            product_count: self.catalogue.len(),
            vocabulary_size: self.matrix.vocabulary_size(),
            brands: self.brands.clone(),
            categories: self.categories.clone(),
        }
    }

    fn resolve_limit(&self, limit: Option<usize>) -> Result<usize> {
        match limit {
            Some(0) => Err(Error::InvalidArgument("limit must be at least 1".to_string())),
            Some(limit) => Ok(limit.min(self.config.max_limit)),
            None => Ok(self.config.default_limit.min(self.config.max_limit)),
        }
    }

    pub fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(Error::InvalidQuery("query must not be empty".to_string()));
        }
        let limit = self.resolve_limit(request.limit)?;

        let extracted = self.extract(request.extractor, query);
        log::debug!(
            "Query {:?} -> keywords {:?} (extractor {})",
            query,
            extracted.keywords,
            request.extractor
        );

        let keywords = &extracted.keywords;
        let filters = &extracted.filters;
        let (mode, results) = match request.mode {
            SearchMode::Auto => {
                let results = self.text_search(keywords, filters, request.sort, limit)?;
                if results.is_empty() {
                    log::debug!("Text index found nothing for {:?}, trying regex scan", query);
                    (
                        SearchMode::Regex,
                        self.regex_search(keywords, filters, request.sort, limit)?,
                    )
                } else {
                    (SearchMode::Text, results)
                }
            }
            SearchMode::Text => (
                SearchMode::Text,
                self.text_search(keywords, filters, request.sort, limit)?,
            ),
            SearchMode::Regex => (
                SearchMode::Regex,
                self.regex_search(keywords, filters, request.sort, limit)?,
            ),
            SearchMode::Similarity => (
                SearchMode::Similarity,
                self.similarity_search(keywords, filters, request.sort, limit),
            ),
        };

        log::info!("Search {:?} ({}) returned {} products", query, mode, results.len());

        Ok(SearchResponse {
            query: query.to_string(),
            extractor: request.extractor,
            mode,
            sort: request.sort,
            keywords: extracted.keywords.clone(),
            entities: extracted.entities.clone(),
            filters: extracted.filters.clone(),
            count: results.len(),
            results,
        })
    }

    fn text_search(
        &self,
        keywords: &[String],
        filters: &Filters,
        sort: SortOrder,
        limit: usize,
    ) -> Result<Vec<ScoredProduct>> {
        self.store.text_search(&StoreQuery {
            keywords,
            filters,
            sort,
            limit,
        })
    }

    fn regex_search(
        &self,
        keywords: &[String],
        filters: &Filters,
        sort: SortOrder,
        limit: usize,
    ) -> Result<Vec<ScoredProduct>> {
        let candidates = self.store.candidates(keywords, filters)?;
        let scorer = RelevanceScorer::new(keywords, self.config.weights)?;
        let mut results = scorer.rank(candidates);
        sort.apply(&mut results);
        results.truncate(limit);
        Ok(results)
    }

    fn similarity_search(
        &self,
        keywords: &[String],
        filters: &Filters,
        sort: SortOrder,
        limit: usize,
    ) -> Vec<ScoredProduct> {
        let mut results: Vec<ScoredProduct> = self
            .matrix
            .similarities(keywords)
            .into_iter()
            .filter_map(|(idx, score)| {
                let product = self.catalogue.get(idx)?;
                filters.accepts(product).then(|| ScoredProduct {
                    product: product.clone(),
                    score,
                })
            })
            .collect();
        sort.apply(&mut results);
        results.truncate(limit);
        results
    }
}
