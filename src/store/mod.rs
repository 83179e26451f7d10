//! Product persistence and the two index queries the search engine runs:
//! a full-text query with sort and limit, and a substring prefilter whose
//! hits are ranked by the regex scorer.

pub mod sqlite;

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::document::filters::Filters;
use crate::document::parser::{Product, ScoredProduct};
use crate::error::{Error, Result};

pub use sqlite::SqliteStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Rating,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::PriceAsc => "price_asc",
            SortOrder::PriceDesc => "price_desc",
            SortOrder::Rating => "rating",
        }
    }

    /// Sorts scored products in place. Ties fall back to score, then id.
    pub fn apply(&self, results: &mut [ScoredProduct]) {
        results.sort_by(|a, b| {
            let primary = match self {
                SortOrder::Relevance => b
                    .score
                    .total_cmp(&a.score)
                    .then(b.product.rating.total_cmp(&a.product.rating)),
                SortOrder::PriceAsc => a.product.price.total_cmp(&b.product.price),
                SortOrder::PriceDesc => b.product.price.total_cmp(&a.product.price),
                SortOrder::Rating => b.product.rating.total_cmp(&a.product.rating),
            };
            primary
                .then(b.score.total_cmp(&a.score))
                .then(a.product.id.cmp(&b.product.id))
        });
    }

    fn sql(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "score DESC, p.rating DESC, p.id ASC",
            SortOrder::PriceAsc => "p.price ASC, score DESC, p.id ASC",
            SortOrder::PriceDesc => "p.price DESC, score DESC, p.id ASC",
            SortOrder::Rating => "p.rating DESC, score DESC, p.id ASC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "relevance" | "score" => Ok(SortOrder::Relevance),
            "price_asc" | "price" => Ok(SortOrder::PriceAsc),
            "price_desc" => Ok(SortOrder::PriceDesc),
            "rating" => Ok(SortOrder::Rating),
            other => Err(Error::InvalidArgument(format!("unknown sort order '{}'", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreQuery<'a> {
    pub keywords: &'a [String],
    pub filters: &'a Filters,
    pub sort: SortOrder,
    pub limit: usize,
}

pub trait ProductStore: Send {
    /// Stores the products and returns how many were written. Products with
    /// a positive id replace any stored product with that id.
    fn insert(&mut self, products: &[Product]) -> Result<usize>;

    fn clear(&mut self) -> Result<()>;

    fn count(&self) -> Result<usize>;

    fn all(&self) -> Result<Vec<Product>>;

    fn brands(&self) -> Result<Vec<String>>;

    fn categories(&self) -> Result<Vec<String>>;

    fn text_search(&self, query: &StoreQuery) -> Result<Vec<ScoredProduct>>;

    /// Products where any searchable field contains any keyword.
    fn candidates(&self, keywords: &[String], filters: &Filters) -> Result<Vec<Product>>;
}
