//! Rule and gazetteer based entity recognition for shopping queries.
//!
//! Brands and categories come from the catalogue itself, so the recognizer
//! only knows the names the store can actually filter on. Prices are read
//! from phrases such as "under $500" or "between 100 and 200".

use std::sync::LazyLock;
use regex::{Captures, Regex};
use serde::Serialize;
use crate::document::filters::Filters;
use crate::error::Result;
use crate::preprocessing::lemmatizer::lemmatize;
use crate::preprocessing::tokenizer::is_unit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    Brand,
    Category,
    Color,
    Quantity,
    Price,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub label: EntityLabel,
    pub text: String,
}

const COLORS: &[&str] = &[
    "black", "white", "silver", "gray", "grey", "red", "blue", "green", "yellow", "orange",
    "purple", "pink", "gold", "brown", "beige", "navy", "teal",
];

const AMOUNT: &str =
    r"\$?\s*(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)(?:\s*(?:dollars|usd|bucks))?";

static BETWEEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\bbetween\s+{AMOUNT}\s*(?:and|to|-)\s*{AMOUNT}"))
        .expect("between pattern compiles")
});

static MAX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?:under|below|less than|cheaper than|up to|at most|max(?:imum)?)\s*{AMOUNT}"
    ))
    .expect("max price pattern compiles")
});

static MIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?:over|above|more than|at least|min(?:imum)?|from)\s*{AMOUNT}"
    ))
    .expect("min price pattern compiles")
});

/// Price constraints found in a query and the query with those phrases removed.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceExtraction {
    pub remaining: String,
    pub entities: Vec<Entity>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

pub fn extract_prices(text: &str) -> PriceExtraction {
    let mut remaining = text.to_lowercase();
    let mut entities = Vec::new();
    let mut min_price = None;
    let mut max_price = None;

    for (re, kind) in [(&*BETWEEN_RE, 0u8), (&*MAX_RE, 1), (&*MIN_RE, 2)] {
        let mut spans = Vec::new();
        for caps in re.captures_iter(&remaining) {
            let whole = caps.get(0).map(|m| (m.start(), m.end()));
            let Some((start, end)) = whole else { continue };
            // "under 16gb" and "at least 128 gb" are capacities, not prices.
            if followed_by_unit(&remaining[end..]) {
                continue;
            }
            match kind {
                0 => {
                    let (low, high) = (amount(&caps, 1), amount(&caps, 2));
                    if let (Some(low), Some(high)) = (low, high) {
                        min_price = Some(low.min(high));
                        max_price = Some(low.max(high));
                    }
                }
                1 => max_price = amount(&caps, 1).or(max_price),
                _ => min_price = amount(&caps, 1).or(min_price),
            }
            entities.push(Entity {
                label: EntityLabel::Price,
                text: remaining[start..end].trim().to_string(),
            });
            spans.push((start, end));
        }
        for (start, end) in spans.into_iter().rev() {
            remaining.replace_range(start..end, " ");
        }
    }

    PriceExtraction {
        remaining,
        entities,
        min_price,
        max_price,
    }
}

fn followed_by_unit(rest: &str) -> bool {
    if rest.starts_with(|c: char| c.is_alphanumeric()) {
        return true;
    }
    let word: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_alphanumeric())
        .collect();
    is_unit(&word)
}

fn amount(caps: &Captures, group: usize) -> Option<f64> {
    caps.get(group)
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

struct GazetteerEntry {
    name: String,
    lemma: String,
    pattern: Regex,
}

impl GazetteerEntry {
    fn new(name: &str) -> Result<Self> {
        let lowered = name.to_lowercase();
        let lemma = lowered
            .split_whitespace()
            .map(lemmatize)
            .collect::<Vec<_>>()
            .join(" ");
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&lowered)))?;
        Ok(Self {
            name: name.to_string(),
            lemma,
            pattern,
        })
    }
}

/// Brand and category names known to the catalogue.
#[derive(Default)]
pub struct Gazetteer {
    brands: Vec<GazetteerEntry>,
    categories: Vec<GazetteerEntry>,
}

impl Gazetteer {
    pub fn new(brands: &[String], categories: &[String]) -> Result<Self> {
        let build = |names: &[String]| -> Result<Vec<GazetteerEntry>> {
            names
                .iter()
                .filter(|name| !name.trim().is_empty())
                .map(|name| GazetteerEntry::new(name.trim()))
                .collect()
        };
        Ok(Self {
            brands: build(brands)?,
            categories: build(categories)?,
        })
    }

    pub fn brand_count(&self) -> usize {
        self.brands.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

#[derive(Default)]
pub struct EntityRecognizer {
    gazetteer: Gazetteer,
}

impl EntityRecognizer {
    pub fn new(gazetteer: Gazetteer) -> Self {
        Self { gazetteer }
    }

    /// Finds brand, category, colour and quantity entities. `lemmas` are the
    /// lemmatized keywords of the same text.
    pub fn recognize(&self, text: &str, lemmas: &[String]) -> (Vec<Entity>, Filters) {
        let mut entities = Vec::new();
        let mut filters = Filters::default();

        for brand in &self.gazetteer.brands {
            if brand.pattern.is_match(text) {
                entities.push(Entity {
                    label: EntityLabel::Brand,
                    text: brand.name.clone(),
                });
                filters.brand.get_or_insert_with(|| brand.name.clone());
            }
        }

        for category in &self.gazetteer.categories {
            if category.pattern.is_match(text) || lemmas.contains(&category.lemma) {
                entities.push(Entity {
                    label: EntityLabel::Category,
                    text: category.name.clone(),
                });
                filters.category.get_or_insert_with(|| category.name.clone());
            }
        }

        for lemma in lemmas {
            if COLORS.contains(&lemma.as_str()) {
                entities.push(Entity {
                    label: EntityLabel::Color,
                    text: lemma.clone(),
                });
                filters.color.get_or_insert_with(|| lemma.clone());
            } else if is_quantity(lemma) {
                entities.push(Entity {
                    label: EntityLabel::Quantity,
                    text: lemma.clone(),
                });
            }
        }

        (entities, filters)
    }
}

fn is_quantity(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_digit()) && token.chars().any(char::is_alphabetic)
}
