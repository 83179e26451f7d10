use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use regex::Regex;
use crate::document::parser::Product;
use crate::preprocessing::stop_words::StopWords;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Alphabetic}\p{N}]+(?:[./-][\p{Alphabetic}\p{N}]+)*|\S")
        .expect("word pattern compiles")
});

/// Lowercases `text` and splits it into words and single punctuation marks.
/// Inner `.`, `-` and `/` keep a word together (`4.5`, `wi-fi`), apostrophes
/// do not (`don't` -> `don`, `'`, `t`).
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn is_alnum(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric)
}

pub fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Units a number can be read with, lowercase.
const UNITS: &[&str] = &[
    "kb", "mb", "gb", "tb", "hz", "khz", "mhz", "ghz", "mah", "w", "kw", "v", "mp", "k", "p",
    "mm", "cm", "m", "in", "inch", "inches", "ft", "g", "kg", "lb", "lbs", "oz", "ml", "l",
    "core", "cores", "fps", "rpm", "pack", "pcs", "pc",
];

pub fn is_unit(token: &str) -> bool {
    UNITS.contains(&token)
}

/// Joins every number with whatever token follows it (`500`, `16`, `gb` ->
/// `50016`, `gb`). This is the merge the `basic` extractor applies.
pub fn merge_numbers(tokens: Vec<String>) -> Vec<String> {
    let mut merged = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        if is_numeric(&token) {
            if let Some(next) = iter.next() {
                merged.push(format!("{}{}", token, next));
                continue;
            }
        }
        merged.push(token);
    }

    merged
}

/// Joins a number with the unit that follows it (`16`, `gb` -> `16gb`).
/// A number followed by anything other than a unit is left alone.
pub fn merge_quantities(tokens: Vec<String>) -> Vec<String> {
    let mut merged = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if is_numeric(&token) {
            if let Some(unit) = iter.next_if(|next| is_unit(next)) {
                merged.push(format!("{}{}", token, unit));
                continue;
            }
        }
        merged.push(token);
    }

    merged
}

/// Alphanumeric, non-stop-word tokens of `text` in order.
pub fn content_tokens(text: &str, stop_words: &StopWords) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|token| is_alnum(token) && !stop_words.contains(token))
        .collect()
}

/// Sorted term -> column index map over the whole catalogue.
pub fn build_vocabulary(products: &[Product], stop_words: &StopWords) -> HashMap<String, usize> {
    let mut terms = HashSet::new();

    for product in products {
        let tokens = merge_quantities(content_tokens(&product.full_text(), stop_words));
        terms.extend(tokens);
    }

    let mut term_list: Vec<String> = terms.into_iter().collect();
    term_list.sort();
    term_list
        .into_iter()
        .enumerate()
        .map(|(i, term)| (term, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_punctuation_and_keeps_inner_separators() {
        assert_eq!(
            tokenize("Wi-Fi router, 4.5 stars!"),
            strings(&["wi-fi", "router", ",", "4.5", "stars", "!"])
        );
        assert_eq!(tokenize("I don't"), strings(&["i", "don", "'", "t"]));
        assert_eq!(tokenize("$500"), strings(&["$", "500"]));
    }

    #[test]
    fn alnum_rejects_punctuation_and_decimals() {
        assert!(is_alnum("16gb"));
        assert!(!is_alnum("4.5"));
        assert!(!is_alnum("wi-fi"));
        assert!(!is_alnum(""));
    }

    #[test]
    fn merges_number_with_following_unit() {
        assert_eq!(
            merge_quantities(strings(&["laptop", "16", "gb", "ram"])),
            strings(&["laptop", "16gb", "ram"])
        );
    }

    #[test]
    fn leaves_numbers_without_units() {
        assert_eq!(
            merge_quantities(strings(&["500", "16", "gb"])),
            strings(&["500", "16gb"])
        );
        assert_eq!(
            merge_quantities(strings(&["2", "cases"])),
            strings(&["2", "cases"])
        );
        assert_eq!(merge_quantities(strings(&["tv", "55"])), strings(&["tv", "55"]));
    }

    #[test]
    fn merge_numbers_joins_any_following_token() {
        assert_eq!(
            merge_numbers(strings(&["500", "16", "gb"])),
            strings(&["50016", "gb"])
        );
        assert_eq!(
            merge_numbers(strings(&["laptop", "16", "gb", "ram"])),
            strings(&["laptop", "16gb", "ram"])
        );
        assert_eq!(merge_numbers(strings(&["2", "cases"])), strings(&["2cases"]));
        assert_eq!(merge_numbers(strings(&["tv", "55"])), strings(&["tv", "55"]));
    }

    #[test]
    fn content_tokens_drop_stop_words() {
        let stop_words = StopWords::english();
        assert_eq!(
            content_tokens("I need a laptop with 16 GB of RAM!", &stop_words),
            strings(&["laptop", "16", "gb", "ram"])
        );
    }

    #[test]
    fn vocabulary_is_sorted_and_indexed() {
        let products = vec![Product {
            id: 1,
            name: "Gaming Laptop".into(),
            brand: "Acme".into(),
            category: "Laptops".into(),
            description: "16 GB memory".into(),
            price: 999.0,
            rating: 4.5,
        }];
        let vocabulary = build_vocabulary(&products, &StopWords::english());
        assert_eq!(vocabulary["16gb"], 0);
        assert_eq!(vocabulary["acme"], 1);
        assert_eq!(vocabulary["gaming"], 2);
        assert_eq!(vocabulary.len(), 6);
    }
}
