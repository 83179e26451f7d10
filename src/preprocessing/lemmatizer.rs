use crate::preprocessing::tokenizer::is_numeric;

const EXCEPTIONS: &[(&str, &str)] = &[
    ("mice", "mouse"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("people", "person"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("shelves", "shelf"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("series", "series"),
    ("species", "species"),
    ("headphones", "headphones"),
    ("earbuds", "earbuds"),
    ("glasses", "glasses"),
    ("jeans", "jeans"),
    ("pants", "pants"),
    ("shorts", "shorts"),
];

// Checked in order, first match wins.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("sses", "ss"),
    ("ies", "y"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("zes", "z"),
];

const KEEP_ENDINGS: &[&str] = &["ss", "us", "is"];

/// Reduces a plural noun to its singular form. Numbers and quantities
/// (`16gb`) pass through untouched.
pub fn lemmatize(word: &str) -> String {
    if is_numeric(word) || word.starts_with(|c: char| c.is_ascii_digit()) {
        return word.to_string();
    }

    if let Some((_, lemma)) = EXCEPTIONS.iter().find(|(form, _)| *form == word) {
        return lemma.to_string();
    }

    if word.chars().count() < 4 {
        return word.to_string();
    }

    for (suffix, replacement) in SUFFIX_RULES {
        if let Some(stem) = word.strip_suffix(suffix) {
            if has_vowel(stem) {
                return format!("{}{}", stem, replacement);
            }
        }
    }

    if KEEP_ENDINGS.iter().any(|ending| word.ends_with(ending)) {
        return word.to_string();
    }

    match word.strip_suffix('s') {
        Some(stem) if has_vowel(stem) => stem.to_string(),
        _ => word.to_string(),
    }
}

fn has_vowel(stem: &str) -> bool {
    stem.chars().any(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y'))
}

/// Lemmatizes every keyword and drops repeats, keeping first occurrences.
pub fn lemmatize_all(keywords: &[String]) -> Vec<String> {
    let mut lemmas: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let lemma = lemmatize(keyword);
        if !lemmas.contains(&lemma) {
            lemmas.push(lemma);
        }
    }
    lemmas
}
