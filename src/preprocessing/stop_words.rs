use std::collections::HashSet;
use std::fs;
use std::path::Path;
use crate::error::Result;

const ENGLISH: &str = include_str!("../../stop_words/english.txt");

/// Words that carry no product meaning in a shopping query.
pub const PRODUCT_SEARCH_ADDITIONS: &[&str] = &[
    "need", "want", "looking", "for", "with", "has", "have", "a", "an", "the", "and", "or", "but",
];

#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Bundled English list plus the product-search additions.
    pub fn english() -> Self {
        Self::from_list(ENGLISH)
    }

    pub fn from_list(content: &str) -> Self {
        let mut words: HashSet<String> = content
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();
        words.extend(PRODUCT_SEARCH_ADDITIONS.iter().map(|w| w.to_string()));
        Self { words }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let stop_words = Self::from_list(&content);
        log::info!("Loaded {} stop words from {}", stop_words.len(), path.display());
        Ok(stop_words)
    }

    /// Falls back to the bundled list when `path` is absent or unreadable.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path).unwrap_or_else(|err| {
                log::warn!(
                    "Could not load stop words from {}: {}. Using the bundled English list.",
                    path.display(),
                    err
                );
                Self::english()
            }),
            None => Self::english(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn english_list_includes_additions() {
        let stop_words = StopWords::english();
        assert!(stop_words.contains("the"));
        assert!(stop_words.contains("under"));
        assert!(stop_words.contains("need"));
        assert!(stop_words.contains("looking"));
        assert!(!stop_words.contains("laptop"));
        assert_eq!(stop_words.len(), 179 + 3);
    }

    #[test]
    fn custom_list_is_trimmed_and_lowercased() {
        let stop_words = StopWords::from_list("  Cheap \n\nBEST\n");
        assert!(stop_words.contains("cheap"));
        assert!(stop_words.contains("best"));
        assert!(stop_words.contains("want"));
        assert!(stop_words.contains("the"));
        assert!(!stop_words.contains("is"));
        assert!(!stop_words.contains("of"));
    }

    #[test]
    fn loads_from_file_and_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "gadget").unwrap();
        let stop_words = StopWords::load_or_default(Some(file.path()));
        assert!(stop_words.contains("gadget"));

        let missing = StopWords::load_or_default(Some(Path::new("/nonexistent/stop.txt")));
        assert!(missing.contains("the"));
    }
}
