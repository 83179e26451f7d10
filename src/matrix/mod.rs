use std::collections::{BTreeMap, HashMap, HashSet};
use sprs::{CsMat, CsVec, TriMat};
use crate::document::parser::Product;
use crate::preprocessing::stop_words::StopWords;
use crate::preprocessing::tokenizer::{content_tokens, merge_quantities};

/// Term x product TF-IDF weights. Each product column is L2-normalized.
pub struct TfIdfMatrix {
    pub terms: HashMap<String, usize>,
    pub matrix: CsMat<f64>,
    pub idf: Vec<f64>,
    n_docs: usize,
}

/// Smoothed inverse document frequency, never below 1.
fn smooth_idf(n_docs: usize, df: usize) -> f64 {
    ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0
}

impl TfIdfMatrix {
    pub fn build(products: &[Product], terms: &HashMap<String, usize>, stop_words: &StopWords) -> Self {
        let n_docs = products.len();
        let n_terms = terms.len();

        let mut df = vec![0usize; n_terms];
        let mut triplets = Vec::new(); // (term_index, doc_index, tf)

        for (doc_index, product) in products.iter().enumerate() {
            let mut term_counts = HashMap::new();
            let mut seen_terms = HashSet::new();
            let mut total_terms = 0;

            for token in merge_quantities(content_tokens(&product.full_text(), stop_words)) {
                if let Some(&term_index) = terms.get(&token) {
                    *term_counts.entry(term_index).or_insert(0) += 1;
                    if seen_terms.insert(term_index) {
                        df[term_index] += 1;
                    }
                    total_terms += 1;
                }
            }

            for (term_index, count) in term_counts {
                let tf = count as f64 / total_terms as f64;
                triplets.push((term_index, doc_index, tf));
            }
        }

        let idf: Vec<f64> = df.iter().map(|&df| smooth_idf(n_docs, df)).collect();

        let mut tri_mat = TriMat::new((n_terms, n_docs));
        for (row, col, tf) in triplets {
            tri_mat.add_triplet(row, col, tf * idf[row]);
        }

        let mut matrix = tri_mat.to_csc();

        for mut col in matrix.outer_iterator_mut() {
            let norm = col.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, value) in col.iter_mut() {
                    *value /= norm;
                }
            }
        }

        log::debug!("Built TF-IDF matrix: {} terms x {} products", n_terms, n_docs);

        Self {
            terms: terms.clone(),
            matrix,
            idf,
            n_docs,
        }
    }

    pub fn n_docs(&self) -> usize {
        self.n_docs
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    pub fn idf_of(&self, term: &str) -> Option<f64> {
        self.terms.get(term).map(|&idx| self.idf[idx])
    }

    /// TF-IDF weight of each distinct in-vocabulary keyword, in first-seen order.
    pub fn weigh(&self, keywords: &[String]) -> Vec<(String, f64)> {
        let known: Vec<&String> = keywords.iter().filter(|k| self.terms.contains_key(*k)).collect();
        let total = known.len() as f64;

        let mut weights: Vec<(String, f64)> = Vec::new();
        for keyword in &known {
            if weights.iter().any(|(k, _)| k == *keyword) {
                continue;
            }
            let count = known.iter().filter(|k| **k == *keyword).count() as f64;
            let idf = self.idf_of(keyword).unwrap_or(0.0);
            weights.push(((*keyword).clone(), count / total * idf));
        }
        weights
    }

    /// Normalized TF-IDF vector of the keywords, `None` when none are known.
    pub fn query_vector(&self, keywords: &[String]) -> Option<CsVec<f64>> {
        let mut query_tf: BTreeMap<usize, usize> = BTreeMap::new();
        let mut total_terms = 0;

        for keyword in keywords {
            if let Some(&idx) = self.terms.get(keyword) {
                *query_tf.entry(idx).or_insert(0) += 1;
                total_terms += 1;
            }
        }
        if total_terms == 0 {
            return None;
        }

        let mut indices = Vec::with_capacity(query_tf.len());
        let mut data = Vec::with_capacity(query_tf.len());
        for (term_idx, count) in query_tf {
            indices.push(term_idx);
            data.push(count as f64 / total_terms as f64 * self.idf[term_idx]);
        }

        let norm = data.iter().map(|v| v * v).sum::<f64>().sqrt();
        for value in data.iter_mut() {
            *value /= norm;
        }

        Some(CsVec::new(self.terms.len(), indices, data))
    }

    /// Cosine similarity of the keywords against every product, highest
    /// first. Products with no shared term are left out.
    pub fn similarities(&self, keywords: &[String]) -> Vec<(usize, f64)> {
        let Some(query_vec) = self.query_vector(keywords) else {
            return Vec::new();
        };

        let mut similarities = Vec::new();
        for (doc_idx, doc_vec) in self.matrix.outer_iterator().enumerate() {
            let sim: f64 = doc_vec
                .iter()
                .filter_map(|(term_idx, value)| query_vec.get(term_idx).map(|q| q * value))
                .sum();
            if sim > 0.0 {
                similarities.push((doc_idx, sim));
            }
        }

        similarities.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        similarities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::tokenizer::build_vocabulary;

    fn product(id: i64, name: &str, description: &str) -> Product {
        Product {
            id,
            name: name.into(),
            brand: String::new(),
            category: String::new(),
            description: description.into(),
            price: 10.0,
            rating: 4.0,
        }
    }

    fn catalogue() -> Vec<Product> {
        vec![
            product(1, "Gaming Laptop", "Fast laptop with 16 GB RAM"),
            product(2, "Office Laptop", "Light and quiet"),
            product(3, "Gaming Mouse", "RGB mouse"),
        ]
    }

    fn matrix() -> TfIdfMatrix {
        let stop_words = StopWords::english();
        let products = catalogue();
        let terms = build_vocabulary(&products, &stop_words);
        TfIdfMatrix::build(&products, &terms, &stop_words)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rare_terms_weigh_more() {
        let tfidf = matrix();
        assert_eq!(tfidf.n_docs(), 3);
        let laptop = tfidf.idf_of("laptop").unwrap();
        let rgb = tfidf.idf_of("rgb").unwrap();
        assert!(rgb > laptop);
        assert!((laptop - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert_eq!(tfidf.idf_of("tablet"), None);
    }

    #[test]
    fn columns_are_unit_length() {
        let tfidf = matrix();
        for col in tfidf.matrix.outer_iterator() {
            let norm: f64 = col.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn weigh_skips_unknown_and_merges_repeats() {
        let tfidf = matrix();
        let weights = tfidf.weigh(&strings(&["gaming", "tablet", "gaming", "rgb"]));
        let names: Vec<&str> = weights.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["gaming", "rgb"]);
        let gaming = weights[0].1;
        let rgb = weights[1].1;
        assert!((gaming - 2.0 / 3.0 * tfidf.idf_of("gaming").unwrap()).abs() < 1e-12);
        assert!((rgb - 1.0 / 3.0 * tfidf.idf_of("rgb").unwrap()).abs() < 1e-12);
    }

    #[test]
    fn similarity_ranks_best_match_first() {
        let tfidf = matrix();
        let results = tfidf.similarities(&strings(&["gaming", "laptop"]));
        assert_eq!(results[0].0, 0);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|(_, sim)| *sim > 0.0 && *sim <= 1.0 + 1e-9));
    }

    #[test]
    fn unknown_query_has_no_vector() {
        let tfidf = matrix();
        assert!(tfidf.query_vector(&strings(&["tablet"])).is_none());
        assert!(tfidf.similarities(&strings(&["tablet"])).is_empty());
    }

    #[test]
    fn empty_catalogue_builds() {
        let stop_words = StopWords::english();
        let terms = HashMap::new();
        let tfidf = TfIdfMatrix::build(&[], &terms, &stop_words);
        assert_eq!(tfidf.vocabulary_size(), 0);
        assert!(tfidf.similarities(&strings(&["laptop"])).is_empty());
    }
}
