//! TF-IDF vector space over a set of postings

use crate::error::{JobScoutError, Result};
use crate::processing::text_processor::TextProcessor;
use log::debug;
use ndarray::{Array1, Array2};
use std::collections::{HashMap, HashSet};

/// Unfitted vectorizer. `max_features == 0` keeps the whole vocabulary.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
}

/// Vocabulary and idf weights learned from one document set.
pub struct FittedVectorizer {
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Array1<f32>,
    processor: TextProcessor,
}

/// A fitted model plus the L2-normalized document matrix it produced.
pub struct VectorSpace {
    model: FittedVectorizer,
    matrix: Array2<f32>,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self { max_features }
    }

    /// Fit on `documents` and return their vectors. An empty document set has
    /// nothing to learn from and is rejected.
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<VectorSpace> {
        if documents.is_empty() {
            return Err(JobScoutError::Vectorizer(
                "cannot fit on an empty document set".to_string(),
            ));
        }

        let processor = TextProcessor::new();
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| processor.vector_terms(doc.as_ref()))
            .collect();

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = doc_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        if self.max_features > 0 {
            ranked.truncate(self.max_features);
        }
        ranked.sort_by(|a, b| a.0.cmp(b.0));

        let n = documents.len() as f32;
        let terms: Vec<String> = ranked.iter().map(|(term, _)| term.to_string()).collect();
        let idf: Array1<f32> = ranked
            .iter()
            .map(|(_, df)| ((1.0 + n) / (1.0 + *df as f32)).ln() + 1.0)
            .collect();
        let vocabulary: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();

        debug!(
            "Fitted vocabulary of {} terms over {} documents",
            terms.len(),
            documents.len()
        );

        let model = FittedVectorizer {
            vocabulary,
            terms,
            idf,
            processor,
        };

        let mut matrix = Array2::<f32>::zeros((tokenized.len(), model.dimensions()));
        for (row_idx, tokens) in tokenized.iter().enumerate() {
            let row = model.weigh(tokens);
            matrix.row_mut(row_idx).assign(&row);
        }

        Ok(VectorSpace { model, matrix })
    }
}

impl FittedVectorizer {
    pub fn dimensions(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// Vectorize unseen text against the learned vocabulary.
    pub fn transform(&self, text: &str) -> Array1<f32> {
        let tokens = self.processor.vector_terms(text);
        self.weigh(&tokens)
    }

    fn weigh(&self, tokens: &[String]) -> Array1<f32> {
        let mut vector = Array1::<f32>::zeros(self.dimensions());
        for token in tokens {
            if let Some(&idx) = self.vocabulary.get(token) {
                vector[idx] += 1.0;
            }
        }
        vector *= &self.idf;
        normalize(&mut vector);
        vector
    }
}

impl VectorSpace {
    pub fn model(&self) -> &FittedVectorizer {
        &self.model
    }

    pub fn matrix(&self) -> &Array2<f32> {
        &self.matrix
    }

    pub fn document_count(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn transform(&self, text: &str) -> Array1<f32> {
        self.model.transform(text)
    }

    /// Cosine similarity of `query` against every document, in document order.
    pub fn similarities(&self, query: &Array1<f32>) -> Array1<f32> {
        if self.model.dimensions() == 0 || query.len() != self.model.dimensions() {
            return Array1::zeros(self.document_count());
        }
        // Rows and query are unit length (or zero), so the dot product is the cosine.
        self.matrix.dot(query).mapv(|s| s.clamp(0.0, 1.0))
    }
}

fn normalize(vector: &mut Array1<f32>) {
    let norm = vector.dot(&*vector).sqrt();
    if norm > 0.0 {
        vector.mapv_inplace(|v| v / norm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<String> {
        vec![
            "Python Developer python django sql".to_string(),
            "Java Engineer spring hibernate".to_string(),
            "Data Analyst sql excel python".to_string(),
        ]
    }

    #[test]
    fn test_empty_document_set_is_rejected() {
        let empty: Vec<String> = Vec::new();
        assert!(matches!(
            TfidfVectorizer::new(1000).fit_transform(&empty),
            Err(JobScoutError::Vectorizer(_))
        ));
    }

    #[test]
    fn test_matrix_shape_and_unit_rows() {
        let space = TfidfVectorizer::new(1000).fit_transform(&docs()).unwrap();
        assert_eq!(space.document_count(), 3);
        assert_eq!(space.matrix().ncols(), space.model().dimensions());

        for row in space.matrix().rows() {
            let norm = row.dot(&row).sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_max_features_keeps_most_common_terms() {
        let space = TfidfVectorizer::new(2).fit_transform(&docs()).unwrap();
        assert_eq!(space.model().terms(), &["python".to_string(), "sql".to_string()]);
    }

    #[test]
    fn test_transform_does_not_extend_vocabulary() {
        let space = TfidfVectorizer::new(1000).fit_transform(&docs()).unwrap();
        let before = space.model().dimensions();

        let query = space.transform("kubernetes terraform python");
        assert_eq!(query.len(), before);
        assert_eq!(space.model().dimensions(), before);
        assert!(!space.model().contains("kubernetes"));
    }

    #[test]
    fn test_similarities() {
        let space = TfidfVectorizer::new(1000).fit_transform(&docs()).unwrap();

        let query = space.transform("java spring");
        let sims = space.similarities(&query);
        assert_eq!(sims.len(), 3);
        assert!(sims[1] > sims[0]);
        assert_eq!(sims[0], 0.0);

        let unknown = space.transform("nothing matching here");
        assert!(space.similarities(&unknown).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_identical_text_is_fully_similar() {
        let space = TfidfVectorizer::new(1000).fit_transform(&docs()).unwrap();
        let query = space.transform("Java Engineer spring hibernate");
        let sims = space.similarities(&query);
        assert!((sims[1] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stop_word_only_corpus_is_degenerate() {
        let space = TfidfVectorizer::new(1000)
            .fit_transform(&["the and of", "to be or not"][..])
            .unwrap();
        assert_eq!(space.model().dimensions(), 0);
        let sims = space.similarities(&space.transform("python"));
        assert_eq!(sims.len(), 2);
        assert!(sims.iter().all(|&s| s == 0.0));
    }
}
