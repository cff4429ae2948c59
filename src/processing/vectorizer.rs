//! TF-IDF term weighting over small in-memory corpora

use crate::config::ProcessingConfig;
use crate::error::{Result, ScreenerError};
use ndarray::{Array2, ArrayView1};
use std::collections::{BTreeSet, HashMap};

/// Position and length of the first n-gram occurrence of a term
type Occurrence = (usize, usize);

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    ngram_range: (usize, usize),
    smooth_idf: bool,
    sublinear_tf: bool,
}

/// L2-normalized TF-IDF rows, one per input document, over a sorted vocabulary
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    vocabulary: Vec<String>,
    idf: Vec<f64>,
    weights: Array2<f64>,
    first_seen: Vec<HashMap<usize, Occurrence>>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(&ProcessingConfig::default())
    }
}

impl TfidfVectorizer {
    pub fn new(config: &ProcessingConfig) -> Self {
        Self {
            ngram_range: (config.ngram_min, config.ngram_max),
            smooth_idf: config.smooth_idf,
            sublinear_tf: config.sublinear_tf,
        }
    }

    /// Contiguous n-grams of the token sequence, ordered by start position
    /// then length
    pub fn ngrams(&self, tokens: &[String]) -> Vec<String> {
        self.ngrams_with_positions(tokens)
            .into_iter()
            .map(|(gram, _)| gram)
            .collect()
    }

    fn ngrams_with_positions(&self, tokens: &[String]) -> Vec<(String, Occurrence)> {
        let (min_n, max_n) = self.ngram_range;
        let mut grams = Vec::new();

        for start in 0..tokens.len() {
            for n in min_n..=max_n {
                if start + n > tokens.len() {
                    break;
                }
                grams.push((tokens[start..start + n].join(" "), (start, n)));
            }
        }

        grams
    }

    /// Learn the vocabulary and IDF of `documents` and weight each of them
    pub fn fit_transform(&self, documents: &[Vec<String>]) -> Result<TfidfMatrix> {
        let grams: Vec<Vec<(String, Occurrence)>> = documents
            .iter()
            .map(|tokens| self.ngrams_with_positions(tokens))
            .collect();

        let vocabulary: Vec<String> = grams
            .iter()
            .flatten()
            .map(|(gram, _)| gram.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if vocabulary.is_empty() {
            return Err(ScreenerError::EmptyVocabulary);
        }

        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
            .collect();

        let n_docs = documents.len();
        let mut weights = Array2::<f64>::zeros((n_docs, vocabulary.len()));
        let mut first_seen = vec![HashMap::new(); n_docs];

        for (doc, doc_grams) in grams.iter().enumerate() {
            for (gram, occurrence) in doc_grams {
                let term = index[gram.as_str()];
                weights[[doc, term]] += 1.0;
                first_seen[doc].entry(term).or_insert(*occurrence);
            }
        }

        let idf: Vec<f64> = weights
            .columns()
            .into_iter()
            .map(|column| {
                let df = column.iter().filter(|&&count| count > 0.0).count() as f64;
                self.inverse_document_frequency(n_docs as f64, df)
            })
            .collect();

        for mut row in weights.rows_mut() {
            for (term, value) in row.iter_mut().enumerate() {
                if *value > 0.0 {
                    let tf = if self.sublinear_tf { value.ln() + 1.0 } else { *value };
                    *value = tf * idf[term];
                }
            }
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|value| value / norm);
            }
        }

        Ok(TfidfMatrix {
            vocabulary,
            idf,
            weights,
            first_seen,
        })
    }

    fn inverse_document_frequency(&self, n_docs: f64, df: f64) -> f64 {
        if self.smooth_idf {
            ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
        } else {
            (n_docs / df).ln() + 1.0
        }
    }
}

impl TfidfMatrix {
    pub fn n_documents(&self) -> usize {
        self.weights.nrows()
    }

    pub fn row(&self, doc: usize) -> ArrayView1<'_, f64> {
        self.weights.row(doc)
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.term_index(term).map(|i| self.idf[i])
    }

    pub fn weight(&self, doc: usize, term: &str) -> Option<f64> {
        self.term_index(term).map(|i| self.weights[[doc, i]])
    }

    /// Terms present in `doc`, heaviest first. Equal weights keep the order
    /// in which the terms first appear in the document.
    pub fn ranked_terms(&self, doc: usize) -> Vec<(&str, f64)> {
        let row = self.weights.row(doc);
        let mut ranked: Vec<(usize, f64, Occurrence)> = self.first_seen[doc]
            .iter()
            .map(|(&term, &occurrence)| (term, row[term], occurrence))
            .collect();

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.2.cmp(&b.2)));

        ranked
            .into_iter()
            .map(|(term, weight, _)| (self.vocabulary[term].as_str(), weight))
            .collect()
    }

    /// Cosine of the angle between two rows, 0.0 when either is all zeros
    pub fn cosine_similarity(&self, a: usize, b: usize) -> f64 {
        let (row_a, row_b) = (self.weights.row(a), self.weights.row(b));
        let norm_a = row_a.dot(&row_a).sqrt();
        let norm_b = row_b.dot(&row_b).sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        (row_a.dot(&row_b) / (norm_a * norm_b)).clamp(0.0, 1.0)
    }

    fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|entry| entry.as_str().cmp(term))
            .ok()
    }
}
