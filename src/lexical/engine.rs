//! BM25 lexical retrieval over the verse corpus.

use std::sync::Arc;

use ahash::AHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::corpus::CorpusStore;
use crate::error::{Result, SanadError};

/// Parameters for the Okapi BM25 ranking function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalParams {
    /// K1 parameter (term frequency saturation).
    pub k1: f32,

    /// B parameter (document length normalization).
    pub b: f32,

    /// Epsilon floor for negative IDF values, as a fraction of the
    /// average IDF across the vocabulary.
    pub epsilon: f32,
}

impl Default for LexicalParams {
    fn default() -> Self {
        LexicalParams {
            k1: 1.5,
            b: 0.75,
            epsilon: 0.25,
        }
    }
}

/// One ranked document from lexical retrieval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexicalHit {
    /// The corpus line that matched.
    pub text: String,
    /// BM25 score, or match fraction for variation search.
    pub score: f32,
}

/// Index statistics for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct LexicalStats {
    /// Number of documents in the index.
    pub document_count: usize,
    /// Number of distinct terms in the vocabulary.
    pub vocabulary_size: usize,
    /// Average document length in tokens.
    pub avg_doc_length: f32,
}

/// In-memory BM25 index over the verse corpus.
///
/// The index is built once at startup from the corpus lines; documents
/// are the lines themselves, in line order, so rankings are reproducible
/// across runs. Tokenization is whitespace splitting over lowercased
/// text, with no stemming or stop word removal, matching how the corpus
/// file is prepared.
pub struct LexicalEngine {
    corpus: Arc<CorpusStore>,
    params: LexicalParams,
    doc_tokens: Vec<Vec<String>>,
    term_freqs: Vec<AHashMap<String, u32>>,
    idf: AHashMap<String, f32>,
    avg_doc_length: f32,
}

impl LexicalEngine {
    /// Build the index from a corpus.
    ///
    /// # Errors
    ///
    /// Returns an error if the corpus is empty or contains no tokens,
    /// since BM25 statistics are undefined for an empty collection.
    pub fn new(corpus: Arc<CorpusStore>, params: LexicalParams) -> Result<Self> {
        if corpus.is_empty() {
            return Err(SanadError::index("cannot build index over an empty corpus"));
        }

        let doc_tokens: Vec<Vec<String>> = corpus.lines().iter().map(|l| tokenize(l)).collect();
        let total_tokens: usize = doc_tokens.iter().map(Vec::len).sum();
        if total_tokens == 0 {
            return Err(SanadError::index("corpus contains no tokens"));
        }
        let avg_doc_length = total_tokens as f32 / doc_tokens.len() as f32;

        let mut term_freqs = Vec::with_capacity(doc_tokens.len());
        let mut doc_freqs: AHashMap<String, u32> = AHashMap::new();
        for tokens in &doc_tokens {
            let mut freqs: AHashMap<String, u32> = AHashMap::new();
            for token in tokens {
                *freqs.entry(token.clone()).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            term_freqs.push(freqs);
        }

        let idf = Self::calc_idf(&doc_freqs, doc_tokens.len(), params.epsilon);

        tracing::debug!(
            "built lexical index: {} documents, {} terms",
            doc_tokens.len(),
            idf.len()
        );

        Ok(LexicalEngine {
            corpus,
            params,
            doc_tokens,
            term_freqs,
            idf,
            avg_doc_length,
        })
    }

    /// Compute per-term IDF with the Okapi negative-IDF floor.
    ///
    /// Raw IDF is `ln(N - df + 0.5) - ln(df + 0.5)`, which goes negative
    /// for terms in more than half the documents. Those are floored at
    /// `epsilon * average_idf`, with the average taken over the raw
    /// values, so very common terms still contribute a small positive
    /// amount instead of pushing matching documents down the ranking.
    fn calc_idf(doc_freqs: &AHashMap<String, u32>, doc_count: usize, epsilon: f32) -> AHashMap<String, f32> {
        let mut idf = AHashMap::with_capacity(doc_freqs.len());
        let mut idf_sum = 0.0f32;
        let mut negative_terms = Vec::new();

        for (term, &df) in doc_freqs {
            let value = (doc_count as f32 - df as f32 + 0.5).ln() - (df as f32 + 0.5).ln();
            idf_sum += value;
            if value < 0.0 {
                negative_terms.push(term.clone());
            }
            idf.insert(term.clone(), value);
        }

        let average_idf = idf_sum / idf.len() as f32;
        let floor = epsilon * average_idf;
        for term in negative_terms {
            idf.insert(term, floor);
        }

        idf
    }

    /// Rank corpus documents against the query with BM25.
    ///
    /// Returns the `top_n` documents in score order, ties broken by
    /// document order. Documents that match no query term are kept with
    /// a score of 0.0, so the result always has `min(top_n, corpus size)`
    /// entries for a non-empty query. An empty query returns no hits.
    pub fn search(&self, query: &str, top_n: usize) -> Vec<LexicalHit> {
        let terms = tokenize(query);
        if terms.is_empty() || top_n == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(usize, f32)> = (0..self.doc_tokens.len())
            .into_par_iter()
            .map(|i| (i, self.score_document(i, &terms)))
            .collect();

        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_n);

        ranked
            .into_iter()
            .map(|(i, score)| LexicalHit {
                text: self.corpus.lines()[i].clone(),
                score,
            })
            .collect()
    }

    /// Rank corpus documents by the fraction of query words they contain
    /// as substrings of document tokens.
    ///
    /// This catches morphological variations BM25 misses ("mercy" inside
    /// "merciful"). Only documents matching at least one query word are
    /// returned, scored by `matched words / query words`, ties broken by
    /// document order.
    pub fn search_with_variations(&self, query: &str, top_n: usize) -> Vec<LexicalHit> {
        let terms = tokenize(query);
        if terms.is_empty() || top_n == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(usize, f32)> = self
            .doc_tokens
            .par_iter()
            .enumerate()
            .filter_map(|(i, tokens)| {
                let matched = terms
                    .iter()
                    .filter(|term| tokens.iter().any(|token| token.contains(term.as_str())))
                    .count();
                if matched > 0 {
                    Some((i, matched as f32 / terms.len() as f32))
                } else {
                    None
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_n);

        ranked
            .into_iter()
            .map(|(i, score)| LexicalHit {
                text: self.corpus.lines()[i].clone(),
                score,
            })
            .collect()
    }

    /// BM25 score of one document against the query terms.
    fn score_document(&self, doc_index: usize, terms: &[String]) -> f32 {
        let doc_length = self.doc_tokens[doc_index].len() as f32;
        let freqs = &self.term_freqs[doc_index];
        let k1 = self.params.k1;
        let b = self.params.b;

        let mut score = 0.0;
        for term in terms {
            let tf = match freqs.get(term) {
                Some(&tf) => tf as f32,
                None => continue,
            };
            let idf = self.idf.get(term).copied().unwrap_or(0.0);
            let denom = tf + k1 * (1.0 - b + b * doc_length / self.avg_doc_length);
            score += idf * (tf * (k1 + 1.0)) / denom;
        }
        score
    }

    /// Index statistics for diagnostics.
    pub fn stats(&self) -> LexicalStats {
        LexicalStats {
            document_count: self.doc_tokens.len(),
            vocabulary_size: self.idf.len(),
            avg_doc_length: self.avg_doc_length,
        }
    }
}

/// Tokenize text the way the corpus is prepared: lowercase, split on
/// whitespace, keep everything.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
