use crate::index::{DocId, InvertedIndex};
use crate::preprocess::{preprocess, Language};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// BM25 tunables. `k1` controls term-frequency saturation, `b` the
/// strength of document-length normalization.
#[derive(Debug, Clone, Copy)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    /// Score normalized by the best returned score, in (0, 1].
    pub confidence: f64,
    /// Soft low-relevance signal: `confidence < 0.3`. Never filters.
    pub caution: bool,
    pub title: String,
    pub url: Option<String>,
    pub language: Language,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub query_terms: Vec<String>,
    pub results: Vec<SearchHit>,
    /// Count of positive-score candidates before top-k truncation.
    pub total_results: usize,
}

impl SearchResults {
    fn empty(query: &str, query_terms: Vec<String>) -> Self {
        Self {
            query: query.to_string(),
            query_terms,
            results: Vec::new(),
            total_results: 0,
        }
    }
}

/// BM25 ranking over a finalized [`InvertedIndex`]. Borrowing the index
/// makes "search before load" unrepresentable, and keeps concurrent
/// searches on one index free of shared mutable state.
pub struct Bm25Scorer<'a> {
    index: &'a InvertedIndex,
    params: Bm25Params,
}

impl<'a> Bm25Scorer<'a> {
    pub fn new(index: &'a InvertedIndex, params: Bm25Params) -> Self {
        Self { index, params }
    }

    pub fn with_defaults(index: &'a InvertedIndex) -> Self {
        Self::new(index, Bm25Params::default())
    }

    /// IDF(term) = ln((N - df + 0.5) / (df + 0.5) + 1). Unseen terms get
    /// 0 and contribute nothing to any score.
    pub fn idf(&self, term: &str) -> f64 {
        let df = self.index.get_document_frequency(term);
        if df == 0 {
            return 0.0;
        }
        let n = f64::from(self.index.doc_count());
        let df = f64::from(df);
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    fn term_contribution(&self, idf: f64, tf: u32, doc_len: u32) -> f64 {
        let tf = f64::from(tf);
        let Bm25Params { k1, b } = self.params;
        let norm = 1.0 - b + b * (f64::from(doc_len) / self.index.avg_doc_length());
        idf * (tf * (k1 + 1.0)) / (tf + k1 * norm)
    }

    /// BM25 score of one document against preprocessed query terms.
    /// Repeated query terms contribute once per occurrence.
    pub fn score(&self, query_terms: &[String], doc_id: &str) -> f64 {
        let doc_len = self.index.doc_length(doc_id);
        if doc_len == 0 || self.index.avg_doc_length() <= 0.0 {
            return 0.0;
        }
        let mut score = 0.0;
        for term in query_terms {
            let idf = self.idf(term);
            if idf == 0.0 {
                continue;
            }
            let tf = self
                .index
                .get_postings(term)
                .iter()
                .find(|p| p.doc_id == doc_id)
                .map(|p| p.tf)
                .unwrap_or(0);
            if tf == 0 {
                continue;
            }
            score += self.term_contribution(idf, tf, doc_len);
        }
        score
    }

    /// Preprocess `query`, score the union of candidate documents from
    /// all query-term posting lists, and return the top `top_k` by
    /// descending score. Ties break by document insertion order.
    ///
    /// An unfinalized or empty index, or a query that preprocesses to
    /// nothing, yields an empty result set rather than an error.
    pub fn search(&self, query: &str, top_k: usize, hint: Option<Language>) -> SearchResults {
        let query_terms = preprocess(query, hint);
        if query_terms.is_empty() || !self.index.is_finalized() || self.index.is_empty() {
            return SearchResults::empty(query, query_terms);
        }

        // One pass over each term's posting list; candidates are exactly
        // the documents appearing in at least one list.
        let mut scores: HashMap<&str, f64> = HashMap::new();
        for term in &query_terms {
            let idf = self.idf(term);
            if idf == 0.0 {
                continue;
            }
            for posting in self.index.get_postings(term) {
                let doc_len = self.index.doc_length(&posting.doc_id);
                *scores.entry(posting.doc_id.as_str()).or_insert(0.0) +=
                    self.term_contribution(idf, posting.tf, doc_len);
            }
        }

        let mut scored: Vec<(&str, f64)> =
            scores.into_iter().filter(|&(_, s)| s > 0.0).collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| self.index.ordinal(a.0).cmp(&self.index.ordinal(b.0)))
        });

        let total_results = scored.len();
        scored.truncate(top_k);
        let max_score = scored.first().map(|&(_, s)| s).unwrap_or(0.0);

        let results = scored
            .into_iter()
            .filter_map(|(doc_id, score)| {
                let meta = self.index.metadata(doc_id)?;
                let confidence = if max_score > 0.0 { score / max_score } else { 0.0 };
                Some(SearchHit {
                    doc_id: doc_id.to_string(),
                    score,
                    confidence,
                    caution: confidence < 0.3,
                    title: meta.title.clone(),
                    url: meta.url.clone(),
                    language: meta.language,
                })
            })
            .collect();

        SearchResults {
            query: query.to_string(),
            query_terms,
            results,
            total_results,
        }
    }
}
