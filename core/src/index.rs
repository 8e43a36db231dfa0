use crate::preprocess::Language;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Document identifiers are assigned by the build layer as
/// `"{lang_code}_{corpus_position}"`, e.g. `en_0`, `bn_17`. Uniqueness
/// across one index lifetime is a caller obligation.
pub type DocId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMeta {
    pub title: String,
    pub url: Option<String>,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    /// Term frequency within the document.
    pub tf: u32,
}

/// Term-level inverted index with per-document lengths and per-term
/// document frequencies.
///
/// Lifecycle: created empty, populated by sequential [`add_document`]
/// calls, then [`finalize`]d once before scoring. After finalize the
/// structure is read-only; shared `&InvertedIndex` access from concurrent
/// searches is safe.
///
/// [`add_document`]: InvertedIndex::add_document
/// [`finalize`]: InvertedIndex::finalize
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Posting>>,
    doc_freq: HashMap<String, u32>,
    doc_lengths: HashMap<DocId, u32>,
    docs: HashMap<DocId, DocMeta>,
    /// Insertion ordinal per document, used to break score ties.
    doc_order: HashMap<DocId, u32>,
    doc_count: u32,
    avg_doc_length: f64,
    finalized: bool,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count per-term frequencies in `tokens`, append one posting per
    /// distinct term, and record the document's length and metadata.
    ///
    /// `doc_id` must be fresh; duplicates are not validated in release
    /// builds (ids come from a monotonic counter plus language prefix).
    pub fn add_document(&mut self, doc_id: DocId, tokens: &[String], meta: DocMeta) {
        debug_assert!(!self.finalized, "add_document after finalize");
        debug_assert!(!self.docs.contains_key(&doc_id), "duplicate doc_id {doc_id}");

        let mut term_freq: HashMap<&str, u32> = HashMap::new();
        for token in tokens {
            *term_freq.entry(token.as_str()).or_insert(0) += 1;
        }
        for (term, tf) in term_freq {
            self.postings
                .entry(term.to_string())
                .or_default()
                .push(Posting { doc_id: doc_id.clone(), tf });
            *self.doc_freq.entry(term.to_string()).or_insert(0) += 1;
        }

        self.doc_lengths.insert(doc_id.clone(), tokens.len() as u32);
        self.doc_order.insert(doc_id.clone(), self.doc_count);
        self.docs.insert(doc_id, meta);
        self.doc_count += 1;
    }

    /// Compute corpus statistics. Call exactly once, after the last
    /// `add_document` and before any scoring. Average document length
    /// stays 0 until this runs.
    pub fn finalize(&mut self) {
        if self.doc_count > 0 {
            let total: u64 = self.doc_lengths.values().map(|&l| u64::from(l)).sum();
            self.avg_doc_length = total as f64 / f64::from(self.doc_count);
        }
        self.finalized = true;
        tracing::info!(
            docs = self.doc_count,
            vocab = self.postings.len(),
            avg_doc_length = self.avg_doc_length,
            "index finalized"
        );
    }

    /// Posting list for `term`; empty for unknown terms.
    pub fn get_postings(&self, term: &str) -> &[Posting] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of documents containing `term`; 0 for unknown terms.
    pub fn get_document_frequency(&self, term: &str) -> u32 {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    pub fn doc_count(&self) -> u32 {
        self.doc_count
    }

    pub fn is_empty(&self) -> bool {
        self.doc_count == 0
    }

    pub fn vocab_size(&self) -> usize {
        self.postings.len()
    }

    pub fn avg_doc_length(&self) -> f64 {
        self.avg_doc_length
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Token count of a document; 0 for unknown ids.
    pub fn doc_length(&self, doc_id: &str) -> u32 {
        self.doc_lengths.get(doc_id).copied().unwrap_or(0)
    }

    pub fn metadata(&self, doc_id: &str) -> Option<&DocMeta> {
        self.docs.get(doc_id)
    }

    /// Insertion ordinal of a document; unknown ids sort last.
    pub fn ordinal(&self, doc_id: &str) -> u32 {
        self.doc_order.get(doc_id).copied().unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(title: &str) -> DocMeta {
        DocMeta {
            title: title.to_string(),
            url: None,
            language: Language::English,
        }
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn document_frequency_counts_distinct_docs() {
        let mut index = InvertedIndex::new();
        index.add_document("en_0".into(), &tokens(&["car", "car", "cheap"]), meta("a"));
        index.add_document("en_1".into(), &tokens(&["car", "expensive"]), meta("b"));
        index.finalize();

        assert_eq!(index.get_document_frequency("car"), 2);
        assert_eq!(index.get_document_frequency("cheap"), 1);
        assert_eq!(index.get_document_frequency("missing"), 0);
        // df equals the number of distinct doc ids in the posting list
        assert_eq!(index.get_postings("car").len(), 2);
    }

    #[test]
    fn postings_record_term_frequency_in_insertion_order() {
        let mut index = InvertedIndex::new();
        index.add_document("en_0".into(), &tokens(&["car", "car"]), meta("a"));
        index.add_document("en_1".into(), &tokens(&["car"]), meta("b"));

        let plist = index.get_postings("car");
        assert_eq!(plist.len(), 2);
        assert_eq!(plist[0], Posting { doc_id: "en_0".into(), tf: 2 });
        assert_eq!(plist[1], Posting { doc_id: "en_1".into(), tf: 1 });
    }

    #[test]
    fn unknown_term_lookups_are_neutral() {
        let index = InvertedIndex::new();
        assert!(index.get_postings("ghost").is_empty());
        assert_eq!(index.get_document_frequency("ghost"), 0);
    }

    #[test]
    fn finalize_computes_mean_document_length() {
        let mut index = InvertedIndex::new();
        index.add_document("en_0".into(), &tokens(&["a", "b", "c", "d"]), meta("a"));
        index.add_document("en_1".into(), &tokens(&["a", "b"]), meta("b"));
        assert_eq!(index.avg_doc_length(), 0.0);
        index.finalize();
        assert!((index.avg_doc_length() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_index_finalizes_with_zero_average() {
        let mut index = InvertedIndex::new();
        index.finalize();
        assert_eq!(index.avg_doc_length(), 0.0);
        assert_eq!(index.doc_count(), 0);
    }

    #[test]
    fn reads_before_finalize_are_consistent() {
        let mut index = InvertedIndex::new();
        index.add_document("en_0".into(), &tokens(&["car"]), meta("a"));
        // Not finalized: postings and df already valid, avgdl stale.
        assert_eq!(index.get_document_frequency("car"), 1);
        assert_eq!(index.get_postings("car").len(), 1);
        assert_eq!(index.avg_doc_length(), 0.0);
        assert!(!index.is_finalized());
    }

    #[test]
    fn ordinals_follow_insertion_order() {
        let mut index = InvertedIndex::new();
        index.add_document("bn_0".into(), &tokens(&["x1"]), meta("a"));
        index.add_document("en_0".into(), &tokens(&["x1"]), meta("b"));
        assert_eq!(index.ordinal("bn_0"), 0);
        assert_eq!(index.ordinal("en_0"), 1);
        assert_eq!(index.ordinal("nope"), u32::MAX);
    }
}
