//! Query-side CLIR helpers: fixed-table synonym expansion, named-entity
//! mapping, and word-by-word Bangla→English substitution. These run
//! upstream of the engine and only rewrite token lists; the index and
//! scorer never translate anything.

use crate::preprocess::Language;
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

lazy_static! {
    static ref SYNONYMS_EN: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert("car", &["automobile", "vehicle"]);
        m.insert("buy", &["purchase", "get"]);
        m.insert("cheap", &["low cost", "affordable"]);
        m
    };
    static ref SYNONYMS_BN: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert("গাড়ি", &["যানবাহন", "অটো"]);
        m.insert("কিনতে", &["ক্রয়", "নিতে"]);
        m.insert("সস্তা", &["কম দাম", "স্বল্পমূল্য"]);
        m
    };
    static ref NAMED_ENTITIES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("bangladesh", "বাংলাদেশ");
        m.insert("dhaka", "ঢাকা");
        m.insert("cricket", "ক্রিকেট");
        m.insert("বাংলাদেশ", "bangladesh");
        m.insert("ঢাকা", "dhaka");
        m
    };
    static ref BN_EN_DICT: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("নির্বাচন", "election");
        m.insert("রাজনীতি", "politics");
        m.insert("সরকার", "government");
        m.insert("অর্থনীতি", "economy");
        m.insert("দুর্নীতি", "corruption");
        m.insert("জলবায়ু", "climate");
        m.insert("পরিবর্তন", "change");
        m.insert("বাজেট", "budget");
        m.insert("শিক্ষা", "education");
        m.insert("স্বাস্থ্য", "health");
        m.insert("সংকট", "crisis");
        m.insert("আইন", "law");
        m.insert("আদালত", "court");
        m.insert("সংসদ", "parliament");
        m
    };
}

/// Append synonyms from the fixed per-language table. Original tokens
/// keep their order; synonyms are appended in table order and duplicates
/// are dropped, so the output is deterministic.
pub fn expand_query(tokens: &[String], language: Language) -> Vec<String> {
    let table = match language {
        Language::English => &*SYNONYMS_EN,
        Language::Bangla => &*SYNONYMS_BN,
    };
    let mut seen: HashSet<&str> = tokens.iter().map(String::as_str).collect();
    let mut expanded: Vec<String> = tokens.to_vec();
    for token in tokens {
        if let Some(synonyms) = table.get(token.as_str()) {
            for &syn in synonyms.iter() {
                if seen.insert(syn) {
                    expanded.push(syn.to_string());
                }
            }
        }
    }
    expanded
}

/// Emit the cross-script counterpart of known named entities ahead of
/// the original token, leaving everything else untouched.
pub fn map_named_entities(tokens: &[String]) -> Vec<String> {
    let mut mapped = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Some(&counterpart) = NAMED_ENTITIES.get(token.as_str()) {
            mapped.push(counterpart.to_string());
        }
        mapped.push(token.clone());
    }
    mapped
}

/// Word-by-word Bangla→English dictionary substitution; unknown words
/// pass through unchanged.
pub fn translate_bangla_terms(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .map(|t| match BN_EN_DICT.get(t.as_str()) {
            Some(&en) => en.to_string(),
            None => t.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn expansion_appends_unseen_synonyms() {
        let out = expand_query(&toks(&["cheap", "car"]), Language::English);
        assert_eq!(&out[..2], &toks(&["cheap", "car"])[..]);
        assert!(out.contains(&"affordable".to_string()));
        assert!(out.contains(&"vehicle".to_string()));
    }

    #[test]
    fn expansion_is_deterministic_and_deduplicated() {
        let a = expand_query(&toks(&["car", "vehicle"]), Language::English);
        let b = expand_query(&toks(&["car", "vehicle"]), Language::English);
        assert_eq!(a, b);
        assert_eq!(a.iter().filter(|t| *t == "vehicle").count(), 1);
    }

    #[test]
    fn entity_mapping_prepends_counterpart() {
        let out = map_named_entities(&toks(&["dhaka", "traffic"]));
        assert_eq!(out, toks(&["ঢাকা", "dhaka", "traffic"]));
    }

    #[test]
    fn bangla_dictionary_translates_known_words_only() {
        let out = translate_bangla_terms(&toks(&["নির্বাচন", "ঢাকায়"]));
        assert_eq!(out, toks(&["election", "ঢাকায়"]));
    }
}
