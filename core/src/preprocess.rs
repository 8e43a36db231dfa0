use anyhow::{anyhow, Error};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref RE_URL: Regex =
        Regex::new(r"(?i)[a-z][a-z0-9+.-]*://\S+|\bwww\S+").expect("valid regex");
    static ref RE_EMAIL: Regex = Regex::new(r"\S+@\S+").expect("valid regex");
    static ref ENGLISH_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from",
            "has", "he", "in", "is", "it", "its", "of", "on", "that", "the",
            "to", "was", "will", "with", "this", "but", "they", "have", "had",
            "what", "when", "where", "who", "which", "why", "how",
        ];
        words.iter().copied().collect()
    };
    static ref BANGLA_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "এবং", "বা", "যে", "এই", "সেই", "যা", "তা", "এক", "একটি",
            "কিছু", "কোন", "করা", "হয়", "হবে", "ছিল", "আছে", "থেকে",
            "সঙ্গে", "দ্বারা", "জন্য", "মধ্যে", "উপর", "নিচে", "আগে",
            "পরে", "মত", "সাথে", "কিন্তু", "যদি", "তবে", "না", "নয়",
            "হয়েছে", "হয়েছিল", "করেছে", "করেছিল", "বলেন", "বলে",
            "বলা", "জানা", "জানায়", "দেয়", "দেওয়া", "নেয়", "নেওয়া",
        ];
        words.iter().copied().collect()
    };
}

/// Corpus languages. The index stores one per document; queries may pass
/// `None` as a hint and let script detection decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Bangla,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Bangla => "bn",
        }
    }

    fn stopwords(self) -> &'static HashSet<&'static str> {
        match self {
            Language::English => &ENGLISH_STOPWORDS,
            Language::Bangla => &BANGLA_STOPWORDS,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "bn" | "bangla" => Ok(Language::Bangla),
            other => Err(anyhow!("unknown language: {other}")),
        }
    }
}

fn is_bangla_char(c: char) -> bool {
    ('\u{0980}'..='\u{09FF}').contains(&c)
}

/// Script-based language detection: any character in the Bangla Unicode
/// block (U+0980..U+09FF) marks the text as Bangla, otherwise English.
pub fn detect_script(text: &str) -> Language {
    if text.chars().any(is_bangla_char) {
        Language::Bangla
    } else {
        Language::English
    }
}

/// Full preprocessing pipeline: URL/email stripping, lowercasing,
/// script filtering, whitespace tokenization, stopword removal, and a
/// minimum-length filter. `None` hint resolves via [`detect_script`].
///
/// Pure and deterministic; indexing and search both go through here so
/// their vocabularies match exactly.
pub fn preprocess(text: &str, hint: Option<Language>) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let language = hint.unwrap_or_else(|| detect_script(text));

    let stripped = RE_URL.replace_all(text, " ");
    let stripped = RE_EMAIL.replace_all(&stripped, " ");
    let lowered = stripped.to_lowercase();

    let filtered: String = lowered
        .chars()
        .map(|c| {
            let keep = match language {
                Language::Bangla => is_bangla_char(c),
                Language::English => c.is_ascii_alphanumeric(),
            };
            if keep || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let stopwords = language.stopwords();
    filtered
        .split_whitespace()
        .filter(|t| !stopwords.contains(t))
        .filter(|t| t.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_sequence() {
        assert!(preprocess("", None).is_empty());
        assert!(preprocess("   \t\n ", Some(Language::English)).is_empty());
    }

    #[test]
    fn stopword_only_query_yields_empty_sequence() {
        assert!(preprocess("the is of", Some(Language::English)).is_empty());
    }

    #[test]
    fn lowercases_and_drops_punctuation() {
        let toks = preprocess("Cheap CAR deals, in Dhaka!", Some(Language::English));
        assert_eq!(toks, vec!["cheap", "car", "deals", "dhaka"]);
    }

    #[test]
    fn strips_urls_and_emails() {
        let toks = preprocess(
            "visit https://example.com/news or www.example.com or mail admin@example.com now",
            Some(Language::English),
        );
        assert_eq!(toks, vec!["visit", "or", "or", "mail", "now"]);
    }

    #[test]
    fn drops_single_char_tokens() {
        let toks = preprocess("x cars y bikes z", Some(Language::English));
        assert_eq!(toks, vec!["cars", "bikes"]);
    }

    #[test]
    fn auto_hint_takes_bangla_branch_on_bangla_script() {
        // Mixed input under auto: Bangla block characters present, so the
        // Latin word must be filtered out by the Bangla branch.
        let toks = preprocess("ঢাকায় cricket খেলা", None);
        assert!(toks.iter().all(|t| t.chars().all(is_bangla_char)));
        assert!(toks.contains(&"খেলা".to_string()));
    }

    #[test]
    fn bangla_stopwords_removed() {
        let toks = preprocess("ঢাকা এবং চট্টগ্রাম", Some(Language::Bangla));
        assert_eq!(toks, vec!["ঢাকা", "চট্টগ্রাম"]);
    }

    #[test]
    fn idempotent_on_clean_text() {
        let first = preprocess("cheap car deals dhaka market prices", Some(Language::English));
        let rejoined = first.join(" ");
        let second = preprocess(&rejoined, Some(Language::English));
        assert_eq!(first, second);
    }

    #[test]
    fn language_parses_from_codes_and_names() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert_eq!("Bangla".parse::<Language>().unwrap(), Language::Bangla);
        assert!("fr".parse::<Language>().is_err());
    }
}
