//! Automatic knowledge base selection for `AutoSearchKnowledgeBase`

use std::collections::HashSet;
use std::fmt::Debug;

use once_cell::sync::Lazy;
use regex::Regex;

use super::catalog::KnowledgeBaseCatalog;
use super::entity::KnowledgeBaseDefinition;
use super::query::extract_keywords;
use crate::domain::error::DomainError;

/// Bonus added when a query term matches a configured keyword
const KEYWORD_BONUS: u32 = 2;

/// Shortest ASCII word treated as a query term
const MIN_ASCII_TERM_LENGTH: usize = 3;

/// Common English words that say nothing about a knowledge base's topic
const STOP_WORDS: &[&str] = &[
    "about", "and", "are", "can", "does", "for", "from", "have", "how", "into", "please", "tell",
    "that", "the", "this", "was", "what", "when", "where", "which", "who", "why", "with", "you",
    "your",
];

static ASCII_WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9]+").expect("valid regex"));

/// Runs of kanji or katakana; hiragana is mostly particles and is skipped
static CJK_RUN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{Han}\p{Katakana}ー]{2,}").expect("valid regex"));

/// Outcome of selecting a knowledge base for a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: String,
    pub score: u32,
}

/// Chooses the single knowledge base best suited to a query
pub trait KnowledgeBaseSelector: Send + Sync + Debug {
    fn select(&self, query: &str, catalog: &KnowledgeBaseCatalog) -> Result<Selection, DomainError>;
}

/// Scores each knowledge base by how many query terms appear in its name,
/// description and keywords.
#[derive(Debug, Clone, Default)]
pub struct KeywordOverlapSelector {
    fallback: Option<String>,
}

impl KeywordOverlapSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Knowledge base to use when nothing in the catalog matches
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    fn score(terms: &[String], kb: &KnowledgeBaseDefinition) -> u32 {
        let vocabulary = Vocabulary::new(kb);

        terms
            .iter()
            .map(|term| {
                let mut score = 0;

                if vocabulary.mentions(term) {
                    score += 1;
                }

                if vocabulary.keyword_matches(term) {
                    score += KEYWORD_BONUS;
                }

                score
            })
            .sum()
    }
}

/// Words and text a knowledge base is known by, lowercased.
///
/// ASCII terms match whole words; other terms (CJK bigrams, katakana runs)
/// match anywhere in the text.
struct Vocabulary {
    text: String,
    words: HashSet<String>,
    keywords: Vec<String>,
}

impl Vocabulary {
    fn new(kb: &KnowledgeBaseDefinition) -> Self {
        let text = format!(
            "{} {} {}",
            kb.name.replace(['_', '-'], " "),
            kb.description,
            kb.keywords.join(" ")
        )
        .to_lowercase();

        let words = ASCII_WORD_PATTERN
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .collect();

        let keywords = kb
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self {
            text,
            words,
            keywords,
        }
    }

    fn mentions(&self, term: &str) -> bool {
        if term.is_ascii() {
            self.words.contains(term)
        } else {
            self.text.contains(term)
        }
    }

    /// ASCII terms match a keyword exactly or as its inflection
    /// (`passwords` for `password`); other terms may contain the keyword.
    fn keyword_matches(&self, term: &str) -> bool {
        self.keywords.iter().any(|k| {
            if term.is_ascii() {
                term.starts_with(k.as_str())
            } else {
                term.contains(k.as_str())
            }
        })
    }
}

impl KnowledgeBaseSelector for KeywordOverlapSelector {
    fn select(&self, query: &str, catalog: &KnowledgeBaseCatalog) -> Result<Selection, DomainError> {
        if catalog.is_empty() {
            return Err(DomainError::validation("No knowledge bases are configured"));
        }

        let terms = query_terms(query);
        let mut best: Option<Selection> = None;

        for kb in catalog.iter() {
            let score = Self::score(&terms, kb);

            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(Selection {
                    name: kb.name.clone(),
                    score,
                });
            }
        }

        match best {
            Some(selection) if selection.score > 0 => Ok(selection),
            _ => match &self.fallback {
                Some(name) if catalog.contains(name) => Ok(Selection {
                    name: name.clone(),
                    score: 0,
                }),
                _ => Err(DomainError::validation(
                    "No configured knowledge base matches the query; specify kbName explicitly",
                )),
            },
        }
    }
}

/// Lowercased matching terms: ASCII words, extracted keywords and CJK bigrams
pub fn query_terms(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut terms = Vec::new();

    let mut push = |term: String| {
        if !is_meaningful(&term) {
            return;
        }

        if seen.insert(term.clone()) {
            terms.push(term);
        }
    };

    for word in ASCII_WORD_PATTERN.find_iter(query) {
        push(word.as_str().to_lowercase());
    }

    for keyword in extract_keywords(query) {
        push(keyword.to_lowercase());
    }

    for run in CJK_RUN_PATTERN.find_iter(query) {
        let chars: Vec<char> = run.as_str().chars().collect();

        for pair in chars.windows(2) {
            push(pair.iter().collect());
        }
    }

    terms
}

fn is_meaningful(term: &str) -> bool {
    if !term.is_ascii() {
        return true;
    }

    term.len() >= MIN_ASCII_TERM_LENGTH && !STOP_WORDS.contains(&term)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> KnowledgeBaseCatalog {
        KnowledgeBaseCatalog::new(vec![
            KnowledgeBaseDefinition::new("product_docs", "JEBUX7Q8QN", "認証機能マニュアル")
                .with_keywords(["認証", "ログイン", "authentication", "login"]),
            KnowledgeBaseDefinition::new("faq", "2I5CHITSB5", "サンプルドキュメント")
                .with_keywords(["faq", "よくある質問"]),
        ])
        .unwrap()
    }

    fn default_catalog() -> KnowledgeBaseCatalog {
        KnowledgeBaseCatalog::new(vec![
            KnowledgeBaseDefinition::new("product_docs", "JEBUX7Q8QN", "認証機能マニュアル")
                .with_keywords([
                    "認証",
                    "ログイン",
                    "パスワード",
                    "authentication",
                    "login",
                    "password",
                    "sso",
                ]),
            KnowledgeBaseDefinition::new("faq", "2I5CHITSB5", "サンプルドキュメント")
                .with_keywords(["faq", "よくある質問"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_unrelated_english_query_is_not_applicable() {
        for query in ["what is the weather today", "go to the zoo"] {
            let result = KeywordOverlapSelector::new().select(query, &default_catalog());

            assert!(
                matches!(result, Err(DomainError::Validation { .. })),
                "{} -> {:?}",
                query,
                result
            );
        }
    }

    #[test]
    fn test_short_and_stop_words_are_not_terms() {
        let terms = query_terms("what is the weather today");
        assert_eq!(terms, vec!["weather", "today"]);
    }

    #[test]
    fn test_ascii_terms_match_whole_words() {
        let catalog = KnowledgeBaseCatalog::new(vec![KnowledgeBaseDefinition::new(
            "product_docs",
            "JEBUX7Q8QN",
            "authentication guide",
        )])
        .unwrap();

        // "then" and "cat" appear only inside "authentication"
        assert!(KeywordOverlapSelector::new().select("then cat", &catalog).is_err());
        assert!(KeywordOverlapSelector::new().select("guide", &catalog).is_ok());
    }

    #[test]
    fn test_keyword_inflection_matches() {
        let selection = KeywordOverlapSelector::new()
            .select("reset forgotten passwords", &default_catalog())
            .unwrap();

        assert_eq!(selection.name, "product_docs");
        assert_eq!(selection.score, KEYWORD_BONUS);
    }

    #[test]
    fn test_query_terms() {
        let terms = query_terms("認証について検索して");
        assert_eq!(terms, vec!["認証", "検索"]);

        let terms = query_terms("How to configure SSO login");
        assert!(terms.contains(&"sso".to_string()));
        assert!(terms.contains(&"login".to_string()));
    }

    #[test]
    fn test_selects_matching_knowledge_base() {
        let selection = KeywordOverlapSelector::new()
            .select("認証について検索して", &catalog())
            .unwrap();

        assert_eq!(selection.name, "product_docs");
        assert!(selection.score > 0);
    }

    #[test]
    fn test_selects_by_katakana_keyword() {
        let selection = KeywordOverlapSelector::new()
            .select("ログイン方法について教えて", &catalog())
            .unwrap();

        assert_eq!(selection.name, "product_docs");
    }

    #[test]
    fn test_selects_by_name() {
        let selection = KeywordOverlapSelector::new()
            .select("Where is the FAQ?", &catalog())
            .unwrap();

        assert_eq!(selection.name, "faq");
    }

    #[test]
    fn test_no_match_without_fallback_is_validation_error() {
        let result = KeywordOverlapSelector::new().select("天気はどう", &catalog());

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_no_match_uses_fallback() {
        let selection = KeywordOverlapSelector::new()
            .with_fallback("faq")
            .select("天気はどう", &catalog())
            .unwrap();

        assert_eq!(selection, Selection { name: "faq".to_string(), score: 0 });
    }

    #[test]
    fn test_unknown_fallback_is_ignored() {
        let result = KeywordOverlapSelector::new()
            .with_fallback("internal_wiki")
            .select("天気はどう", &catalog());

        assert!(result.is_err());
    }

    #[test]
    fn test_empty_catalog() {
        let result = KeywordOverlapSelector::new()
            .select("認証", &KnowledgeBaseCatalog::default());

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_ties_go_to_first_configured() {
        let catalog = KnowledgeBaseCatalog::new(vec![
            KnowledgeBaseDefinition::new("alpha", "A", "shared topic"),
            KnowledgeBaseDefinition::new("beta", "B", "shared topic"),
        ])
        .unwrap();

        let selection = KeywordOverlapSelector::new()
            .select("shared", &catalog)
            .unwrap();

        assert_eq!(selection.name, "alpha");
    }
}
