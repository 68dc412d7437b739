//! Query shaping applied before retrieval: decomposition, keyword extraction
//! and keyword enhancement

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Queries shorter than this (in characters) are never decomposed
pub const QUERY_SPLIT_THRESHOLD: usize = 50;

/// Fragments shorter than this (in characters) are dropped after splitting
pub const MIN_SUB_QUERY_LENGTH: usize = 5;

/// Number of extracted keywords appended to each sub-query
pub const ENHANCEMENT_KEYWORD_LIMIT: usize = 3;

static SPLIT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // sentence punctuation
        r"[。！？\n]",
        // connective phrases
        r"(?:、また|、そして)",
        // topic markers
        r"(?:について|に関して)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9_]{2,}").expect("valid regex"));

static KATAKANA_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ァ-ヶー]{3,}").expect("valid regex"));

static BRACKETED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[「『(]([^」』)]+)[」』)]").expect("valid regex"));

/// Split a long query into sub-queries.
///
/// Returns the original query alone when it is short or when splitting does
/// not yield at least two usable fragments.
pub fn split_query(query: &str) -> Vec<String> {
    if query.chars().count() < QUERY_SPLIT_THRESHOLD {
        return vec![query.to_string()];
    }

    let mut parts = vec![query.to_string()];

    for pattern in SPLIT_PATTERNS.iter() {
        parts = parts
            .iter()
            .flat_map(|part| pattern.split(part))
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
    }

    let parts = dedup_preserving_order(
        parts
            .into_iter()
            .filter(|p| p.chars().count() >= MIN_SUB_QUERY_LENGTH),
    );

    if parts.len() > 1 {
        parts
    } else {
        vec![query.to_string()]
    }
}

/// Extract terms worth matching literally: identifiers (API names, error
/// codes), katakana loanwords and bracketed phrases.
pub fn extract_keywords(query: &str) -> Vec<String> {
    let identifiers = IDENTIFIER_PATTERN.find_iter(query).map(|m| m.as_str());
    let katakana = KATAKANA_PATTERN.find_iter(query).map(|m| m.as_str());
    let bracketed = BRACKETED_PATTERN
        .captures_iter(query)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str());

    dedup_preserving_order(
        identifiers
            .chain(katakana)
            .chain(bracketed)
            .map(str::to_string),
    )
}

/// Append the leading keywords to a sub-query
pub fn enhance_query(sub_query: &str, keywords: &[String]) -> String {
    if keywords.is_empty() {
        return sub_query.to_string();
    }

    let suffix = keywords
        .iter()
        .take(ENHANCEMENT_KEYWORD_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    format!("{} {}", sub_query, suffix)
}

fn dedup_preserving_order(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(item.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_query_is_not_split() {
        assert_eq!(split_query("認証について検索して"), vec!["認証について検索して"]);
    }

    #[test]
    fn test_long_query_is_split_on_punctuation_and_topic_markers() {
        let query = "認証機能の設定方法について詳しく知りたいです。\
                     また、ログイン時にエラーが発生した場合の対処方法も教えてください。";
        assert!(query.chars().count() >= QUERY_SPLIT_THRESHOLD);

        let parts = split_query(query);

        assert_eq!(
            parts,
            vec![
                "認証機能の設定方法",
                "詳しく知りたいです",
                "また、ログイン時にエラーが発生した場合の対処方法も教えてください",
            ]
        );
    }

    #[test]
    fn test_long_query_without_separators_is_kept_whole() {
        let query = "a".repeat(60);
        assert_eq!(split_query(&query), vec![query.clone()]);
    }

    #[test]
    fn test_short_fragments_are_dropped() {
        // Only one fragment survives the length filter, so the original is kept
        let query = format!("短い。{}", "長い説明文がここに続きます".repeat(4));
        assert_eq!(split_query(&query), vec![query.clone()]);
    }

    #[test]
    fn test_extract_keywords() {
        let keywords = extract_keywords("OAuth2のトークン「refresh_token」の使い方");
        assert_eq!(keywords, vec!["OAuth2", "refresh_token", "トークン"]);
    }

    #[test]
    fn test_extract_keywords_ignores_short_terms() {
        assert!(extract_keywords("ID と PW の違い").is_empty());
    }

    #[test]
    fn test_extract_bracketed_phrase() {
        let keywords = extract_keywords("『二段階認証』の設定");
        assert_eq!(keywords, vec!["二段階認証"]);
    }

    #[test]
    fn test_enhance_query() {
        let keywords = vec![
            "OAuth2".to_string(),
            "JWT".to_string(),
            "トークン".to_string(),
            "SAML".to_string(),
        ];

        assert_eq!(enhance_query("認証", &keywords), "認証 OAuth2 JWT トークン");
        assert_eq!(enhance_query("認証", &[]), "認証");
    }
}
