//! Knowledge base validation utilities

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::error::DomainError;

/// Maximum length for knowledge base names
pub const MAX_KB_NAME_LENGTH: usize = 64;

/// Default number of results when the caller does not specify one
pub const DEFAULT_MAX_RESULTS: u32 = 5;

/// Upper bound accepted by the Retrieve API for `numberOfResults`
pub const MAX_RESULTS_LIMIT: u32 = 100;

/// Knowledge base names: lowercase alphanumerics, underscores and hyphens
static KB_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("valid regex"));

/// Knowledge base validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum KnowledgeBaseValidationError {
    /// Name is empty
    EmptyName,
    /// Name exceeds maximum length
    NameTooLong { length: usize, max: usize },
    /// Name contains invalid characters
    InvalidNameFormat { name: String },
    /// Name is well-formed but not configured
    UnknownKnowledgeBase { name: String },
    /// Query is empty or whitespace
    EmptyQuery,
    /// max_results outside the accepted range
    InvalidMaxResults { value: i64, min: u32, max: u32 },
}

impl fmt::Display for KnowledgeBaseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "kbName is required"),
            Self::NameTooLong { length, max } => {
                write!(
                    f,
                    "Knowledge base name too long: {} characters (max {})",
                    length, max
                )
            }
            Self::InvalidNameFormat { name } => {
                write!(
                    f,
                    "Invalid knowledge base name '{}': must be lowercase alphanumeric with underscores or hyphens",
                    name
                )
            }
            Self::UnknownKnowledgeBase { name } => {
                write!(f, "Unknown knowledge base: {}", name)
            }
            Self::EmptyQuery => write!(f, "query is required"),
            Self::InvalidMaxResults { value, min, max } => {
                write!(
                    f,
                    "Invalid maxResults {}: must be between {} and {}",
                    value, min, max
                )
            }
        }
    }
}

impl std::error::Error for KnowledgeBaseValidationError {}

impl From<KnowledgeBaseValidationError> for DomainError {
    fn from(err: KnowledgeBaseValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Validate the shape of a knowledge base name
pub fn validate_knowledge_base_name(name: &str) -> Result<(), KnowledgeBaseValidationError> {
    if name.is_empty() {
        return Err(KnowledgeBaseValidationError::EmptyName);
    }

    if name.len() > MAX_KB_NAME_LENGTH {
        return Err(KnowledgeBaseValidationError::NameTooLong {
            length: name.len(),
            max: MAX_KB_NAME_LENGTH,
        });
    }

    if !KB_NAME_PATTERN.is_match(name) {
        return Err(KnowledgeBaseValidationError::InvalidNameFormat {
            name: name.to_string(),
        });
    }

    Ok(())
}

/// Validate a search query, returning it trimmed
pub fn validate_query(query: &str) -> Result<&str, KnowledgeBaseValidationError> {
    let trimmed = query.trim();

    if trimmed.is_empty() {
        return Err(KnowledgeBaseValidationError::EmptyQuery);
    }

    Ok(trimmed)
}

/// Validate max_results, applying the default when absent
pub fn validate_max_results(value: Option<i64>) -> Result<u32, KnowledgeBaseValidationError> {
    const MIN: u32 = 1;

    let Some(value) = value else {
        return Ok(DEFAULT_MAX_RESULTS);
    };

    if value < MIN as i64 || value > MAX_RESULTS_LIMIT as i64 {
        return Err(KnowledgeBaseValidationError::InvalidMaxResults {
            value,
            min: MIN,
            max: MAX_RESULTS_LIMIT,
        });
    }

    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_kb_names() {
        assert!(validate_knowledge_base_name("a").is_ok());
        assert!(validate_knowledge_base_name("product_docs").is_ok());
        assert!(validate_knowledge_base_name("faq").is_ok());
        assert!(validate_knowledge_base_name("internal-wiki-v2").is_ok());
    }

    #[test]
    fn test_invalid_kb_names() {
        assert!(matches!(
            validate_knowledge_base_name(""),
            Err(KnowledgeBaseValidationError::EmptyName)
        ));

        let long_name = "a".repeat(65);
        assert!(matches!(
            validate_knowledge_base_name(&long_name),
            Err(KnowledgeBaseValidationError::NameTooLong { .. })
        ));

        assert!(matches!(
            validate_knowledge_base_name("Product Docs"),
            Err(KnowledgeBaseValidationError::InvalidNameFormat { .. })
        ));

        assert!(matches!(
            validate_knowledge_base_name("_faq"),
            Err(KnowledgeBaseValidationError::InvalidNameFormat { .. })
        ));
    }

    #[test]
    fn test_query_validation() {
        assert_eq!(validate_query("  認証  ").unwrap(), "認証");
        assert_eq!(
            validate_query("   "),
            Err(KnowledgeBaseValidationError::EmptyQuery)
        );
        assert_eq!(validate_query(""), Err(KnowledgeBaseValidationError::EmptyQuery));
    }

    #[test]
    fn test_max_results_validation() {
        assert_eq!(validate_max_results(None).unwrap(), DEFAULT_MAX_RESULTS);
        assert_eq!(validate_max_results(Some(1)).unwrap(), 1);
        assert_eq!(validate_max_results(Some(100)).unwrap(), 100);

        assert!(validate_max_results(Some(0)).is_err());
        assert!(validate_max_results(Some(-3)).is_err());
        assert!(validate_max_results(Some(101)).is_err());
    }

    #[test]
    fn test_error_messages_are_non_empty() {
        assert_eq!(
            KnowledgeBaseValidationError::EmptyName.to_string(),
            "kbName is required"
        );
        assert_eq!(
            KnowledgeBaseValidationError::UnknownKnowledgeBase {
                name: "wiki".to_string()
            }
            .to_string(),
            "Unknown knowledge base: wiki"
        );
    }
}
