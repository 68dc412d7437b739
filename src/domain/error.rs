use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("Timed out after {seconds}s: {operation}")]
    Timeout { operation: String, seconds: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn knowledge_base(message: impl Into<String>) -> Self {
        Self::KnowledgeBase(message.into())
    }

    pub fn timeout(operation: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            seconds,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the caller caused this error (as opposed to the system)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Message without the variant prefix, as returned to callers
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message }
            | Self::Configuration { message }
            | Self::Internal { message } => message.clone(),
            Self::KnowledgeBase(message) => message.clone(),
            Self::Timeout { .. } => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("kbName is required");
        assert_eq!(error.to_string(), "Validation error: kbName is required");
        assert_eq!(error.message(), "kbName is required");
        assert!(error.is_client_error());
    }

    #[test]
    fn test_timeout_error() {
        let error = DomainError::timeout("retrieve from knowledge base 'faq'", 30);
        assert_eq!(
            error.to_string(),
            "Timed out after 30s: retrieve from knowledge base 'faq'"
        );
        assert!(!error.is_client_error());
    }

    #[test]
    fn test_system_errors_are_not_client_errors() {
        assert!(!DomainError::knowledge_base("throttled").is_client_error());
        assert!(!DomainError::configuration("missing id").is_client_error());
        assert!(!DomainError::internal("boom").is_client_error());
    }
}
