use thiserror::Error;

/// Errors from the retrieval layer (embedding model and vector index).
///
/// Every variant is recoverable from the caller's point of view: the
/// similarity lookup converts them into the keyword fallback path.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("vector index error: {0}")]
    Index(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("vector search unavailable")]
    Unavailable,
}

/// Errors related to jurisdiction profiles.
#[derive(Debug, Error)]
pub enum JurisdictionError {
    #[error("jurisdiction not found: '{0}'")]
    NotFound(String),

    #[error("jurisdiction '{0}' already exists")]
    AlreadyExists(String),

    #[error("invalid jurisdiction code: '{0}'")]
    InvalidCode(String),

    #[error("invalid profile '{code}': {reason}")]
    InvalidProfile { code: String, reason: String },

    #[error("profile parse error: {0}")]
    Parse(String),

    #[error("filesystem error: {0}")]
    FileSystem(String),
}

/// Errors from loading or saving `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),

    #[error("config serialize error: {0}")]
    Serialize(String),

    #[error("filesystem error: {0}")]
    FileSystem(String),

    #[error("unknown state code: '{0}'")]
    UnknownState(String),
}

/// Errors surfaced by the navigator when it cannot produce an answer at all.
#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("empty query after sanitization")]
    EmptyQuery,

    #[error("no guide registered for '{0}' and no generic guide available")]
    NoGuide(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_error_display() {
        let err = RetrievalError::Index("table missing".to_string());
        assert_eq!(err.to_string(), "vector index error: table missing");
    }

    #[test]
    fn test_jurisdiction_error_display() {
        let err = JurisdictionError::InvalidProfile {
            code: "TX".to_string(),
            reason: "source_url must use https".to_string(),
        };
        assert!(err.to_string().contains("TX"));
        assert!(err.to_string().contains("https"));
    }

    #[test]
    fn test_navigator_error_display() {
        let err = NavigatorError::NoGuide("ZZ".to_string());
        assert!(err.to_string().contains("'ZZ'"));
    }
}
