//! Error types for analysis operations

use thiserror::Error;

/// Analysis pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Chat-completion layer error
    #[error("LLM error: {0}")]
    Llm(#[from] tickerlens_llm::LlmError),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Market data provider error
    #[error("Market data error: {0}")]
    MarketData(String),

    /// Tool invocation error
    #[error("Tool error: {0}")]
    Tool(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report rendering error
    #[error("Report error: {0}")]
    Report(String),
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MarketData("no quotes for XYZ".to_string());
        assert_eq!(err.to_string(), "Market data error: no quotes for XYZ");

        let err = Error::Config("temperature out of range".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: temperature out of range"
        );
    }

    #[test]
    fn test_llm_error_conversion() {
        let llm_err = tickerlens_llm::LlmError::AuthenticationFailed;
        let err: Error = llm_err.into();
        assert!(matches!(err, Error::Llm(_)));
    }
}
