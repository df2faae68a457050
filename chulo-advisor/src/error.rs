use std::time::Duration;

use crate::validation::InvalidInput;

/// The backend could not produce a usable suggestion. Callers may retry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdvisorUnavailable {
    #[error("pricing backend did not answer within {0:?}")]
    Timeout(Duration),

    #[error("pricing backend could not be reached: {0}")]
    Transport(String),

    #[error("pricing backend returned HTTP {0}")]
    Status(u16),

    #[error("pricing backend returned a malformed suggestion: {0}")]
    Malformed(String),

    #[error("pricing backend returned an inconsistent suggestion: {0}")]
    Inconsistent(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdvisorError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error(transparent)]
    Unavailable(#[from] AdvisorUnavailable),
}

/// Advisor construction errors
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("advisor.generative must be set when advisor.backend is \"generative\"")]
    MissingGenerativeConfig,

    #[error("invalid advisor.rules: {0}")]
    InvalidRules(String),

    #[error("HTTP client could not be built: {0}")]
    HttpClient(#[from] reqwest::Error),
}
