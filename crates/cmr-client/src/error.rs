//! Error types for CMR requests.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmrError {
    #[error("Launchpad token error: {0}")]
    Token(String),

    #[error("Unknown CMR environment '{0}' (expected ops, uat or sit)")]
    UnknownEnvironment(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to obtain collection ShortName for concept-id '{0}'")]
    MissingShortName(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CmrResult<T> = Result<T, CmrError>;
