// Error types for repocards.
// Covers GitHub API failures, configuration problems, and output errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoCardsError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<figment::Error> for RepoCardsError {
    fn from(err: figment::Error) -> Self {
        RepoCardsError::Config(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, RepoCardsError>;
