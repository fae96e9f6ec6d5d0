//! Error handling for the job scout application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobScoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Posting source '{source_name}' unavailable: {message}")]
    SourceUnavailable { source_name: String, message: String },

    #[error("No postings found")]
    EmptyResultSet,

    #[error("Text generation service unavailable after {} attempt(s)", attempts.len())]
    GenerationServiceUnavailable { attempts: Vec<GenerationAttempt> },

    #[error("Vectorizer error: {0}")]
    Vectorizer(String),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// One failed call against a text-generation model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationAttempt {
    pub model: String,
    pub error: String,
}

impl std::fmt::Display for GenerationAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.model, self.error)
    }
}

pub type Result<T> = std::result::Result<T, JobScoutError>;

/// Convert anyhow errors raised inside adapters to our custom error type
impl From<anyhow::Error> for JobScoutError {
    fn from(err: anyhow::Error) -> Self {
        JobScoutError::Network(format!("{:#}", err))
    }
}
