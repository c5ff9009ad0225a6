//! Error types for the interview pipeline
//!
//! Failures are classified by the stage that produced them so logs say which
//! upstream dependency broke. The HTTP layer still answers every one of them
//! with the same generic 500.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Speech-to-text request or response failure
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// Language model request or response failure
    #[error("chat completion failed: {0}")]
    Completion(String),

    /// Text-to-speech request or stream failure
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    /// The client's serialized transcript could not be parsed
    #[error("invalid history: {0}")]
    InvalidHistory(#[source] serde_json::Error),

    /// The model's grading reply was not the expected JSON object
    #[error("invalid score report: {0}")]
    InvalidScore(#[source] serde_json::Error),

    /// Multipart body was unreadable or incomplete
    #[error("upload error: {0}")]
    Upload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Short label for the failing stage, used as a structured log field
    pub fn stage(&self) -> &'static str {
        match self {
            ServiceError::Transcription(_) => "transcription",
            ServiceError::Completion(_) => "completion",
            ServiceError::Synthesis(_) => "synthesis",
            ServiceError::InvalidHistory(_) => "history",
            ServiceError::InvalidScore(_) => "score",
            ServiceError::Upload(_) => "upload",
            ServiceError::Io(_) => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
