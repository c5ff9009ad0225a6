pub mod audio;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod interview;
pub mod services;

pub use audio::{StoredUpload, UploadStore};
pub use client::{ClientError, InterviewClient};
pub use config::Config;
pub use error::{Result, ServiceError};
pub use http::{create_router, AppState};
pub use interview::{
    InterviewService, InterviewSettings, Role, ScoreReport, Transcript, Turn, TurnReply,
};
pub use services::{ChatModel, CompletionOptions, SpeechSynthesizer, Transcriber};
