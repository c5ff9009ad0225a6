//! Upstream AI service clients
//!
//! The orchestrator talks to three remote services through these traits:
//! - `Transcriber` - speech-to-text (Deepgram)
//! - `ChatModel` - chat completions (Groq, OpenAI-compatible)
//! - `SpeechSynthesizer` - streamed text-to-speech (Murf)

pub mod deepgram;
pub mod groq;
pub mod murf;
pub mod stream;

use crate::error::Result;
use crate::interview::Turn;
use bytes::Bytes;

pub use deepgram::DeepgramClient;
pub use groq::GroqClient;
pub use murf::MurfClient;
pub use stream::{collect_bounded, CollectError};

/// Sampling parameters for one completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    /// Token ceiling; `None` leaves it to the provider
    pub max_tokens: Option<u32>,
    /// Ask the model for a single JSON object
    pub json_mode: bool,
}

/// Speech-to-text backend
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe one complete audio payload. Empty string means nothing was heard.
    async fn transcribe(&self, audio: &[u8], mime: &str) -> Result<String>;
}

/// Chat language model
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: &[Turn], options: &CompletionOptions) -> Result<String>;
}

/// Text-to-speech backend
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text`, returning the complete encoded audio
    async fn synthesize(&self, text: &str) -> Result<Bytes>;

    /// MIME type of the bytes returned by `synthesize`
    fn mime_type(&self) -> &str;
}
