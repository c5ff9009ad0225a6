//! Interview domain
//!
//! - `Transcript` / `Turn`: the dialogue the client carries between requests
//! - `InterviewService`: sequences transcription, chat completion and speech
//!   synthesis for a turn, and grades a finished session
//! - `ScoreReport`: typed view of the grading the model returns

mod orchestrator;
pub mod prompts;
mod score;
mod transcript;

pub use orchestrator::{InterviewService, InterviewSettings, TurnReply};
pub use score::{parse_model_reply, ScoreReport};
pub use transcript::{Role, Transcript, Turn};
