use super::prompts::{INTERVIEWER_PERSONA, SCORING_INSTRUCTIONS, SILENCE_REPLY, SILENCE_USER_TEXT};
use super::score::{parse_model_reply, ScoreReport};
use super::transcript::{Transcript, Turn};
use crate::audio::data_uri;
use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::services::{
    ChatModel, CompletionOptions, DeepgramClient, GroqClient, MurfClient, SpeechSynthesizer,
    Transcriber,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of one interview turn, as returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReply {
    pub user_text: String,
    pub ai_text: String,
    /// Synthesized reply as a `data:` URI; `None` for the silence fallback
    pub audio: Option<String>,
}

impl TurnReply {
    pub fn silence() -> Self {
        Self {
            user_text: SILENCE_USER_TEXT.to_string(),
            ai_text: SILENCE_REPLY.to_string(),
            audio: None,
        }
    }
}

/// Sampling settings for the two kinds of completion
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewSettings {
    pub reply_temperature: f32,
    pub reply_max_tokens: u32,
    pub score_temperature: f32,
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            reply_temperature: 0.5,
            reply_max_tokens: 100,
            score_temperature: 0.2,
        }
    }
}

/// Stateless coordinator for interview turns and end-of-session grading
pub struct InterviewService {
    transcriber: Arc<dyn Transcriber>,
    chat: Arc<dyn ChatModel>,
    speech: Arc<dyn SpeechSynthesizer>,
    settings: InterviewSettings,
}

impl InterviewService {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        chat: Arc<dyn ChatModel>,
        speech: Arc<dyn SpeechSynthesizer>,
        settings: InterviewSettings,
    ) -> Self {
        Self {
            transcriber,
            chat,
            speech,
            settings,
        }
    }

    /// Wire up the Deepgram, Groq and Murf clients from configuration
    pub fn from_config(cfg: &Config) -> Self {
        let http = reqwest::Client::new();
        let creds = &cfg.credentials;

        Self::new(
            Arc::new(DeepgramClient::with_client(
                http.clone(),
                creds.deepgram_api_key.clone(),
                &cfg.transcription,
            )),
            Arc::new(GroqClient::with_client(
                http.clone(),
                creds.groq_api_key.clone(),
                &cfg.chat,
            )),
            Arc::new(MurfClient::with_client(
                http,
                creds.murf_api_key.clone(),
                &cfg.speech,
            )),
            InterviewSettings {
                reply_temperature: cfg.chat.temperature,
                reply_max_tokens: cfg.chat.max_tokens,
                score_temperature: cfg.chat.score_temperature,
            },
        )
    }

    pub fn settings(&self) -> &InterviewSettings {
        &self.settings
    }

    /// Transcribe the answer, get the interviewer's reply, and voice it.
    ///
    /// Silent or blank audio short-circuits to the fallback reply without
    /// calling the chat model or the synthesizer.
    pub async fn process_turn(
        &self,
        audio: &[u8],
        mime: &str,
        transcript: &Transcript,
    ) -> Result<TurnReply> {
        let user_text = self.transcriber.transcribe(audio, mime).await?;
        if user_text.trim().is_empty() {
            info!("No speech detected, returning silence fallback");
            return Ok(TurnReply::silence());
        }
        info!("Transcription: {}", user_text);

        let messages = interviewer_messages(transcript, &user_text);
        let options = CompletionOptions {
            temperature: self.settings.reply_temperature,
            max_tokens: Some(self.settings.reply_max_tokens),
            json_mode: false,
        };
        let ai_text = self.chat.complete(&messages, &options).await?;
        if ai_text.trim().is_empty() {
            return Err(ServiceError::Completion("model returned an empty reply".to_string()));
        }
        info!("AI response: {}", ai_text);

        let speech = self.speech.synthesize(&ai_text).await?;
        let audio = data_uri(self.speech.mime_type(), &speech);

        Ok(TurnReply {
            user_text,
            ai_text,
            audio: Some(audio),
        })
    }

    /// Grade a finished session.
    ///
    /// The model's JSON reply is returned as-is; scores are not range-checked
    /// or coerced, only logged when they look wrong.
    pub async fn generate_score(&self, transcript: &Transcript) -> Result<Value> {
        let conversation = serde_json::to_string(transcript)
            .map_err(|e| ServiceError::Completion(e.to_string()))?;
        let messages = [Turn::system(SCORING_INSTRUCTIONS), Turn::user(conversation)];
        let options = CompletionOptions {
            temperature: self.settings.score_temperature,
            max_tokens: None,
            json_mode: true,
        };

        info!("Scoring transcript of {} turns", transcript.len());
        let content = self.chat.complete(&messages, &options).await?;
        let reply = parse_model_reply(&content)?;

        match ScoreReport::from_value(&reply) {
            Some(report) => {
                let out_of_range = report.out_of_range();
                if !out_of_range.is_empty() {
                    warn!("Model returned out-of-range scores: {:?}", out_of_range);
                }
            }
            None => warn!("Model score reply has an unexpected shape: {}", reply),
        }

        Ok(reply)
    }
}

/// Persona instruction, then the prior transcript, then the new answer
fn interviewer_messages(transcript: &Transcript, user_text: &str) -> Vec<Turn> {
    let mut messages = Vec::with_capacity(transcript.len() + 2);
    messages.push(Turn::system(INTERVIEWER_PERSONA));
    messages.extend(transcript.turns().iter().cloned());
    messages.push(Turn::user(user_text));
    messages
}
