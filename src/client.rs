//! Client side of the interview protocol
//!
//! `InterviewClient` keeps the transcript for one session, seeded with the
//! opening prompt, and sends it along with every request; the server keeps
//! nothing between calls.

use crate::interview::{ScoreReport, Transcript, TurnReply};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Recordings smaller than this are treated as accidental taps and not uploaded
pub const MIN_UPLOAD_BYTES: usize = 500;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to encode transcript: {0}")]
    Encode(#[from] serde_json::Error),

    /// Scoring requires at least one answered question
    #[error("answer at least one question before finishing")]
    NothingAnswered,
}

#[derive(Serialize)]
struct ScoreBody {
    history: String,
}

pub struct InterviewClient {
    http: Client,
    base_url: String,
    transcript: Transcript,
}

impl InterviewClient {
    /// Start a session against the server at `base_url` (e.g. `http://localhost:3000`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transcript: Transcript::opening(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Upload one recorded answer.
    ///
    /// Returns `None` without contacting the server when the recording is too
    /// short. Otherwise the reply's user and assistant texts are appended to
    /// the transcript.
    pub async fn answer(&mut self, audio: Vec<u8>) -> Result<Option<TurnReply>, ClientError> {
        if audio.len() < MIN_UPLOAD_BYTES {
            warn!("Audio too short ({} bytes), not uploading", audio.len());
            return Ok(None);
        }

        let part = Part::bytes(audio)
            .file_name("response.webm")
            .mime_str("audio/webm")?;
        let form = Form::new()
            .part("audio", part)
            .text("history", self.transcript.to_history()?);

        let response = self
            .http
            .post(format!("{}/api/process-interview", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let reply: TurnReply = check_status(response).await?.json().await?;
        self.transcript
            .record_exchange(reply.user_text.clone(), reply.ai_text.clone());

        info!(
            "Turn complete, {} questions answered",
            self.transcript.answered_questions()
        );

        Ok(Some(reply))
    }

    /// Ask the server to grade the session
    pub async fn finish(&self) -> Result<ScoreReport, ClientError> {
        if self.transcript.answered_questions() == 0 {
            return Err(ClientError::NothingAnswered);
        }

        let body = ScoreBody {
            history: self.transcript.to_history()?,
        };

        let response = self
            .http
            .post(format!("{}/api/generate-score", self.base_url))
            .json(&body)
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}
