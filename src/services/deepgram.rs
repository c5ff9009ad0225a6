use super::Transcriber;
use crate::config::TranscriptionConfig;
use crate::error::{Result, ServiceError};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};

#[derive(Debug, Default, Deserialize)]
struct ListenResponse {
    #[serde(default)]
    results: Option<ListenResults>,
}

#[derive(Debug, Default, Deserialize)]
struct ListenResults {
    #[serde(default)]
    channels: Vec<ListenChannel>,
}

#[derive(Debug, Default, Deserialize)]
struct ListenChannel {
    #[serde(default)]
    alternatives: Vec<ListenAlternative>,
}

#[derive(Debug, Default, Deserialize)]
struct ListenAlternative {
    #[serde(default)]
    transcript: String,
}

impl ListenResponse {
    /// Best transcript of the first channel; empty when the response has none
    fn into_transcript(self) -> String {
        self.results
            .and_then(|r| r.channels.into_iter().next())
            .and_then(|c| c.alternatives.into_iter().next())
            .map(|a| a.transcript)
            .unwrap_or_default()
    }
}

/// Deepgram prerecorded transcription over HTTP
#[derive(Clone)]
pub struct DeepgramClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    smart_format: bool,
}

impl DeepgramClient {
    pub fn new(api_key: impl Into<String>, cfg: &TranscriptionConfig) -> Self {
        Self::with_client(Client::new(), api_key, cfg)
    }

    pub fn with_client(client: Client, api_key: impl Into<String>, cfg: &TranscriptionConfig) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            smart_format: cfg.smart_format,
        }
    }
}

#[async_trait::async_trait]
impl Transcriber for DeepgramClient {
    async fn transcribe(&self, audio: &[u8], mime: &str) -> Result<String> {
        info!(
            "Sending {} bytes ({}) to Deepgram model {}",
            audio.len(),
            mime,
            self.model
        );

        let smart_format = if self.smart_format { "true" } else { "false" };
        let response = self
            .client
            .post(format!("{}/v1/listen", self.base_url))
            .query(&[("model", self.model.as_str()), ("smart_format", smart_format)])
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", mime)
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| ServiceError::Transcription(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Deepgram API error: {} {}", status, body);
            return Err(ServiceError::Transcription(format!("HTTP {}: {}", status, body)));
        }

        let listen: ListenResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Transcription(e.to_string()))?;

        let transcript = listen.into_transcript();
        debug!("Deepgram transcript: {:?}", transcript);

        Ok(transcript)
    }
}
