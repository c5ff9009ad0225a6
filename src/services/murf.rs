use super::{collect_bounded, SpeechSynthesizer};
use crate::config::SpeechConfig;
use crate::error::{Result, ServiceError};
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StreamRequest<'a> {
    voice_id: &'a str,
    style: &'a str,
    text: &'a str,
    multi_native_locale: &'a str,
    model: &'a str,
    format: &'a str,
    sample_rate: u32,
    channel_type: &'a str,
}

/// Murf streaming text-to-speech.
///
/// The response body is streamed but buffered completely before returning.
#[derive(Clone)]
pub struct MurfClient {
    client: Client,
    api_key: String,
    base_url: String,
    config: SpeechConfig,
}

impl MurfClient {
    pub fn new(api_key: impl Into<String>, cfg: &SpeechConfig) -> Self {
        Self::with_client(Client::new(), api_key, cfg)
    }

    pub fn with_client(client: Client, api_key: impl Into<String>, cfg: &SpeechConfig) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            config: cfg.clone(),
        }
    }

    fn request<'a>(&'a self, text: &'a str) -> StreamRequest<'a> {
        StreamRequest {
            voice_id: &self.config.voice_id,
            style: &self.config.style,
            text,
            multi_native_locale: &self.config.locale,
            model: &self.config.model,
            format: &self.config.format,
            sample_rate: self.config.sample_rate,
            channel_type: &self.config.channel_type,
        }
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for MurfClient {
    async fn synthesize(&self, text: &str) -> Result<Bytes> {
        info!(
            "Generating audio with Murf {} stream ({})",
            self.config.model, self.config.voice_id
        );

        let response = self
            .client
            .post(format!("{}/v1/speech/stream", self.base_url))
            .header("api-key", &self.api_key)
            .json(&self.request(text))
            .send()
            .await
            .map_err(|e| ServiceError::Synthesis(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            error!("Murf API error: {} {}", status, body);
            return Err(ServiceError::Synthesis(format!("HTTP {}: {}", status, body)));
        }

        let audio = collect_bounded(response.bytes_stream(), self.config.max_audio_bytes)
            .await
            .map_err(|e| ServiceError::Synthesis(e.to_string()))?;

        info!("Stream ended, {} bytes of audio ready", audio.len());

        Ok(audio)
    }

    fn mime_type(&self) -> &str {
        self.config.mime_type()
    }
}
