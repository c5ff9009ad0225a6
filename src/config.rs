use anyhow::Result;
use serde::Deserialize;

/// Environment variables that override file/default settings.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DEEPGRAM_API_KEY", "credentials.deepgram_api_key"),
    ("GROQ_API_KEY", "credentials.groq_api_key"),
    ("MURF_API_KEY", "credentials.murf_api_key"),
    ("PORT", "service.http.port"),
];

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "MockMate".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
    /// Largest accepted request body (audio uploads included)
    pub max_upload_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

/// API keys for the three upstream services. No defaults: startup fails without them.
#[derive(Clone, Deserialize)]
pub struct CredentialsConfig {
    pub deepgram_api_key: String,
    pub groq_api_key: String,
    pub murf_api_key: String,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("deepgram_api_key", &"<redacted>")
            .field("groq_api_key", &"<redacted>")
            .field("murf_api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub base_url: String,
    pub model: String,
    pub smart_format: bool,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepgram.com".to_string(),
            model: "nova-2".to_string(),
            smart_format: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub base_url: String,
    pub model: String,
    /// Sampling temperature for interviewer replies
    pub temperature: f32,
    /// Token ceiling for interviewer replies
    pub max_tokens: u32,
    /// Sampling temperature for the end-of-session grading call
    pub score_temperature: f32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.5,
            max_tokens: 100,
            score_temperature: 0.2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub base_url: String,
    pub voice_id: String,
    pub style: String,
    pub locale: String,
    pub model: String,
    pub format: String,
    pub sample_rate: u32,
    pub channel_type: String,
    /// Upper bound on buffered synthesized audio per reply
    pub max_audio_bytes: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "https://global.api.murf.ai".to_string(),
            voice_id: "en-US-natalie".to_string(),
            style: "Promo".to_string(),
            locale: "en-US".to_string(),
            model: "FALCON".to_string(),
            format: "MP3".to_string(),
            sample_rate: 24000,
            channel_type: "MONO".to_string(),
            max_audio_bytes: 10 * 1024 * 1024,
        }
    }
}

impl SpeechConfig {
    /// MIME type used when inlining audio of the configured format
    pub fn mime_type(&self) -> &'static str {
        match self.format.to_ascii_uppercase().as_str() {
            "MP3" => "audio/mp3",
            "WAV" => "audio/wav",
            "OGG" => "audio/ogg",
            "FLAC" => "audio/flac",
            _ => "audio/mpeg",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadsConfig {
    pub dir: String,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: "uploads".to_string(),
        }
    }
}

impl Config {
    /// Load from an optional config file, then apply environment overrides.
    pub fn load(path: &str) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    pub fn load_with_env<F>(path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder =
            config::Config::builder().add_source(config::File::with_name(path).required(false));

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, lookup(var))?;
        }

        let settings = builder.build()?;

        Ok(settings.try_deserialize()?)
    }
}
