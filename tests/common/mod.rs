// Shared fakes for the upstream services.
//
// Each fake counts its calls so tests can check which stages of a turn ran.

#![allow(dead_code)]

use bytes::Bytes;
use mockmate::{
    AppState, ChatModel, CompletionOptions, InterviewService, InterviewSettings, ServiceError,
    SpeechSynthesizer, Transcriber, Turn, UploadStore,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const FAKE_AUDIO: &[u8] = b"ID3-fake-mp3-frames";

pub struct FakeTranscriber {
    outcome: Result<String, String>,
    calls: AtomicUsize,
    last_mime: Mutex<Option<String>>,
}

#[async_trait::async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, _audio: &[u8], mime: &str) -> mockmate::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_mime.lock().unwrap() = Some(mime.to_string());
        self.outcome.clone().map_err(ServiceError::Transcription)
    }
}

pub struct FakeChat {
    outcome: Result<String, String>,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<Turn>>,
    last_options: Mutex<Option<CompletionOptions>>,
}

#[async_trait::async_trait]
impl ChatModel for FakeChat {
    async fn complete(
        &self,
        messages: &[Turn],
        options: &CompletionOptions,
    ) -> mockmate::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = messages.to_vec();
        *self.last_options.lock().unwrap() = Some(options.clone());
        self.outcome.clone().map_err(ServiceError::Completion)
    }
}

pub struct FakeSpeech {
    outcome: Result<Bytes, String>,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl SpeechSynthesizer for FakeSpeech {
    async fn synthesize(&self, _text: &str) -> mockmate::Result<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map_err(ServiceError::Synthesis)
    }

    fn mime_type(&self) -> &str {
        "audio/mp3"
    }
}

/// One set of fakes plus handles to inspect them after the fact
pub struct Fakes {
    pub transcriber: Arc<FakeTranscriber>,
    pub chat: Arc<FakeChat>,
    pub speech: Arc<FakeSpeech>,
}

impl Fakes {
    /// Transcription yields `heard`, the model replies `reply`
    pub fn new(heard: &str, reply: &str) -> Self {
        Self::with_outcomes(Ok(heard.to_string()), Ok(reply.to_string()), Ok(Bytes::from_static(FAKE_AUDIO)))
    }

    pub fn with_outcomes(
        heard: Result<String, String>,
        reply: Result<String, String>,
        audio: Result<Bytes, String>,
    ) -> Self {
        Self {
            transcriber: Arc::new(FakeTranscriber {
                outcome: heard,
                calls: AtomicUsize::new(0),
                last_mime: Mutex::new(None),
            }),
            chat: Arc::new(FakeChat {
                outcome: reply,
                calls: AtomicUsize::new(0),
                last_messages: Mutex::new(Vec::new()),
                last_options: Mutex::new(None),
            }),
            speech: Arc::new(FakeSpeech {
                outcome: audio,
                calls: AtomicUsize::new(0),
            }),
        }
    }

    pub fn service(&self) -> InterviewService {
        InterviewService::new(
            self.transcriber.clone(),
            self.chat.clone(),
            self.speech.clone(),
            InterviewSettings::default(),
        )
    }

    pub fn state(&self, upload_dir: &Path) -> AppState {
        let uploads = UploadStore::new(upload_dir).unwrap();
        AppState::new(self.service(), uploads, 1024 * 1024)
    }

    pub fn transcribe_calls(&self) -> usize {
        self.transcriber.calls.load(Ordering::SeqCst)
    }

    pub fn chat_calls(&self) -> usize {
        self.chat.calls.load(Ordering::SeqCst)
    }

    pub fn speech_calls(&self) -> usize {
        self.speech.calls.load(Ordering::SeqCst)
    }

    pub fn last_mime(&self) -> Option<String> {
        self.transcriber.last_mime.lock().unwrap().clone()
    }

    pub fn last_messages(&self) -> Vec<Turn> {
        self.chat.last_messages.lock().unwrap().clone()
    }

    pub fn last_options(&self) -> Option<CompletionOptions> {
        self.chat.last_options.lock().unwrap().clone()
    }
}

pub const BOUNDARY: &str = "mockmate-test-boundary";

/// Build a multipart body with an optional `audio` file part and optional `history` part
pub fn multipart_body(audio: Option<&[u8]>, history: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(audio) = audio {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"audio\"; filename=\"response.webm\"\r\n\
              Content-Type: audio/webm\r\n\r\n",
        );
        body.extend_from_slice(audio);
        body.extend_from_slice(b"\r\n");
    }

    if let Some(history) = history {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"history\"\r\n\r\n");
        body.extend_from_slice(history.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}
