// Integration tests for the upstream service clients
//
// Each client is pointed at a stub axum server on 127.0.0.1:0 that records
// the request it receives and answers with a canned status and body.

use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Router;
use bytes::Bytes;
use mockmate::config::{ChatConfig, SpeechConfig, TranscriptionConfig};
use mockmate::services::{DeepgramClient, GroqClient, MurfClient};
use mockmate::{ChatModel, CompletionOptions, ServiceError, SpeechSynthesizer, Transcriber, Turn};
use serde_json::Value;

#[derive(Debug, Clone)]
struct Captured {
    method: String,
    path: String,
    query: String,
    headers: HeaderMap,
    body: Bytes,
}

impl Captured {
    fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Clone)]
struct Stub {
    captured: Arc<Mutex<Vec<Captured>>>,
    status: StatusCode,
    body: Bytes,
}

impl Stub {
    fn only_request(&self) -> Captured {
        let captured = self.captured.lock().unwrap();
        assert_eq!(captured.len(), 1, "expected exactly one upstream request");
        captured[0].clone()
    }
}

async fn record(State(stub): State<Stub>, request: Request) -> (StatusCode, Bytes) {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap();

    stub.captured.lock().unwrap().push(Captured {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().unwrap_or_default().to_string(),
        headers: parts.headers,
        body,
    });

    (stub.status, stub.body.clone())
}

/// Start a stub answering every request with `status` and `body`; returns its base URL
async fn spawn_stub(status: StatusCode, body: impl Into<Bytes>) -> (String, Stub) {
    let stub = Stub {
        captured: Arc::default(),
        status,
        body: body.into(),
    };
    let app = Router::new().fallback(record).with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), stub)
}

fn deepgram(base_url: String) -> DeepgramClient {
    let cfg = TranscriptionConfig {
        base_url,
        ..TranscriptionConfig::default()
    };
    DeepgramClient::new("dg-key", &cfg)
}

fn groq(base_url: String) -> GroqClient {
    let cfg = ChatConfig {
        base_url: format!("{base_url}/openai/v1"),
        ..ChatConfig::default()
    };
    GroqClient::new("groq-key", &cfg)
}

fn murf(base_url: String, max_audio_bytes: usize) -> MurfClient {
    let cfg = SpeechConfig {
        base_url,
        max_audio_bytes,
        ..SpeechConfig::default()
    };
    MurfClient::new("murf-key", &cfg)
}

fn json_mode() -> CompletionOptions {
    CompletionOptions {
        temperature: 0.2,
        max_tokens: None,
        json_mode: true,
    }
}

#[tokio::test]
async fn test_deepgram_request_and_transcript() {
    let reply = r#"{"results": {"channels": [{"alternatives": [{"transcript": "I write Rust.", "confidence": 0.98}]}]}}"#;
    let (base, stub) = spawn_stub(StatusCode::OK, reply).await;

    let text = deepgram(base)
        .transcribe(b"webm-bytes", "audio/webm")
        .await
        .unwrap();
    assert_eq!(text, "I write Rust.");

    let req = stub.only_request();
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/v1/listen");
    assert!(req.query.contains("model=nova-2"), "{}", req.query);
    assert!(req.query.contains("smart_format=true"), "{}", req.query);
    assert_eq!(req.header("authorization"), "Token dg-key");
    assert_eq!(req.header("content-type"), "audio/webm");
    assert_eq!(&req.body[..], b"webm-bytes");
}

#[tokio::test]
async fn test_deepgram_without_alternatives_is_silence() {
    let (base, _stub) = spawn_stub(StatusCode::OK, r#"{"results": {"channels": []}}"#).await;

    let text = deepgram(base).transcribe(b"x", "audio/webm").await.unwrap();
    assert_eq!(text, "");
}

#[tokio::test]
async fn test_deepgram_error_status() {
    let (base, _stub) = spawn_stub(StatusCode::UNAUTHORIZED, r#"{"err_code": "INVALID_AUTH"}"#).await;

    let err = deepgram(base).transcribe(b"x", "audio/webm").await.unwrap_err();
    assert!(matches!(err, ServiceError::Transcription(_)));
    assert!(err.to_string().contains("INVALID_AUTH"), "{err}");
}

#[tokio::test]
async fn test_groq_request_and_reply() {
    let reply = r#"{
        "choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"technical\": 7}"}}],
        "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
    }"#;
    let (base, stub) = spawn_stub(StatusCode::OK, reply).await;

    let messages = vec![Turn::system("grade"), Turn::user("[]")];
    let content = groq(base).complete(&messages, &json_mode()).await.unwrap();
    assert_eq!(content, r#"{"technical": 7}"#);

    let req = stub.only_request();
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/openai/v1/chat/completions");
    assert_eq!(req.header("authorization"), "Bearer groq-key");
    assert!(req.header(header::CONTENT_TYPE.as_str()).starts_with("application/json"));

    let body = req.json();
    assert_eq!(body["model"], "llama-3.1-8b-instant");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "[]");
    assert_eq!(body["response_format"]["type"], "json_object");
    assert!(body.get("max_tokens").is_none());
}

#[tokio::test]
async fn test_groq_empty_choices_is_an_error() {
    let (base, _stub) = spawn_stub(StatusCode::OK, r#"{"choices": []}"#).await;

    let err = groq(base)
        .complete(&[Turn::user("hi")], &json_mode())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Completion(_)));
    assert!(err.to_string().contains("no choices in response"), "{err}");
}

#[tokio::test]
async fn test_groq_null_content_is_an_error() {
    let reply = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
    let (base, _stub) = spawn_stub(StatusCode::OK, reply).await;

    let err = groq(base)
        .complete(&[Turn::user("hi")], &json_mode())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Completion(_)));
    assert!(err.to_string().contains("first choice has no content"), "{err}");
}

#[tokio::test]
async fn test_groq_error_status() {
    let (base, _stub) = spawn_stub(StatusCode::TOO_MANY_REQUESTS, "rate limited").await;

    let err = groq(base)
        .complete(&[Turn::user("hi")], &json_mode())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Completion(_)));
    assert!(err.to_string().contains("rate limited"), "{err}");
}

#[tokio::test]
async fn test_murf_request_and_streamed_audio() {
    let audio = vec![0xFFu8; 3000];
    let (base, stub) = spawn_stub(StatusCode::OK, audio.clone()).await;

    let client = murf(base, 1024 * 1024);
    let bytes = client.synthesize("Tell me about yourself.").await.unwrap();
    assert_eq!(&bytes[..], &audio[..]);
    assert_eq!(client.mime_type(), "audio/mp3");

    let req = stub.only_request();
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/v1/speech/stream");
    assert_eq!(req.header("api-key"), "murf-key");

    let body = req.json();
    assert_eq!(body["voiceId"], "en-US-natalie");
    assert_eq!(body["style"], "Promo");
    assert_eq!(body["text"], "Tell me about yourself.");
    assert_eq!(body["multiNativeLocale"], "en-US");
    assert_eq!(body["model"], "FALCON");
    assert_eq!(body["format"], "MP3");
    assert_eq!(body["sampleRate"], 24000);
    assert_eq!(body["channelType"], "MONO");
}

#[tokio::test]
async fn test_murf_forbidden_is_synthesis_error() {
    let (base, _stub) = spawn_stub(StatusCode::FORBIDDEN, "invalid api key").await;

    let err = murf(base, 1024).synthesize("hello").await.unwrap_err();
    assert!(matches!(err, ServiceError::Synthesis(_)));
    assert_eq!(err.stage(), "synthesis");
    assert!(err.to_string().contains("invalid api key"), "{err}");
}

#[tokio::test]
async fn test_murf_oversized_stream_is_synthesis_error() {
    let (base, _stub) = spawn_stub(StatusCode::OK, vec![1u8; 64]).await;

    let err = murf(base, 16).synthesize("hello").await.unwrap_err();
    assert!(matches!(err, ServiceError::Synthesis(_)));
}
