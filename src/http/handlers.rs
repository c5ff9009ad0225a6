use super::state::AppState;
use crate::audio::{StoredUpload, DEFAULT_AUDIO_MIME};
use crate::error::{Result, ServiceError};
use crate::interview::{Transcript, TurnReply};
use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, info_span, Instrument};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body text for any failed turn
pub const TURN_FAILURE_MESSAGE: &str = "Error processing interview";

/// Error text for any failed scoring request
pub const SCORE_FAILURE_MESSAGE: &str = "Failed to generate score";

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    /// Stringified transcript (JSON array of turns)
    pub history: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/process-interview
/// Multipart `audio` + `history`; returns `{ userText, aiText, audio }`
pub async fn process_interview(State(state): State<AppState>, multipart: Multipart) -> Response {
    let turn_id = uuid::Uuid::new_v4();
    let span = info_span!("turn", %turn_id);

    match run_turn(&state, multipart).instrument(span).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => {
            error!(%turn_id, stage = e.stage(), "Error processing interview: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, TURN_FAILURE_MESSAGE).into_response()
        }
    }
}

/// The upload is dropped (and its file removed) when this returns, on every path.
async fn run_turn(state: &AppState, mut multipart: Multipart) -> Result<TurnReply> {
    let mut upload: Option<StoredUpload> = None;
    let mut history: Option<String> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::Upload(e.to_string()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("audio") => {
                let mime = field.content_type().unwrap_or(DEFAULT_AUDIO_MIME).to_string();
                let mut stored = state.uploads.create(mime)?;
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| ServiceError::Upload(e.to_string()))?
                {
                    stored.write_chunk(&chunk).await?;
                }
                stored.finish().await?;
                upload = Some(stored);
            }
            Some("history") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServiceError::Upload(e.to_string()))?;
                history = Some(text);
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| ServiceError::Upload("missing audio field".to_string()))?;
    let transcript = Transcript::from_history(history.as_deref())?;

    info!(
        "Audio received: {} ({} bytes, {})",
        upload.path().display(),
        upload.len(),
        upload.mime()
    );

    let audio = upload.read().await?;
    state
        .service
        .process_turn(&audio, upload.mime(), &transcript)
        .await
}

/// POST /api/generate-score
/// JSON `{ history }`; returns the model's grading object unchanged
pub async fn generate_score(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ScoreRequest>, JsonRejection>,
) -> Response {
    let result = match payload {
        Ok(Json(req)) => score(&state, req).await,
        Err(rejection) => Err(ServiceError::Upload(rejection.body_text())),
    };

    match result {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            error!(stage = e.stage(), "Scoring error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: SCORE_FAILURE_MESSAGE.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn score(state: &AppState, req: ScoreRequest) -> Result<Value> {
    let transcript = Transcript::from_history(req.history.as_deref())?;
    state.service.generate_score(&transcript).await
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
