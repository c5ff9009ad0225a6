//! HTTP API for the interview frontend
//!
//! - POST /api/process-interview - Run one interview turn (multipart audio + history)
//! - POST /api/generate-score - Grade a finished transcript
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{ErrorResponse, ScoreRequest, SCORE_FAILURE_MESSAGE, TURN_FAILURE_MESSAGE};
pub use routes::create_router;
pub use state::AppState;
