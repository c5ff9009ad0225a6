use crate::audio::UploadStore;
use crate::interview::InterviewService;
use std::sync::Arc;

/// Shared application state for HTTP handlers.
///
/// Holds no per-session data: the transcript travels with each request.
#[derive(Clone)]
pub struct AppState {
    /// Turn and scoring pipeline
    pub service: Arc<InterviewService>,

    /// Where uploaded audio is spooled while a turn runs
    pub uploads: UploadStore,

    /// Request body limit for audio uploads
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(service: InterviewService, uploads: UploadStore, max_upload_bytes: usize) -> Self {
        Self {
            service: Arc::new(service),
            uploads,
            max_upload_bytes,
        }
    }
}
