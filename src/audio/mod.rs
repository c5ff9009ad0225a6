pub mod encode;
pub mod upload;

pub use encode::data_uri;
pub use upload::{StoredUpload, UploadStore, DEFAULT_AUDIO_MIME};
