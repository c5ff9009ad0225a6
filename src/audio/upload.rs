use crate::error::Result;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// MIME type assumed for uploads that don't declare one
pub const DEFAULT_AUDIO_MIME: &str = "audio/webm";

/// Directory holding transient audio uploads
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Open the store, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        info!("Upload directory: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create an empty upload file to be filled with `write_chunk`
    pub fn create(&self, mime: impl Into<String>) -> Result<StoredUpload> {
        let file = Builder::new()
            .prefix("upload-")
            .tempfile_in(&self.dir)?;
        let writer = tokio::fs::File::from_std(file.as_file().try_clone()?);

        debug!("Created upload file: {}", file.path().display());

        Ok(StoredUpload {
            writer,
            file,
            mime: mime.into(),
            len: 0,
        })
    }
}

/// One uploaded audio payload on disk.
///
/// The file is removed when this value is dropped, whichever way the turn ends.
pub struct StoredUpload {
    // Declared before `file` so the handle closes before the file is deleted
    writer: tokio::fs::File,
    file: NamedTempFile,
    mime: String,
    len: usize,
}

impl StoredUpload {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.writer.write_all(chunk).await?;
        self.len += chunk.len();
        Ok(())
    }

    /// Flush buffered writes so `read` sees the whole payload
    pub async fn finish(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn read(&self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(self.file.path()).await?)
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        debug!("Removing upload file: {}", self.file.path().display());
    }
}
