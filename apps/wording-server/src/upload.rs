//! Temporary spooling, decoding and scanning of uploaded documents

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use shared_types::{DocumentFormat, ScanResult};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use wording_engine::WordingEngine;

use crate::error::ServerError;

/// An uploaded document on disk, removed when dropped or cleaned up
pub struct TempUpload {
    file: NamedTempFile,
}

impl TempUpload {
    pub fn spool(dir: &Path, format: DocumentFormat, bytes: &[u8]) -> Result<Self, ServerError> {
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(format.extension())
            .tempfile_in(dir)
            .map_err(|e| ServerError::Internal(format!("creating temp file: {}", e)))?;

        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|e| ServerError::Internal(format!("writing temp file: {}", e)))?;

        debug!("Spooled {} bytes to {}", bytes.len(), file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Remove the file now; failures are logged, never returned
    pub fn cleanup(self) {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            warn!("Failed to remove temp upload {}: {}", path.display(), e);
        }
    }
}

/// Decode and scan on the blocking pool under a timeout
///
/// The upload moves into the task, which removes it right after decoding. A
/// timed-out request therefore still gets its file cleaned up once the
/// task finishes.
pub async fn scan_upload(
    upload: TempUpload,
    format: DocumentFormat,
    engine: Arc<WordingEngine>,
    timeout_ms: u64,
) -> Result<ScanResult, ServerError> {
    let task = tokio::task::spawn_blocking(move || {
        let decoded = doc_extract::extract_file(upload.path(), format);
        upload.cleanup();
        decoded.map(|content| engine.scan_document(&content))
    });

    match tokio::time::timeout(Duration::from_millis(timeout_ms), task).await {
        Ok(Ok(result)) => Ok(result?),
        Ok(Err(e)) => Err(ServerError::Internal(format!("scan task failed: {}", e))),
        Err(_) => Err(ServerError::Timeout(timeout_ms)),
    }
}
