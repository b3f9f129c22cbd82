use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for uploaded files (book PDFs live under `books/`)
    pub dir: PathBuf,
    /// Request body limit for uploads, in bytes
    pub max_upload_bytes: usize,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let max_upload_mb: usize = env::var("EDUPLAY_MAX_UPLOAD_MB")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);

        Self {
            dir: PathBuf::from(
                env::var("EDUPLAY_STORAGE_DIR").unwrap_or_else(|_| "./storage".to_string()),
            ),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        }
    }
}
