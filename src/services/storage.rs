use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::Result;

const BOOKS_DIR: &str = "books";

/// Uploaded book PDFs on local disk, addressed by paths relative to `root`
#[derive(Debug, Clone)]
pub struct PdfStorage {
    root: PathBuf,
}

impl PdfStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a stored relative path
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write a PDF under a fresh unique name and return `books/<uuid>.pdf`
    pub async fn store_pdf(&self, bytes: &[u8]) -> Result<String> {
        let dir = self.root.join(BOOKS_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let relative = format!("{}/{}.pdf", BOOKS_DIR, Uuid::new_v4());
        tokio::fs::write(self.root.join(&relative), bytes).await?;

        tracing::debug!(path = %relative, size = bytes.len(), "Stored book PDF");
        Ok(relative)
    }

    /// Remove a stored file; a file that is already gone is not an error
    pub async fn remove(&self, relative: &str) -> Result<()> {
        match tokio::fs::remove_file(self.resolve(relative)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %relative, "Stored file already missing");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Accept a part as a PDF by content type or, failing that, by extension
pub fn is_pdf(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    if content_type == Some("application/pdf") {
        return true;
    }
    file_name
        .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
        .unwrap_or(false)
}
