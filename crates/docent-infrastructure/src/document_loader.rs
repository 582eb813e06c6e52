//! Builds documents from files on disk.

use docent_core::{DEFAULT_MEDIA_TYPE, DocentError, Document, Result};
use std::path::Path;

/// Creates a path-backed [`Document`] for `path`.
///
/// The document is named after the file and its media type is guessed from
/// the extension. The bytes are not read here; they are read when the
/// document is encoded for a query, so a file removed in between surfaces as
/// a read error at that point.
pub async fn load_document(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| DocentError::io(format!("Failed to stat {}: {}", path.display(), e)))?;
    if !metadata.is_file() {
        return Err(DocentError::invalid_input(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| DocentError::invalid_input(format!("{} has no file name", path.display())))?;

    let media_type = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_MEDIA_TYPE)
        .to_string();

    tracing::debug!(document = %name, media_type = %media_type, "Loaded document");

    Ok(Document::from_path(name, media_type, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_core::DocumentSource;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_pdf_gets_pdf_media_type() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("midterm.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let doc = load_document(&path).await.unwrap();

        assert_eq!(doc.name(), "midterm.pdf");
        assert_eq!(doc.media_type(), "application/pdf");
        assert_eq!(doc.source(), &DocumentSource::Path(path));
    }

    #[tokio::test]
    async fn test_unknown_extension_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blob.zzqx");
        std::fs::write(&path, b"\x00\x01").unwrap();

        let doc = load_document(&path).await.unwrap();
        assert_eq!(doc.media_type(), DEFAULT_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_document(temp_dir.path().join("nope.pdf")).await.unwrap_err();
        assert!(matches!(err, DocentError::Io { .. }));
    }

    #[tokio::test]
    async fn test_directory_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_document(temp_dir.path()).await.unwrap_err();
        assert!(matches!(err, DocentError::InvalidInput(_)));
    }
}
