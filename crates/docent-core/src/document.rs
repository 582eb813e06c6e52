//! Documents and the groups that hold them.

use crate::error::{DocentError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Media type used when nothing better is known about a blob.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Where a document's bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Bytes held in memory.
    Bytes(Arc<[u8]>),
    /// A file on disk, read lazily each time the document is encoded.
    Path(PathBuf),
}

/// An uploaded document: an opaque blob plus its name and media type.
///
/// Documents are immutable once created. Within a [`Group`] they are
/// identified by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    media_type: String,
    source: DocumentSource,
}

impl Document {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        source: DocumentSource,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            source,
        }
    }

    /// Creates a document backed by in-memory bytes.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self::new(name, media_type, DocumentSource::Bytes(Arc::from(bytes)))
    }

    /// Creates a document backed by a file path.
    pub fn from_path(
        name: impl Into<String>,
        media_type: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Self {
        Self::new(
            name,
            media_type,
            DocumentSource::Path(path.as_ref().to_path_buf()),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    /// Reads the raw bytes of this document.
    ///
    /// # Errors
    ///
    /// Returns [`DocentError::Read`] if a path-backed document can no longer
    /// be read (deleted, permissions revoked, ...).
    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        match &self.source {
            DocumentSource::Bytes(bytes) => Ok(bytes.to_vec()),
            DocumentSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| DocentError::read(&self.name, e.to_string())),
        }
    }
}

/// A user-defined, named collection of documents sharing one chat context.
///
/// Documents keep their insertion order and are unique by name. Groups are
/// only ever extended; nothing is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: String,
    name: String,
    documents: Vec<Document>,
}

impl Group {
    /// Creates an empty group with a fresh random identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name)
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            documents: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn find(&self, name: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.name() == name)
    }

    /// Appends a document unless one with the same name is already present.
    ///
    /// Returns `true` if the document was added.
    pub fn add_document(&mut self, document: Document) -> bool {
        if self.contains(document.name()) {
            tracing::debug!(
                group = %self.name,
                document = document.name(),
                "Skipping duplicate document"
            );
            return false;
        }
        self.documents.push(document);
        true
    }

    /// Appends every document whose name is not yet taken, in order.
    ///
    /// Duplicates inside `documents` itself are skipped as well. Returns the
    /// number of documents actually added.
    pub fn add_documents(&mut self, documents: impl IntoIterator<Item = Document>) -> usize {
        let mut added = 0;
        for document in documents {
            if self.add_document(document) {
                added += 1;
            }
        }
        added
    }
}
