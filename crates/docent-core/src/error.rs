//! Error types for the Docent application.

use thiserror::Error;

/// A shared error type for the Docent library crates.
///
/// Typed, structured variants with automatic conversion from common error
/// types via the `From` trait.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocentError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected user input (empty credential, blank group name, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A document's bytes could not be read
    #[error("Failed to read document '{name}': {message}")]
    Read { name: String, message: String },

    /// The active group has no documents to answer from
    #[error("No documents in scope")]
    EmptyScope,

    /// The selected document is no longer part of the group
    #[error("Selected document '{0}' is not in the active group")]
    StaleSelection(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocentError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a Read error for the named document
    pub fn read(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Read {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a precondition violation the caller should have
    /// prevented (no documents, or a selection pointing at a missing document).
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::EmptyScope | Self::StaleSelection(_))
    }
}

impl From<std::io::Error> for DocentError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DocentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DocentError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for DocentError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (for glue code in the binary)
impl From<anyhow::Error> for DocentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, DocentError>`.
pub type Result<T> = std::result::Result<T, DocentError>;
