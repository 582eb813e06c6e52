//! Generative backend interface.
//!
//! A backend receives one fully assembled request per question and returns
//! the model's text. Implementations live in `docent-interaction`.

use crate::credential::Credential;
use async_trait::async_trait;
use thiserror::Error;

/// A binary document part, already encoded for transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinePart {
    pub media_type: String,
    /// Base64 payload without any data URI header.
    pub data: String,
}

/// Everything a backend needs to answer one question.
///
/// Documents are sent in order, followed by the question as the final text
/// part. The grounding instruction travels separately as the system
/// instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub system_instruction: String,
    pub documents: Vec<InlinePart>,
    pub question: String,
}

/// Failures reported by a backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend rejected the credential.
    #[error("Credential rejected by backend: {0}")]
    InvalidCredential(String),

    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status that is not a credential problem.
    #[error("Backend returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body could not be understood or carried no text.
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),
}

impl BackendError {
    pub fn is_invalid_credential(&self) -> bool {
        matches!(self, Self::InvalidCredential(_))
    }
}

#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Sends exactly one request and returns the answer text verbatim.
    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerateRequest,
    ) -> Result<String, BackendError>;
}
