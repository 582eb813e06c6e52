//! Domain model for Docent: documents and groups, scope resolution, the
//! grounding policy, transcripts, and the interfaces the query flow depends on.

pub mod backend;
pub mod credential;
pub mod document;
pub mod encoder;
pub mod error;
pub mod grounding;
pub mod scope;
pub mod transcript;

pub use backend::{BackendError, GenerateRequest, GenerativeBackend, InlinePart};
pub use credential::{Credential, CredentialStore, InMemoryCredentialStore};
pub use document::{DEFAULT_MEDIA_TYPE, Document, DocumentSource, Group};
pub use error::{DocentError, Result};
pub use grounding::GroundingPolicy;
pub use scope::{ScopeSelection, resolve};
pub use transcript::{MessageRole, Transcript, TranscriptEntry};
