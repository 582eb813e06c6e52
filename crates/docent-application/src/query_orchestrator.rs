//! Grounded query orchestration.
//!
//! Turns a question plus a scope selection into exactly one backend request
//! and folds whatever happens into an [`Outcome`].

use crate::outcome::Outcome;
use docent_core::{
    BackendError, CredentialStore, DocentError, Document, GenerateRequest, GenerativeBackend,
    GroundingPolicy, Group, InlinePart, ScopeSelection, encoder, scope,
};
use futures::future::try_join_all;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Answers questions against a group's documents.
///
/// # Responsibilities
///
/// - Resolving the scope selection to documents
/// - Encoding the documents concurrently
/// - Short-circuiting when no credential is on file
/// - Dispatching a single request carrying the grounding policy
/// - Classifying failures and clearing a rejected credential
///
/// At most one `answer` runs at a time; a concurrent call gets
/// [`Outcome::Busy`] without touching the backend. No call is ever retried.
pub struct QueryOrchestrator {
    backend: Arc<dyn GenerativeBackend>,
    credentials: Arc<dyn CredentialStore>,
    policy: GroundingPolicy,
    in_flight: AtomicBool,
}

impl QueryOrchestrator {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        credentials: Arc<dyn CredentialStore>,
        policy: GroundingPolicy,
    ) -> Self {
        Self {
            backend,
            credentials,
            policy,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Returns `true` while an `answer` call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claims the single in-flight slot, or `None` if a question is already
    /// being answered. The slot is released when the guard drops.
    pub fn try_reserve(&self) -> Option<InFlightGuard<'_>> {
        InFlightGuard::try_acquire(&self.in_flight)
    }

    /// Answers `question` from the documents `selection` picks out of `group`.
    pub async fn answer(
        &self,
        group: &Group,
        question: &str,
        selection: &ScopeSelection,
    ) -> Outcome {
        let Some(slot) = self.try_reserve() else {
            tracing::warn!(group = group.name(), "Rejecting question while another is in flight");
            return Outcome::Busy;
        };
        self.answer_reserved(slot, group, question, selection).await
    }

    /// Like [`answer`](Self::answer), for a caller that already holds the
    /// slot from [`try_reserve`](Self::try_reserve).
    pub async fn answer_reserved(
        &self,
        slot: InFlightGuard<'_>,
        group: &Group,
        question: &str,
        selection: &ScopeSelection,
    ) -> Outcome {
        debug_assert!(std::ptr::eq(slot.flag, &self.in_flight));
        let _slot = slot;

        let documents = match scope::resolve(group, selection) {
            Ok(documents) => documents,
            Err(DocentError::StaleSelection(document)) => {
                tracing::warn!(group = group.name(), document = %document, "Stale scope selection");
                return Outcome::StaleSelection { document };
            }
            Err(e) => {
                tracing::warn!(group = group.name(), "Cannot resolve scope: {}", e);
                return Outcome::EmptyScope;
            }
        };

        let Some(credential) = self.credentials.get() else {
            tracing::info!("No credential on file, backend not contacted");
            return Outcome::MissingCredential;
        };

        let parts = match encode_all(&documents).await {
            Ok(parts) => parts,
            Err(DocentError::Read { name, message }) => {
                tracing::error!(document = %name, "Failed to read document: {}", message);
                return Outcome::ReadError { document: name };
            }
            Err(e) => {
                tracing::error!("Failed to encode documents: {}", e);
                return Outcome::BackendFailure;
            }
        };

        let request = GenerateRequest {
            system_instruction: self.policy.instruction().to_string(),
            documents: parts,
            question: question.to_string(),
        };

        tracing::info!(
            group = group.name(),
            scope = %selection,
            documents = request.documents.len(),
            model = self.backend.model(),
            "Dispatching grounded query"
        );

        match self.backend.generate(&credential, &request).await {
            Ok(text) => {
                tracing::info!(chars = text.chars().count(), "Received answer");
                Outcome::Answer(text)
            }
            Err(BackendError::InvalidCredential(detail)) => {
                tracing::warn!("Backend rejected credential: {}", detail);
                if let Err(e) = self.credentials.clear() {
                    tracing::error!("Failed to clear rejected credential: {}", e);
                }
                Outcome::InvalidCredential
            }
            Err(e) => {
                tracing::error!("Backend call failed: {}", e);
                Outcome::BackendFailure
            }
        }
    }
}

/// Encodes every document concurrently, keeping their order.
async fn encode_all(documents: &[Document]) -> docent_core::Result<Vec<InlinePart>> {
    try_join_all(documents.iter().map(|doc| async move {
        let data = encoder::encode(doc).await?;
        Ok::<_, DocentError>(InlinePart {
            media_type: doc.media_type().to_string(),
            data,
        })
    }))
    .await
}

/// Holds the single in-flight slot; releases it on drop, including when the
/// `answer` future is cancelled.
#[must_use = "the slot is released as soon as the guard is dropped"]
pub struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
