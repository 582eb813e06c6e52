//! The interface a front end drives.
//!
//! `StudySession` owns the group catalog, the active chat (group, scope,
//! transcript) and the orchestrator. A front end calls into it and renders
//! the transcript it hands back.

use crate::group_catalog::GroupCatalog;
use crate::outcome::Outcome;
use crate::query_orchestrator::QueryOrchestrator;
use docent_core::{
    Credential, DocentError, Document, Group, Result, ScopeSelection, Transcript, TranscriptEntry,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// The chat currently open on one group.
#[derive(Debug)]
struct ActiveChat {
    group_id: String,
    selection: ScopeSelection,
    transcript: Transcript,
}

#[derive(Debug, Default)]
struct SessionState {
    catalog: GroupCatalog,
    active: Option<ActiveChat>,
    /// Bumped whenever a chat is opened or left, so answers that arrive
    /// for a chat that is gone can be recognised and dropped.
    epoch: u64,
}

/// Front-end facing session over groups, scope and transcript.
///
/// # Thread Safety
///
/// State lives behind a `tokio::sync::Mutex` that is never held across the
/// backend call, so `set_scope`, `exit_session` and friends stay responsive
/// while a question is being answered.
pub struct StudySession {
    orchestrator: Arc<QueryOrchestrator>,
    state: Mutex<SessionState>,
}

impl StudySession {
    pub fn new(orchestrator: Arc<QueryOrchestrator>) -> Self {
        Self {
            orchestrator,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Creates a new, empty group.
    pub async fn create_group(&self, name: &str) -> Result<String> {
        self.state.lock().await.catalog.create_group(name)
    }

    /// Adds documents to a group, skipping names already present.
    pub async fn add_documents(
        &self,
        group_id: &str,
        documents: impl IntoIterator<Item = Document>,
    ) -> Result<usize> {
        self.state
            .lock()
            .await
            .catalog
            .add_documents(group_id, documents)
    }

    /// Snapshot of every group.
    pub async fn groups(&self) -> Vec<Group> {
        self.state.lock().await.catalog.groups().to_vec()
    }

    /// The group of the open chat, if any.
    pub async fn active_group(&self) -> Option<Group> {
        let state = self.state.lock().await;
        state
            .active
            .as_ref()
            .and_then(|chat| state.catalog.get(&chat.group_id).cloned())
    }

    pub async fn scope(&self) -> Option<ScopeSelection> {
        self.state
            .lock()
            .await
            .active
            .as_ref()
            .map(|chat| chat.selection.clone())
    }

    pub async fn transcript(&self) -> Transcript {
        self.state
            .lock()
            .await
            .active
            .as_ref()
            .map(|chat| chat.transcript.clone())
            .unwrap_or_default()
    }

    /// Opens a chat on `group_id`.
    ///
    /// Scope resets to all documents and the transcript restarts with a
    /// greeting naming the group and its document count.
    pub async fn start_session(&self, group_id: &str) -> Result<Transcript> {
        let mut state = self.state.lock().await;
        let group = state
            .catalog
            .get(group_id)
            .ok_or_else(|| DocentError::not_found("group", group_id))?;

        let transcript = Transcript::opened_for(group.name(), group.document_count());
        tracing::info!(
            group = group.name(),
            documents = group.document_count(),
            "Session started"
        );

        state.epoch += 1;
        state.active = Some(ActiveChat {
            group_id: group_id.to_string(),
            selection: ScopeSelection::All,
            transcript: transcript.clone(),
        });
        Ok(transcript)
    }

    /// Leaves the open chat and clears its transcript.
    pub async fn exit_session(&self) {
        let mut state = self.state.lock().await;
        if let Some(mut chat) = state.active.take() {
            chat.transcript.reset();
            state.epoch += 1;
            tracing::info!(group_id = %chat.group_id, "Session exited");
        }
    }

    /// Changes which documents the next question is answered against.
    pub async fn set_scope(&self, selection: ScopeSelection) -> Result<()> {
        let mut state = self.state.lock().await;
        let SessionState { catalog, active, .. } = &mut *state;
        let chat = active
            .as_mut()
            .ok_or_else(|| DocentError::invalid_input("no active session"))?;
        let group = catalog
            .get(&chat.group_id)
            .ok_or_else(|| DocentError::not_found("group", chat.group_id.clone()))?;

        if let ScopeSelection::Document(name) = &selection {
            if !group.contains(name) {
                return Err(DocentError::not_found("document", name.clone()));
            }
        }

        tracing::debug!(scope = %selection, "Scope changed");
        chat.selection = selection;
        Ok(())
    }

    /// Stores a user-provided credential. Blank input is rejected and leaves
    /// the stored credential untouched.
    pub fn submit_credential(&self, value: &str) -> Result<()> {
        let credential = Credential::new(value.trim())?;
        self.orchestrator.credentials().set(credential)
    }

    pub fn has_credential(&self) -> bool {
        self.orchestrator.credentials().get().is_some()
    }

    /// Asks a question in the open chat.
    ///
    /// The question is appended before the backend is called and the
    /// outcome after, as an assistant entry for answers and a system-error
    /// entry otherwise. If the chat was left or replaced while the answer
    /// was pending, the outcome is discarded.
    pub async fn send_question(&self, text: &str) -> Result<Transcript> {
        let question = text.trim();
        if question.is_empty() {
            return Err(DocentError::invalid_input("question must not be empty"));
        }
        // Claimed before the user entry is appended.
        let Some(slot) = self.orchestrator.try_reserve() else {
            return Err(DocentError::invalid_input(
                "a question is already being answered",
            ));
        };

        let (group, selection, epoch) = {
            let mut state = self.state.lock().await;
            let epoch = state.epoch;
            let SessionState { catalog, active, .. } = &mut *state;
            let chat = active
                .as_mut()
                .ok_or_else(|| DocentError::invalid_input("no active session"))?;
            let group = catalog
                .get(&chat.group_id)
                .cloned()
                .ok_or_else(|| DocentError::not_found("group", chat.group_id.clone()))?;

            chat.transcript.append(TranscriptEntry::user(question));
            (group, chat.selection.clone(), epoch)
        };

        let outcome = self
            .orchestrator
            .answer_reserved(slot, &group, question, &selection)
            .await;
        Ok(self.apply_outcome(epoch, outcome).await)
    }

    async fn apply_outcome(&self, epoch: u64, outcome: Outcome) -> Transcript {
        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            tracing::info!("Discarding answer for a session that is no longer open");
            return state
                .active
                .as_ref()
                .map(|chat| chat.transcript.clone())
                .unwrap_or_default();
        }

        match state.active.as_mut() {
            Some(chat) => {
                chat.transcript.append(outcome.to_entry());
                chat.transcript.clone()
            }
            None => Transcript::default(),
        }
    }
}
