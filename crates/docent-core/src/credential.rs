//! Credential storage interface.
//!
//! Defines the interface for reading and replacing the single API credential
//! used to authorize backend calls.

use crate::error::{DocentError, Result};
use std::sync::RwLock;

/// An opaque API secret.
///
/// `Debug` output is redacted so the value never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps `value`, refusing empty or whitespace-only input.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DocentError::invalid_input("credential must not be empty"));
        }
        Ok(Self(value))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Process-wide store for the single API credential.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Persisted secrets have appropriate permissions (e.g., 600 on Unix)
/// - Secrets are never logged or exposed in error messages
pub trait CredentialStore: Send + Sync {
    /// Returns the stored credential, or `None` if none is on file.
    fn get(&self) -> Option<Credential>;

    /// Replaces the stored credential and persists it immediately.
    fn set(&self, credential: Credential) -> Result<()>;

    /// Removes the stored credential and persists the removal immediately.
    fn clear(&self) -> Result<()>;
}

/// Non-persistent store, used for tests and throwaway runs.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    credential: RwLock<Option<Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: RwLock::new(Some(credential)),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.credential
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn set(&self, credential: Credential) -> Result<()> {
        let mut guard = self
            .credential
            .write()
            .map_err(|e| DocentError::internal(format!("credential lock poisoned: {}", e)))?;
        *guard = Some(credential);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .credential
            .write()
            .map_err(|e| DocentError::internal(format!("credential lock poisoned: {}", e)))?;
        *guard = None;
        Ok(())
    }
}
