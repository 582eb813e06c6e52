//! File-backed credential store.
//!
//! Persists the API credential in `secret.json` and caches it in memory so
//! `get` never touches the disk after startup.

use crate::paths::DocentPaths;
use crate::storage::AtomicJsonFile;
use docent_core::{Credential, CredentialStore, DocentError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// On-disk shape of `secret.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SecretFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

/// Credential store backed by `secret.json`.
///
/// The file is read exactly once, in [`FileCredentialStore::open`]. Every
/// `set`/`clear` rewrites it atomically with owner-only permissions before
/// updating the cache.
pub struct FileCredentialStore {
    cached: RwLock<Option<Credential>>,
    file: AtomicJsonFile<SecretFile>,
}

impl FileCredentialStore {
    /// Opens the store at the default secret path.
    pub fn open_default(paths: &DocentPaths) -> Result<Self> {
        let path = paths
            .secret_file()
            .map_err(|e| DocentError::config(format!("Failed to get secret path: {}", e)))?;
        Self::open(path)
    }

    /// Opens the store at `path`, reading any credential already on file.
    ///
    /// An unreadable or corrupt file is logged and treated as "no
    /// credential"; the next `set` overwrites it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = AtomicJsonFile::<SecretFile>::new(path.as_ref().to_path_buf()).private();

        let initial = match file.load() {
            Ok(Some(secret)) => secret.api_key.and_then(|key| Credential::new(key).ok()),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(
                    path = %file.path().display(),
                    "Ignoring unreadable secret file: {}",
                    e
                );
                None
            }
        };

        tracing::info!(
            path = %file.path().display(),
            present = initial.is_some(),
            "Credential store opened"
        );

        Ok(Self {
            cached: RwLock::new(initial),
            file,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    fn replace(&self, credential: Option<Credential>) -> Result<()> {
        let mut guard = self
            .cached
            .write()
            .map_err(|e| DocentError::internal(format!("credential lock poisoned: {}", e)))?;

        self.file.save(&SecretFile {
            api_key: credential.as_ref().map(|c| c.expose().to_string()),
        })?;

        *guard = credential;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.cached
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn set(&self, credential: Credential) -> Result<()> {
        self.replace(Some(credential))?;
        tracing::info!("Credential updated");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.replace(None)?;
        tracing::info!("Credential cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_means_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::open(temp_dir.path().join("secret.json")).unwrap();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_corrupt_file_means_absent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FileCredentialStore::open(&path).unwrap();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_blank_key_on_disk_means_absent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        fs::write(&path, r#"{ "api_key": "  " }"#).unwrap();

        let store = FileCredentialStore::open(&path).unwrap();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_clear_persists_removal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");

        let store = FileCredentialStore::open(&path).unwrap();
        store.set(Credential::new("AIza-1").unwrap()).unwrap();
        store.clear().unwrap();
        assert!(store.get().is_none());

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("AIza-1"));
        assert!(FileCredentialStore::open(&path).unwrap().get().is_none());
    }
}
