pub mod config_service;
pub mod credential_store;
pub mod document_loader;
pub mod paths;
pub mod storage;

pub use crate::config_service::{AppConfig, BackendConfig, ConfigService};
pub use crate::credential_store::FileCredentialStore;
pub use crate::document_loader::load_document;
pub use crate::paths::DocentPaths;
