//! Scope selection and resolution.
//!
//! A scope decides which documents of the active group a question is
//! answered against: all of them, or exactly one.

use crate::document::{Document, Group};
use crate::error::{DocentError, Result};
use serde::{Deserialize, Serialize};

/// Which documents of the active group a question targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ScopeSelection {
    /// Every document in the active group.
    #[default]
    All,
    /// Exactly one document, referenced by name.
    Document(String),
}

impl ScopeSelection {
    pub fn document(name: impl Into<String>) -> Self {
        Self::Document(name.into())
    }

    /// Returns `true` if this selection can be resolved against `group`.
    pub fn is_valid_for(&self, group: &Group) -> bool {
        match self {
            Self::All => true,
            Self::Document(name) => group.contains(name),
        }
    }
}

impl std::fmt::Display for ScopeSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all documents"),
            Self::Document(name) => write!(f, "{}", name),
        }
    }
}

/// Resolves `selection` against `group` into the exact, ordered documents to
/// submit.
///
/// # Errors
///
/// - [`DocentError::EmptyScope`] if the group has no documents.
/// - [`DocentError::StaleSelection`] if the selected document is no longer in
///   the group. A stale selection never falls back to "all".
pub fn resolve(group: &Group, selection: &ScopeSelection) -> Result<Vec<Document>> {
    if group.is_empty() {
        return Err(DocentError::EmptyScope);
    }

    match selection {
        ScopeSelection::All => Ok(group.documents().to_vec()),
        ScopeSelection::Document(name) => group
            .find(name)
            .cloned()
            .map(|doc| vec![doc])
            .ok_or_else(|| DocentError::StaleSelection(name.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_with(names: &[&str]) -> Group {
        let mut group = Group::new("Algorithms");
        for name in names {
            group.add_document(Document::from_bytes(*name, "application/pdf", name.as_bytes().to_vec()));
        }
        group
    }

    #[test]
    fn test_resolve_all_keeps_group_order() {
        let group = group_with(&["midterm.pdf", "syllabus.pdf", "notes.pdf"]);

        let docs = resolve(&group, &ScopeSelection::All).unwrap();

        assert_eq!(docs.len(), 3);
        assert_eq!(docs.as_slice(), group.documents());
    }

    #[test]
    fn test_resolve_specific_document_is_singleton() {
        let group = group_with(&["midterm.pdf", "syllabus.pdf"]);

        let docs = resolve(&group, &ScopeSelection::document("syllabus.pdf")).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(&docs[0], group.find("syllabus.pdf").unwrap());
    }

    #[test]
    fn test_resolve_every_member_individually() {
        let group = group_with(&["a.pdf", "b.pdf", "c.pdf"]);
        for doc in group.documents() {
            let resolved = resolve(&group, &ScopeSelection::document(doc.name())).unwrap();
            assert_eq!(resolved, vec![doc.clone()]);
        }
    }

    #[test]
    fn test_resolve_empty_group_fails() {
        let group = group_with(&[]);
        assert_eq!(
            resolve(&group, &ScopeSelection::All),
            Err(DocentError::EmptyScope)
        );
        assert_eq!(
            resolve(&group, &ScopeSelection::document("a.pdf")),
            Err(DocentError::EmptyScope)
        );
    }

    #[test]
    fn test_resolve_stale_selection_does_not_fall_back() {
        let group = group_with(&["midterm.pdf"]);
        assert_eq!(
            resolve(&group, &ScopeSelection::document("final.pdf")),
            Err(DocentError::StaleSelection("final.pdf".to_string()))
        );
    }

    #[test]
    fn test_selection_validity() {
        let group = group_with(&["midterm.pdf"]);
        assert!(ScopeSelection::All.is_valid_for(&group));
        assert!(ScopeSelection::document("midterm.pdf").is_valid_for(&group));
        assert!(!ScopeSelection::document("final.pdf").is_valid_for(&group));
    }
}
