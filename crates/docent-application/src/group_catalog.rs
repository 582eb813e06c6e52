//! In-memory catalog of document groups.

use docent_core::{DocentError, Document, Group, Result};

/// Every group the user has created, in creation order.
///
/// Groups are never deleted; documents are only ever appended.
#[derive(Debug, Default)]
pub struct GroupCatalog {
    groups: Vec<Group>,
}

impl GroupCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty group and returns its id.
    pub fn create_group(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DocentError::invalid_input("group name must not be empty"));
        }

        let group = Group::new(name);
        let id = group.id().to_string();
        tracing::info!(group = name, id = %id, "Created group");
        self.groups.push(group);
        Ok(id)
    }

    /// Appends the uniquely named documents to the group, returning how many
    /// were added.
    pub fn add_documents(
        &mut self,
        group_id: &str,
        documents: impl IntoIterator<Item = Document>,
    ) -> Result<usize> {
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id() == group_id)
            .ok_or_else(|| DocentError::not_found("group", group_id))?;

        let added = group.add_documents(documents);
        tracing::info!(
            group = group.name(),
            added,
            total = group.document_count(),
            "Added documents"
        );
        Ok(added)
    }

    pub fn get(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id() == group_id)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }
}
