use std::sync::{PoisonError, RwLock};

use crate::record::ProjectRecord;

/// The last project list fetched by the dashboard.
///
/// Edit and delete look projects up here by their `_row`; charts and exports
/// read the snapshot instead of fetching again. `None` until the first fetch.
#[derive(Debug, Default)]
pub struct ProjectStore {
    projects: RwLock<Option<Vec<ProjectRecord>>>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole list with a fresh fetch.
    pub fn replace(&self, projects: Vec<ProjectRecord>) {
        let mut guard = self.projects.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(projects);
    }

    pub fn snapshot(&self) -> Option<Vec<ProjectRecord>> {
        self.projects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn find(&self, row: u32) -> Option<ProjectRecord> {
        self.projects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()?
            .iter()
            .find(|p| p.row() == Some(row))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.projects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
