use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// Change markers set by whoever diffs datasets; only read here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeFlags {
    #[serde(default)]
    pub is_changed: bool,
    #[serde(default)]
    pub is_added: bool,
    #[serde(default)]
    pub is_removed: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAnnotation {
    pub is_search_result: bool,
    #[serde(flatten)]
    pub changes: ChangeFlags,
}

/// Per-record flags kept beside the dataset, indexed by record position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotations {
    entries: Vec<RecordAnnotation>,
}

impl Annotations {
    pub fn for_dataset(dataset: &Dataset) -> Self {
        Self {
            entries: vec![RecordAnnotation::default(); dataset.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&RecordAnnotation> {
        self.entries.get(position)
    }

    pub fn is_search_result(&self, position: usize) -> bool {
        self.entries
            .get(position)
            .is_some_and(|entry| entry.is_search_result)
    }

    pub fn changes(&self, position: usize) -> ChangeFlags {
        self.entries
            .get(position)
            .map(|entry| entry.changes)
            .unwrap_or_default()
    }

    /// Sizes the table to `dataset`, starting over if it belonged to a
    /// dataset of a different length.
    pub fn align_to(&mut self, dataset: &Dataset) {
        if self.entries.len() != dataset.len() {
            *self = Self::for_dataset(dataset);
        }
    }

    pub fn clear_search_results(&mut self) {
        for entry in &mut self.entries {
            entry.is_search_result = false;
        }
    }

    pub fn mark_search_result(&mut self, position: usize) -> bool {
        match self.entries.get_mut(position) {
            Some(entry) => {
                entry.is_search_result = true;
                true
            }
            None => false,
        }
    }

    pub fn set_changes(&mut self, position: usize, changes: ChangeFlags) -> bool {
        match self.entries.get_mut(position) {
            Some(entry) => {
                entry.changes = changes;
                true
            }
            None => false,
        }
    }

    pub fn search_result_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.is_search_result)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordAnnotation> {
        self.entries.iter()
    }
}
