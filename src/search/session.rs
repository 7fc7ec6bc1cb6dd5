use std::sync::Arc;

use tracing::info;

use crate::annotations::Annotations;
use crate::dataset::Dataset;
use crate::fields::Configuration;

use super::{FuzzyIndex, SearchCapability, SearchOutcome, run_search};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    /// No active query. An index may or may not be present.
    Idle,
    Indexed,
    Queried,
}

/// Owns the current index and the last applied query.
///
/// The index is shared behind an [`Arc`] so concurrent readers can keep
/// querying a snapshot; rebuilding swaps in a new one.
pub struct SearchSession {
    index: Option<Arc<dyn SearchCapability>>,
    state: SearchState,
    last: SearchOutcome,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            index: None,
            state: SearchState::Idle,
            last: SearchOutcome::default(),
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn index(&self) -> Option<Arc<dyn SearchCapability>> {
        self.index.clone()
    }

    pub fn last_outcome(&self) -> &SearchOutcome {
        &self.last
    }

    pub fn build_index(&mut self, dataset: &Dataset, configuration: &Configuration) {
        let index = FuzzyIndex::build(dataset, configuration);
        info!(
            documents = index.document_count(),
            fields = index.field_ids().len(),
            "built search index"
        );
        self.replace_index(Arc::new(index));
    }

    /// Installs `index`, dropping results tied to the previous one.
    pub fn replace_index(&mut self, index: Arc<dyn SearchCapability>) {
        self.index = Some(index);
        self.last = SearchOutcome::default();
        self.state = SearchState::Indexed;
    }

    pub fn search(
        &mut self,
        query: &str,
        dataset: &Dataset,
        annotations: &mut Annotations,
    ) -> &SearchOutcome {
        let index = self.index.as_deref();
        self.last = run_search(query, dataset, index, annotations);
        let usable = index.is_some_and(|index| index.document_count() == dataset.len());
        self.state = if query.trim().is_empty() || !usable {
            SearchState::Idle
        } else {
            SearchState::Queried
        };
        &self.last
    }
}
