use crate::dataset::Dataset;
use crate::fields::Configuration;

use super::document::{SearchDocument, flatten_documents};
use super::{SearchCapability, SearchHit};

/// Case-insensitive substring match over string-valued fields.
///
/// Unranked: hits come back in dataset order. Only used when explicitly
/// selected in place of [`super::FuzzyIndex`].
#[derive(Clone, Debug)]
pub struct SubstringIndex {
    documents: Vec<SearchDocument>,
}

impl SubstringIndex {
    pub fn build(dataset: &Dataset, configuration: &Configuration) -> Self {
        let mut documents = flatten_documents(dataset, configuration);
        for document in &mut documents {
            document.fields.retain(|field| field.is_string);
            for field in &mut document.fields {
                field.text = field.text.to_uppercase();
            }
        }
        Self { documents }
    }
}

impl SearchCapability for SubstringIndex {
    fn search(&self, query: &str) -> Vec<SearchHit> {
        if query.is_empty() {
            return Vec::new();
        }

        let needle = query.to_uppercase();
        self.documents
            .iter()
            .filter(|document| document.fields.iter().any(|field| field.text.contains(&needle)))
            .map(|document| SearchHit {
                reference: document.reference,
                score: 1,
            })
            .collect()
    }

    fn document_count(&self) -> usize {
        self.documents.len()
    }
}
