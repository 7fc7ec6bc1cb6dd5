use crate::dataset::{Dataset, Scalar};
use crate::fields::Configuration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentField {
    pub id: String,
    pub text: String,
    pub is_string: bool,
}

/// Flattened, searchable view of one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchDocument {
    pub reference: usize,
    pub fields: Vec<DocumentField>,
}

pub fn flatten_documents(dataset: &Dataset, configuration: &Configuration) -> Vec<SearchDocument> {
    dataset
        .records()
        .iter()
        .enumerate()
        .map(|(reference, record)| SearchDocument {
            reference,
            fields: configuration
                .fields
                .iter()
                .filter_map(|field| {
                    let value = record.resolve(&field.path)?;
                    if matches!(value, Scalar::Null) {
                        return None;
                    }
                    Some(DocumentField {
                        id: field.id(),
                        text: value.to_string(),
                        is_string: value.as_text().is_some(),
                    })
                })
                .collect(),
        })
        .collect()
}
