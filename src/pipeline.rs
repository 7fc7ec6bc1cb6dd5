use tracing::info;

use crate::annotations::Annotations;
use crate::dataset::{Dataset, DatasetPayload};
use crate::fields::{Configuration, FieldDescriptor, ValueSet, extract_values, infer};
use crate::hierarchy::{GroupNode, group};
use crate::search::{SearchOutcome, SearchSession};

/// A dataset with everything derived from it: merged configuration, value
/// sets, search session and per-record annotations.
pub struct LoadedDataset {
    dataset: Dataset,
    user_configuration: Option<Configuration>,
    configuration: Configuration,
    values: ValueSet,
    annotations: Annotations,
    search: SearchSession,
}

impl LoadedDataset {
    pub fn new(payload: DatasetPayload) -> Self {
        let DatasetPayload {
            dataset,
            configuration: user_configuration,
        } = payload;

        let configuration = infer(&dataset, user_configuration.as_ref());
        let values = extract_values(&dataset, &configuration);
        let annotations = Annotations::for_dataset(&dataset);
        let mut search = SearchSession::new();
        search.build_index(&dataset, &configuration);

        info!(
            records = dataset.len(),
            fields = configuration.fields.len(),
            "dataset ready"
        );

        Self {
            dataset,
            user_configuration,
            configuration,
            values,
            annotations,
            search,
        }
    }

    /// Swaps in a new dataset; configuration, values and index are rebuilt
    /// against the original user configuration.
    pub fn replace_dataset(&mut self, dataset: Dataset) {
        *self = Self::new(DatasetPayload {
            dataset,
            configuration: self.user_configuration.take(),
        });
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn values(&self) -> &ValueSet {
        &self.values
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    pub fn search_session(&mut self) -> &mut SearchSession {
        &mut self.search
    }

    pub fn search(&mut self, query: &str) -> &SearchOutcome {
        self.search.search(query, &self.dataset, &mut self.annotations)
    }

    pub fn has_search(&self) -> bool {
        !self.search.last_outcome().query_string.trim().is_empty()
    }

    pub fn group(&self, grouping: &[FieldDescriptor]) -> GroupNode {
        group(&self.dataset, &self.annotations, grouping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_payload;

    const DATA: &str = r#"[
        { "uid": "uid1", "role": { "role": "role", "confidence": 80 } },
        { "uid": "uid2", "role": { "role": "role", "confidence": 82 } }
    ]"#;

    #[test]
    fn derives_configuration_values_and_index() {
        let mut loaded = LoadedDataset::new(parse_payload(DATA).unwrap());
        assert_eq!(loaded.configuration().fields.len(), 3);
        assert_eq!(loaded.values().get("role.confidence").unwrap().len(), 2);

        let results = loaded.search("uid2").results.clone();
        assert_eq!(results, [1]);
        assert!(loaded.has_search());
        assert!(loaded.annotations().is_search_result(1));
    }

    #[test]
    fn replacing_the_dataset_rebuilds_everything() {
        let mut loaded = LoadedDataset::new(parse_payload(DATA).unwrap());
        loaded.search("uid1");

        let bigger = parse_payload(r#"[{ "uid": "x" }, { "uid": "y" }, { "uid": "uid1", "extra": 1 }]"#)
            .unwrap()
            .dataset;
        loaded.replace_dataset(bigger);

        assert_eq!(loaded.annotations().search_result_count(), 0);
        assert!(!loaded.has_search());
        assert!(loaded.configuration().field_by_id("extra").is_some());
        assert_eq!(loaded.search("uid1").results, [2]);
    }
}
