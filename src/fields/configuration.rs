use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{Dataset, LeafVisitor, Scalar};
use crate::util::field_id;

/// One addressable leaf of the record shape.
///
/// Identity is the path: two descriptors compare equal when their paths do,
/// whatever their display name or groupability.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub path: Vec<String>,
    pub display_name: String,
    #[serde(default = "default_groupable")]
    pub groupable: bool,
}

fn default_groupable() -> bool {
    true
}

impl FieldDescriptor {
    pub fn new(path: Vec<String>, display_name: impl Into<String>, groupable: bool) -> Self {
        Self {
            path,
            display_name: display_name.into(),
            groupable,
        }
    }

    /// Descriptor for a path discovered in data: dotted display name, groupable.
    pub fn inferred(path: Vec<String>) -> Self {
        let display_name = field_id(&path);
        Self {
            path,
            display_name,
            groupable: true,
        }
    }

    pub fn id(&self) -> String {
        field_id(&self.path)
    }
}

impl PartialEq for FieldDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for FieldDescriptor {}

impl Hash for FieldDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl Configuration {
    pub fn field(&self, path: &[String]) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.path == path)
    }

    pub fn field_by_id(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.id() == id)
    }

    pub fn groupable(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.groupable)
    }
}

struct LeafPathCollector {
    known: HashSet<Vec<String>>,
    discovered: Vec<Vec<String>>,
}

impl LeafVisitor for LeafPathCollector {
    fn leaf(&mut self, path: &[String], _value: &Scalar) {
        if !self.known.contains(path) {
            self.known.insert(path.to_vec());
            self.discovered.push(path.to_vec());
        }
    }
}

/// Merges the leaf paths found in `dataset` into `user`.
///
/// User entries keep their position and attributes; paths not covered by
/// them are appended in discovery order.
pub fn infer(dataset: &Dataset, user: Option<&Configuration>) -> Configuration {
    let mut fields = user.map(|config| config.fields.clone()).unwrap_or_default();

    let mut collector = LeafPathCollector {
        known: fields.iter().map(|field| field.path.clone()).collect(),
        discovered: Vec::new(),
    };
    for record in dataset.records() {
        record.visit_leaves(&mut collector);
    }

    debug!(
        user_fields = fields.len(),
        inferred_fields = collector.discovered.len(),
        records = dataset.len(),
        "inferred field configuration"
    );

    fields.extend(collector.discovered.into_iter().map(FieldDescriptor::inferred));
    Configuration { fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_payload;

    fn dataset(raw: &str) -> Dataset {
        parse_payload(raw).unwrap().dataset
    }

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    fn two_records() -> Dataset {
        dataset(
            r#"[
                { "uid": "uid1", "role": { "role": "role", "confidence": 80 } },
                { "uid": "uid2", "role": { "role": "role", "confidence": 80 } }
            ]"#,
        )
    }

    #[test]
    fn appends_missing_fields_after_user_entries() {
        let user = Configuration {
            fields: vec![
                FieldDescriptor::new(path(&["uid"]), "UID", true),
                FieldDescriptor::new(path(&["role", "role"]), "Role", false),
            ],
        };

        let merged = infer(&two_records(), Some(&user));

        let summary = merged
            .fields
            .iter()
            .map(|f| (f.id(), f.display_name.as_str(), f.groupable))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            [
                ("uid".to_owned(), "UID", true),
                ("role.role".to_owned(), "Role", false),
                ("role.confidence".to_owned(), "role.confidence", true),
            ]
        );
    }

    #[test]
    fn builds_default_configuration_from_data() {
        let inferred = infer(&two_records(), None);
        let names = inferred
            .fields
            .iter()
            .map(|f| f.display_name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["uid", "role.role", "role.confidence"]);
        assert!(inferred.fields.iter().all(|f| f.groupable));
    }

    #[test]
    fn inference_is_idempotent() {
        let data = two_records();
        let once = infer(&data, None);
        let twice = infer(&data, Some(&once));
        assert_eq!(once, twice);
        assert_eq!(
            once.fields.iter().map(|f| &f.display_name).collect::<Vec<_>>(),
            twice.fields.iter().map(|f| &f.display_name).collect::<Vec<_>>()
        );
    }

    #[test]
    fn heterogeneous_records_contribute_each_leaf_once() {
        let data = dataset(
            r#"[
                { "a": 1, "b": { "c": 2 } },
                { "a": 3, "d": "x", "b": { "e": true } },
                { "b": { "c": 4 }, "f": [1, 2] }
            ]"#,
        );
        let ids = infer(&data, None)
            .fields
            .iter()
            .map(FieldDescriptor::id)
            .collect::<Vec<_>>();
        assert_eq!(ids, ["a", "b.c", "d", "b.e", "f"]);
    }

    #[test]
    fn keeps_user_fields_absent_from_data() {
        let user = Configuration {
            fields: vec![FieldDescriptor::new(path(&["ghost"]), "Ghost", false)],
        };
        let merged = infer(&two_records(), Some(&user));
        assert_eq!(merged.fields[0].display_name, "Ghost");
        assert_eq!(merged.fields.len(), 4);
    }

    #[test]
    fn empty_dataset_yields_empty_configuration() {
        assert_eq!(infer(&Dataset::default(), None), Configuration::default());
    }

    #[test]
    fn descriptors_compare_by_path() {
        let a = FieldDescriptor::new(path(&["uid"]), "UID", true);
        let b = FieldDescriptor::new(path(&["uid"]), "uid", false);
        assert_eq!(a, b);
        assert_ne!(a, FieldDescriptor::inferred(path(&["role", "uid"])));
    }
}
