use std::collections::{HashMap, HashSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::dataset::{Dataset, Scalar};

use super::Configuration;

/// Distinct values per field id, in configuration order. Each list keeps
/// first-seen order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueSet {
    entries: Vec<(String, Vec<Scalar>)>,
    index_by_id: HashMap<String, usize>,
}

impl ValueSet {
    pub fn get(&self, id: &str) -> Option<&[Scalar]> {
        self.index_by_id
            .get(id)
            .map(|&index| self.entries[index].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Scalar])> {
        self.entries
            .iter()
            .map(|(id, values)| (id.as_str(), values.as_slice()))
    }

    fn slot(&mut self, id: String) -> &mut Vec<Scalar> {
        let index = match self.index_by_id.get(&id) {
            Some(&index) => index,
            None => {
                self.entries.push((id.clone(), Vec::new()));
                self.index_by_id.insert(id, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }
}

impl Serialize for ValueSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, values) in &self.entries {
            map.serialize_entry(id, values)?;
        }
        map.end()
    }
}

/// Equality key for a raw value. Numbers compare by their double value with
/// `-0` folded into `0`, so `80`, `80.0` and `8e1` are one value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum ValueKey {
    Null,
    Bool(bool),
    Number(u64),
    Text(String),
    List(Vec<ValueKey>),
}

impl From<&Scalar> for ValueKey {
    fn from(value: &Scalar) -> Self {
        match value {
            Scalar::Null => Self::Null,
            Scalar::Bool(flag) => Self::Bool(*flag),
            Scalar::Number(number) => {
                let float = number.as_f64().unwrap_or(f64::NAN);
                let float = if float == 0.0 { 0.0 } else { float };
                Self::Number(float.to_bits())
            }
            Scalar::Text(text) => Self::Text(text.clone()),
            Scalar::List(items) => Self::List(items.iter().map(Self::from).collect()),
        }
    }
}

pub fn extract_values(dataset: &Dataset, configuration: &Configuration) -> ValueSet {
    let mut value_set = ValueSet::default();

    for field in &configuration.fields {
        let slot = value_set.slot(field.id());
        let mut seen = slot.iter().map(ValueKey::from).collect::<HashSet<_>>();

        for record in dataset.records() {
            if let Some(value) = record.resolve(&field.path)
                && seen.insert(ValueKey::from(value))
            {
                slot.push(value.clone());
            }
        }
    }

    debug!(
        fields = value_set.len(),
        records = dataset.len(),
        "extracted unique field values"
    );
    value_set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_payload;
    use crate::fields::infer;

    fn values_for(raw: &str) -> ValueSet {
        let dataset = parse_payload(raw).unwrap().dataset;
        let configuration = infer(&dataset, None);
        extract_values(&dataset, &configuration)
    }

    #[test]
    fn keeps_first_seen_order_per_field() {
        let values = values_for(
            r#"[
                { "uid": "uid1", "role": { "role": "role", "confidence": 80 } },
                { "uid": "uid2", "role": { "role": "role", "confidence": 82 } }
            ]"#,
        );

        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"{"uid":["uid1","uid2"],"role.role":["role"],"role.confidence":[80,82]}"#
        );
    }

    #[test]
    fn suppresses_duplicates() {
        let values = values_for(
            r#"[
                { "role": { "confidence": 80 } },
                { "role": { "confidence": 80 } }
            ]"#,
        );
        assert_eq!(
            values.get("role.confidence").unwrap(),
            [Scalar::Number(80u64.into())]
        );
    }

    #[test]
    fn compares_raw_values_not_their_text() {
        let values = values_for(r#"[{ "v": 80 }, { "v": "80" }, { "v": 80 }]"#);
        assert_eq!(
            values.get("v").unwrap(),
            [Scalar::Number(80u64.into()), Scalar::Text("80".to_owned())]
        );
    }

    #[test]
    fn numerically_equal_values_are_one_value() {
        let values = values_for(r#"[{ "v": 80 }, { "v": 80.0 }, { "v": -0.0 }, { "v": 0 }, { "v": 8e1 }]"#);
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"{"v":[80,-0.0]}"#);
    }

    #[test]
    fn skips_records_missing_the_path() {
        let values = values_for(r#"[{ "a": 1 }, { "b": 2 }, { "a": { "nested": 3 } }, { "a": 4 }]"#);
        assert_eq!(
            values.get("a").unwrap(),
            [Scalar::Number(1u64.into()), Scalar::Number(4u64.into())]
        );
        assert_eq!(values.get("b").unwrap().len(), 1);
    }

    #[test]
    fn zero_fields_give_an_empty_set() {
        let values = extract_values(&Dataset::default(), &Configuration::default());
        assert!(values.is_empty());
        assert!(values.get("anything").is_none());
    }
}
