use serde_json::{Map, Value};

use crate::fields::Configuration;

use super::record::{Mapping, Node, Record, Scalar};
use super::{Dataset, DatasetError, DatasetPayload};

/// Deepest nesting accepted for a single record.
pub const MAX_DEPTH: usize = 64;

pub fn parse_payload(raw: &str) -> Result<DatasetPayload, DatasetError> {
    let parsed: Value = serde_json::from_str(raw)?;
    payload_from_value(parsed)
}

pub fn payload_from_value(value: Value) -> Result<DatasetPayload, DatasetError> {
    match value {
        Value::Array(items) => Ok(DatasetPayload {
            dataset: dataset_from_items(items)?,
            configuration: None,
        }),
        Value::Object(mut object) => {
            let Some(Value::Array(items)) = object.remove("dataset") else {
                return Err(DatasetError::UnexpectedShape);
            };

            let configuration = match object.remove("configuration") {
                None | Some(Value::Null) => None,
                Some(raw) => Some(
                    serde_json::from_value::<Configuration>(raw)
                        .map_err(DatasetError::Configuration)?,
                ),
            };

            Ok(DatasetPayload {
                dataset: dataset_from_items(items)?,
                configuration,
            })
        }
        _ => Err(DatasetError::UnexpectedShape),
    }
}

fn dataset_from_items(items: Vec<Value>) -> Result<Dataset, DatasetError> {
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let Value::Object(object) = item else {
            return Err(DatasetError::NotAMapping { index });
        };
        let record = mapping_from_object(object, 1)
            .ok_or(DatasetError::TooDeep { index, limit: MAX_DEPTH })?;
        records.push(record);
    }
    Ok(Dataset::new(records))
}

fn mapping_from_object(object: Map<String, Value>, depth: usize) -> Option<Record> {
    if depth > MAX_DEPTH {
        return None;
    }

    let mut mapping = Mapping::new();
    for (key, value) in object {
        let node = match value {
            Value::Object(child) => Node::Mapping(mapping_from_object(child, depth + 1)?),
            Value::Array(items) => Node::Scalar(Scalar::from_array(items)),
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(flag) => Node::Scalar(Scalar::Bool(flag)),
            Value::Number(number) => Node::Scalar(Scalar::Number(number)),
            Value::String(text) => Node::Scalar(Scalar::Text(text)),
        };
        mapping.insert(key, node);
    }
    Some(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDS: &str = r#"[
        { "uid": "uid1", "role": { "role": "role", "confidence": 80 } },
        { "uid": "uid2", "role": { "role": "role", "confidence": 80 } }
    ]"#;

    #[test]
    fn parses_bare_record_array() {
        let payload = parse_payload(RECORDS).unwrap();
        assert_eq!(payload.dataset.len(), 2);
        assert!(payload.configuration.is_none());
    }

    #[test]
    fn parses_dataset_with_configuration() {
        let raw = format!(
            r#"{{ "dataset": {RECORDS}, "configuration": {{ "fields": [
                {{ "path": ["uid"], "displayName": "UID", "groupable": true }},
                {{ "path": ["role", "role"], "displayName": "Role", "groupable": false }}
            ] }} }}"#
        );
        let payload = parse_payload(&raw).unwrap();
        let configuration = payload.configuration.unwrap();
        assert_eq!(configuration.fields.len(), 2);
        assert_eq!(configuration.fields[1].display_name, "Role");
        assert!(!configuration.fields[1].groupable);
    }

    #[test]
    fn rejects_non_object_records() {
        let error = parse_payload(r#"[{ "uid": "a" }, 3]"#).unwrap_err();
        assert!(matches!(error, DatasetError::NotAMapping { index: 1 }));
    }

    #[test]
    fn rejects_unexpected_shapes() {
        assert!(matches!(
            parse_payload(r#""text""#).unwrap_err(),
            DatasetError::UnexpectedShape
        ));
        assert!(matches!(
            parse_payload(r#"{ "records": [] }"#).unwrap_err(),
            DatasetError::UnexpectedShape
        ));
    }

    #[test]
    fn rejects_records_nested_past_the_limit() {
        let mut raw = String::from("1");
        for _ in 0..=MAX_DEPTH {
            raw = format!(r#"{{"a":{raw}}}"#);
        }
        let error = parse_payload(&format!("[{raw}]")).unwrap_err();
        assert!(matches!(error, DatasetError::TooDeep { index: 0, .. }));
    }
}
