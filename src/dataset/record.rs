use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

/// A leaf value inside a record.
///
/// Arrays are leaves too; objects nested inside arrays are kept as their
/// compact JSON text so that every scalar stays hashable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vec<Scalar>),
}

impl Scalar {
    pub(super) fn from_array(items: Vec<Value>) -> Self {
        Self::List(items.into_iter().map(Self::from_array_item).collect())
    }

    fn from_array_item(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => Self::Number(number),
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::from_array(items),
            object @ Value::Object(_) => Self::Text(object.to_string()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
            Self::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Number(number) => number.serialize(serializer),
            Self::Text(text) => serializer.serialize_str(text),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Mapping(Mapping),
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(scalar) => scalar.serialize(serializer),
            Self::Mapping(mapping) => mapping.serialize(serializer),
        }
    }
}

/// Receives every leaf of a record during a depth-first walk.
pub trait LeafVisitor {
    fn leaf(&mut self, path: &[String], value: &Scalar);
}

/// Ordered string-keyed mapping. Key order follows the source document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Node)>,
}

pub type Record = Mapping;

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, node: Node) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            slot.1 = node;
        } else {
            self.entries.push((key, node));
        }
    }

    pub fn with(mut self, key: impl Into<String>, node: Node) -> Self {
        self.insert(key, node);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, node)| node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Follows `path` and returns the scalar at its end. Paths that stop
    /// early or end on a mapping resolve to nothing.
    pub fn resolve(&self, path: &[String]) -> Option<&Scalar> {
        let (last, parents) = path.split_last()?;
        let mut cursor = self;
        for segment in parents {
            match cursor.get(segment)? {
                Node::Mapping(next) => cursor = next,
                Node::Scalar(_) => return None,
            }
        }

        match cursor.get(last)? {
            Node::Scalar(value) => Some(value),
            Node::Mapping(_) => None,
        }
    }

    pub fn visit_leaves<V: LeafVisitor>(&self, visitor: &mut V) {
        let mut path = Vec::new();
        self.walk(&mut path, visitor);
    }

    fn walk<V: LeafVisitor>(&self, path: &mut Vec<String>, visitor: &mut V) {
        for (key, node) in &self.entries {
            path.push(key.clone());
            match node {
                Node::Scalar(value) => visitor.leaf(path, value),
                Node::Mapping(child) => child.walk(path, visitor),
            }
            path.pop();
        }
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, node) in &self.entries {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}
