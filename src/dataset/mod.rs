mod load;
mod parse;
mod record;

use thiserror::Error;

use crate::fields::Configuration;

pub use load::load_payload;
pub use parse::{MAX_DEPTH, parse_payload, payload_from_value};
pub use record::{LeafVisitor, Mapping, Node, Record, Scalar};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected an array of records or an object with a `dataset` array")]
    UnexpectedShape,
    #[error("record {index} is not an object")]
    NotAMapping { index: usize },
    #[error("record {index} nests deeper than {limit} levels")]
    TooDeep { index: usize, limit: usize },
    #[error("invalid configuration: {0}")]
    Configuration(#[source] serde_json::Error),
}

/// Ordered records. Positions are the join key used by search references
/// and annotations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Record> {
        self.records.get(position)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

/// A dataset as handed over by a loader, with the optional partial
/// configuration that came alongside it.
#[derive(Clone, Debug, Default)]
pub struct DatasetPayload {
    pub dataset: Dataset,
    pub configuration: Option<Configuration>,
}
