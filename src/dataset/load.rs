use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::DatasetPayload;
use super::parse::parse_payload;

pub fn load_payload(path: &Path) -> Result<DatasetPayload> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file {}", path.display()))?;

    let payload = parse_payload(&raw)
        .with_context(|| format!("failed to parse dataset file {}", path.display()))?;

    info!(
        path = %path.display(),
        records = payload.dataset.len(),
        has_configuration = payload.configuration.is_some(),
        "loaded dataset"
    );
    Ok(payload)
}
