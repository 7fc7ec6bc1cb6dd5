use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::fields::{Configuration, FieldDescriptor};

/// View options chosen by the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    /// Fields to group by, outermost first.
    #[serde(default)]
    pub hierarchy_config: Vec<FieldDescriptor>,
    #[serde(default = "default_show_nodes")]
    pub should_show_nodes: bool,
    #[serde(default)]
    pub dark_theme: bool,
    #[serde(default)]
    pub color_by: Option<FieldDescriptor>,
    #[serde(default)]
    pub key_fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub ignored_fields: Vec<FieldDescriptor>,
}

fn default_show_nodes() -> bool {
    true
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            hierarchy_config: Vec::new(),
            should_show_nodes: default_show_nodes(),
            dark_theme: false,
            color_by: None,
            key_fields: Vec::new(),
            ignored_fields: Vec::new(),
        }
    }
}

impl Controls {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read controls file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid controls file {}", path.display()))
    }

    pub fn set_hierarchy_config(&mut self, fields: Vec<FieldDescriptor>) {
        self.hierarchy_config = fields;
    }

    pub fn show_nodes(&mut self, show: bool) {
        self.should_show_nodes = show;
    }

    pub fn use_dark_theme(&mut self, dark: bool) {
        self.dark_theme = dark;
    }

    pub fn set_color_by(&mut self, field: Option<FieldDescriptor>) {
        self.color_by = field;
    }

    pub fn set_key_fields(&mut self, fields: Vec<FieldDescriptor>) {
        self.key_fields = fields;
    }

    pub fn set_ignored_fields(&mut self, fields: Vec<FieldDescriptor>) {
        self.ignored_fields = fields;
    }
}

/// Fields offered for coloring: the groupable ones, in configuration order.
pub fn color_by_candidates(configuration: &Configuration) -> Vec<&FieldDescriptor> {
    configuration.groupable().collect()
}
