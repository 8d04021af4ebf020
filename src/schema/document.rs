//! Nested schema description format, loadable from JSON or TOML

use super::{SchemaEntry, SchemaKind, SchemaMap};
use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A set of modules and their node trees
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
}

/// One module and its top-level nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<SchemaNodeSpec>,
}

/// One schema node and its descendants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNodeSpec {
    pub name: String,
    pub kind: SchemaKind,
    /// `false` marks the subtree read-only
    #[serde(default = "default_true")]
    pub config: bool,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub children: Vec<SchemaNodeSpec>,
}

fn default_true() -> bool {
    true
}

impl SchemaDocument {
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let raw = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&raw).map_err(|e| SchemaError::Parse(e.to_string())),
            Some("toml") => toml::from_str(&raw).map_err(|e| SchemaError::Parse(e.to_string())),
            _ => Err(SchemaError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl ModuleSpec {
    pub(super) fn register(&self, map: &mut SchemaMap) -> Result<(), SchemaError> {
        validate_name(&self.name)?;
        map.insert(
            format!("/{}", self.name),
            SchemaEntry::new(self.name.clone(), SchemaKind::Module),
        )?;
        for node in &self.nodes {
            let path = format!("/{}:{}", self.name, node.name);
            node.register(map, path, false, &[])?;
        }
        Ok(())
    }
}

impl SchemaNodeSpec {
    fn register(
        &self,
        map: &mut SchemaMap,
        path: String,
        inherited_read_only: bool,
        parent_keys: &[String],
    ) -> Result<(), SchemaError> {
        validate_name(&self.name)?;
        if self.kind == SchemaKind::Module {
            return Err(SchemaError::InvalidPath(format!(
                "{}: module nodes may only appear at document level",
                path
            )));
        }

        // config false is inherited by every descendant
        let read_only = inherited_read_only || !self.config;
        let mut entry = SchemaEntry::new(self.name.clone(), self.kind)
            .read_only(read_only)
            .with_keys(self.keys.iter().cloned());
        if self.kind == SchemaKind::Leaf && parent_keys.contains(&self.name) {
            entry = entry.key();
        }
        map.insert(path.clone(), entry)?;

        for child in &self.children {
            let child_path = format!("{}/{}", path, child.name);
            child.register(map, child_path, read_only, &self.keys)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), SchemaError> {
    if name.is_empty() || name.contains('/') || name.contains('[') {
        return Err(SchemaError::InvalidPath(format!("invalid node name '{}'", name)));
    }
    Ok(())
}
