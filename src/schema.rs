//! Schema Index
//!
//! Per-path schema metadata used to classify every node the walker visits.
//! Lookups are keyed by canonical, predicate-free schema paths such as
//! `/openconfig-acl:acl/acl-sets/acl-set/config/name`.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

mod document;

pub use document::{ModuleSpec, SchemaDocument, SchemaNodeSpec};

/// Schema node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaKind {
    Module,
    Container,
    List,
    Leaf,
    LeafList,
}

/// Schema metadata for a single path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub name: String,
    pub kind: SchemaKind,
    pub read_only: bool,
    /// Leaf is a key of its parent list
    pub is_key: bool,
    /// Key leaf names (lists only)
    pub keys: Vec<String>,
}

impl SchemaEntry {
    pub fn new(name: impl Into<String>, kind: SchemaKind) -> Self {
        Self {
            name: name.into(),
            kind,
            read_only: false,
            is_key: false,
            keys: Vec::new(),
        }
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_module(&self) -> bool {
        self.kind == SchemaKind::Module
    }

    pub fn is_container(&self) -> bool {
        self.kind == SchemaKind::Container
    }

    pub fn is_list(&self) -> bool {
        self.kind == SchemaKind::List
    }

    /// True for plain leaves only; leaf-lists report false
    pub fn is_leaf(&self) -> bool {
        self.kind == SchemaKind::Leaf
    }

    pub fn is_leaf_list(&self) -> bool {
        self.kind == SchemaKind::LeafList
    }
}

/// Read access to schema metadata by canonical path
pub trait SchemaIndex: Send + Sync {
    fn lookup(&self, path: &str) -> Option<&SchemaEntry>;

    /// Whether a writable `config` leaf mirrors the state leaf at `path`
    ///
    /// Looks up `../../config/<name>` relative to `path`.
    fn sibling_config_leaf(&self, path: &str) -> bool {
        let Some((parent, name)) = path.rsplit_once('/') else {
            return false;
        };
        let Some((grandparent, _)) = parent.rsplit_once('/') else {
            return false;
        };
        let sibling = format!("{}/config/{}", grandparent, name);
        self.lookup(&sibling)
            .map(|entry| entry.is_leaf() && !entry.read_only)
            .unwrap_or(false)
    }
}

/// HashMap-backed schema index
#[derive(Debug, Clone, Default)]
pub struct SchemaMap {
    entries: HashMap<String, SchemaEntry>,
}

impl SchemaMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry; paths must be unique
    pub fn insert(&mut self, path: impl Into<String>, entry: SchemaEntry) -> Result<(), SchemaError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(SchemaError::InvalidPath(path));
        }
        if self.entries.contains_key(&path) {
            return Err(SchemaError::DuplicatePath(path));
        }
        self.entries.insert(path, entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Flatten a nested schema description into an index
    pub fn from_document(document: &SchemaDocument) -> Result<Self, SchemaError> {
        let mut map = SchemaMap::new();
        for module in &document.modules {
            module.register(&mut map)?;
        }
        debug!(entries = map.len(), "Built schema index");
        Ok(map)
    }

    /// Load a schema description from a `.json` or `.toml` file
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let document = SchemaDocument::from_file(path)?;
        let map = Self::from_document(&document)?;
        info!(
            schema_file = %path.display(),
            modules = document.modules.len(),
            entries = map.len(),
            "Loaded schema index"
        );
        Ok(map)
    }
}

impl SchemaIndex for SchemaMap {
    fn lookup(&self, path: &str) -> Option<&SchemaEntry> {
        self.entries.get(path)
    }
}
