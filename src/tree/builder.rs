//! Tree builder for materializing data trees from JSON payloads
//!
//! Walks an RFC 7951 style payload alongside the schema index so that lists
//! become [`KeyedList`]s keyed by their key leaves. Members without a schema
//! entry are materialized by shape alone.

use crate::error::TreeError;
use crate::schema::{SchemaIndex, SchemaKind};
use crate::tree::node::{Container, Field, KeyedList, ListKey, ModuleChild, ModuleRoot, Node};
use crate::tree::path::strip_module_prefix;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Builds [`Node`] trees guided by a schema index
pub struct TreeBuilder<'a, S: SchemaIndex + ?Sized> {
    schema: &'a S,
}

impl<'a, S: SchemaIndex + ?Sized> TreeBuilder<'a, S> {
    pub fn new(schema: &'a S) -> Self {
        Self { schema }
    }

    /// Build a document root from an object keyed by `module:name`
    #[instrument(skip(self, payload))]
    pub fn build_root(&self, payload: &Value) -> Result<Node, TreeError> {
        let members = payload.as_object().ok_or(TreeError::TypeMismatch {
            path: "/".to_string(),
            expected: "object",
        })?;

        let mut root = ModuleRoot::new();
        for (key, value) in members {
            let (module, name) = key
                .split_once(':')
                .ok_or_else(|| TreeError::InvalidRoot(key.clone()))?;
            let node = self.build(&format!("/{}", key), value)?;
            root.push(ModuleChild {
                module: module.to_string(),
                name: name.to_string(),
                value: Some(node),
            });
        }
        debug!(modules = root.children().len(), "Built document root");
        Ok(Node::Root(root))
    }

    /// Build the node at schema path `path` from `payload`
    pub fn build(&self, path: &str, payload: &Value) -> Result<Node, TreeError> {
        let Some(entry) = self.schema.lookup(path) else {
            return self.build_unknown(path, payload);
        };

        match entry.kind {
            SchemaKind::Module | SchemaKind::Container => {
                let members = expect_object(path, payload)?;
                Ok(Node::Container(self.build_container(path, members)?))
            }
            SchemaKind::List => {
                let items = expect_array(path, payload)?;
                if entry.keys.is_empty() {
                    let elements = items
                        .iter()
                        .map(|item| {
                            let members = expect_object(path, item)?;
                            Ok(Node::Container(self.build_container(path, members)?))
                        })
                        .collect::<Result<Vec<_>, TreeError>>()?;
                    return Ok(Node::ValueList(elements));
                }
                Ok(Node::KeyedList(self.build_list(path, &entry.keys, items)?))
            }
            SchemaKind::Leaf => {
                if payload.is_object() || payload.is_array() {
                    return Err(TreeError::TypeMismatch {
                        path: path.to_string(),
                        expected: "scalar",
                    });
                }
                Ok(Node::Leaf(payload.clone()))
            }
            SchemaKind::LeafList => {
                let items = expect_array(path, payload)?;
                Ok(Node::ValueList(items.iter().cloned().map(Node::Leaf).collect()))
            }
        }
    }

    fn build_container(&self, path: &str, members: &Map<String, Value>) -> Result<Container, TreeError> {
        let mut container = Container::new();
        for (key, value) in members {
            if key.starts_with('@') {
                container.push(Field::meta(key.clone(), Node::Leaf(value.clone())));
                continue;
            }
            let name = strip_module_prefix(key);
            let child = self.build(&format!("{}/{}", path, name), value)?;
            container.push(Field {
                name: key.clone(),
                schema: Some(name.to_string()),
                value: Some(child),
            });
        }
        Ok(container)
    }

    fn build_list(&self, path: &str, keys: &[String], items: &[Value]) -> Result<KeyedList, TreeError> {
        let mut list = KeyedList::new(keys.iter().cloned());
        for item in items {
            let members = expect_object(path, item)?;
            let mut key = Vec::with_capacity(keys.len());
            for key_name in keys {
                let value = members.get(key_name).ok_or_else(|| TreeError::MissingKey {
                    path: path.to_string(),
                    key: key_name.clone(),
                })?;
                key.push(key_string(value));
            }
            list.insert(ListKey(key), self.build_container(path, members)?);
        }
        Ok(list)
    }

    fn build_unknown(&self, path: &str, payload: &Value) -> Result<Node, TreeError> {
        match payload {
            Value::Object(members) => Ok(Node::Container(self.build_container(path, members)?)),
            Value::Array(items) => items
                .iter()
                .map(|item| self.build_unknown(path, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Node::ValueList),
            scalar => Ok(Node::Leaf(scalar.clone())),
        }
    }
}

fn expect_object<'v>(path: &str, payload: &'v Value) -> Result<&'v Map<String, Value>, TreeError> {
    payload.as_object().ok_or_else(|| TreeError::TypeMismatch {
        path: path.to_string(),
        expected: "object",
    })
}

fn expect_array<'v>(path: &str, payload: &'v Value) -> Result<&'v [Value], TreeError> {
    payload
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| TreeError::TypeMismatch {
            path: path.to_string(),
            expected: "array",
        })
}

fn key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
