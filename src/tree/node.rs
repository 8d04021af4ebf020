//! In-memory data tree nodes
//!
//! A tree is materialized by an upstream collaborator (see [`crate::tree::builder`])
//! and then trimmed in place. Pruning only ever clears slots or removes list
//! elements; it never creates nodes.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Node kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Container,
    KeyedList,
    ValueList,
    Root,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Leaf => "leaf",
            NodeKind::Container => "container",
            NodeKind::KeyedList => "keyed-list",
            NodeKind::ValueList => "value-list",
            NodeKind::Root => "module-root",
        }
    }
}

/// A data tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Scalar value. `Null` is treated as an absent leaf.
    Leaf(Value),
    /// Named field set
    Container(Container),
    /// List instances addressed by their key tuple
    KeyedList(KeyedList),
    /// Ordered elements without keys (leaf-lists, unkeyed lists)
    ValueList(Vec<Node>),
    /// Synthetic document root whose children are module top-level nodes
    Root(ModuleRoot),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Leaf(_) => NodeKind::Leaf,
            Node::Container(_) => NodeKind::Container,
            Node::KeyedList(_) => NodeKind::KeyedList,
            Node::ValueList(_) => NodeKind::ValueList,
            Node::Root(_) => NodeKind::Root,
        }
    }

    /// True when the node carries nothing worth visiting
    pub fn is_zero(&self) -> bool {
        match self {
            Node::Leaf(value) => value.is_null(),
            Node::KeyedList(list) => list.is_empty(),
            Node::ValueList(items) => items.is_empty(),
            Node::Container(_) | Node::Root(_) => false,
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Node::Container(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match self {
            Node::Container(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_keyed_list(&self) -> Option<&KeyedList> {
        match self {
            Node::KeyedList(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            Node::Leaf(v) => Some(v),
            _ => None,
        }
    }

    /// Render the node with its serializer
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// A named field slot inside a container
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Serialization name
    pub name: String,
    /// Schema name annotation. Fields without one are internal metadata.
    pub schema: Option<String>,
    /// Slot content; `None` once cleared
    pub value: Option<Node>,
}

impl Field {
    /// Field annotated with a schema name equal to its serialization name
    pub fn new(name: impl Into<String>, value: Node) -> Self {
        let name = name.into();
        Self {
            schema: Some(name.clone()),
            name,
            value: Some(value),
        }
    }

    /// Internal field with no schema annotation
    pub fn meta(name: impl Into<String>, value: Node) -> Self {
        Self {
            name: name.into(),
            schema: None,
            value: Some(value),
        }
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    /// Zero the slot in place
    pub fn clear(&mut self) {
        self.value = None;
    }
}

/// Container node: an ordered set of field slots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    fields: Vec<Field>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Node) -> Self {
        self.push(Field::new(name, value));
        self
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    /// Present field by serialization name
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value.as_ref())
    }

    /// Present field by serialization name, mutable
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.fields
            .iter_mut()
            .find(|f| f.name == name)
            .and_then(|f| f.value.as_mut())
    }

    /// Field slot by schema annotation
    pub fn field_by_schema_mut(&mut self, schema_name: &str) -> Option<&mut Field> {
        self.fields
            .iter_mut()
            .find(|f| f.schema.as_deref() == Some(schema_name))
    }

    /// Names of the fields that currently hold a value
    pub fn present_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_present())
            .map(|f| f.name.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        !self.fields.iter().any(Field::is_present)
    }
}

/// Ordered tuple of key leaf values identifying a list instance
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListKey(pub Vec<String>);

impl ListKey {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ListKey(values.into_iter().map(Into::into).collect())
    }
}

/// Keyed list node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedList {
    /// Key leaf names, in schema order
    key_names: Vec<String>,
    elements: BTreeMap<ListKey, Container>,
}

impl KeyedList {
    pub fn new<I, S>(key_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key_names: key_names.into_iter().map(Into::into).collect(),
            elements: BTreeMap::new(),
        }
    }

    pub fn key_names(&self) -> &[String] {
        &self.key_names
    }

    pub fn insert(&mut self, key: ListKey, element: Container) -> Option<Container> {
        self.elements.insert(key, element)
    }

    pub fn get(&self, key: &ListKey) -> Option<&Container> {
        self.elements.get(key)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ListKey, &Container)> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ListKey, &mut Container)> {
        self.elements.iter_mut()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Container> {
        self.elements.values_mut()
    }

    /// Remove every element
    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

/// A top-level module member of the document root
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleChild {
    pub module: String,
    pub name: String,
    pub value: Option<Node>,
}

/// Document root; each child belongs to a module namespace
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleRoot {
    children: Vec<ModuleChild>,
}

impl ModuleRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_child(mut self, module: impl Into<String>, name: impl Into<String>, value: Node) -> Self {
        self.children.push(ModuleChild {
            module: module.into(),
            name: name.into(),
            value: Some(value),
        });
        self
    }

    pub fn push(&mut self, child: ModuleChild) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[ModuleChild] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [ModuleChild] {
        &mut self.children
    }
}

/// Mutable handle to a resolved pruning target
#[derive(Debug)]
pub enum NodeMut<'a> {
    Node(&'a mut Node),
    /// A keyed-list instance
    Element(&'a mut Container),
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Leaf(value) => value.serialize(serializer),
            Node::Container(container) => container.serialize(serializer),
            Node::KeyedList(list) => list.serialize(serializer),
            Node::ValueList(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Root(root) => root.serialize(serializer),
        }
    }
}

/// Empty lists read as absent after a depth cut, so they are not emitted
fn emits(node: &Node) -> bool {
    match node {
        Node::KeyedList(list) => !list.is_empty(),
        Node::ValueList(items) => !items.is_empty(),
        Node::Leaf(value) => !value.is_null(),
        Node::Container(_) | Node::Root(_) => true,
    }
}

impl Serialize for Container {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: Vec<(&str, &Node)> = self
            .fields
            .iter()
            .filter_map(|f| f.value.as_ref().map(|v| (f.name.as_str(), v)))
            .filter(|(_, v)| emits(v))
            .collect();
        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (name, value) in present {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for KeyedList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.elements.len()))?;
        for element in self.elements.values() {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl Serialize for ModuleRoot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: Vec<(String, &Node)> = self
            .children
            .iter()
            .filter_map(|c| {
                c.value
                    .as_ref()
                    .map(|v| (format!("{}:{}", c.module, c.name), v))
            })
            .filter(|(_, v)| emits(v))
            .collect();
        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (name, value) in present {
            map.serialize_entry(&name, value)?;
        }
        map.end()
    }
}
