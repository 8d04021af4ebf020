//! Request path resolution against a materialized tree

use crate::error::PruneError;
use crate::tree::node::{Container, ModuleRoot, Node, NodeMut};
use crate::tree::path::{parse_path, strip_module_prefix, PathElem};
use tracing::trace;

/// Resolves an absolute request path to the node(s) it addresses
pub trait PathResolver: Send + Sync {
    /// Resolution never mutates the tree. More than one handle is returned
    /// when list predicates match several instances.
    fn resolve<'a>(&self, root: &'a mut Node, path: &str) -> Result<Vec<NodeMut<'a>>, PruneError>;
}

/// Default resolver with partial key matching
///
/// Missing list predicates act as wildcards, so `/m:top/list` addresses every
/// instance of `list`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeResolver;

impl PathResolver for TreeResolver {
    fn resolve<'a>(&self, root: &'a mut Node, path: &str) -> Result<Vec<NodeMut<'a>>, PruneError> {
        let elems = parse_path(path)?;
        let mut current = vec![NodeMut::Node(root)];

        for (depth, elem) in elems.iter().enumerate() {
            let mut next = Vec::new();
            for handle in current {
                descend(handle, elem, depth, path, &mut next)?;
            }
            if next.is_empty() {
                return Err(PruneError::resolution(
                    path,
                    format!("no instance matches '{}'", elem.name),
                ));
            }
            current = next;
        }

        trace!(path, targets = current.len(), "Resolved path");
        Ok(current)
    }
}

fn descend<'a>(
    handle: NodeMut<'a>,
    elem: &PathElem,
    depth: usize,
    path: &str,
    out: &mut Vec<NodeMut<'a>>,
) -> Result<(), PruneError> {
    match handle {
        NodeMut::Node(node) => {
            let kind = node.kind();
            match node {
                Node::Root(root) if depth == 0 => {
                    let child = module_child(root, elem, path)?;
                    expand(child, elem, path, out)
                }
                Node::Container(container) if depth > 0 => {
                    let child = field_node(container, elem, path)?;
                    expand(child, elem, path, out)
                }
                _ => Err(PruneError::resolution(
                    path,
                    format!("cannot descend from {} into '{}'", kind.as_str(), elem.name),
                )),
            }
        }
        NodeMut::Element(container) => {
            let child = field_node(container, elem, path)?;
            expand(child, elem, path, out)
        }
    }
}

fn module_child<'a>(root: &'a mut ModuleRoot, elem: &PathElem, path: &str) -> Result<&'a mut Node, PruneError> {
    let wanted_module = elem.name.rsplit_once(':').map(|(module, _)| module);
    let wanted_name = elem.local_name();

    root.children_mut()
        .iter_mut()
        .find(|child| child.name == wanted_name && wanted_module.map_or(true, |m| child.module == m))
        .and_then(|child| child.value.as_mut())
        .ok_or_else(|| PruneError::resolution(path, format!("no top-level node '{}'", elem.name)))
}

fn field_node<'a>(container: &'a mut Container, elem: &PathElem, path: &str) -> Result<&'a mut Node, PruneError> {
    let name = strip_module_prefix(&elem.name);
    container
        .field_by_schema_mut(name)
        .and_then(|field| field.value.as_mut())
        .ok_or_else(|| PruneError::resolution(path, format!("absent node '{}'", name)))
}

fn expand<'a>(node: &'a mut Node, elem: &PathElem, path: &str, out: &mut Vec<NodeMut<'a>>) -> Result<(), PruneError> {
    match node {
        Node::KeyedList(list) => {
            let mut positions = Vec::with_capacity(elem.keys.len());
            for (key, value) in &elem.keys {
                let idx = list
                    .key_names()
                    .iter()
                    .position(|k| k == key)
                    .ok_or_else(|| PruneError::resolution(path, format!("'{}' is not a key of '{}'", key, elem.name)))?;
                positions.push((idx, value.as_str()));
            }
            for (key, element) in list.iter_mut() {
                let matched = positions
                    .iter()
                    .all(|(idx, value)| key.0.get(*idx).map(String::as_str) == Some(*value));
                if matched {
                    out.push(NodeMut::Element(element));
                }
            }
            Ok(())
        }
        other if !elem.keys.is_empty() => Err(PruneError::resolution(
            path,
            format!("predicates on non-list {} '{}'", other.kind().as_str(), elem.name),
        )),
        other => {
            out.push(NodeMut::Node(other));
            Ok(())
        }
    }
}
