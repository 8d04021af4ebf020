//! Depth-first pruning walker
//!
//! Visits every present, schema-annotated field below a target node and
//! clears, keeps, or descends into it based on [`FilterEvaluator`] decisions.
//! The tree is mutated in place; the caller must hold exclusive access to it
//! for the whole pass.

use crate::error::PruneError;
use crate::query::{FilterEvaluator, QueryParams};
use crate::schema::SchemaIndex;
use crate::tree::node::{Container, KeyedList, ModuleRoot, Node, NodeKind};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

/// Pruning walker for one request
pub struct TreeWalker<'a, S: SchemaIndex + ?Sized> {
    evaluator: FilterEvaluator<'a, S>,
    params: &'a QueryParams,
    cancel: Option<&'a CancellationToken>,
}

impl<'a, S: SchemaIndex + ?Sized> TreeWalker<'a, S> {
    pub fn new(schema: &'a S, params: &'a QueryParams) -> Self {
        Self {
            evaluator: FilterEvaluator::new(schema, params),
            params,
            cancel: None,
        }
    }

    /// Abort the walk once `token` is cancelled
    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn check_cancelled(&self, path: &str) -> Result<(), PruneError> {
        match self.cancel {
            Some(token) if token.is_cancelled() => Err(PruneError::Cancelled {
                path: path.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Prune `node`, whose schema path is `path`
    pub fn prune(&self, node: &mut Node, path: &str, prune_depth: u32, depth_diff: i32) -> Result<(), PruneError> {
        self.check_cancelled(path)?;

        match node {
            Node::Leaf(_) => {
                trace!(path, "Keeping leaf node");
                Ok(())
            }
            Node::Container(container) => self.prune_container(container, path, prune_depth, depth_diff),
            Node::Root(root) => self.prune_root(root, prune_depth, depth_diff),
            Node::KeyedList(_) | Node::ValueList(_) => {
                // Only container-shaped targets carry named child fields
                debug!(path, kind = node.kind().as_str(), "Bypassing list target");
                Ok(())
            }
        }
    }

    /// Prune the fields of a container (or a keyed-list instance)
    pub fn prune_container(
        &self,
        container: &mut Container,
        path: &str,
        prune_depth: u32,
        depth_diff: i32,
    ) -> Result<(), PruneError> {
        self.check_cancelled(path)?;

        if prune_depth == 1 {
            info!(path, prune_depth, depth_diff, "Pruning");
        } else {
            trace!(path, prune_depth, depth_diff, "Pruning");
        }

        for field in container.fields_mut() {
            let Some(schema_name) = field.schema.as_deref() else {
                continue;
            };
            let Some(value) = field.value.as_mut() else {
                continue;
            };
            if value.is_zero() {
                trace!(path, field = schema_name, "Skipping zero value node");
                continue;
            }

            let child_path = format!("{}/{}", path, schema_name);
            let decision = self.evaluator.evaluate(&child_path, prune_depth, depth_diff);

            if !decision.keep {
                debug!(path = %child_path, kind = value.kind().as_str(), "Removing node");
                field.clear();
                continue;
            }
            if decision.keep_subtree {
                debug!(path = %child_path, kind = value.kind().as_str(), "Keeping subtree");
                continue;
            }

            match value {
                Node::KeyedList(list) => self.prune_list(list, &child_path, prune_depth, depth_diff)?,
                Node::ValueList(items) => {
                    for item in items.iter_mut() {
                        self.prune(item, &child_path, prune_depth + 1, depth_diff)?;
                    }
                }
                Node::Container(inner) => {
                    self.prune_container(inner, &child_path, prune_depth + 1, depth_diff)?
                }
                Node::Leaf(_) => trace!(path = %child_path, "Keeping node"),
                Node::Root(_) => {
                    return Err(PruneError::UnexpectedNode {
                        path: child_path,
                        expected: "data node",
                        found: NodeKind::Root.as_str(),
                    })
                }
            }
        }

        if prune_depth == 1 {
            info!(path, "Done pruning");
        }
        Ok(())
    }

    /// Keyed lists are cut at the list itself when the depth limit would
    /// leave instances holding nothing but their keys.
    fn prune_list(&self, list: &mut KeyedList, path: &str, prune_depth: u32, depth_diff: i32) -> Result<(), PruneError> {
        if self.params.is_depth_enabled() && prune_depth + 1 >= self.params.cur_depth() {
            debug!(path, prune_depth, elements = list.len(), "Trimming list instances");
            list.clear();
            return Ok(());
        }

        for element in list.values_mut() {
            self.prune_container(element, path, prune_depth + 1, depth_diff)?;
        }
        Ok(())
    }

    /// The document root: every child is a module top-level node
    ///
    /// Top-level nodes themselves are never filtered, only what lies below them.
    fn prune_root(&self, root: &mut ModuleRoot, prune_depth: u32, depth_diff: i32) -> Result<(), PruneError> {
        info!(prune_depth, depth_diff, "Pruning from document root");
        for child in root.children_mut() {
            let Some(value) = child.value.as_mut() else {
                continue;
            };
            if value.is_zero() {
                continue;
            }
            let module_path = format!("/{}:{}", child.module, child.name);
            self.prune(value, &module_path, prune_depth + 1, depth_diff)?;
        }
        Ok(())
    }
}
