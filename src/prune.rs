//! Pruning Orchestrator
//!
//! Resolves the target node(s) of a read request, aligns structural depth
//! with the request-relative field paths, runs the walker on every target and
//! records timing statistics.

use crate::error::PruneError;
use crate::query::QueryParams;
use crate::schema::SchemaIndex;
use crate::stats::PruneStats;
use crate::tree::node::{Node, NodeMut};
use crate::tree::path::{segment_count, strip_predicates};
use crate::tree::resolve::{PathResolver, TreeResolver};
use crate::tree::walker::TreeWalker;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

/// Orchestrator behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrunerOptions {
    /// Record per-call timing into the shared statistics
    pub record_stats: bool,
    /// Log cumulative totals after every call
    pub log_totals: bool,
}

impl Default for PrunerOptions {
    fn default() -> Self {
        Self {
            record_stats: true,
            log_totals: true,
        }
    }
}

/// Query-parameter pruning entry point
///
/// Holds no per-request state; one instance can serve concurrent requests as
/// long as each call owns its tree exclusively.
pub struct Pruner<S: SchemaIndex, R: PathResolver = TreeResolver> {
    schema: Arc<S>,
    resolver: R,
    stats: Arc<PruneStats>,
    options: PrunerOptions,
}

impl<S: SchemaIndex> Pruner<S, TreeResolver> {
    pub fn new(schema: Arc<S>) -> Self {
        Self::with_resolver(schema, TreeResolver)
    }
}

impl<S: SchemaIndex, R: PathResolver> Pruner<S, R> {
    pub fn with_resolver(schema: Arc<S>, resolver: R) -> Self {
        Self {
            schema,
            resolver,
            stats: Arc::new(PruneStats::new()),
            options: PrunerOptions::default(),
        }
    }

    /// Share a statistics accumulator with other pruners
    pub fn with_stats(mut self, stats: Arc<PruneStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_options(mut self, options: PrunerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn stats(&self) -> &Arc<PruneStats> {
        &self.stats
    }

    pub fn schema(&self) -> &Arc<S> {
        &self.schema
    }

    /// Prune the subtree(s) at `absolute_path` in place
    ///
    /// `request_path` is the path the client asked for; field selections are
    /// relative to it. `absolute_path` may sit below it when a subtree is
    /// pruned on its own.
    pub fn prune(
        &self,
        root: &mut Node,
        absolute_path: &str,
        request_path: &str,
        params: &QueryParams,
    ) -> Result<(), PruneError> {
        self.run(root, absolute_path, request_path, params, None)
    }

    /// Like [`Pruner::prune`], aborting once `cancel` fires
    ///
    /// A cancelled pass leaves the tree partially pruned.
    pub fn prune_with_cancellation(
        &self,
        root: &mut Node,
        absolute_path: &str,
        request_path: &str,
        params: &QueryParams,
        cancel: &CancellationToken,
    ) -> Result<(), PruneError> {
        self.run(root, absolute_path, request_path, params, Some(cancel))
    }

    #[instrument(skip(self, root, params, cancel), fields(params = %params))]
    fn run(
        &self,
        root: &mut Node,
        absolute_path: &str,
        request_path: &str,
        params: &QueryParams,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), PruneError> {
        let start = Instant::now();

        let xpath = strip_predicates(absolute_path);
        // Field paths are relative to the request path, the walk depth to xpath
        let depth_diff = segment_count(&xpath) as i32 - segment_count(request_path) as i32;

        let targets = match self.resolver.resolve(root, absolute_path) {
            Ok(targets) => targets,
            Err(e) => {
                error!(absolute_path, request_path, error = %e, "Couldn't resolve prune target");
                return Err(e);
            }
        };
        debug!(xpath = %xpath, depth_diff, targets = targets.len(), "Resolved prune targets");

        let mut walker = TreeWalker::new(self.schema.as_ref(), params);
        if let Some(token) = cancel {
            walker = walker.with_cancellation(token);
        }

        let mut result = Ok(());
        for target in targets {
            result = match target {
                NodeMut::Node(node) => walker.prune(node, &xpath, 1, depth_diff),
                NodeMut::Element(element) => walker.prune_container(element, &xpath, 1, depth_diff),
            };
            if result.is_err() {
                break;
            }
        }

        let elapsed = start.elapsed();
        if self.options.record_stats {
            self.stats.record(&xpath, absolute_path, elapsed);
        }
        info!(absolute_path, request_path, elapsed = ?elapsed, "Prune complete");
        if self.options.log_totals {
            info!(totals = %self.stats.totals(), "Prune totals");
        }

        if let Err(e) = &result {
            error!(absolute_path, error = %e, "Pruning failed; tree may be partially pruned");
        }
        result
    }
}
