//! Per-node keep/prune decisions

use crate::query::content::match_content;
use crate::query::params::QueryParams;
use crate::schema::{SchemaEntry, SchemaIndex};
use tracing::{trace, warn};

/// Outcome of evaluating one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Keep the node; `false` clears it
    pub keep: bool,
    /// Keep everything below the node untouched
    pub keep_subtree: bool,
}

impl Decision {
    pub const KEEP: Decision = Decision {
        keep: true,
        keep_subtree: false,
    };
    pub const DROP: Decision = Decision {
        keep: false,
        keep_subtree: false,
    };
    pub const KEEP_SUBTREE: Decision = Decision {
        keep: true,
        keep_subtree: true,
    };
}

/// Applies depth, content and fields filters to schema paths
pub struct FilterEvaluator<'a, S: SchemaIndex + ?Sized> {
    schema: &'a S,
    params: &'a QueryParams,
}

impl<'a, S: SchemaIndex + ?Sized> FilterEvaluator<'a, S> {
    pub fn new(schema: &'a S, params: &'a QueryParams) -> Self {
        Self { schema, params }
    }

    pub fn params(&self) -> &QueryParams {
        self.params
    }

    /// Decide the fate of the node at `path`
    ///
    /// `prune_depth` counts levels from the pruning root (the root's children
    /// are at depth 1); `depth_diff` realigns it with field paths, which are
    /// relative to the request path.
    pub fn evaluate(&self, path: &str, prune_depth: u32, depth_diff: i32) -> Decision {
        trace!(path, prune_depth, depth_diff, params = %self.params, "evaluate");

        let Some(entry) = self.schema.lookup(path) else {
            warn!(path, "No schema entry for path; keeping subtree");
            return Decision::KEEP_SUBTREE;
        };

        if entry.is_module() {
            trace!(path, "module boundary");
            return Decision::KEEP;
        }

        if self.params.is_depth_enabled() && prune_depth >= self.params.cur_depth() {
            trace!(path, prune_depth, cur_depth = self.params.cur_depth(), "depth: cut");
            return Decision::DROP;
        }

        if self.params.is_content_enabled()
            && !match_content(self.schema, path, entry, self.params.content())
        {
            return Decision::DROP;
        }

        if self.params.is_fields_enabled() {
            let decision = self.match_fields(path, entry, prune_depth, depth_diff);
            if !decision.keep || decision.keep_subtree {
                return decision;
            }
        }

        Decision::KEEP
    }

    /// Field selection
    ///
    /// The first field path terminating at this node wins and stops the scan,
    /// so field order matters when two paths could end here.
    fn match_fields(&self, path: &str, entry: &SchemaEntry, prune_depth: u32, depth_diff: i32) -> Decision {
        if entry.is_key {
            trace!(path, "fields: key leaf kept");
            return Decision::KEEP_SUBTREE;
        }

        let depth = i64::from(prune_depth) + i64::from(depth_diff) - 1;
        let Ok(depth) = usize::try_from(depth) else {
            trace!(path, depth, "fields: node above request path");
            return Decision::DROP;
        };

        let mut decision = Decision::DROP;
        for field in self.params.fields() {
            let segments: Vec<&str> = field.split('/').collect();
            if segments.len() <= depth {
                continue;
            }
            if segments[depth] == entry.name {
                decision.keep = true;
                decision.keep_subtree = depth == segments.len() - 1;
                trace!(path, field = field.as_str(), keep_subtree = decision.keep_subtree, "fields: match");
                if decision.keep_subtree {
                    break;
                }
            }
        }
        decision
    }
}
