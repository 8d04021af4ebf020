//! Pruning API
//!
//! Thin facade for services that receive read responses as JSON: holds the
//! shared schema index and pruner, materializes payloads into trees, prunes
//! them and hands back JSON.

use crate::config::ShearConfig;
use crate::error::ApiError;
use crate::prune::{Pruner, PrunerOptions};
use crate::query::QueryParams;
use crate::schema::SchemaMap;
use crate::stats::StatsSnapshot;
use crate::tree::builder::TreeBuilder;
use crate::tree::node::Node;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Pruning service over a [`SchemaMap`]
pub struct ShearApi {
    pruner: Pruner<SchemaMap>,
}

impl ShearApi {
    pub fn new(schema: Arc<SchemaMap>) -> Self {
        Self {
            pruner: Pruner::new(schema),
        }
    }

    pub fn with_options(schema: Arc<SchemaMap>, options: PrunerOptions) -> Self {
        Self {
            pruner: Pruner::new(schema).with_options(options),
        }
    }

    /// Build the service from validated configuration
    ///
    /// The configuration must name a schema document.
    pub fn from_config(config: &ShearConfig) -> Result<Self, ApiError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;

        let schema_path = config
            .schema
            .path
            .as_deref()
            .ok_or_else(|| ApiError::ConfigError("No schema path configured".to_string()))?;
        let schema = SchemaMap::from_file(schema_path)?;

        let options = PrunerOptions {
            record_stats: config.stats.enabled,
            log_totals: config.stats.log_totals,
        };
        info!(schema_entries = schema.len(), ?options, "Pruning service ready");
        Ok(Self::with_options(Arc::new(schema), options))
    }

    pub fn pruner(&self) -> &Pruner<SchemaMap> {
        &self.pruner
    }

    pub fn schema(&self) -> &Arc<SchemaMap> {
        self.pruner.schema()
    }

    /// Materialize a JSON document keyed by `module:name`
    pub fn build_tree(&self, payload: &Value) -> Result<Node, ApiError> {
        Ok(TreeBuilder::new(self.schema().as_ref()).build_root(payload)?)
    }

    /// Prune an already materialized tree in place
    pub fn prune(
        &self,
        root: &mut Node,
        absolute_path: &str,
        request_path: &str,
        params: &QueryParams,
    ) -> Result<(), ApiError> {
        Ok(self.pruner.prune(root, absolute_path, request_path, params)?)
    }

    /// Prune a JSON document and return the surviving data
    ///
    /// Identity parameters skip materialization entirely.
    pub fn prune_json(
        &self,
        payload: &Value,
        absolute_path: &str,
        request_path: &str,
        params: &QueryParams,
    ) -> Result<Value, ApiError> {
        if params.is_identity() {
            debug!(absolute_path, "No query parameters; returning payload as is");
            return Ok(payload.clone());
        }
        let mut root = self.build_tree(payload)?;
        self.prune(&mut root, absolute_path, request_path, params)?;
        Ok(root.to_json())
    }

    /// [`ShearApi::prune_json`] with cooperative cancellation
    pub fn prune_json_with_cancellation(
        &self,
        payload: &Value,
        absolute_path: &str,
        request_path: &str,
        params: &QueryParams,
        cancel: &CancellationToken,
    ) -> Result<Value, ApiError> {
        let mut root = self.build_tree(payload)?;
        self.pruner
            .prune_with_cancellation(&mut root, absolute_path, request_path, params, cancel)?;
        Ok(root.to_json())
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.pruner.stats().snapshot()
    }
}
