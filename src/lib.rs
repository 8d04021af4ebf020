//! Shear: query-parameter pruning for YANG-modelled data trees
//!
//! Trims a materialized read response in place so it honours the `depth`,
//! `content` and `fields` query parameters of a RESTCONF/gNMI style request.
//! Decisions are driven by a [`schema::SchemaIndex`]; the tree is walked
//! depth first by [`tree::TreeWalker`] and orchestrated by [`prune::Pruner`].

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod prune;
pub mod query;
pub mod schema;
pub mod stats;
pub mod tree;

pub use api::ShearApi;
pub use error::{ApiError, PruneError, SchemaError, TreeError};
pub use prune::{Pruner, PrunerOptions};
pub use query::{ContentType, QueryParams};
