//! Query parameter filters
//!
//! Depth, content and fields filters evaluated per schema path.

pub mod content;
pub mod filter;
pub mod params;

pub use filter::{Decision, FilterEvaluator};
pub use params::{ContentType, QueryParams};
