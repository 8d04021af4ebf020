//! Data Tree
//!
//! In-memory representation of a read response, the path utilities used to
//! address it, and the walker that prunes it in place.

pub mod builder;
pub mod node;
pub mod path;
pub mod resolve;
pub mod walker;

pub use node::{Container, Field, KeyedList, ListKey, ModuleChild, ModuleRoot, Node, NodeKind, NodeMut};
pub use resolve::{PathResolver, TreeResolver};
pub use walker::TreeWalker;
