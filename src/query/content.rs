//! Config / state / operational classification of schema nodes

use crate::query::params::ContentType;
use crate::schema::{SchemaEntry, SchemaIndex};
use tracing::trace;

/// Whether the node belongs to the state (non-config) partition
///
/// A writable non-leaf that is not a `config` container is provisionally
/// treated as state; its descendants decide what finally survives.
pub fn is_state_entry(entry: &SchemaEntry) -> bool {
    if entry.read_only {
        return true;
    }
    if entry.is_leaf() {
        return false;
    }
    if entry.is_container() && entry.name == "config" {
        return false;
    }
    true
}

/// Whether the node carries derived operational data
///
/// A state leaf mirroring a writable leaf of the same name under the sibling
/// `config` container is applied configuration, not operational data.
pub fn is_operational_entry<S: SchemaIndex + ?Sized>(schema: &S, path: &str, entry: &SchemaEntry) -> bool {
    if !is_state_entry(entry) {
        trace!(path, "operational: omit config path");
        return false;
    }
    if !entry.is_leaf() {
        return true;
    }
    if schema.sibling_config_leaf(path) {
        trace!(path, "operational: omit state leaf mirroring config");
        return false;
    }
    true
}

/// Content filter; list keys always pass
pub fn match_content<S: SchemaIndex + ?Sized>(
    schema: &S,
    path: &str,
    entry: &SchemaEntry,
    content: ContentType,
) -> bool {
    if entry.is_key {
        trace!(path, "content: key leaf kept");
        return true;
    }

    let keep = match content {
        ContentType::All => true,
        ContentType::Config => !entry.read_only,
        ContentType::NonConfig => is_state_entry(entry),
        ContentType::Operational => is_operational_entry(schema, path, entry),
    };
    if !keep {
        trace!(path, %content, "content: omit path");
    }
    keep
}
