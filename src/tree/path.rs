//! Schema path splitting and normalization utilities
//!
//! Request paths look like `/openconfig-acl:acl/acl-sets/acl-set[name=A][type=B]`.
//! Schema paths are the same sequence with every list predicate removed and
//! module prefixes kept only on the first segment.

use crate::error::PruneError;

/// One element of a parsed request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathElem {
    /// Node name, possibly carrying a `module:` prefix
    pub name: String,
    /// List predicates in the order they were written
    pub keys: Vec<(String, String)>,
}

impl PathElem {
    /// Node name without any module prefix
    pub fn local_name(&self) -> &str {
        strip_module_prefix(&self.name)
    }
}

/// Split a path into segments on `/`, ignoring separators inside `[...]`
/// predicates and after a `\` escape. A leading `/` is ignored and the root
/// path yields no segments.
pub fn split_path(path: &str) -> Vec<&str> {
    let path = path.strip_prefix('/').unwrap_or(path);
    if path.is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_escape = false;
    let mut in_key = false;

    for (i, c) in path.char_indices() {
        if in_escape {
            in_escape = false;
            continue;
        }
        match c {
            '\\' => in_escape = true,
            '[' => in_key = true,
            ']' => in_key = false,
            '/' if !in_key => {
                parts.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&path[start..]);
    parts
}

/// Number of schema levels in a path
pub fn segment_count(path: &str) -> usize {
    split_path(path).len()
}

/// Drop a `module:` prefix from a single segment
pub fn strip_module_prefix(segment: &str) -> &str {
    match segment.rfind(':') {
        Some(idx) => &segment[idx + 1..],
        None => segment,
    }
}

/// Canonical schema path for a request path
///
/// Removes list predicates from every segment and module prefixes from every
/// segment but the first. The root path normalizes to `""`.
pub fn strip_predicates(path: &str) -> String {
    let segments = split_path(path);
    if segments.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(path.len());
    for (i, segment) in segments.iter().enumerate() {
        let name = match segment.find('[') {
            Some(idx) => &segment[..idx],
            None => segment,
        };
        out.push('/');
        if i == 0 {
            out.push_str(name);
        } else {
            out.push_str(strip_module_prefix(name));
        }
    }
    out
}

/// Parse a request path into elements with their list predicates
pub fn parse_path(path: &str) -> Result<Vec<PathElem>, PruneError> {
    split_path(path)
        .into_iter()
        .map(|segment| parse_segment(path, segment))
        .collect()
}

fn parse_segment(path: &str, segment: &str) -> Result<PathElem, PruneError> {
    let (name, mut rest) = match segment.find('[') {
        Some(idx) => (&segment[..idx], &segment[idx..]),
        None => (segment, ""),
    };
    if name.is_empty() {
        return Err(PruneError::resolution(path, "empty path segment"));
    }

    let mut keys = Vec::new();
    while !rest.is_empty() {
        let body = rest
            .strip_prefix('[')
            .ok_or_else(|| PruneError::resolution(path, format!("malformed predicate in '{}'", segment)))?;

        let eq = body
            .find('=')
            .ok_or_else(|| PruneError::resolution(path, format!("predicate without '=' in '{}'", segment)))?;
        let key = body[..eq].trim();

        let mut value = String::new();
        let mut end = None;
        let mut escaped = false;
        for (i, c) in body[eq + 1..].char_indices() {
            if escaped {
                value.push(c);
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                ']' => {
                    end = Some(eq + 1 + i);
                    break;
                }
                _ => value.push(c),
            }
        }
        let end = end.ok_or_else(|| {
            PruneError::resolution(path, format!("unterminated predicate in '{}'", segment))
        })?;

        if key.is_empty() {
            return Err(PruneError::resolution(path, format!("empty predicate key in '{}'", segment)));
        }
        keys.push((key.to_string(), value));
        rest = &body[end + 1..];
    }

    Ok(PathElem {
        name: name.to_string(),
        keys,
    })
}
