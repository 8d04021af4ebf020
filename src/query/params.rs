//! Per-request query parameters

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content classification filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    All,
    Config,
    #[serde(alias = "non-config", alias = "state")]
    NonConfig,
    Operational,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentType::All => "all",
            ContentType::Config => "config",
            ContentType::NonConfig => "nonconfig",
            ContentType::Operational => "operational",
        };
        f.write_str(name)
    }
}

/// Filter configuration for one read request
///
/// Built once per request and never mutated during a pruning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    depth_enabled: bool,
    #[serde(default)]
    cur_depth: u32,
    #[serde(default)]
    content: ContentType,
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    fields_fill_all: bool,
}

impl QueryParams {
    /// No filtering: every node is kept
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the result depth; `0` means unlimited
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth_enabled = depth > 0;
        self.cur_depth = depth;
        self
    }

    pub fn with_content(mut self, content: ContentType) -> Self {
        self.content = content;
        self
    }

    /// Field paths relative to the request path, in request order
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Reserved flag; carried through but not consulted by pruning
    pub fn with_fields_fill_all(mut self, fill_all: bool) -> Self {
        self.fields_fill_all = fill_all;
        self
    }

    pub fn is_depth_enabled(&self) -> bool {
        self.depth_enabled
    }

    pub fn cur_depth(&self) -> u32 {
        self.cur_depth
    }

    pub fn is_content_enabled(&self) -> bool {
        self.content != ContentType::All
    }

    pub fn content(&self) -> ContentType {
        self.content
    }

    pub fn is_fields_enabled(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn fields_fill_all(&self) -> bool {
        self.fields_fill_all
    }

    /// True when no filter would remove anything
    pub fn is_identity(&self) -> bool {
        !self.is_depth_enabled() && !self.is_content_enabled() && !self.is_fields_enabled()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "depth={} content={} fields={:?}",
            if self.depth_enabled {
                self.cur_depth.to_string()
            } else {
                "off".to_string()
            },
            self.content,
            self.fields
        )
    }
}
