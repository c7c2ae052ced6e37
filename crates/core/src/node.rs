//! Node types - the entities of the property graph

use crate::label::{normalize_name, sanitize_node_kind};
use crate::value::PropertyValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable deduplication identity of a node: normalized name + kind,
/// case-insensitive on both.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeKey(String);

impl NodeKey {
    /// Build a key from a raw display name and a (sanitized) kind.
    pub fn new(name: &str, kind: &str) -> Self {
        Self(format!(
            "{}|{}",
            normalize_name(name),
            kind.to_ascii_uppercase()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A typed, named node in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Display name, original casing preserved
    pub name: String,

    /// Open type tag, e.g. Person/Organization, default MISC
    pub kind: String,

    /// Flat property map
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Node {
    /// Create a new node; the kind is sanitized on the way in.
    pub fn new(name: impl Into<String>, kind: &str) -> Self {
        Self {
            name: name.into().trim().to_string(),
            kind: sanitize_node_kind(kind),
            properties: BTreeMap::new(),
        }
    }

    /// Builder: attach a property
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Stable key for merge-by-key
    pub fn key(&self) -> NodeKey {
        NodeKey::new(&self.name, &self.kind)
    }
}
