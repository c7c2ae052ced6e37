//! Edge types - typed, directed relationships between nodes

use crate::label::sanitize_edge_kind;
use crate::node::NodeKey;
use crate::value::PropertyValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Uniqueness key of an edge: (source, kind, target). A repeated extraction
/// of the same fact merges into the existing edge instead of duplicating it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub source: NodeKey,
    pub kind: String,
    pub target: NodeKey,
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -[{}]-> {}", self.source, self.kind, self.target)
    }
}

/// A typed, directed, labeled edge between two nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeKey,
    pub target: NodeKey,

    /// Sanitized kind (UPPER_SNAKE), defaults to RELATED_TO
    pub kind: String,

    /// Flat property map; textual extractions always carry the originating
    /// sentence here
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Edge {
    /// Create a new edge; the kind is sanitized on the way in.
    pub fn new(source: NodeKey, kind: &str, target: NodeKey) -> Self {
        Self {
            source,
            target,
            kind: sanitize_edge_kind(kind),
            properties: BTreeMap::new(),
        }
    }

    /// Builder: attach a property
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            source: self.source.clone(),
            kind: self.kind.clone(),
            target: self.target.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_sanitized_on_construction() {
        let a = NodeKey::new("Alice", "Person");
        let b = NodeKey::new("Acme", "Organization");
        let edge = Edge::new(a, "works at", b);
        assert_eq!(edge.kind, "WORKS_AT");
    }

    #[test]
    fn test_empty_kind_falls_back() {
        let a = NodeKey::new("Alice", "Person");
        let b = NodeKey::new("Acme", "Organization");
        let edge = Edge::new(a, "", b);
        assert_eq!(edge.kind, "RELATED_TO");
    }

    #[test]
    fn test_key_includes_direction() {
        let a = NodeKey::new("Alice", "Person");
        let b = NodeKey::new("Bob", "Person");
        let ab = Edge::new(a.clone(), "MANAGES", b.clone());
        let ba = Edge::new(b, "MANAGES", a);
        assert_ne!(ab.key(), ba.key());
    }
}
