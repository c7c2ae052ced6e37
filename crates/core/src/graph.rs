//! The in-memory property graph and its merge semantics

use crate::edge::{Edge, EdgeKey};
use crate::node::{Node, NodeKey};
use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A session-scoped property graph: nodes keyed by stable key, edges keyed
/// by (source, kind, target).
///
/// Built fresh per input file, handed to the upserter, then discarded; the
/// persistent store is the system of record across sessions. BTreeMaps keep
/// iteration order deterministic so repeated runs on the same data persist
/// and render identically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    nodes: BTreeMap<NodeKey, Node>,
    edges: BTreeMap<EdgeKey, Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a node into the graph.
    ///
    /// If a node with the same key exists, its properties are updated
    /// last-write-wins per property; the first-seen display name is kept.
    /// Returns the key the node landed under.
    pub fn merge_node(&mut self, node: Node) -> NodeKey {
        let key = node.key();
        match self.nodes.get_mut(&key) {
            Some(existing) => {
                existing.properties.extend(node.properties);
            }
            None => {
                self.nodes.insert(key.clone(), node);
            }
        }
        key
    }

    /// Merge an edge into the graph.
    ///
    /// Both endpoints must already be present; an edge pointing at a missing
    /// node is refused rather than left dangling. Repeated edges with the
    /// same (source, kind, target) merge properties last-write-wins.
    pub fn merge_edge(&mut self, edge: Edge) -> Result<EdgeKey> {
        if !self.nodes.contains_key(&edge.source) {
            return Err(CoreError::UnknownNode(edge.source.to_string()));
        }
        if !self.nodes.contains_key(&edge.target) {
            return Err(CoreError::UnknownNode(edge.target.to_string()));
        }

        let key = edge.key();
        match self.edges.get_mut(&key) {
            Some(existing) => {
                existing.properties.extend(edge.properties);
            }
            None => {
                self.edges.insert(key.clone(), edge);
            }
        }
        Ok(key)
    }

    pub fn node(&self, key: &NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node kinds in deterministic key order, deduplicated.
    pub fn node_kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = Vec::new();
        for node in self.nodes.values() {
            if !kinds.contains(&node.kind.as_str()) {
                kinds.push(&node.kind);
            }
        }
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PropertyValue;

    #[test]
    fn test_merge_collapses_same_key() {
        let mut graph = Graph::new();
        graph.merge_node(Node::new("Alice", "Person"));
        graph.merge_node(Node::new("ALICE", "person"));
        graph.merge_node(Node::new("alice", "Person"));

        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_merge_keeps_first_name_updates_properties() {
        let mut graph = Graph::new();
        let key = graph.merge_node(
            Node::new("Alice", "Person").with_property("age", PropertyValue::Int(30)),
        );
        graph.merge_node(
            Node::new("ALICE", "Person")
                .with_property("age", PropertyValue::Int(31))
                .with_property("city", PropertyValue::from("Lisbon")),
        );

        let node = graph.node(&key).unwrap();
        assert_eq!(node.name, "Alice");
        assert_eq!(node.properties["age"], PropertyValue::Int(31));
        assert_eq!(node.properties["city"], PropertyValue::from("Lisbon"));
    }

    #[test]
    fn test_edge_requires_endpoints() {
        let mut graph = Graph::new();
        let alice = graph.merge_node(Node::new("Alice", "Person"));
        let ghost = NodeKey::new("Ghost", "Person");

        let err = graph.merge_edge(Edge::new(alice, "KNOWS", ghost));
        assert!(matches!(err, Err(CoreError::UnknownNode(_))));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_repeated_fact_is_noop_merge() {
        let mut graph = Graph::new();
        let a = graph.merge_node(Node::new("Alice", "Person"));
        let b = graph.merge_node(Node::new("Acme", "Organization"));

        graph
            .merge_edge(Edge::new(a.clone(), "WORKS_AT", b.clone()))
            .unwrap();
        graph.merge_edge(Edge::new(a, "WORKS_AT", b)).unwrap();

        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_no_dangling_edges_invariant() {
        let mut graph = Graph::new();
        let a = graph.merge_node(Node::new("Alice", "Person"));
        let b = graph.merge_node(Node::new("Bob", "Person"));
        graph.merge_edge(Edge::new(a, "KNOWS", b)).unwrap();

        for edge in graph.edges() {
            assert!(graph.node(&edge.source).is_some());
            assert!(graph.node(&edge.target).is_some());
        }
    }

    #[test]
    fn test_node_kinds_in_order() {
        let mut graph = Graph::new();
        graph.merge_node(Node::new("Acme", "Organization"));
        graph.merge_node(Node::new("Alice", "Person"));
        graph.merge_node(Node::new("Bob", "Person"));

        assert_eq!(graph.node_kinds(), vec!["Organization", "Person"]);
    }
}
