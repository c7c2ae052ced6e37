//! GraphBuilder - maps tabular records and textual triples into Graph mutations

use crate::draft::RelationCandidate;
use crate::edge::Edge;
use crate::graph::Graph;
use crate::label::{sanitize_edge_kind, sanitize_node_kind};
use crate::node::Node;
use crate::value::{CoercionWarning, PropertyValue};
use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// One tabular record: ordered column name → raw value pairs, as supplied by
/// the ingestion collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub columns: Vec<(String, serde_json::Value)>,
}

impl Record {
    pub fn new(columns: Vec<(String, serde_json::Value)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.columns
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, value)| value)
    }
}

/// Declared mapping from record columns to graph structure. Always supplied
/// by the caller; column roles are never inferred from the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMapping {
    /// Column whose value names the record's own node
    pub key_column: String,

    /// Node kind for the record's own node
    #[serde(default = "default_record_kind")]
    pub node_kind: String,

    /// Columns that reference other entities instead of holding plain values
    #[serde(default)]
    pub references: Vec<ReferenceMapping>,
}

fn default_record_kind() -> String {
    "Record".to_string()
}

/// A column that becomes an edge to another entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceMapping {
    pub column: String,

    /// Edge kind; defaults to the column name when omitted
    #[serde(default)]
    pub relation: Option<String>,

    /// Kind of the referenced node
    #[serde(default = "default_target_kind")]
    pub target_kind: String,
}

fn default_target_kind() -> String {
    crate::label::DEFAULT_NODE_KIND.to_string()
}

impl ReferenceMapping {
    fn relation_kind(&self) -> String {
        sanitize_edge_kind(self.relation.as_deref().unwrap_or(&self.column))
    }
}

/// Accumulates Graph mutations from both input modes and records every
/// property-coercion fallback so the caller can surface warnings.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
    warnings: Vec<CoercionWarning>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Textual mode: merge one extracted triple into the graph.
    ///
    /// Source and target nodes are merged first, so the edge can never
    /// dangle. The originating sentence, confidence, and contributing
    /// strategies ride along as edge properties.
    pub fn add_candidate(&mut self, candidate: &RelationCandidate) {
        let source = self
            .graph
            .merge_node(Node::new(&candidate.source.name, &candidate.source.kind));
        let target = self
            .graph
            .merge_node(Node::new(&candidate.target.name, &candidate.target.kind));

        let edge = Edge::new(source, &candidate.kind, target)
            .with_property("sentence", PropertyValue::from(candidate.sentence.clone()))
            .with_property(
                "confidence",
                PropertyValue::from(candidate.confidence.to_string()),
            )
            .with_property("method", PropertyValue::from(candidate.methods_tag()));

        // Endpoints were merged above; this cannot fail.
        let _ = self.graph.merge_edge(edge);
    }

    /// Structured mode: merge one tabular record into the graph under the
    /// declared mapping.
    ///
    /// The key column names the record's node; reference columns become
    /// edges to their own nodes; every other column becomes a property,
    /// coerced to the primitive set with a warning on fallback. A mapping
    /// that names a column the record does not have is a configuration
    /// error and fails the record hard.
    pub fn add_record(&mut self, record: &Record, mapping: &TableMapping) -> Result<()> {
        let key_value = record
            .get(&mapping.key_column)
            .ok_or_else(|| CoreError::ColumnMissing(mapping.key_column.clone()))?;

        let name = match key_value {
            serde_json::Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
            serde_json::Value::Null => {
                return Err(CoreError::EmptyKey(mapping.key_column.clone()))
            }
            other => {
                let text = PropertyValue::coerce(other).0.to_text();
                if text.is_empty() {
                    return Err(CoreError::EmptyKey(mapping.key_column.clone()));
                }
                text
            }
        };

        // Reference columns must exist before we mutate anything, so a bad
        // mapping rejects the record instead of half-applying it.
        for reference in &mapping.references {
            if record.get(&reference.column).is_none() {
                return Err(CoreError::ColumnMissing(reference.column.clone()));
            }
        }

        let node_kind = sanitize_node_kind(&mapping.node_kind);
        let record_key = self.graph.merge_node(Node::new(&name, &node_kind));

        for (column, value) in &record.columns {
            if *column == mapping.key_column {
                continue;
            }

            if let Some(reference) = mapping.references.iter().find(|r| r.column == *column) {
                // A null reference is absence of a fact, not a bad value.
                if value.is_null() {
                    continue;
                }
                let target_name = PropertyValue::coerce(value).0.to_text();
                if target_name.is_empty() {
                    continue;
                }

                let target_key = self
                    .graph
                    .merge_node(Node::new(&target_name, &reference.target_kind));
                let edge = Edge::new(record_key.clone(), &reference.relation_kind(), target_key);
                let _ = self.graph.merge_edge(edge);
            } else {
                let (coerced, fallback) = PropertyValue::coerce(value);
                if let Some(kind) = fallback {
                    self.warnings.push(CoercionWarning {
                        owner: record_key.to_string(),
                        property: column.clone(),
                        kind,
                    });
                }

                let node = Node::new(&name, &node_kind).with_property(column.clone(), coerced);
                self.graph.merge_node(node);
            }
        }

        Ok(())
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn warnings(&self) -> &[CoercionWarning] {
        &self.warnings
    }

    /// Hand over the built graph and the collected diagnostics.
    pub fn finish(self) -> (Graph, Vec<CoercionWarning>) {
        (self.graph, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{Confidence, EntityDraft, ExtractionMethod};
    use crate::node::NodeKey;
    use serde_json::json;

    fn mapping_with_reference() -> TableMapping {
        TableMapping {
            key_column: "name".into(),
            node_kind: "Person".into(),
            references: vec![ReferenceMapping {
                column: "company".into(),
                relation: Some("WORKS_AT".into()),
                target_kind: "Organization".into(),
            }],
        }
    }

    #[test]
    fn test_structured_record_with_reference() {
        let mut builder = GraphBuilder::new();
        let record = Record::new(vec![
            ("name".into(), json!("Bob")),
            ("company".into(), json!("Acme")),
        ]);

        builder.add_record(&record, &mapping_with_reference()).unwrap();
        let (graph, warnings) = builder.finish();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(warnings.is_empty());

        let edge = graph.edges().next().unwrap();
        assert_eq!(edge.kind, "WORKS_AT");
        assert_eq!(edge.source, NodeKey::new("Bob", "Person"));
        assert_eq!(edge.target, NodeKey::new("Acme", "Organization"));
    }

    #[test]
    fn test_plain_columns_become_properties() {
        let mut builder = GraphBuilder::new();
        let record = Record::new(vec![
            ("name".into(), json!("Bob")),
            ("age".into(), json!(41)),
            ("active".into(), json!(true)),
        ]);
        let mapping = TableMapping {
            key_column: "name".into(),
            node_kind: "Person".into(),
            references: vec![],
        };

        builder.add_record(&record, &mapping).unwrap();
        let (graph, _) = builder.finish();

        let node = graph.node(&NodeKey::new("Bob", "Person")).unwrap();
        assert_eq!(node.properties["age"], PropertyValue::Int(41));
        assert_eq!(node.properties["active"], PropertyValue::Bool(true));
    }

    #[test]
    fn test_missing_key_column_is_fatal() {
        let mut builder = GraphBuilder::new();
        let record = Record::new(vec![("title".into(), json!("x"))]);
        let mapping = TableMapping {
            key_column: "name".into(),
            node_kind: "Person".into(),
            references: vec![],
        };

        let err = builder.add_record(&record, &mapping);
        assert!(matches!(err, Err(CoreError::ColumnMissing(_))));
        assert!(builder.graph().is_empty());
    }

    #[test]
    fn test_missing_reference_column_is_fatal() {
        let mut builder = GraphBuilder::new();
        let record = Record::new(vec![("name".into(), json!("Bob"))]);

        let err = builder.add_record(&record, &mapping_with_reference());
        assert!(matches!(err, Err(CoreError::ColumnMissing(_))));
        assert!(builder.graph().is_empty());
    }

    #[test]
    fn test_null_property_coerces_with_one_warning() {
        let mut builder = GraphBuilder::new();
        let record = Record::new(vec![
            ("name".into(), json!("Bob")),
            ("nickname".into(), json!(null)),
        ]);
        let mapping = TableMapping {
            key_column: "name".into(),
            node_kind: "Person".into(),
            references: vec![],
        };

        builder.add_record(&record, &mapping).unwrap();
        let (graph, warnings) = builder.finish();

        let node = graph.node(&NodeKey::new("Bob", "Person")).unwrap();
        assert_eq!(node.properties["nickname"], PropertyValue::Text(String::new()));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].property, "nickname");
    }

    #[test]
    fn test_null_reference_skips_edge() {
        let mut builder = GraphBuilder::new();
        let record = Record::new(vec![
            ("name".into(), json!("Bob")),
            ("company".into(), json!(null)),
        ]);

        builder.add_record(&record, &mapping_with_reference()).unwrap();
        let (graph, warnings) = builder.finish();

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_textual_candidate() {
        let mut builder = GraphBuilder::new();
        let candidate = RelationCandidate {
            source: EntityDraft::new("Alice", "Person", 0, 5),
            target: EntityDraft::new("Acme", "Organization", 15, 19),
            kind: "WORKS_AT".into(),
            sentence: "Alice works at Acme since 2020.".into(),
            confidence: Confidence::Medium,
            methods: vec![ExtractionMethod::Preposition],
        };

        builder.add_candidate(&candidate);
        builder.add_candidate(&candidate);
        let (graph, _) = builder.finish();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);

        let edge = graph.edges().next().unwrap();
        assert_eq!(
            edge.properties["sentence"],
            PropertyValue::from("Alice works at Acme since 2020.")
        );
        assert_eq!(edge.properties["confidence"], PropertyValue::from("medium"));
    }

    #[test]
    fn test_repeated_records_merge() {
        let mut builder = GraphBuilder::new();
        let record = Record::new(vec![
            ("name".into(), json!("Bob")),
            ("company".into(), json!("Acme")),
        ]);
        let mapping = mapping_with_reference();

        builder.add_record(&record, &mapping).unwrap();
        builder.add_record(&record, &mapping).unwrap();
        let (graph, _) = builder.finish();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }
}
