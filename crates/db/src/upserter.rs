//! GraphUpserter - idempotent persistence of an in-memory Graph

use crate::{DbConnection, DbError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use textgraph_core::{Edge, Graph, Node, PropertyValue};
use tracing::{debug, instrument, warn};

/// Applies Graph mutations to the store with merge-by-key semantics.
///
/// Every write is an upsert against a UNIQUE index, so applying the same
/// Graph twice leaves the store exactly as applying it once. Writes are
/// issued sequentially in graph order; a failing record is retried once
/// with its property values stringified, then reported and skipped.
#[derive(Clone)]
pub struct GraphUpserter {
    db: DbConnection,
}

impl GraphUpserter {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Persist a whole graph, nodes first so no edge write can ever precede
    /// its endpoints. Returns a per-record report; store-level trouble with
    /// one record never aborts the batch.
    #[instrument(skip(self, graph))]
    pub async fn apply(&self, graph: &Graph) -> UpsertReport {
        let mut report = UpsertReport::default();

        for node in graph.nodes() {
            let id = node.key().to_string();
            match self.upsert_node_with_fallback(node).await {
                Ok(()) => report.nodes_written += 1,
                Err(e) => {
                    warn!("Node upsert failed for {}: {}", id, e);
                    report.failures.push(UpsertFailure {
                        id,
                        detail: e.to_string(),
                    });
                }
            }
        }

        for edge in graph.edges() {
            let id = edge.key().to_string();
            match self.upsert_edge_with_fallback(edge).await {
                Ok(()) => report.edges_written += 1,
                Err(e) => {
                    warn!("Edge upsert failed for {}: {}", id, e);
                    report.failures.push(UpsertFailure {
                        id,
                        detail: e.to_string(),
                    });
                }
            }
        }

        debug!(
            "Applied graph: {} nodes, {} edges, {} failures",
            report.nodes_written,
            report.edges_written,
            report.failures.len()
        );

        report
    }

    /// Two-stage write: attempt as-is; on rejection stringify every property
    /// value and retry once. Only the retry's failure is surfaced.
    async fn upsert_node_with_fallback(&self, node: &Node) -> Result<()> {
        match self.upsert_node(node, false).await {
            Ok(()) => Ok(()),
            Err(first) => {
                debug!(
                    "Retrying node {} with stringified properties: {}",
                    node.key(),
                    first
                );
                self.upsert_node(node, true).await
            }
        }
    }

    async fn upsert_edge_with_fallback(&self, edge: &Edge) -> Result<()> {
        match self.upsert_edge(edge, false).await {
            Ok(()) => Ok(()),
            Err(first) => {
                debug!(
                    "Retrying edge {} with stringified properties: {}",
                    edge.key(),
                    first
                );
                self.upsert_edge(edge, true).await
            }
        }
    }

    async fn upsert_node(&self, node: &Node, stringify: bool) -> Result<()> {
        let properties = property_object(&node.properties, stringify)?;

        self.db
            .query(
                r#"
                INSERT INTO node (key, name, kind, properties)
                VALUES ($key, $name, $kind, $properties)
                ON DUPLICATE KEY UPDATE
                    name = $name,
                    kind = $kind,
                    properties = $properties,
                    updated_at = time::now()
                "#,
            )
            .bind(("key", node.key().to_string()))
            .bind(("name", node.name.clone()))
            .bind(("kind", node.kind.clone()))
            .bind(("properties", properties))
            .await?
            .check()?;

        Ok(())
    }

    async fn upsert_edge(&self, edge: &Edge, stringify: bool) -> Result<()> {
        let properties = property_object(&edge.properties, stringify)?;

        self.db
            .query(
                r#"
                INSERT INTO edge (src, dst, kind, properties)
                VALUES ($src, $dst, $kind, $properties)
                ON DUPLICATE KEY UPDATE
                    properties = $properties,
                    updated_at = time::now()
                "#,
            )
            .bind(("src", edge.source.to_string()))
            .bind(("dst", edge.target.to_string()))
            .bind(("kind", edge.kind.clone()))
            .bind(("properties", properties))
            .await?
            .check()?;

        Ok(())
    }

    /// Node/edge counts and the kind distribution
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<StoreStats> {
        let counts: Vec<StoreCounts> = self
            .db
            .query(
                r#"
                RETURN {
                    node_count: (SELECT count() FROM node GROUP ALL)[0].count,
                    edge_count: (SELECT count() FROM edge GROUP ALL)[0].count
                }
                "#,
            )
            .await?
            .take(0)?;

        let counts = counts
            .into_iter()
            .next()
            .ok_or_else(|| DbError::QueryFailed("stats".into()))?;

        let node_kinds: Vec<KindCount> = self
            .db
            .query("SELECT kind, count() AS count FROM node GROUP BY kind ORDER BY count DESC")
            .await?
            .take(0)?;

        let edge_kinds: Vec<KindCount> = self
            .db
            .query("SELECT kind, count() AS count FROM edge GROUP BY kind ORDER BY count DESC")
            .await?
            .take(0)?;

        Ok(StoreStats {
            node_count: counts.node_count,
            edge_count: counts.edge_count,
            node_kinds,
            edge_kinds,
        })
    }

    /// Everything the rendering collaborator needs, in deterministic order
    #[instrument(skip(self))]
    pub async fn export(&self) -> Result<(Vec<StoredNode>, Vec<StoredEdge>)> {
        let nodes: Vec<StoredNode> = self
            .db
            .query("SELECT key, name, kind, properties, created_at FROM node ORDER BY key")
            .await?
            .take(0)?;

        let edges: Vec<StoredEdge> = self
            .db
            .query("SELECT src, dst, kind, properties, created_at FROM edge ORDER BY src, kind, dst")
            .await?
            .take(0)?;

        Ok((nodes, edges))
    }

    /// Delete all persisted nodes and edges
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        self.db.query("DELETE node; DELETE edge;").await?.check()?;
        Ok(())
    }
}

fn property_object(
    properties: &BTreeMap<String, PropertyValue>,
    stringify: bool,
) -> Result<serde_json::Value> {
    if stringify {
        let stringified: BTreeMap<&str, String> = properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.to_text()))
            .collect();
        Ok(serde_json::to_value(stringified)?)
    } else {
        Ok(serde_json::to_value(properties)?)
    }
}

// ==========================================
// RESULT TYPES
// ==========================================

/// One record that could not be written even after the stringify fallback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertFailure {
    pub id: String,
    pub detail: String,
}

/// Outcome of applying one Graph to the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertReport {
    pub nodes_written: usize,
    pub edges_written: usize,
    #[serde(default)]
    pub failures: Vec<UpsertFailure>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct StoreCounts {
    #[serde(default)]
    node_count: i64,
    #[serde(default)]
    edge_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindCount {
    pub kind: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub node_count: i64,
    pub edge_count: i64,
    #[serde(default)]
    pub node_kinds: Vec<KindCount>,
    #[serde(default)]
    pub edge_kinds: Vec<KindCount>,
}

/// A persisted node as the renderer sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredNode {
    pub key: String,
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A persisted edge as the renderer sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEdge {
    pub src: String,
    pub dst: String,
    pub kind: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
