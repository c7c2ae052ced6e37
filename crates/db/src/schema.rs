//! SurrealDB schema definitions

use crate::{DbConnection, Result};
use tracing::info;

/// Initialize the database schema
pub async fn initialize_schema(db: &DbConnection) -> Result<()> {
    info!("Initializing database schema...");

    db.query(SCHEMA_DEFINITION).await?;

    info!("Schema initialized successfully");
    Ok(())
}

// Edge kinds are open strings, so edges live in one table with their
// endpoints stored as node keys; the UNIQUE indexes are the merge keys the
// upserter relies on.
const SCHEMA_DEFINITION: &str = r#"
-- ============================================
-- TABLES
-- ============================================

-- Graph nodes
DEFINE TABLE node SCHEMAFULL;
DEFINE FIELD key ON node TYPE string;
DEFINE FIELD name ON node TYPE string;
DEFINE FIELD kind ON node TYPE string DEFAULT 'MISC';
DEFINE FIELD properties ON node FLEXIBLE TYPE object DEFAULT {};
DEFINE FIELD created_at ON node TYPE datetime DEFAULT time::now();
DEFINE FIELD updated_at ON node TYPE datetime DEFAULT time::now();

-- Graph edges
DEFINE TABLE edge SCHEMAFULL;
DEFINE FIELD src ON edge TYPE string;
DEFINE FIELD dst ON edge TYPE string;
DEFINE FIELD kind ON edge TYPE string DEFAULT 'RELATED_TO';
DEFINE FIELD properties ON edge FLEXIBLE TYPE object DEFAULT {};
DEFINE FIELD created_at ON edge TYPE datetime DEFAULT time::now();
DEFINE FIELD updated_at ON edge TYPE datetime DEFAULT time::now();

-- ============================================
-- INDEXES
-- ============================================

-- Merge keys
DEFINE INDEX idx_node_key ON node FIELDS key UNIQUE;
DEFINE INDEX idx_edge_identity ON edge FIELDS src, kind, dst UNIQUE;

-- Kind filtering
DEFINE INDEX idx_node_kind ON node FIELDS kind;
DEFINE INDEX idx_edge_kind ON edge FIELDS kind;
"#;

#[cfg(test)]
mod tests {
    use crate::init_memory;

    #[tokio::test]
    async fn test_schema_initialization() {
        let db = init_memory().await.expect("Failed to init db");

        // Verify tables exist by selecting from them
        let nodes: Vec<serde_json::Value> = db.select("node").await.unwrap();
        assert!(nodes.is_empty());

        let edges: Vec<serde_json::Value> = db.select("edge").await.unwrap();
        assert!(edges.is_empty());
    }
}
