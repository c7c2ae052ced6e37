//! Core domain types for textgraph
//!
//! This crate defines the property-graph model and the pure construction
//! logic: nodes, edges, property values and their coercion rules, label
//! sanitization, the session-scoped Graph with merge-by-key semantics, the
//! GraphBuilder for both input modes, and the style catalog used by
//! rendering collaborators.

pub mod builder;
pub mod draft;
pub mod edge;
pub mod error;
pub mod graph;
pub mod label;
pub mod node;
pub mod style;
pub mod value;

pub use builder::{GraphBuilder, Record, ReferenceMapping, TableMapping};
pub use draft::{Confidence, EntityDraft, ExtractionMethod, RelationCandidate};
pub use edge::{Edge, EdgeKey};
pub use error::{CoreError, Result};
pub use graph::Graph;
pub use label::{normalize_name, sanitize_edge_kind, sanitize_node_kind};
pub use node::{Node, NodeKey};
pub use style::{EdgeStyle, NodeShape, NodeStyle, StyleCatalog};
pub use value::{CoercionKind, CoercionWarning, PropertyValue};
