//! Visual encoding of node and edge kinds for downstream rendering

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved style for unknown/empty kinds
const DEFAULT_NODE_COLOR: &str = "#95A5A6";
const DEFAULT_EDGE_COLOR: &str = "#7F8C8D";
const DEFAULT_NODE_SIZE: u32 = 25;

/// Fixed colors for kinds the extractor commonly produces
const KNOWN_NODE_COLORS: &[(&str, &str)] = &[
    ("Person", "#FF6B6B"),
    ("Organization", "#4ECDC4"),
    ("Location", "#45B7D1"),
    ("Date", "#FFA07A"),
    ("Product", "#98D8C8"),
    ("Event", "#F7DC6F"),
];

const KNOWN_EDGE_COLORS: &[(&str, &str)] = &[
    ("OWNS", "#E74C3C"),
    ("FOUNDED", "#8E44AD"),
    ("WORKS_AT", "#3498DB"),
    ("MANAGES", "#E67E22"),
    ("REPORTS_TO", "#16A085"),
    ("COLLABORATES_WITH", "#27AE60"),
    ("HIRED", "#2ECC71"),
    ("LOCATED_IN", "#45B7D1"),
];

/// Palette for kinds first seen at runtime, indexed by observation order
const NODE_PALETTE: &[&str] = &[
    "#9B59B6", "#1ABC9C", "#F39C12", "#D35400", "#2980B9", "#C0392B", "#7DCEA0", "#AF7AC5",
];

const EDGE_PALETTE: &[&str] = &[
    "#5DADE2", "#58D68D", "#F5B041", "#EC7063", "#A569BD", "#45B39D",
];

const NODE_SHAPES: &[NodeShape] = &[
    NodeShape::Dot,
    NodeShape::Square,
    NodeShape::Triangle,
    NodeShape::Diamond,
    NodeShape::Star,
    NodeShape::Hexagon,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    Dot,
    Square,
    Triangle,
    Diamond,
    Star,
    Hexagon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub color: String,
    pub shape: NodeShape,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    pub color: String,
    pub width: u32,
}

/// Edge width from the extraction confidence stored on the edge
pub fn width_for_confidence(confidence: &str) -> u32 {
    match confidence {
        "high" => 3,
        "low" => 1,
        _ => 2,
    }
}

/// Session-scoped style assignment.
///
/// Well-known kinds always get their fixed color; kinds first seen at
/// runtime draw from the palette in order of first observation, so repeated
/// runs over the same data reproduce the same encoding. One catalog per
/// session; never shared across sessions.
#[derive(Debug, Clone, Default)]
pub struct StyleCatalog {
    node_styles: BTreeMap<String, NodeStyle>,
    edge_styles: BTreeMap<String, EdgeStyle>,
    nodes_assigned: usize,
    edges_assigned: usize,
}

impl StyleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Style for a node kind, assigning one on first observation.
    /// Empty kinds map to the reserved default.
    pub fn node_style(&mut self, kind: &str) -> NodeStyle {
        if kind.is_empty() {
            return Self::default_node_style();
        }
        if let Some(style) = self.node_styles.get(kind) {
            return style.clone();
        }

        let style = match KNOWN_NODE_COLORS.iter().find(|(k, _)| *k == kind) {
            Some((_, color)) => NodeStyle {
                color: (*color).to_string(),
                shape: NodeShape::Dot,
                size: DEFAULT_NODE_SIZE,
            },
            None => {
                let idx = self.nodes_assigned;
                self.nodes_assigned += 1;
                NodeStyle {
                    color: NODE_PALETTE[idx % NODE_PALETTE.len()].to_string(),
                    shape: NODE_SHAPES[idx % NODE_SHAPES.len()],
                    size: DEFAULT_NODE_SIZE,
                }
            }
        };

        self.node_styles.insert(kind.to_string(), style.clone());
        style
    }

    /// Style for an edge kind, assigning one on first observation.
    pub fn edge_style(&mut self, kind: &str) -> EdgeStyle {
        if kind.is_empty() {
            return Self::default_edge_style();
        }
        if let Some(style) = self.edge_styles.get(kind) {
            return style.clone();
        }

        let style = match KNOWN_EDGE_COLORS.iter().find(|(k, _)| *k == kind) {
            Some((_, color)) => EdgeStyle {
                color: (*color).to_string(),
                width: 2,
            },
            None => {
                let idx = self.edges_assigned;
                self.edges_assigned += 1;
                EdgeStyle {
                    color: EDGE_PALETTE[idx % EDGE_PALETTE.len()].to_string(),
                    width: 2,
                }
            }
        };

        self.edge_styles.insert(kind.to_string(), style.clone());
        style
    }

    pub fn default_node_style() -> NodeStyle {
        NodeStyle {
            color: DEFAULT_NODE_COLOR.to_string(),
            shape: NodeShape::Dot,
            size: DEFAULT_NODE_SIZE,
        }
    }

    pub fn default_edge_style() -> EdgeStyle {
        EdgeStyle {
            color: DEFAULT_EDGE_COLOR.to_string(),
            width: 2,
        }
    }
}
