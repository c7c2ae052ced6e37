//! Extraction result types - what the linguistic pipeline hands the builder

use crate::label::{sanitize_node_kind, DEFAULT_NODE_KIND};
use crate::node::NodeKey;
use serde::{Deserialize, Serialize};

/// An entity mention resolved from a recognizer span, not yet merged into a
/// graph. Duplicate drafts of the same entity are absorbed by the graph's
/// merge-by-key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDraft {
    /// Display text, original casing preserved
    pub name: String,
    /// Readable kind tag, default MISC
    pub kind: String,
    /// Character offsets into the originating sentence
    pub start: usize,
    pub end: usize,
}

impl EntityDraft {
    pub fn new(name: impl Into<String>, kind: &str, start: usize, end: usize) -> Self {
        let kind = if kind.trim().is_empty() {
            DEFAULT_NODE_KIND.to_string()
        } else {
            sanitize_node_kind(kind)
        };
        Self {
            name: name.into().trim().to_string(),
            kind,
            start,
            end,
        }
    }

    pub fn key(&self) -> NodeKey {
        NodeKey::new(&self.name, &self.kind)
    }
}

/// Which strategy produced a candidate relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Juxtaposed entity pair with a short connecting span
    Adjacency,
    /// Verb with an entity subject and an entity object
    VerbDependency,
    /// Entity followed by a preposition governing another entity
    Preposition,
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Adjacency => write!(f, "adjacency"),
            Self::VerbDependency => write!(f, "verb_dependency"),
            Self::Preposition => write!(f, "preposition"),
        }
    }
}

/// Extraction confidence, used for edge styling and dedup tie-breaking
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// A candidate (source, relation, target) triple extracted from one sentence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationCandidate {
    pub source: EntityDraft,
    pub target: EntityDraft,

    /// Sanitized relation kind (UPPER_SNAKE)
    pub kind: String,

    /// The sentence the triple was extracted from
    pub sentence: String,

    pub confidence: Confidence,

    /// All strategies that produced this triple, in extraction order
    pub methods: Vec<ExtractionMethod>,
}

impl RelationCandidate {
    /// Dedup identity: (source key, kind, target key)
    pub fn dedup_key(&self) -> (NodeKey, String, NodeKey) {
        (self.source.key(), self.kind.clone(), self.target.key())
    }

    /// Methods joined for storage as a single edge property
    pub fn methods_tag(&self) -> String {
        self.methods
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("+")
    }
}
