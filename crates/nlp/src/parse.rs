//! Parse representation supplied by the external NLP worker
//!
//! Shapes mirror what a dependency parser emits per sentence: tokens with
//! lemma, part-of-speech, dependency label and head index, plus named-entity
//! spans with character offsets into the sentence text.

use serde::{Deserialize, Serialize};

/// One token of a parsed sentence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub lemma: String,

    /// Coarse part-of-speech tag (VERB, NOUN, ADP, ...)
    pub pos: String,

    /// Dependency label (nsubj, dobj, prep, pobj, ...)
    pub dep: String,

    /// Index of the head token within the sentence
    pub head: usize,

    /// Character offsets into the sentence text
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// Punctuation and symbol tokens carry no relation signal
    pub fn is_word(&self) -> bool {
        self.pos != "PUNCT" && self.pos != "SYM" && !self.text.trim().is_empty()
    }
}

/// A named-entity span as the recognizer reported it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,

    /// Recognizer tag; may be blank when the recognizer is unsure
    #[serde(default)]
    pub label: String,

    pub start: usize,
    pub end: usize,
}

/// One sentence with its tokens and entity spans
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedSentence {
    pub text: String,
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub entities: Vec<EntitySpan>,
}

impl ParsedSentence {
    /// Indices of tokens whose character range overlaps [start, end)
    pub fn tokens_in_span(&self, start: usize, end: usize) -> Vec<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.start < end && t.end > start)
            .map(|(i, _)| i)
            .collect()
    }
}
