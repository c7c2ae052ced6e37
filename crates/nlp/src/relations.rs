//! RelationExtractor - candidate triples from a parsed sentence
//!
//! Three independent strategies run over the same sentence and their outputs
//! are pooled, then deduplicated by (source, kind, target). Distinct labels
//! for the same entity pair all survive; identical labels merge into one
//! candidate that records every contributing strategy.

use crate::parse::{ParsedSentence, Token};
use std::collections::HashMap;
use textgraph_core::{
    sanitize_edge_kind, Confidence, EntityDraft, ExtractionMethod, NodeKey, RelationCandidate,
};

/// Maximum number of intervening word tokens for the adjacency strategy
const MAX_GAP_TOKENS: usize = 5;

const SUBJECT_DEPS: &[&str] = &["nsubj", "nsubjpass"];
const OBJECT_DEPS: &[&str] = &["dobj", "obj", "attr", "dative", "oprd"];

/// Preposition → relation when the preposition hangs off a verb
const VERB_PREP_KINDS: &[(&str, &str)] = &[
    ("at", "WORKS_AT"),
    ("for", "WORKS_FOR"),
    ("with", "COLLABORATES_WITH"),
    ("under", "REPORTS_TO"),
    ("to", "REPORTS_TO"),
];

/// Preposition → relation when the preposition hangs off a nominal
const NOUN_PREP_KINDS: &[(&str, &str)] = &[
    ("at", "LOCATED_AT"),
    ("in", "LOCATED_IN"),
    ("of", "PART_OF"),
    ("with", "ASSOCIATED_WITH"),
    ("from", "FROM"),
];

/// Extract deduplicated relation candidates from one sentence.
///
/// Sentences with fewer than two resolvable entities contribute nothing;
/// that is the normal case for most prose, not an error.
pub fn extract(sentence: &ParsedSentence, entities: &[EntityDraft]) -> Vec<RelationCandidate> {
    if entities.len() < 2 {
        return Vec::new();
    }

    let mut pool = Vec::new();
    pool.extend(adjacency_candidates(sentence, entities));
    pool.extend(verb_candidates(sentence, entities));
    pool.extend(preposition_candidates(sentence, entities));

    dedup(pool)
}

/// Strategy 1: juxtaposed entity pairs.
///
/// Every ordered pair of entities separated by at most [`MAX_GAP_TOKENS`]
/// word tokens yields a candidate labeled by the literal connecting text.
/// Catches appositive mentions that carry no explicit verb; an empty
/// connecting span sanitizes to the RELATED_TO fallback.
fn adjacency_candidates(
    sentence: &ParsedSentence,
    entities: &[EntityDraft],
) -> Vec<RelationCandidate> {
    let mut out = Vec::new();

    for source in entities {
        for target in entities {
            if source.end > target.start || source.key() == target.key() {
                continue;
            }

            let between: Vec<&Token> = sentence
                .tokens
                .iter()
                .filter(|t| t.start >= source.end && t.end <= target.start && t.is_word())
                .collect();

            if between.len() > MAX_GAP_TOKENS {
                continue;
            }

            let label = between
                .iter()
                .map(|t| t.text.to_lowercase())
                .collect::<Vec<_>>()
                .join(" ");

            out.push(candidate(
                source,
                target,
                &label,
                sentence,
                Confidence::High,
                ExtractionMethod::Adjacency,
            ));
        }
    }

    out
}

/// Strategy 2: verb with an entity subject and an entity object.
///
/// Objects are direct complements of the verb, or the object of a
/// preposition the verb governs. The candidate is labeled by the verb lemma.
fn verb_candidates(sentence: &ParsedSentence, entities: &[EntityDraft]) -> Vec<RelationCandidate> {
    let mut out = Vec::new();

    for (idx, token) in sentence.tokens.iter().enumerate() {
        if token.pos != "VERB" {
            continue;
        }

        let children: Vec<usize> = (0..sentence.tokens.len())
            .filter(|&j| j != idx && sentence.tokens[j].head == idx)
            .collect();

        let subjects: Vec<&EntityDraft> = children
            .iter()
            .filter(|&&j| SUBJECT_DEPS.contains(&sentence.tokens[j].dep.as_str()))
            .filter_map(|&j| entity_at(entities, &sentence.tokens[j]))
            .collect();

        let mut objects: Vec<&EntityDraft> = children
            .iter()
            .filter(|&&j| OBJECT_DEPS.contains(&sentence.tokens[j].dep.as_str()))
            .filter_map(|&j| entity_at(entities, &sentence.tokens[j]))
            .collect();

        // Objects reached through a preposition the verb governs
        for &prep_idx in children.iter().filter(|&&j| sentence.tokens[j].dep == "prep") {
            for j in 0..sentence.tokens.len() {
                if sentence.tokens[j].head == prep_idx && sentence.tokens[j].dep == "pobj" {
                    if let Some(entity) = entity_at(entities, &sentence.tokens[j]) {
                        objects.push(entity);
                    }
                }
            }
        }

        for &subject in &subjects {
            for &object in &objects {
                if subject.key() == object.key() {
                    continue;
                }
                out.push(candidate(
                    subject,
                    object,
                    &token.lemma,
                    sentence,
                    Confidence::Medium,
                    ExtractionMethod::VerbDependency,
                ));
            }
        }
    }

    out
}

/// Strategy 3: entity followed by a preposition governing another entity.
///
/// The label comes from a context-aware preposition table keyed on whether
/// the preposition hangs off a verb or a nominal, falling back to
/// RELATED_VIA_<PREP>.
fn preposition_candidates(
    sentence: &ParsedSentence,
    entities: &[EntityDraft],
) -> Vec<RelationCandidate> {
    let mut out = Vec::new();

    for (idx, token) in sentence.tokens.iter().enumerate() {
        if token.dep != "prep" {
            continue;
        }

        let object = (0..sentence.tokens.len())
            .filter(|&j| sentence.tokens[j].head == idx && sentence.tokens[j].dep == "pobj")
            .find_map(|j| entity_at(entities, &sentence.tokens[j]));

        let Some(target) = object else {
            continue;
        };

        let head = sentence.tokens.get(token.head);
        let source = head
            .and_then(|h| entity_at(entities, h))
            .or_else(|| nearest_entity_before(entities, token.start));

        let Some(source) = source else {
            continue;
        };
        if source.key() == target.key() {
            continue;
        }

        let head_is_verb = head.map(|h| h.pos == "VERB").unwrap_or(false);
        let label = preposition_kind(&token.lemma, head_is_verb);

        out.push(candidate(
            source,
            target,
            &label,
            sentence,
            Confidence::Medium,
            ExtractionMethod::Preposition,
        ));
    }

    out
}

fn preposition_kind(prep: &str, head_is_verb: bool) -> String {
    let prep = prep.to_lowercase();
    let table = if head_is_verb {
        VERB_PREP_KINDS
    } else {
        NOUN_PREP_KINDS
    };

    table
        .iter()
        .find(|(p, _)| *p == prep)
        .map(|(_, kind)| (*kind).to_string())
        .unwrap_or_else(|| format!("RELATED_VIA_{}", sanitize_edge_kind(&prep)))
}

/// The entity whose span overlaps the token's character range, if any
fn entity_at<'a>(entities: &'a [EntityDraft], token: &Token) -> Option<&'a EntityDraft> {
    entities
        .iter()
        .find(|e| e.start < token.end && e.end > token.start)
}

/// The entity ending closest before the given offset, if any
fn nearest_entity_before(entities: &[EntityDraft], offset: usize) -> Option<&EntityDraft> {
    entities
        .iter()
        .filter(|e| e.end <= offset)
        .max_by_key(|e| e.end)
}

fn candidate(
    source: &EntityDraft,
    target: &EntityDraft,
    label: &str,
    sentence: &ParsedSentence,
    confidence: Confidence,
    method: ExtractionMethod,
) -> RelationCandidate {
    RelationCandidate {
        source: source.clone(),
        target: target.clone(),
        kind: sanitize_edge_kind(label),
        sentence: sentence.text.clone(),
        confidence,
        methods: vec![method],
    }
}

/// Pool-and-merge dedup: candidates with the same (source, kind, target)
/// collapse into one record listing every contributing strategy and the
/// highest confidence. Distinct kinds for the same pair are all kept.
fn dedup(pool: Vec<RelationCandidate>) -> Vec<RelationCandidate> {
    let mut out: Vec<RelationCandidate> = Vec::new();
    let mut seen: HashMap<(NodeKey, String, NodeKey), usize> = HashMap::new();

    for candidate in pool {
        match seen.get(&candidate.dedup_key()) {
            Some(&idx) => {
                let existing = &mut out[idx];
                existing.confidence = existing.confidence.max(candidate.confidence);
                for method in candidate.methods {
                    if !existing.methods.contains(&method) {
                        existing.methods.push(method);
                    }
                }
            }
            None => {
                seen.insert(candidate.dedup_key(), out.len());
                out.push(candidate);
            }
        }
    }

    out
}
