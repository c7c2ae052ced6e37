//! EntityResolver - normalizes recognizer spans into typed entity drafts

use crate::parse::EntitySpan;
use textgraph_core::EntityDraft;

/// Readable kinds for the tags recognizers commonly emit. Unknown tags pass
/// through as-is; blank tags default to MISC downstream.
const TAG_KINDS: &[(&str, &str)] = &[
    ("PERSON", "Person"),
    ("PER", "Person"),
    ("ORG", "Organization"),
    ("ORGANIZATION", "Organization"),
    ("GPE", "Location"),
    ("LOC", "Location"),
    ("LOCATION", "Location"),
    ("FAC", "Facility"),
    ("DATE", "Date"),
    ("TIME", "Time"),
    ("MONEY", "Money"),
    ("PRODUCT", "Product"),
    ("EVENT", "Event"),
    ("WORK_OF_ART", "WorkOfArt"),
    ("NORP", "Group"),
];

fn kind_for_tag(tag: &str) -> &str {
    let tag = tag.trim();
    TAG_KINDS
        .iter()
        .find(|(raw, _)| raw.eq_ignore_ascii_case(tag))
        .map(|(_, kind)| *kind)
        .unwrap_or(tag)
}

/// Turn one sentence's raw span list into ordered entity drafts.
///
/// Whitespace is trimmed, blank tags become MISC, display casing is kept.
/// Overlapping spans pass through untouched; the graph's merge-by-key
/// absorbs any duplicates they produce.
pub fn resolve_spans(spans: &[EntitySpan]) -> Vec<EntityDraft> {
    spans
        .iter()
        .filter(|span| !span.text.trim().is_empty())
        .map(|span| EntityDraft::new(span.text.clone(), kind_for_tag(&span.label), span.start, span.end))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, label: &str, start: usize) -> EntitySpan {
        EntitySpan {
            text: text.into(),
            label: label.into(),
            start,
            end: start + text.len(),
        }
    }

    #[test]
    fn test_known_tags_mapped() {
        let drafts = resolve_spans(&[span("Alice", "PERSON", 0), span("Acme", "ORG", 15)]);
        assert_eq!(drafts[0].kind, "Person");
        assert_eq!(drafts[1].kind, "Organization");
    }

    #[test]
    fn test_blank_tag_defaults_to_misc() {
        let drafts = resolve_spans(&[span("thingamajig", "", 0)]);
        assert_eq!(drafts[0].kind, "MISC");
    }

    #[test]
    fn test_unknown_tag_passes_through() {
        let drafts = resolve_spans(&[span("Boeing 747", "VEHICLE", 0)]);
        assert_eq!(drafts[0].kind, "VEHICLE");
    }

    #[test]
    fn test_casing_preserved_whitespace_trimmed() {
        let drafts = resolve_spans(&[span("  McDonald's ", "ORG", 0)]);
        assert_eq!(drafts[0].name, "McDonald's");
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve_spans(&[]).is_empty());
    }

    #[test]
    fn test_blank_spans_skipped() {
        let drafts = resolve_spans(&[span("   ", "ORG", 0), span("Acme", "ORG", 10)]);
        assert_eq!(drafts.len(), 1);
    }
}
