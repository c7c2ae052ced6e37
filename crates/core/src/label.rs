//! Label sanitization for the graph store's identifier charset

/// Fallback edge kind when sanitization leaves nothing usable.
pub const DEFAULT_EDGE_KIND: &str = "RELATED_TO";

/// Fallback node kind when the recognizer supplies no tag.
pub const DEFAULT_NODE_KIND: &str = "MISC";

/// Sanitize a raw relationship label into a store-safe edge kind:
/// uppercase, non-alphanumeric runs collapsed to a single underscore.
/// Labels that sanitize to nothing fall back to `RELATED_TO`.
pub fn sanitize_edge_kind(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;

    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch.to_ascii_uppercase());
        } else {
            pending_sep = true;
        }
    }

    if out.is_empty() {
        DEFAULT_EDGE_KIND.to_string()
    } else {
        out
    }
}

/// Sanitize a raw node type tag: alphanumeric only, original casing kept.
/// Blank tags fall back to `MISC`.
pub fn sanitize_node_kind(raw: &str) -> String {
    let out: String = raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect();

    if out.is_empty() {
        DEFAULT_NODE_KIND.to_string()
    } else {
        out
    }
}

/// Normalize a display name for use in a stable key: lowercased,
/// whitespace collapsed.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_kind_uppercase_underscore() {
        assert_eq!(sanitize_edge_kind("works at"), "WORKS_AT");
        assert_eq!(sanitize_edge_kind("co-founder of"), "CO_FOUNDER_OF");
        assert_eq!(sanitize_edge_kind("reports.to"), "REPORTS_TO");
    }

    #[test]
    fn test_edge_kind_collapses_runs() {
        assert_eq!(sanitize_edge_kind("works -- at"), "WORKS_AT");
        assert_eq!(sanitize_edge_kind("  owns!  "), "OWNS");
    }

    #[test]
    fn test_edge_kind_fallback() {
        assert_eq!(sanitize_edge_kind(""), "RELATED_TO");
        assert_eq!(sanitize_edge_kind("  ?!  "), "RELATED_TO");
    }

    #[test]
    fn test_edge_kind_charset() {
        for raw in ["a b c", "...", "Hello, World!", "x\ty\nz", "42%"] {
            let kind = sanitize_edge_kind(raw);
            assert!(!kind.is_empty());
            assert!(kind
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'));
        }
    }

    #[test]
    fn test_node_kind() {
        assert_eq!(sanitize_node_kind("Person"), "Person");
        assert_eq!(sanitize_node_kind("Work Of Art"), "WorkOfArt");
        assert_eq!(sanitize_node_kind(""), "MISC");
        assert_eq!(sanitize_node_kind("  "), "MISC");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  John   DOE  "), "john doe");
        assert_eq!(normalize_name("Acme Corp"), "acme corp");
    }
}
