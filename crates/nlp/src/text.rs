//! Text cleanup applied before shipping a document to the parser

/// Normalize raw document text: collapse whitespace, strip characters that
/// carry no linguistic signal while keeping sentence punctuation intact.
pub fn clean_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    collapsed
        .chars()
        .filter(|c| {
            c.is_alphanumeric()
                || c.is_whitespace()
                || matches!(c, '.' | ',' | ';' | '!' | '?' | '\'' | '-' | '_')
        })
        .collect::<String>()
        .trim()
        .to_string()
}
