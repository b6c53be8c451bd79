use serde_json::{Map, Value};

/// A raw record as returned by the document store.
pub type Document = Map<String, Value>;

/// Reads a field as display text.
///
/// Non-empty strings are trimmed and numbers are rendered in decimal. Anything
/// else (null, booleans, empty strings, arrays, objects) counts as absent.
pub fn text_field(document: &Document, key: &str) -> Option<String> {
    match document.get(key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads the first alias carrying a usable value.
pub fn first_text_field(document: &Document, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|key| text_field(document, key))
}
