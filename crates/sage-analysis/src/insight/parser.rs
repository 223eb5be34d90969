//! Extraction of a JSON object embedded in free text.
//!
//! Providers that do not support structured output wrap their JSON in
//! prose or code fences. This module finds the first balanced
//! brace-delimited span, aware of string literals and escapes, and hands it
//! to serde for parsing.

use serde_json::Value;

/// Extract and parse the first balanced `{...}` span in `text`.
///
/// Returns `None` when no balanced span exists or the span is not valid
/// JSON.
pub(crate) fn extract_json_object(text: &str) -> Option<Value> {
    let span = first_balanced_span(text)?;
    serde_json::from_str(span).ok()
}

/// Find the first balanced brace-delimited span, skipping braces inside
/// string literals.
fn first_balanced_span(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}
