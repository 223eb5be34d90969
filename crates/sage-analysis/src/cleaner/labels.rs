//! Column label normalization.

use once_cell::sync::Lazy;
use regex::Regex;

// Runs of whitespace and non-word characters collapse to one underscore.
static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w]+").expect("Invalid regex: non-word run"));

/// Normalize a single column label: trim, lowercase, replace whitespace and
/// special characters with `_`.
pub(crate) fn normalize_label(label: &str) -> String {
    let lowered = label.trim().to_lowercase();
    let replaced = NON_WORD.replace_all(&lowered, "_");
    let trimmed = replaced.trim_matches('_');
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Normalize a full header row, resolving post-normalization collisions.
///
/// Distinct source headers can normalize to the same label (e.g.
/// "Total Sales" and "total-sales"). Colliding labels get `_2`, `_3`, ...
/// suffixes in encounter order so no column is silently dropped.
pub(crate) fn normalize_labels(labels: &[String]) -> Vec<String> {
    let mut seen: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    let mut result = Vec::with_capacity(labels.len());

    for label in labels {
        let base = normalize_label(label);
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            result.push(base);
        } else {
            result.push(format!("{}_{}", base, count));
        }
    }

    result
}
