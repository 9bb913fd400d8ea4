//! Identifier helpers shared by the schema generators.

use std::collections::BTreeSet;

/// Fallback used when normalization leaves nothing behind.
pub const FALLBACK_NAME: &str = "item";

/// Normalize a display name into a lowercase `[a-z0-9_]` identifier.
///
/// Whitespace runs collapse to a single underscore; every other character
/// outside the allowed set is dropped. Returns [`FALLBACK_NAME`] when the
/// result would be empty.
pub fn normalize_name(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let mut normalized = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                normalized.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;

        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' {
            normalized.push(ch);
        }
    }

    if normalized.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        normalized
    }
}

/// Reserve `preferred` in `used`, suffixing `_2`, `_3`, ... until it is free.
pub fn ensure_unique(preferred: &str, used: &mut BTreeSet<String>) -> String {
    let mut next = preferred.to_string();
    let mut index = 2;

    while used.contains(&next) {
        next = format!("{preferred}_{index}");
        index += 1;
    }

    used.insert(next.clone());
    next
}

/// Quote an identifier for SQL, doubling embedded double quotes.
pub fn quote_identifier(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
