//! Message-ID canonicalization
//!
//! After the list platform migration the In-Reply-To header stopped carrying
//! angle brackets while Message-ID kept them. Every identifier is wrapped in
//! `<...>` before it is used as a lookup key so both generations match.

/// Return the angle-bracket delimited form of a message identifier.
///
/// Already delimited identifiers are returned unchanged (after trimming
/// surrounding whitespace), so the function is idempotent.
pub fn normalize_message_id(message_id: &str) -> String {
    let trimmed = message_id.trim();
    if trimmed.starts_with('<') {
        return trimmed.to_string();
    }

    format!("<{trimmed}>")
}

/// Split a References header into identifiers, oldest first.
pub fn split_references(header_value: &str) -> Vec<String> {
    header_value
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
