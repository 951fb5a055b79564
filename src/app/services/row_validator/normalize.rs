//! Normalization applied to accepted rows
//!
//! Only string fields are normalized; numeric values pass through the
//! validator exactly as parsed.

/// Trim and title-case a player name
///
/// Words are separated on whitespace (runs collapse to a single space);
/// letters following a hyphen, apostrophe, or period are also capitalized,
/// so `"d.j. o'brien-smith"` becomes `"D.J. O'Brien-Smith"`.
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut boundary = true;
    for c in word.chars() {
        if boundary {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        boundary = matches!(c, '-' | '\'' | '.');
    }
    out
}
