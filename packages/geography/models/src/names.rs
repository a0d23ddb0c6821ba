//! Name and column normalization helpers.
//!
//! Reference tables come from different exports with inconsistent casing
//! (`"ANDHRA PRADESH"`, `"andhra pradesh"`) and header spellings
//! (`"KIDNAPPING & ABDUCTION"`, `"Kidnapping and Abduction"`). These
//! helpers produce the canonical forms used as lookup keys.

/// Converts a place name to title case, collapsing internal whitespace.
///
/// Every alphabetic run that follows a non-alphabetic character starts a
/// new word, so `"NORTH-EAST delhi"` becomes `"North-East Delhi"`.
#[must_use]
pub fn title_case(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());
    let mut at_word_start = true;

    for ch in collapsed.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = !ch.is_numeric();
        }
    }

    out
}

/// Normalizes a crime column header to `snake_case`.
///
/// Lower-cases the header and collapses every run of non-alphanumeric
/// characters into a single `_`. The standalone word `and` is dropped so
/// `"Kidnapping and Abduction"` and `"KIDNAPPING & ABDUCTION"` both map to
/// `"kidnapping_abduction"`.
#[must_use]
pub fn normalize_column(header: &str) -> String {
    header
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty() && *part != "and")
        .collect::<Vec<_>>()
        .join("_")
}

/// Case-insensitive comparison of two place names after normalization.
#[must_use]
pub fn same_place(a: &str, b: &str) -> bool {
    title_case(a) == title_case(b)
}
