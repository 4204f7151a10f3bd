//! Week parity classification.
//!
//! The source renders parity as free-form Cyrillic markers, frequently
//! abbreviated and occasionally misspelled.

use crate::models::Parity;

/// Odd-week markers, longest first so stripping never leaves fragments.
/// "нея" is a recurring typo for "неч" on the source site.
const ODD_MARKERS: [&str; 3] = ["нечет", "неч", "нея"];

/// Lowercase the text and fold "ё" into "е".
pub(crate) fn fold(raw: &str) -> String {
    raw.to_lowercase().replace('ё', "е")
}

/// Remove every odd-week marker from already-folded text.
fn strip_odd_markers(folded: &str) -> String {
    let mut s = folded.to_string();
    for marker in ODD_MARKERS {
        s = s.replace(marker, "");
    }
    s
}

/// Classify week parity from raw date/parity text.
///
/// Both markers present, or neither, means the record applies every week.
pub fn classify_parity(raw: &str) -> Parity {
    let folded = fold(raw);
    let odd = ODD_MARKERS.iter().any(|m| folded.contains(m));
    // "чет" is a substring of "нечет"; only count it outside odd markers.
    let even = strip_odd_markers(&folded).contains("чет");

    match (odd, even) {
        (true, false) => Parity::Odd,
        (false, true) => Parity::Even,
        _ => Parity::Any,
    }
}
