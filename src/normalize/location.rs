//! Audience/building text cleanup.

/// Strip dash placeholders and surrounding whitespace; empty becomes absent.
pub fn clean_location(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '-' | '–' | '—')).collect();
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}
