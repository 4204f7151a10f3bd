//! Date-list parsing with a confidence status.
//!
//! Raw date cells mix concrete dates, parity markers, subgroup markers and
//! arbitrary separators. Parsing never fails: anything that cannot be
//! derived confidently comes out as absent dates with `NeedCheck`.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::models::DateStatus;

use super::parity::fold;

/// Result of parsing one raw date cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDates {
    /// Concrete dates in the order they appeared, absent when none parsed
    pub dates: Option<Vec<NaiveDate>>,
    /// Whether the parsed values can be trusted without manual review
    pub status: DateStatus,
}

/// Literal cells that carry parity only and are trusted as-is.
const PURE_PARITY: [&str; 12] = [
    "чет",
    "чет.",
    "чет.нед.",
    "чет.нед",
    "неч",
    "неч.",
    "неч.нед.",
    "неч.нед",
    "нечет",
    "нечет.",
    "нечет.нед.",
    "нечет.нед",
];

/// Parity/week tokens stripped before date tokenization, longest first.
const PARITY_TOKENS: [&str; 12] = [
    "нечет.нед.",
    "нечет.нед",
    "неч.нед.",
    "неч.нед",
    "чет.нед.",
    "чет.нед",
    "нечет",
    "неч",
    "нея",
    "чет",
    "нед.",
    "нед",
];

fn subgroup_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d\s*подгр?\.?").expect("subgroup marker regex"))
}

/// Whether the raw cell mentions a subgroup ("1 подгр", "2 подг", ...).
pub fn has_subgroup_marker(raw: &str) -> bool {
    subgroup_re().is_match(&fold(raw))
}

fn parse_token(token: &str, year: i32) -> Option<NaiveDate> {
    let token = token.trim_matches('.');
    if token.is_empty() {
        return None;
    }
    // Day-month first, assuming the current year; then a full date.
    NaiveDate::parse_from_str(&format!("{token}.{year}"), "%d.%m.%Y")
        .or_else(|_| NaiveDate::parse_from_str(token, "%d.%m.%Y"))
        .ok()
}

/// Parse a raw date cell into concrete dates plus a confidence status.
///
/// A slash or a subgroup marker anywhere in the cell forces `NeedCheck`
/// even when dates parse, since the source uses both to express
/// alternatives the schedule model cannot represent.
pub fn parse_dates(raw: &str, today: NaiveDate) -> ParsedDates {
    let folded = fold(raw);
    let folded = folded.trim();

    let forced = folded.contains('/') || subgroup_re().is_match(folded);

    // An empty cell means "every week per parity": nothing to verify.
    if folded.is_empty() {
        return ParsedDates {
            dates: None,
            status: DateStatus::Good,
        };
    }
    if !forced && PURE_PARITY.contains(&folded) {
        return ParsedDates {
            dates: None,
            status: DateStatus::Good,
        };
    }

    let mut cleaned = subgroup_re().replace_all(folded, " ").into_owned();
    for token in PARITY_TOKENS {
        cleaned = cleaned.replace(token, " ");
    }
    let cleaned = cleaned.replace(['/', ';', ','], " ");

    let year = today.year();
    let dates: Vec<NaiveDate> = cleaned
        .split_whitespace()
        .filter_map(|tok| parse_token(tok, year))
        .collect();

    let status = if forced || dates.is_empty() {
        DateStatus::NeedCheck
    } else {
        DateStatus::Good
    };

    ParsedDates {
        dates: (!dates.is_empty()).then_some(dates),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 2).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_month_pair_assumes_current_year() {
        let parsed = parse_dates("05.09 19.09", today());
        assert_eq!(parsed.dates, Some(vec![date(2026, 9, 5), date(2026, 9, 19)]));
        assert_eq!(parsed.status, DateStatus::Good);
    }

    #[test]
    fn test_full_date_parses_directly() {
        let parsed = parse_dates("05.09.2025", today());
        assert_eq!(parsed.dates, Some(vec![date(2025, 9, 5)]));
        assert_eq!(parsed.status, DateStatus::Good);
    }

    #[test]
    fn test_unparseable_text_needs_check() {
        let parsed = parse_dates("уточняется", today());
        assert_eq!(parsed.dates, None);
        assert_eq!(parsed.status, DateStatus::NeedCheck);
    }

    #[test]
    fn test_pure_parity_literals_are_good() {
        for raw in ["чет", "неч.нед.", "нечет.нед.", "Чёт"] {
            let parsed = parse_dates(raw, today());
            assert_eq!(parsed.dates, None, "raw = {raw}");
            assert_eq!(parsed.status, DateStatus::Good, "raw = {raw}");
        }
    }

    #[test]
    fn test_empty_cell_is_good() {
        let parsed = parse_dates("  ", today());
        assert_eq!(parsed.dates, None);
        assert_eq!(parsed.status, DateStatus::Good);
    }

    #[test]
    fn test_subgroup_marker_forces_need_check() {
        let parsed = parse_dates("1 подгр", today());
        assert_eq!(parsed.dates, None);
        assert_eq!(parsed.status, DateStatus::NeedCheck);

        // Dates still come through, only the status is downgraded.
        let parsed = parse_dates("05.09 2 подг", today());
        assert_eq!(parsed.dates, Some(vec![date(2026, 9, 5)]));
        assert_eq!(parsed.status, DateStatus::NeedCheck);
    }

    #[test]
    fn test_slash_forces_need_check() {
        let parsed = parse_dates("05.09/19.09", today());
        assert_eq!(parsed.dates, Some(vec![date(2026, 9, 5), date(2026, 9, 19)]));
        assert_eq!(parsed.status, DateStatus::NeedCheck);
    }

    #[test]
    fn test_parity_tokens_stripped_before_dates() {
        let parsed = parse_dates("неч.нед. 05.09", today());
        assert_eq!(parsed.dates, Some(vec![date(2026, 9, 5)]));
        assert_eq!(parsed.status, DateStatus::Good);
    }

    #[test]
    fn test_order_preserved() {
        let parsed = parse_dates("19.09, 05.09", today());
        assert_eq!(parsed.dates, Some(vec![date(2026, 9, 19), date(2026, 9, 5)]));
    }
}
