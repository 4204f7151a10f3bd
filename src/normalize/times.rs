//! Lesson time parsing and end-time derivation.

use chrono::{Duration, NaiveTime, Timelike};

/// The eight bell-schedule start slots as (hour, minute).
const SLOT_STARTS: [(u32, u32); 8] = [
    (8, 0),
    (9, 40),
    (11, 20),
    (13, 20),
    (15, 0),
    (16, 40),
    (18, 15),
    (19, 50),
];

/// Every slot runs for one academic pair.
const SLOT_MINUTES: i64 = 90;

/// Parse a raw time cell, e.g. "08:00" or "08:00:00".
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Derive the end time for a known start slot.
///
/// Starts outside the bell schedule yield no end time rather than a guess.
pub fn end_time_for(start: NaiveTime) -> Option<NaiveTime> {
    SLOT_STARTS
        .contains(&(start.hour(), start.minute()))
        .then(|| start + Duration::minutes(SLOT_MINUTES))
}
