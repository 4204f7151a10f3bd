//! Comparison keys for matching records across the source and the store.
//!
//! Records share no stable identifier between the two datasets, so
//! matching runs on field tuples: the full key for exact matches, the
//! anchor key to shortlist fallback candidates.

use chrono::{NaiveDate, NaiveTime};

use crate::models::{DateStatus, LessonType, NormalizedRecord, Parity, RecordKind};

/// Ordered tuple of every comparable field.
///
/// Two records describing the same real-world event produce equal full
/// keys exactly when no data has changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FullKey {
    pub kind: RecordKind,
    pub day_number: Option<u8>,
    pub starts_at: Option<NaiveTime>,
    pub ends_at: Option<NaiveTime>,
    pub dates: Option<Vec<NaiveDate>>,
    pub parity: Parity,
    pub dates_status: DateStatus,
    pub lesson_type: LessonType,
    pub discipline_name: String,
    pub discipline_number: Option<i64>,
    pub audience: Option<String>,
    pub building: Option<String>,
    pub teacher_login: Option<String>,
    pub department_ext_id: Option<i64>,
}

impl FullKey {
    pub fn of(rec: &NormalizedRecord) -> Self {
        Self {
            kind: rec.kind,
            day_number: rec.day_number,
            starts_at: rec.starts_at,
            ends_at: rec.ends_at,
            dates: rec.dates.clone(),
            parity: rec.parity,
            dates_status: rec.dates_status,
            lesson_type: rec.lesson_type,
            discipline_name: rec.discipline_name.clone(),
            discipline_number: rec.discipline_number,
            audience: rec.audience.clone(),
            building: rec.building.clone(),
            teacher_login: rec.teacher_login.clone(),
            department_ext_id: rec.department_ext_id,
        }
    }
}

/// Narrow tuple used to shortlist fallback match candidates.
///
/// Lessons anchor on the discipline reference plus the lesson type; exams
/// anchor on the discipline reference alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnchorKey {
    pub kind: RecordKind,
    pub discipline_name: String,
    pub discipline_number: Option<i64>,
    pub lesson_type: Option<LessonType>,
}

impl AnchorKey {
    pub fn of(rec: &NormalizedRecord) -> Self {
        Self {
            kind: rec.kind,
            discipline_name: rec.discipline_name.clone(),
            discipline_number: rec.discipline_number,
            lesson_type: match rec.kind {
                RecordKind::Lesson => Some(rec.lesson_type),
                RecordKind::Exam => None,
            },
        }
    }
}
