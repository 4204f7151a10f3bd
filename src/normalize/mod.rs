//! Text Normalizer: pure functions turning raw scraped fields into
//! structured, comparable values.
//!
//! Every function here is deterministic and side-effect free; the
//! "current date" needed for year inference is always an explicit
//! argument. Nothing in this module ever errors on bad data; low
//! confidence is expressed in-data as [`crate::models::DateStatus::NeedCheck`].

pub mod dates;
pub mod lesson_type;
pub mod location;
pub mod parity;
pub mod times;

use chrono::NaiveDate;

pub use dates::{ParsedDates, parse_dates};
pub use lesson_type::classify_type;
pub use location::clean_location;
pub use parity::classify_parity;
pub use times::{end_time_for, parse_time};

use crate::models::{LessonType, MILITARY_DEPARTMENT_EXT_ID, NormalizedRecord, SourceRecord};

/// Normalize one raw scraped record.
///
/// `today` supplies the year assumed for day-month date pairs.
pub fn normalize(src: &SourceRecord, today: NaiveDate) -> NormalizedRecord {
    let parity = classify_parity(&src.date_text);
    let parsed = parse_dates(&src.date_text, today);
    let lesson_type = classify_type(&src.type_text, &src.discipline_name);
    let starts_at = parse_time(&src.start_time);
    let ends_at = starts_at.and_then(end_time_for);

    // Military training never carries real teacher/department references;
    // the source leaves them blank or repeats the discipline. Pin the
    // sentinel department and drop the teacher so every military record
    // resolves to the same references.
    let (teacher_login, department_ext_id, department_name) =
        if lesson_type == LessonType::Military {
            (
                None,
                Some(MILITARY_DEPARTMENT_EXT_ID),
                src.discipline_name.trim().to_string(),
            )
        } else {
            (
                src.teacher_login
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
                src.department_ext_id,
                src.department_name.trim().to_string(),
            )
        };

    NormalizedRecord {
        kind: src.kind,
        day_number: src.day_number,
        parity,
        dates: parsed.dates,
        dates_status: parsed.status,
        lesson_type,
        starts_at,
        ends_at,
        audience: clean_location(&src.audience),
        building: clean_location(&src.building),
        discipline_name: src.discipline_name.trim().to_string(),
        discipline_number: src.discipline_number,
        teacher_name: src.teacher_name.trim().to_string(),
        teacher_login,
        department_ext_id,
        department_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateStatus, Parity, RecordKind};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 2).unwrap()
    }

    fn make_source() -> SourceRecord {
        SourceRecord {
            kind: RecordKind::Lesson,
            day_number: Some(1),
            date_text: "неч.нед.".to_string(),
            discipline_name: " Математический анализ ".to_string(),
            discipline_number: Some(301),
            type_text: "лек.".to_string(),
            audience: "302".to_string(),
            building: "-".to_string(),
            teacher_name: "Иванов И.И.".to_string(),
            teacher_login: Some("ivanov".to_string()),
            department_ext_id: Some(12),
            department_name: "Кафедра математики".to_string(),
            start_time: "08:00".to_string(),
        }
    }

    #[test]
    fn test_normalize_lesson() {
        let rec = normalize(&make_source(), today());

        assert_eq!(rec.parity, Parity::Odd);
        assert_eq!(rec.dates, None);
        assert_eq!(rec.dates_status, DateStatus::Good);
        assert_eq!(rec.lesson_type, LessonType::Lecture);
        assert_eq!(rec.starts_at.map(|t| t.to_string()), Some("08:00:00".into()));
        assert_eq!(rec.ends_at.map(|t| t.to_string()), Some("09:30:00".into()));
        assert_eq!(rec.audience.as_deref(), Some("302"));
        assert_eq!(rec.building, None);
        assert_eq!(rec.discipline_name, "Математический анализ");
        assert_eq!(rec.teacher_login.as_deref(), Some("ivanov"));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let src = make_source();
        assert_eq!(normalize(&src, today()), normalize(&src, today()));
    }

    #[test]
    fn test_normalizing_clean_fields_is_a_noop() {
        let first = normalize(&make_source(), today());

        // Feeding already-normalized text back through the pure helpers
        // changes nothing.
        assert_eq!(
            clean_location(first.audience.as_deref().unwrap_or("")),
            first.audience
        );
        assert_eq!(
            first.discipline_name.trim().to_string(),
            first.discipline_name
        );
    }

    #[test]
    fn test_military_forces_sentinel_references() {
        let mut src = make_source();
        src.discipline_name = "Военная подготовка".to_string();
        let rec = normalize(&src, today());

        assert_eq!(rec.lesson_type, LessonType::Military);
        assert_eq!(rec.teacher_login, None);
        assert_eq!(rec.department_ext_id, Some(MILITARY_DEPARTMENT_EXT_ID));
    }

    #[test]
    fn test_blank_teacher_login_is_absent() {
        let mut src = make_source();
        src.teacher_login = Some("  ".to_string());
        assert_eq!(normalize(&src, today()).teacher_login, None);
    }
}
