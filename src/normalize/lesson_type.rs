//! Lesson/exam type classification.

use crate::models::{
    LessonType, MILITARY_DISCIPLINE_NAME, PHYSICAL_EDUCATION_DISCIPLINE_NAME,
};

use super::parity::fold;

/// Classify a record type from its raw abbreviation and discipline name.
///
/// Military training is matched by exact discipline name and overrides the
/// abbreviation entirely. Physical education is a practice-typed entry
/// whose discipline name matches the fixed elective-course phrase.
pub fn classify_type(type_text: &str, discipline_name: &str) -> LessonType {
    let discipline = discipline_name.trim();
    if discipline == MILITARY_DISCIPLINE_NAME {
        return LessonType::Military;
    }

    let folded = fold(type_text);
    let t = folded.trim();

    let base = if t.starts_with("лек") {
        LessonType::Lecture
    } else if t.starts_with("лаб") || t.starts_with("лб") {
        LessonType::Lab
    } else if t.starts_with("конс") {
        LessonType::Consultation
    } else if t.starts_with("курс") || t.starts_with("кп") || t.starts_with("кр") {
        LessonType::CourseWork
    } else if t.starts_with("инд") {
        LessonType::Individual
    } else if t.starts_with("экз") {
        LessonType::Exam
    } else if t.starts_with("зач") {
        LessonType::Credit
    } else if t.starts_with("пр") {
        LessonType::Practice
    } else {
        LessonType::Unknown
    };

    if base == LessonType::Practice && discipline == PHYSICAL_EDUCATION_DISCIPLINE_NAME {
        return LessonType::PhysicalEducation;
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviation_table() {
        assert_eq!(classify_type("лек.", "Математика"), LessonType::Lecture);
        assert_eq!(classify_type("Лекция", "Математика"), LessonType::Lecture);
        assert_eq!(classify_type("пр", "Математика"), LessonType::Practice);
        assert_eq!(classify_type("лаб.", "Физика"), LessonType::Lab);
        assert_eq!(classify_type("конс", "Физика"), LessonType::Consultation);
        assert_eq!(classify_type("КП", "Детали машин"), LessonType::CourseWork);
        assert_eq!(classify_type("инд.зад.", "Графика"), LessonType::Individual);
        assert_eq!(classify_type("экз.", "Физика"), LessonType::Exam);
        assert_eq!(classify_type("зачет", "Физика"), LessonType::Credit);
    }

    #[test]
    fn test_unmapped_is_unknown() {
        assert_eq!(classify_type("???", "Математика"), LessonType::Unknown);
        assert_eq!(classify_type("", "Математика"), LessonType::Unknown);
    }

    #[test]
    fn test_physical_education_special_case() {
        assert_eq!(
            classify_type("пр", PHYSICAL_EDUCATION_DISCIPLINE_NAME),
            LessonType::PhysicalEducation
        );
        // Only practice-typed entries get the special case.
        assert_eq!(
            classify_type("лек", PHYSICAL_EDUCATION_DISCIPLINE_NAME),
            LessonType::Lecture
        );
    }

    #[test]
    fn test_military_overrides_abbreviation() {
        assert_eq!(
            classify_type("лек", MILITARY_DISCIPLINE_NAME),
            LessonType::Military
        );
        assert_eq!(classify_type("", MILITARY_DISCIPLINE_NAME), LessonType::Military);
    }
}
