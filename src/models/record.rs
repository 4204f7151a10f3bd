//! Schedule record data structures.
//!
//! `SourceRecord` carries raw scraped fields exactly as the site renders
//! them; `NormalizedRecord` is the structured, comparable form produced by
//! the normalizer; `StoredRecord` is a persisted record plus its identity
//! and resolved references.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a record describes a regular lesson or an exam session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    Lesson,
    Exam,
}

/// Week parity a record applies to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    Odd,
    Even,
    #[default]
    Any,
}

/// Confidence flag for parsed dates and parity.
///
/// `NeedCheck` means an operator should verify the values by hand; the
/// record still flows through reconciliation unchanged.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DateStatus {
    #[default]
    Good,
    NeedCheck,
}

/// Classified record type.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    Lecture,
    Practice,
    Lab,
    Consultation,
    CourseWork,
    Individual,
    PhysicalEducation,
    Military,
    Exam,
    Credit,
    #[default]
    Unknown,
}

/// A raw lesson or exam row as scraped from the source site.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceRecord {
    /// Lesson row vs exam row
    #[serde(default)]
    pub kind: RecordKind,

    /// Day of week, 1 = Monday (exams usually omit it)
    #[serde(default)]
    pub day_number: Option<u8>,

    /// Free-form date/parity text, e.g. "неч.нед." or "05.09 19.09"
    #[serde(default)]
    pub date_text: String,

    /// Discipline display name
    pub discipline_name: String,

    /// Source-side discipline number, when published
    #[serde(default)]
    pub discipline_number: Option<i64>,

    /// Raw type abbreviation, e.g. "лек", "пр", "лаб"
    #[serde(default)]
    pub type_text: String,

    /// Raw audience text, may carry stray dashes
    #[serde(default)]
    pub audience: String,

    /// Raw building text
    #[serde(default)]
    pub building: String,

    /// Teacher display name
    #[serde(default)]
    pub teacher_name: String,

    /// Teacher account login, when published
    #[serde(default)]
    pub teacher_login: Option<String>,

    /// Department external id, when published
    #[serde(default)]
    pub department_ext_id: Option<i64>,

    /// Department display name
    #[serde(default)]
    pub department_name: String,

    /// Raw start time, e.g. "08:00"
    #[serde(default)]
    pub start_time: String,
}

/// A structured, comparable schedule record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedRecord {
    /// Lesson vs exam
    pub kind: RecordKind,

    /// Day of week, 1 = Monday
    pub day_number: Option<u8>,

    /// Week parity
    pub parity: Parity,

    /// Concrete dates, in the order they appeared in the raw text
    pub dates: Option<Vec<NaiveDate>>,

    /// Confidence flag for `dates` and `parity`
    pub dates_status: DateStatus,

    /// Classified record type
    pub lesson_type: LessonType,

    /// Start time, when parseable
    pub starts_at: Option<NaiveTime>,

    /// End time derived from the start slot table
    pub ends_at: Option<NaiveTime>,

    /// Audience, dash-stripped; absent when empty
    pub audience: Option<String>,

    /// Building, dash-stripped; absent when empty
    pub building: Option<String>,

    /// Discipline display name
    pub discipline_name: String,

    /// Source-side discipline number
    pub discipline_number: Option<i64>,

    /// Teacher display name (carried for reference creation, not compared)
    pub teacher_name: String,

    /// Teacher account login
    pub teacher_login: Option<String>,

    /// Department external id
    pub department_ext_id: Option<i64>,

    /// Department display name (carried for reference creation, not compared)
    pub department_name: String,
}

/// A previously persisted record with identity and resolved references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredRecord {
    /// Store-side primary key
    pub id: i64,

    /// When the record was first created
    pub created_at: DateTime<Utc>,

    /// Owning group id
    pub group_id: i64,

    /// Resolved discipline reference
    pub discipline_id: i64,

    /// Resolved teacher reference, when the record has one
    pub teacher_id: Option<i64>,

    /// Resolved department reference, when the record has one
    pub department_id: Option<i64>,

    /// The persisted normalized form
    pub record: NormalizedRecord,
}

/// Payload for creating or updating a record in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordInsert {
    pub group_id: i64,
    pub discipline_id: i64,
    pub teacher_id: Option<i64>,
    pub department_id: Option<i64>,
    pub record: NormalizedRecord,
}
