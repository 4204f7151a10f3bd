//! Reference entities resolved on demand during a sync run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discipline name that marks military training entries.
pub const MILITARY_DISCIPLINE_NAME: &str = "Военная подготовка";

/// Discipline name that marks physical education entries.
pub const PHYSICAL_EDUCATION_DISCIPLINE_NAME: &str =
    "Элективные курсы по физической культуре";

/// Sentinel department ext id assigned to military training records.
///
/// The source never publishes a real department for these entries; the
/// sentinel resolves through the ordinary get-or-create path so every
/// military record points at the same store-side department.
pub const MILITARY_DEPARTMENT_EXT_ID: i64 = -1;

/// Kind of a reference entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Teacher,
    Discipline,
    Department,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Teacher => "teacher",
            Self::Discipline => "discipline",
            Self::Department => "department",
        };
        f.write_str(s)
    }
}

/// A teacher, discipline or department known to the store.
///
/// External key is a login for teachers and an external id (rendered as a
/// string) for disciplines and departments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceEntity {
    /// Store-side primary key
    pub id: i64,

    /// Entity kind
    pub kind: ReferenceKind,

    /// External key the entity was matched or created by
    pub ext_key: String,

    /// Display name
    pub name: String,
}
