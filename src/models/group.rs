//! Student group data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A group as listed by the source site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceGroup {
    /// Source-side identifier (stable across scrapes)
    pub ext_id: String,

    /// Display name, e.g. "ИС-21"
    pub name: String,
}

/// A group previously persisted in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredGroup {
    /// Store-side primary key
    pub id: i64,

    /// Source-side identifier used for matching against `SourceGroup`
    pub ext_id: String,

    /// Display name
    pub name: String,

    /// When this group's schedule was last successfully synced
    pub last_synced_at: Option<DateTime<Utc>>,
}
