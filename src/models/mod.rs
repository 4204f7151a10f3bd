// src/models/mod.rs

//! Domain models for the sync application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod group;
mod record;
mod reference;
mod report;

// Re-export all public types
pub use group::{SourceGroup, StoredGroup};
pub use record::{
    DateStatus, LessonType, NormalizedRecord, Parity, RecordInsert, RecordKind, SourceRecord,
    StoredRecord,
};
pub use reference::{
    MILITARY_DEPARTMENT_EXT_ID, MILITARY_DISCIPLINE_NAME, PHYSICAL_EDUCATION_DISCIPLINE_NAME,
    ReferenceEntity, ReferenceKind,
};
pub use report::{GroupCounts, GroupReport, SyncReport};
