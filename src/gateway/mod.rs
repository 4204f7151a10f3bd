//! Gateway abstractions for the source site and the store of record.
//!
//! The orchestrator only ever talks to these traits; HTTP implementations
//! live in [`source`] and [`store`], with an in-memory store in
//! [`memory`] for tests and local development.

pub mod memory;
pub mod source;
pub mod store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{
    RecordInsert, ReferenceEntity, ReferenceKind, SourceGroup, SourceRecord, StoredGroup,
    StoredRecord,
};

// Re-export for convenience
pub use memory::MemoryStore;
pub use source::HttpSource;
pub use store::HttpStore;

/// Read access to the external site the schedules are scraped from.
#[async_trait]
pub trait SourceGateway: Send + Sync {
    /// List every group the source publishes a schedule for.
    async fn list_groups(&self) -> Result<Vec<SourceGroup>>;

    /// Fetch the raw lesson rows for one group.
    async fn get_group_lessons(&self, group_ext_id: &str) -> Result<Vec<SourceRecord>>;

    /// Fetch the raw exam rows for one group.
    async fn get_group_exams(&self, group_ext_id: &str) -> Result<Vec<SourceRecord>>;
}

/// Read/write access to the store of record.
#[async_trait]
pub trait StoreGateway: Send + Sync {
    /// List every group known to the store.
    async fn list_groups(&self) -> Result<Vec<StoredGroup>>;

    /// Create a group discovered in the source.
    async fn create_group(&self, name: &str, ext_id: &str) -> Result<StoredGroup>;

    /// Look up a reference entity by external key, creating it when absent.
    ///
    /// Idempotent under concurrent duplicate attempts: a race returns the
    /// existing entity rather than erroring.
    async fn get_or_create_reference(
        &self,
        kind: ReferenceKind,
        ext_key: &str,
        name: &str,
    ) -> Result<ReferenceEntity>;

    /// Fetch every persisted record for one group.
    async fn get_group_records(&self, group_id: i64) -> Result<Vec<StoredRecord>>;

    /// Persist a new record.
    async fn create_record(&self, insert: &RecordInsert) -> Result<StoredRecord>;

    /// Replace an existing record's fields and references.
    async fn update_record(&self, id: i64, insert: &RecordInsert) -> Result<()>;

    /// Delete a record by id.
    async fn delete_record(&self, id: i64) -> Result<()>;

    /// Stamp a group's last successful sync time.
    async fn patch_group_synced_at(&self, group_id: i64, at: DateTime<Utc>) -> Result<()>;
}
