//! In-memory Store Gateway for tests and local development.
//!
//! Mirrors the HTTP store's semantics, including idempotent reference
//! get-or-create under concurrent duplicate attempts.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{
    RecordInsert, ReferenceEntity, ReferenceKind, StoredGroup, StoredRecord,
};

use super::StoreGateway;

#[derive(Debug, Default)]
struct Inner {
    groups: Vec<StoredGroup>,
    records: HashMap<i64, StoredRecord>,
    references: HashMap<(ReferenceKind, String), ReferenceEntity>,
    next_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory store backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a group directly, bypassing the gateway surface.
    pub async fn seed_group(&self, name: &str, ext_id: &str) -> StoredGroup {
        let mut inner = self.inner.lock().await;
        let group = StoredGroup {
            id: inner.next_id(),
            ext_id: ext_id.to_string(),
            name: name.to_string(),
            last_synced_at: None,
        };
        inner.groups.push(group.clone());
        group
    }

    /// Seed a record directly, bypassing the gateway surface.
    pub async fn seed_record(&self, insert: &RecordInsert) -> StoredRecord {
        let mut inner = self.inner.lock().await;
        let id = inner.next_id();
        let record = StoredRecord {
            id,
            created_at: Utc::now(),
            group_id: insert.group_id,
            discipline_id: insert.discipline_id,
            teacher_id: insert.teacher_id,
            department_id: insert.department_id,
            record: insert.record.clone(),
        };
        inner.records.insert(id, record.clone());
        record
    }

    /// Snapshot a group by ext id, for assertions.
    pub async fn group_by_ext_id(&self, ext_id: &str) -> Option<StoredGroup> {
        let inner = self.inner.lock().await;
        inner.groups.iter().find(|g| g.ext_id == ext_id).cloned()
    }

    /// Snapshot all records, for assertions.
    pub async fn all_records(&self) -> Vec<StoredRecord> {
        let inner = self.inner.lock().await;
        let mut records: Vec<_> = inner.records.values().cloned().collect();
        records.sort_by_key(|r| r.id);
        records
    }

    /// Number of reference entities created so far.
    pub async fn reference_count(&self) -> usize {
        self.inner.lock().await.references.len()
    }
}

#[async_trait]
impl StoreGateway for MemoryStore {
    async fn list_groups(&self) -> Result<Vec<StoredGroup>> {
        Ok(self.inner.lock().await.groups.clone())
    }

    async fn create_group(&self, name: &str, ext_id: &str) -> Result<StoredGroup> {
        let mut inner = self.inner.lock().await;
        if let Some(existing) = inner.groups.iter().find(|g| g.ext_id == ext_id) {
            return Ok(existing.clone());
        }
        let group = StoredGroup {
            id: inner.next_id(),
            ext_id: ext_id.to_string(),
            name: name.to_string(),
            last_synced_at: None,
        };
        inner.groups.push(group.clone());
        Ok(group)
    }

    async fn get_or_create_reference(
        &self,
        kind: ReferenceKind,
        ext_key: &str,
        name: &str,
    ) -> Result<ReferenceEntity> {
        let mut inner = self.inner.lock().await;
        let key = (kind, ext_key.to_string());
        if let Some(existing) = inner.references.get(&key) {
            return Ok(existing.clone());
        }
        let entity = ReferenceEntity {
            id: inner.next_id(),
            kind,
            ext_key: ext_key.to_string(),
            name: name.to_string(),
        };
        inner.references.insert(key, entity.clone());
        Ok(entity)
    }

    async fn get_group_records(&self, group_id: i64) -> Result<Vec<StoredRecord>> {
        let inner = self.inner.lock().await;
        let mut records: Vec<_> = inner
            .records
            .values()
            .filter(|r| r.group_id == group_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    async fn create_record(&self, insert: &RecordInsert) -> Result<StoredRecord> {
        let mut inner = self.inner.lock().await;
        let id = inner.next_id();
        let record = StoredRecord {
            id,
            created_at: Utc::now(),
            group_id: insert.group_id,
            discipline_id: insert.discipline_id,
            teacher_id: insert.teacher_id,
            department_id: insert.department_id,
            record: insert.record.clone(),
        };
        inner.records.insert(id, record.clone());
        Ok(record)
    }

    async fn update_record(&self, id: i64, insert: &RecordInsert) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let record = inner
            .records
            .get_mut(&id)
            .ok_or_else(|| AppError::store("update_record", format!("record {id} not found")))?;
        record.group_id = insert.group_id;
        record.discipline_id = insert.discipline_id;
        record.teacher_id = insert.teacher_id;
        record.department_id = insert.department_id;
        record.record = insert.record.clone();
        Ok(())
    }

    async fn delete_record(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner
            .records
            .remove(&id)
            .ok_or_else(|| AppError::store("delete_record", format!("record {id} not found")))?;
        Ok(())
    }

    async fn patch_group_synced_at(&self, group_id: i64, at: DateTime<Utc>) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let group = inner
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| {
                AppError::store("patch_group_synced_at", format!("group {group_id} not found"))
            })?;
        group.last_synced_at = Some(at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_create_reference_is_idempotent() {
        let store = MemoryStore::new();

        let first = store
            .get_or_create_reference(ReferenceKind::Teacher, "ivanov", "Иванов И.И.")
            .await
            .unwrap();
        let second = store
            .get_or_create_reference(ReferenceKind::Teacher, "ivanov", "Иванов Иван")
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.reference_count().await, 1);
    }

    #[tokio::test]
    async fn test_same_key_different_kind_is_distinct() {
        let store = MemoryStore::new();

        let teacher = store
            .get_or_create_reference(ReferenceKind::Teacher, "12", "x")
            .await
            .unwrap();
        let department = store
            .get_or_create_reference(ReferenceKind::Department, "12", "x")
            .await
            .unwrap();

        assert_ne!(teacher.id, department.id);
    }

    #[tokio::test]
    async fn test_create_group_returns_existing_on_duplicate() {
        let store = MemoryStore::new();
        let a = store.create_group("ИС-21", "1042").await.unwrap();
        let b = store.create_group("ИС-21", "1042").await.unwrap();
        assert_eq!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_delete_missing_record_errors() {
        let store = MemoryStore::new();
        assert!(store.delete_record(404).await.is_err());
    }
}
