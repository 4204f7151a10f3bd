//! Sync Orchestrator.
//!
//! Drives reconciliation across every group: reconciles the group lists,
//! fans out over fixed-size chunks of groups, applies each group's change
//! set through the Store Gateway, and aggregates per-group outcomes into a
//! [`SyncReport`]. A failure in one group never aborts its chunk or the
//! run; the group is recorded with its error and its "last synced" stamp
//! is withheld. No transaction spans the run, so progress already applied
//! survives a crash mid-run.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use futures::future::join_all;

use crate::error::{AppError, Result};
use crate::gateway::{SourceGateway, StoreGateway};
use crate::models::{
    GroupCounts, GroupReport, NormalizedRecord, RecordInsert, ReferenceEntity, ReferenceKind,
    StoredGroup, SyncReport,
};
use crate::normalize::normalize;
use crate::reconcile::{ChangeSet, reconcile};

/// Default number of groups synced concurrently per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// Per-run cache of resolved reference entities.
///
/// Explicitly scoped to one run and passed into each group sync, so
/// concurrent runs and tests never interfere. The lock is never held
/// across an await: a miss drops it, round-trips to the store, then
/// re-locks to insert. Two groups racing to the same miss both reach the
/// store, which resolves the race via get-or-create.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    entries: Mutex<HashMap<(ReferenceKind, String), ReferenceEntity>>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a reference through the cache, hitting the store on a miss.
    pub async fn resolve(
        &self,
        store: &dyn StoreGateway,
        kind: ReferenceKind,
        ext_key: &str,
        name: &str,
    ) -> Result<ReferenceEntity> {
        let cache_key = (kind, ext_key.to_string());
        if let Some(hit) = self
            .entries
            .lock()
            .map_err(|_| AppError::invariant("reference cache poisoned"))?
            .get(&cache_key)
        {
            return Ok(hit.clone());
        }

        let entity = store.get_or_create_reference(kind, ext_key, name).await?;
        self.entries
            .lock()
            .map_err(|_| AppError::invariant("reference cache poisoned"))?
            .insert(cache_key, entity.clone());
        Ok(entity)
    }
}

/// Drives one full sync run across all groups.
pub struct SyncOrchestrator {
    source: Arc<dyn SourceGateway>,
    store: Arc<dyn StoreGateway>,
}

impl SyncOrchestrator {
    pub fn new(source: Arc<dyn SourceGateway>, store: Arc<dyn StoreGateway>) -> Self {
        Self { source, store }
    }

    /// Run one sync pass over every group.
    ///
    /// Groups are processed in fixed-size chunks; all groups within a
    /// chunk run concurrently, and a chunk only starts once the previous
    /// one has fully settled.
    pub async fn run(&self, chunk_size: usize) -> Result<SyncReport> {
        let started_at = Utc::now();
        let chunk_size = chunk_size.max(1);

        let groups = self.ensure_groups().await?;
        log::info!(
            "Syncing {} groups in chunks of {}",
            groups.len(),
            chunk_size
        );

        let cache = ReferenceCache::new();
        let mut reports = Vec::with_capacity(groups.len());

        for chunk in groups.chunks(chunk_size) {
            let outcomes = join_all(chunk.iter().map(|group| {
                let cache = &cache;
                async move { (group, self.sync_group(group, cache).await) }
            }))
            .await;

            for (group, outcome) in outcomes {
                let report = match outcome {
                    Ok(counts) => GroupReport {
                        group_name: group.name.clone(),
                        group_ext_id: group.ext_id.clone(),
                        counts,
                        error: None,
                    },
                    Err(e) => {
                        log::warn!("Group {} ({}) failed: {}", group.name, group.ext_id, e);
                        GroupReport {
                            group_name: group.name.clone(),
                            group_ext_id: group.ext_id.clone(),
                            counts: GroupCounts::default(),
                            error: Some(e.to_string()),
                        }
                    }
                };
                reports.push(report);
            }
        }

        let report = SyncReport {
            started_at,
            finished_at: Utc::now(),
            groups: reports,
        };
        let totals = report.totals();
        log::info!(
            "Sync finished: {} ok, {} failed; +{} ~{} -{} ={}",
            report.succeeded(),
            report.failed(),
            totals.added,
            totals.changed,
            totals.deleted,
            totals.unchanged
        );
        Ok(report)
    }

    /// Fetch known groups and create the ones only the source knows about.
    async fn ensure_groups(&self) -> Result<Vec<StoredGroup>> {
        let mut stored = self.store.list_groups().await?;
        let source_groups = self.source.list_groups().await?;

        let known: HashSet<&str> = stored.iter().map(|g| g.ext_id.as_str()).collect();
        let missing: Vec<_> = source_groups
            .iter()
            .filter(|g| !known.contains(g.ext_id.as_str()))
            .collect();

        if !missing.is_empty() {
            log::info!("Creating {} groups discovered in the source", missing.len());
        }
        for group in missing {
            let created = self.store.create_group(&group.name, &group.ext_id).await?;
            stored.push(created);
        }
        Ok(stored)
    }

    /// Sync one group end to end.
    async fn sync_group(&self, group: &StoredGroup, cache: &ReferenceCache) -> Result<GroupCounts> {
        let mut raw = self.source.get_group_lessons(&group.ext_id).await?;
        raw.extend(self.source.get_group_exams(&group.ext_id).await?);

        let today = Utc::now().date_naive();
        let normalized: Vec<NormalizedRecord> =
            raw.iter().map(|rec| normalize(rec, today)).collect();

        let stored = self.store.get_group_records(group.id).await?;
        let set = reconcile(&normalized, &stored);

        log::debug!(
            "Group {}: {} unchanged, {} changed, {} to add, {} to delete",
            group.name,
            set.unchanged.len(),
            set.changed.len(),
            set.to_add.len(),
            set.to_delete.len()
        );

        self.apply(group, &set, cache).await?;
        self.store.patch_group_synced_at(group.id, Utc::now()).await?;

        Ok(GroupCounts {
            unchanged: set.unchanged.len(),
            changed: set.changed.len(),
            added: set.to_add.len(),
            deleted: set.to_delete.len(),
        })
    }

    /// Apply one group's change set to the store.
    async fn apply(
        &self,
        group: &StoredGroup,
        set: &ChangeSet,
        cache: &ReferenceCache,
    ) -> Result<()> {
        Self::check_consumption(set)?;

        for rec in &set.to_add {
            let insert = self.resolve_insert(group.id, rec, cache).await?;
            self.store.create_record(&insert).await?;
        }

        for change in &set.changed {
            let mut insert = RecordInsert {
                group_id: group.id,
                discipline_id: change.old.discipline_id,
                teacher_id: change.old.teacher_id,
                department_id: change.old.department_id,
                record: change.new.clone(),
            };

            // Re-resolve only the reference fields that actually changed;
            // everything else carries over from the stored record.
            if change.differences.contains_key("discipline_name")
                || change.differences.contains_key("discipline_number")
            {
                insert.discipline_id = self.resolve_discipline(&change.new, cache).await?.id;
            }
            if change.differences.contains_key("teacher_login") {
                insert.teacher_id = self.resolve_teacher(&change.new, cache).await?;
            }
            if change.differences.contains_key("department_ext_id") {
                insert.department_id = self.resolve_department(&change.new, cache).await?;
            }

            self.store.update_record(change.old.id, &insert).await?;
        }

        for rec in &set.to_delete {
            self.store.delete_record(rec.id).await?;
        }

        Ok(())
    }

    /// Detect a stored record consumed by more than one match.
    ///
    /// Unreachable given the reconciler's algorithm; if it ever trips, the
    /// apply step for this group aborts before touching the store.
    fn check_consumption(set: &ChangeSet) -> Result<()> {
        let mut seen = HashSet::new();
        let ids = set
            .unchanged
            .iter()
            .map(|r| r.id)
            .chain(set.changed.iter().map(|c| c.old.id))
            .chain(set.to_delete.iter().map(|r| r.id));
        for id in ids {
            if !seen.insert(id) {
                return Err(AppError::invariant(format!(
                    "stored record {id} consumed more than once"
                )));
            }
        }
        Ok(())
    }

    async fn resolve_discipline(
        &self,
        rec: &NormalizedRecord,
        cache: &ReferenceCache,
    ) -> Result<ReferenceEntity> {
        let ext_key = match rec.discipline_number {
            Some(number) => number.to_string(),
            None => rec.discipline_name.clone(),
        };
        cache
            .resolve(
                self.store.as_ref(),
                ReferenceKind::Discipline,
                &ext_key,
                &rec.discipline_name,
            )
            .await
    }

    async fn resolve_teacher(
        &self,
        rec: &NormalizedRecord,
        cache: &ReferenceCache,
    ) -> Result<Option<i64>> {
        match &rec.teacher_login {
            Some(login) => {
                let entity = cache
                    .resolve(
                        self.store.as_ref(),
                        ReferenceKind::Teacher,
                        login,
                        &rec.teacher_name,
                    )
                    .await?;
                Ok(Some(entity.id))
            }
            None => Ok(None),
        }
    }

    async fn resolve_department(
        &self,
        rec: &NormalizedRecord,
        cache: &ReferenceCache,
    ) -> Result<Option<i64>> {
        match rec.department_ext_id {
            Some(ext_id) => {
                let entity = cache
                    .resolve(
                        self.store.as_ref(),
                        ReferenceKind::Department,
                        &ext_id.to_string(),
                        &rec.department_name,
                    )
                    .await?;
                Ok(Some(entity.id))
            }
            None => Ok(None),
        }
    }

    /// Resolve every reference a new record needs.
    async fn resolve_insert(
        &self,
        group_id: i64,
        rec: &NormalizedRecord,
        cache: &ReferenceCache,
    ) -> Result<RecordInsert> {
        let discipline = self.resolve_discipline(rec, cache).await?;
        let teacher_id = self.resolve_teacher(rec, cache).await?;
        let department_id = self.resolve_department(rec, cache).await?;

        Ok(RecordInsert {
            group_id,
            discipline_id: discipline.id,
            teacher_id,
            department_id,
            record: rec.clone(),
        })
    }
}

/// Run one sync pass with the default chunk size unless overridden.
pub async fn run_sync(
    source: Arc<dyn SourceGateway>,
    store: Arc<dyn StoreGateway>,
    chunk_size: usize,
) -> Result<SyncReport> {
    SyncOrchestrator::new(source, store).run(chunk_size).await
}
