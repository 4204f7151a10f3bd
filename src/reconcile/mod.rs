//! Reconciliation of source-normalized records against stored records.
//!
//! Computes the four-way partition {unchanged, changed, to_add, to_delete}
//! for one group. Exact matches pair up by full key; the remainder is
//! matched through an anchor-key candidate index with a minimum-difference
//! rule. Bad data never errors here: low-confidence records flow through
//! with their `NeedCheck` status intact.

pub mod diff;
pub mod keys;

use std::collections::{BTreeMap, HashMap, VecDeque};

use serde::{Deserialize, Serialize};

pub use diff::{FieldChange, diff_records};
pub use keys::{AnchorKey, FullKey};

use crate::models::{NormalizedRecord, StoredRecord};

/// A stored record paired with its replacement and their differences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedRecord {
    /// The stored record being updated
    pub old: StoredRecord,
    /// The normalized source record replacing it
    pub new: NormalizedRecord,
    /// Per-field before/after values, keyed by field name
    pub differences: BTreeMap<String, FieldChange>,
}

/// Result of reconciling one group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Exact full-key matches; nothing to apply
    pub unchanged: Vec<StoredRecord>,
    /// Minimum-difference matches needing an update
    pub changed: Vec<ChangedRecord>,
    /// Source records with no stored counterpart
    pub to_add: Vec<NormalizedRecord>,
    /// Stored records no longer present in the source
    pub to_delete: Vec<StoredRecord>,
}

impl ChangeSet {
    /// Check if there is anything to apply.
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty() || !self.to_add.is_empty() || !self.to_delete.is_empty()
    }

    /// Get the total number of operations to apply.
    pub fn change_count(&self) -> usize {
        self.changed.len() + self.to_add.len() + self.to_delete.len()
    }
}

/// Reconcile source-normalized records against stored records.
///
/// Every stored record is consumed by at most one match; candidate ties
/// on difference count resolve to the earliest stored record in input
/// order, which keeps the output deterministic.
pub fn reconcile(source: &[NormalizedRecord], stored: &[StoredRecord]) -> ChangeSet {
    let mut set = ChangeSet::default();
    let mut source_consumed = vec![false; source.len()];
    let mut stored_consumed = vec![false; stored.len()];

    // Pass 1: exact full-key matches. Queues keep input order so repeated
    // identical rows pair one-to-one.
    let mut stored_by_full: HashMap<FullKey, VecDeque<usize>> = HashMap::new();
    for (idx, rec) in stored.iter().enumerate() {
        stored_by_full
            .entry(FullKey::of(&rec.record))
            .or_default()
            .push_back(idx);
    }

    for (src_idx, rec) in source.iter().enumerate() {
        if let Some(queue) = stored_by_full.get_mut(&FullKey::of(rec)) {
            if let Some(stored_idx) = queue.pop_front() {
                source_consumed[src_idx] = true;
                stored_consumed[stored_idx] = true;
                set.unchanged.push(stored[stored_idx].clone());
            }
        }
    }

    // Pass 2: anchor-key shortlist with minimum-difference selection.
    let mut stored_by_anchor: HashMap<AnchorKey, Vec<usize>> = HashMap::new();
    for (idx, rec) in stored.iter().enumerate() {
        if !stored_consumed[idx] {
            stored_by_anchor
                .entry(AnchorKey::of(&rec.record))
                .or_default()
                .push(idx);
        }
    }

    for (src_idx, rec) in source.iter().enumerate() {
        if source_consumed[src_idx] {
            continue;
        }
        let Some(candidates) = stored_by_anchor.get(&AnchorKey::of(rec)) else {
            continue;
        };

        // First-seen order breaks ties: only a strictly smaller diff
        // displaces the current best.
        let mut best: Option<(usize, BTreeMap<String, FieldChange>)> = None;
        for &stored_idx in candidates {
            if stored_consumed[stored_idx] {
                continue;
            }
            let differences = diff_records(&stored[stored_idx].record, rec);
            let better = best
                .as_ref()
                .is_none_or(|(_, current)| differences.len() < current.len());
            if better {
                best = Some((stored_idx, differences));
            }
        }

        if let Some((stored_idx, differences)) = best {
            source_consumed[src_idx] = true;
            stored_consumed[stored_idx] = true;
            set.changed.push(ChangedRecord {
                old: stored[stored_idx].clone(),
                new: rec.clone(),
                differences,
            });
        }
    }

    // Pass 3: leftovers.
    for (idx, rec) in source.iter().enumerate() {
        if !source_consumed[idx] {
            set.to_add.push(rec.clone());
        }
    }
    for (idx, rec) in stored.iter().enumerate() {
        if !stored_consumed[idx] {
            set.to_delete.push(rec.clone());
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateStatus, LessonType, Parity, RecordKind};
    use chrono::{NaiveTime, Utc};

    fn make_record(discipline: &str, audience: &str) -> NormalizedRecord {
        NormalizedRecord {
            kind: RecordKind::Lesson,
            day_number: Some(1),
            parity: Parity::Any,
            dates: None,
            dates_status: DateStatus::Good,
            lesson_type: LessonType::Lecture,
            starts_at: NaiveTime::from_hms_opt(8, 0, 0),
            ends_at: NaiveTime::from_hms_opt(9, 30, 0),
            audience: Some(audience.to_string()),
            building: Some("1".to_string()),
            discipline_name: discipline.to_string(),
            discipline_number: None,
            teacher_name: "Иванов И.И.".to_string(),
            teacher_login: Some("ivanov".to_string()),
            department_ext_id: Some(12),
            department_name: "Кафедра".to_string(),
        }
    }

    fn make_stored(id: i64, rec: NormalizedRecord) -> StoredRecord {
        StoredRecord {
            id,
            created_at: Utc::now(),
            group_id: 1,
            discipline_id: 100,
            teacher_id: Some(200),
            department_id: Some(300),
            record: rec,
        }
    }

    fn assert_complete(set: &ChangeSet, source_len: usize, stored_len: usize) {
        assert_eq!(
            set.unchanged.len() + set.changed.len() + set.to_delete.len(),
            stored_len
        );
        assert_eq!(
            set.unchanged.len() + set.changed.len() + set.to_add.len(),
            source_len
        );
    }

    #[test]
    fn test_identical_sets_are_unchanged() {
        let source = vec![make_record("Математика", "302")];
        let stored = vec![make_stored(1, source[0].clone())];

        let set = reconcile(&source, &stored);
        assert!(!set.has_changes());
        assert_eq!(set.unchanged.len(), 1);
        assert_complete(&set, 1, 1);
    }

    #[test]
    fn test_additions_and_deletions() {
        let source = vec![make_record("Математика", "302"), make_record("Физика", "415")];
        let stored = vec![
            make_stored(1, make_record("Математика", "302")),
            make_stored(2, make_record("История", "100")),
        ];

        let set = reconcile(&source, &stored);
        assert_eq!(set.unchanged.len(), 1);
        assert_eq!(set.to_add.len(), 1);
        assert_eq!(set.to_add[0].discipline_name, "Физика");
        assert_eq!(set.to_delete.len(), 1);
        assert_eq!(set.to_delete[0].id, 2);
        assert_complete(&set, 2, 2);
    }

    #[test]
    fn test_anchor_match_becomes_changed() {
        let source = vec![make_record("Математика", "415")];
        let stored = vec![make_stored(1, make_record("Математика", "302"))];

        let set = reconcile(&source, &stored);
        assert_eq!(set.changed.len(), 1);
        assert_eq!(set.changed[0].old.id, 1);
        assert_eq!(set.changed[0].differences.len(), 1);
        assert!(set.changed[0].differences.contains_key("audience"));
        assert_complete(&set, 1, 1);
    }

    #[test]
    fn test_minimum_difference_candidate_wins() {
        let source = vec![make_record("Математика", "415")];

        // Candidate 2 differs in one field, candidate 1 in three.
        let mut far = make_record("Математика", "100");
        far.day_number = Some(5);
        far.parity = Parity::Odd;
        let near = make_record("Математика", "302");

        let stored = vec![make_stored(1, far), make_stored(2, near)];
        let set = reconcile(&source, &stored);

        assert_eq!(set.changed.len(), 1);
        assert_eq!(set.changed[0].old.id, 2);
        assert_eq!(set.changed[0].differences.len(), 1);
        assert_eq!(set.to_delete.len(), 1);
        assert_eq!(set.to_delete[0].id, 1);
        assert_complete(&set, 1, 2);
    }

    #[test]
    fn test_tie_breaks_to_first_stored_in_input_order() {
        let source = vec![make_record("Математика", "415")];
        let stored = vec![
            make_stored(7, make_record("Математика", "100")),
            make_stored(8, make_record("Математика", "200")),
        ];

        let set = reconcile(&source, &stored);
        assert_eq!(set.changed[0].old.id, 7);
    }

    #[test]
    fn test_anchor_requires_same_lesson_type() {
        let source = vec![make_record("Математика", "415")];
        let mut other = make_record("Математика", "415");
        other.lesson_type = LessonType::Practice;
        let stored = vec![make_stored(1, other)];

        let set = reconcile(&source, &stored);
        assert_eq!(set.changed.len(), 0);
        assert_eq!(set.to_add.len(), 1);
        assert_eq!(set.to_delete.len(), 1);
        assert_complete(&set, 1, 1);
    }

    #[test]
    fn test_stored_record_consumed_at_most_once() {
        // Two source records compete for one stored candidate.
        let source = vec![make_record("Математика", "415"), make_record("Математика", "500")];
        let stored = vec![make_stored(1, make_record("Математика", "302"))];

        let set = reconcile(&source, &stored);
        assert_eq!(set.changed.len(), 1);
        assert_eq!(set.to_add.len(), 1);
        assert_complete(&set, 2, 1);
    }

    #[test]
    fn test_duplicate_rows_pair_one_to_one() {
        let rec = make_record("Математика", "302");
        let source = vec![rec.clone(), rec.clone()];
        let stored = vec![make_stored(1, rec.clone()), make_stored(2, rec.clone())];

        let set = reconcile(&source, &stored);
        assert_eq!(set.unchanged.len(), 2);
        assert_complete(&set, 2, 2);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let source = vec![make_record("Математика", "415"), make_record("Физика", "100")];
        let stored = vec![
            make_stored(1, make_record("Математика", "302")),
            make_stored(2, make_record("История", "200")),
        ];

        let first = reconcile(&source, &stored);
        let second = reconcile(&source, &stored);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn test_need_check_records_flow_through() {
        let mut rec = make_record("Математика", "302");
        rec.dates_status = DateStatus::NeedCheck;
        let source = vec![rec.clone()];
        let stored = vec![make_stored(1, rec)];

        let set = reconcile(&source, &stored);
        assert_eq!(set.unchanged.len(), 1);
    }

    #[test]
    fn test_empty_sides() {
        let set = reconcile(&[], &[]);
        assert!(!set.has_changes());

        let source = vec![make_record("Математика", "302")];
        let set = reconcile(&source, &[]);
        assert_eq!(set.to_add.len(), 1);

        let stored = vec![make_stored(1, make_record("Математика", "302"))];
        let set = reconcile(&[], &stored);
        assert_eq!(set.to_delete.len(), 1);
        assert_eq!(set.change_count(), 1);
    }
}
