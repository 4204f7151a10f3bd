//! Per-run sync report structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record counts for one group's reconciliation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupCounts {
    pub unchanged: usize,
    pub changed: usize,
    pub added: usize,
    pub deleted: usize,
}

/// Outcome of syncing a single group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupReport {
    /// Group display name
    pub group_name: String,

    /// Source-side group identifier
    pub group_ext_id: String,

    /// Record counts; zero for a failed group
    pub counts: GroupCounts,

    /// Error message if the group failed to sync
    pub error: Option<String>,
}

impl GroupReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated outcome of one full sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished
    pub finished_at: DateTime<Utc>,

    /// One entry per group, in completion order within each chunk
    pub groups: Vec<GroupReport>,
}

impl SyncReport {
    /// Number of groups that synced successfully.
    pub fn succeeded(&self) -> usize {
        self.groups.iter().filter(|g| g.is_ok()).count()
    }

    /// Number of groups that failed.
    pub fn failed(&self) -> usize {
        self.groups.len() - self.succeeded()
    }

    /// Record counts summed over all successful groups.
    pub fn totals(&self) -> GroupCounts {
        let mut totals = GroupCounts::default();
        for g in self.groups.iter().filter(|g| g.is_ok()) {
            totals.unchanged += g.counts.unchanged;
            totals.changed += g.counts.changed;
            totals.added += g.counts.added;
            totals.deleted += g.counts.deleted;
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_report(error: Option<&str>, added: usize) -> GroupReport {
        GroupReport {
            group_name: "ИС-21".to_string(),
            group_ext_id: "1042".to_string(),
            counts: GroupCounts {
                added,
                ..GroupCounts::default()
            },
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_totals_skip_failed_groups() {
        let report = SyncReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            groups: vec![
                make_report(None, 3),
                make_report(Some("source unavailable"), 7),
                make_report(None, 2),
            ],
        };

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.totals().added, 5);
    }
}
