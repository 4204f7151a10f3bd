//! Field-by-field record diffing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::NormalizedRecord;

/// One differing field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldChange {
    pub before: Value,
    pub after: Value,
}

fn to_value<T: Serialize>(v: &T) -> Value {
    serde_json::to_value(v).unwrap_or(Value::Null)
}

fn check<T: Serialize + PartialEq>(
    out: &mut BTreeMap<String, FieldChange>,
    field: &str,
    before: &T,
    after: &T,
) {
    if before != after {
        out.insert(
            field.to_string(),
            FieldChange {
                before: to_value(before),
                after: to_value(after),
            },
        );
    }
}

/// Strict-equality diff over every comparable field.
///
/// Display-only fields (teacher/department names) are excluded, matching
/// the full-key field set.
pub fn diff_records(
    stored: &NormalizedRecord,
    source: &NormalizedRecord,
) -> BTreeMap<String, FieldChange> {
    let mut out = BTreeMap::new();
    check(&mut out, "kind", &stored.kind, &source.kind);
    check(&mut out, "day_number", &stored.day_number, &source.day_number);
    check(&mut out, "parity", &stored.parity, &source.parity);
    check(&mut out, "dates", &stored.dates, &source.dates);
    check(&mut out, "dates_status", &stored.dates_status, &source.dates_status);
    check(&mut out, "lesson_type", &stored.lesson_type, &source.lesson_type);
    check(&mut out, "starts_at", &stored.starts_at, &source.starts_at);
    check(&mut out, "ends_at", &stored.ends_at, &source.ends_at);
    check(&mut out, "audience", &stored.audience, &source.audience);
    check(&mut out, "building", &stored.building, &source.building);
    check(
        &mut out,
        "discipline_name",
        &stored.discipline_name,
        &source.discipline_name,
    );
    check(
        &mut out,
        "discipline_number",
        &stored.discipline_number,
        &source.discipline_number,
    );
    check(
        &mut out,
        "teacher_login",
        &stored.teacher_login,
        &source.teacher_login,
    );
    check(
        &mut out,
        "department_ext_id",
        &stored.department_ext_id,
        &source.department_ext_id,
    );
    out
}
