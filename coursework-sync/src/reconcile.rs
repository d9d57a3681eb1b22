//! Reconciliation: decide which assignments need a new page and which pages
//! need their due date or link refreshed.
//!
//! The join key is the numeric assignment id. Each id maps to at most one
//! page; the plan never lists an id twice.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};

use coursework_core::schema::UNTITLED;
use coursework_core::types::{Assignment, AssignmentId, CreatePayload, DatabaseEntry, UpdatePayload};

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Assignments with no page yet.
    pub creates: Vec<CreatePayload>,
    /// Existing pages whose due date or link differs from Canvas.
    pub updates: Vec<UpdatePayload>,
    /// Existing pages that already match Canvas.
    pub unchanged: Vec<AssignmentId>,
    /// Placeholder records dropped by name.
    pub skipped_sentinel: usize,
    /// Records without a usable id; they can never be matched, so they are
    /// neither created nor updated.
    pub skipped_without_id: usize,
}

impl ReconcilePlan {
    /// True when applying the plan would issue no writes.
    pub fn is_noop(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty()
    }
}

/// Compute creations and updates.
///
/// `entries` must already be restricted to pages with a numeric
/// "Assignment Id". `now` stands in for a missing `due_at`.
pub fn reconcile(
    assignments: &[Assignment],
    entries: &[DatabaseEntry],
    now: DateTime<Utc>,
) -> ReconcilePlan {
    let lookup = build_lookup(entries);
    let now_stamp = now.to_rfc3339();

    let mut plan = ReconcilePlan::default();
    let mut seen: HashSet<AssignmentId> = HashSet::new();

    for assignment in assignments {
        if assignment.is_sentinel() {
            plan.skipped_sentinel += 1;
            continue;
        }
        let Some(id) = assignment.id else {
            tracing::warn!(
                name = assignment.name.as_deref().unwrap_or(UNTITLED),
                course = %assignment.course_id,
                "assignment has no id; skipped"
            );
            plan.skipped_without_id += 1;
            continue;
        };
        if !seen.insert(id) {
            tracing::debug!(%id, "duplicate assignment id in source; keeping first");
            continue;
        }

        let due_date = assignment
            .due_at
            .clone()
            .unwrap_or_else(|| now_stamp.clone());

        match lookup.get(&id) {
            None => plan.creates.push(CreatePayload {
                assignment_id: id,
                title: assignment
                    .name
                    .clone()
                    .unwrap_or_else(|| UNTITLED.to_string()),
                due_date,
                subject_id: assignment.course_id.to_string(),
                url: assignment.html_url.clone(),
            }),
            Some(entry) => {
                let up_to_date = assignment.due_at.is_some()
                    && same_due(entry.due_date.as_deref(), &due_date)
                    && entry.url == assignment.html_url;
                if up_to_date {
                    plan.unchanged.push(id);
                } else {
                    plan.updates.push(UpdatePayload {
                        page_id: entry.page_id.clone(),
                        assignment_id: id,
                        due_date,
                        url: assignment.html_url.clone(),
                    });
                }
            }
        }
    }

    plan
}

/// `assignment id -> entry`. The first page wins when the store already
/// holds duplicates.
fn build_lookup(entries: &[DatabaseEntry]) -> HashMap<AssignmentId, &DatabaseEntry> {
    let mut lookup: HashMap<AssignmentId, &DatabaseEntry> = HashMap::with_capacity(entries.len());
    for entry in entries {
        if let Some(kept) = lookup.get(&entry.assignment_id) {
            tracing::warn!(
                id = %entry.assignment_id,
                kept = %kept.page_id,
                ignored = %entry.page_id,
                "several pages share one assignment id"
            );
            continue;
        }
        lookup.insert(entry.assignment_id, entry);
    }
    lookup
}

#[derive(Debug, PartialEq, Eq)]
enum Due {
    Instant(DateTime<Utc>),
    Day(NaiveDate),
}

fn parse_due(raw: &str) -> Option<Due> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(Due::Instant(instant.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(Due::Day)
}

/// Compare Notion's stored start date with the Canvas value. Notion echoes
/// timestamps back with milliseconds and an explicit offset, so compare
/// instants rather than strings.
fn same_due(stored: Option<&str>, wanted: &str) -> bool {
    let Some(stored) = stored else {
        return false;
    };
    match (parse_due(stored), parse_due(wanted)) {
        (Some(a), Some(b)) => a == b,
        _ => stored.trim() == wanted.trim(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
