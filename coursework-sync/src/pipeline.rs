//! One sync pass: fetch, reconcile, write.
//!
//! Clients are injected by the caller. Every batch (per-course assignment
//! fetches, page creations, page updates) is awaited with a join-all. Issued
//! requests always run to completion; if any failed, the first error in
//! batch order is returned and the other results are discarded. Writes
//! already accepted by Notion are not rolled back.

use chrono::Utc;
use futures::future::{join, join_all};

use coursework_clients::{CanvasApi, ClientError, NotionApi};
use coursework_core::types::{Assignment, Course, DatabaseEntry, DatabaseId};

use crate::error::SyncError;
use crate::reconcile::{reconcile, ReconcilePlan};

/// What the user picked in the interactive selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub database: DatabaseId,
    pub courses: Vec<Course>,
}

/// Knobs for a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Compute and report the plan without writing.
    pub dry_run: bool,
}

/// Counts reported at the end of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub fetched_assignments: usize,
    pub existing_entries: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped_sentinel: usize,
    pub skipped_without_id: usize,
    pub dry_run: bool,
}

/// Run one pass for `selection`.
pub async fn run<C, N>(
    canvas: &C,
    notion: &N,
    selection: &Selection,
    options: RunOptions,
) -> Result<SyncReport, SyncError>
where
    C: CanvasApi,
    N: NotionApi,
{
    let (assignments, entries) = fetch(canvas, notion, selection).await?;
    tracing::info!(
        courses = selection.courses.len(),
        assignments = assignments.len(),
        entries = entries.len(),
        "fetched source and destination"
    );

    let plan = reconcile(&assignments, &entries, Utc::now());
    tracing::info!(
        create = plan.creates.len(),
        update = plan.updates.len(),
        unchanged = plan.unchanged.len(),
        "reconciled"
    );

    let mut report = SyncReport {
        fetched_assignments: assignments.len(),
        existing_entries: entries.len(),
        unchanged: plan.unchanged.len(),
        skipped_sentinel: plan.skipped_sentinel,
        skipped_without_id: plan.skipped_without_id,
        dry_run: options.dry_run,
        ..SyncReport::default()
    };

    if options.dry_run {
        report.created = plan.creates.len();
        report.updated = plan.updates.len();
        return Ok(report);
    }

    let (created, updated) = apply(notion, &selection.database, &plan).await?;
    report.created = created;
    report.updated = updated;
    Ok(report)
}

/// Fetch assignments for every selected course alongside the existing rows.
pub async fn fetch<C, N>(
    canvas: &C,
    notion: &N,
    selection: &Selection,
) -> Result<(Vec<Assignment>, Vec<DatabaseEntry>), SyncError>
where
    C: CanvasApi,
    N: NotionApi,
{
    let assignments = async {
        fetch_assignments(canvas, &selection.courses)
            .await
            .map_err(|source| SyncError::Fetch {
                what: "Canvas assignments",
                source,
            })
    };
    let entries = async {
        notion
            .query_database(&selection.database)
            .await
            .map_err(|source| SyncError::Fetch {
                what: "Notion database entries",
                source,
            })
    };
    let (assignments, entries) = join(assignments, entries).await;
    Ok((assignments?, entries?))
}

async fn fetch_assignments<C: CanvasApi>(
    canvas: &C,
    courses: &[Course],
) -> Result<Vec<Assignment>, ClientError> {
    let batches = join_all(courses.iter().map(|course| canvas.list_assignments(course.id)))
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(batches.into_iter().flatten().collect())
}

/// Issue every creation and update concurrently and wait for all of them.
/// Returns the number of creations and updates, or the first failure.
pub async fn apply<N: NotionApi>(
    notion: &N,
    database: &DatabaseId,
    plan: &ReconcilePlan,
) -> Result<(usize, usize), SyncError> {
    let creates = join_all(
        plan.creates
            .iter()
            .map(|payload| notion.create_page(database, payload)),
    );
    let updates = join_all(plan.updates.iter().map(|payload| notion.update_page(payload)));
    let (created, updated) = join(creates, updates).await;

    let failed = created.iter().chain(&updated).filter(|r| r.is_err()).count();
    if failed > 0 {
        tracing::warn!(failed, "write batch had failures; successful writes stay applied");
    }
    let created = created
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| SyncError::Write { source })?;
    let updated = updated
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| SyncError::Write { source })?;
    Ok((created.len(), updated.len()))
}
