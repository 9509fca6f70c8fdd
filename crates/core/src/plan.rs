// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Merge planning.
//!
//! Planning is pure: it validates the request and computes the per-task
//! transfer steps and the log entry's initial status. Execution (row
//! mutation, one transaction per task) belongs to the API layer.

use time::Date;

use dealroom_domain::{MergeStatus, MergeType};

use crate::error::CoreError;
use crate::snapshot::TaskSnapshot;

/// One task's assignment transfer within a merge.
///
/// Executing a transfer means: drop the target's existing assignment row
/// if present, insert a fresh target assignment, set the task's primary
/// assignee to the target, and clear any pending-assignment bookkeeping.
/// The whole step sequence runs in a single transaction per task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTransfer {
    /// The task whose assignment moves.
    pub task_id: i64,
    /// The user receiving the assignment.
    pub to_user_id: i64,
}

/// A validated merge, ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// The user giving up assignments.
    pub source_user_id: i64,
    /// The user receiving assignments.
    pub target_user_id: i64,
    /// Whether the merge reverts automatically.
    pub merge_type: MergeType,
    /// The status the merge log entry is created with.
    pub initial_status: MergeStatus,
    /// The end date for temporary merges (date-only).
    pub temporary_end_date: Option<Date>,
    /// Per-task transfer steps.
    pub transfers: Vec<TaskTransfer>,
    /// Historical snapshot of the transferred tasks.
    pub snapshots: Vec<TaskSnapshot>,
}

/// Plans a merge of the snapshotted tasks from one user to another.
///
/// # Arguments
///
/// * `source_user_id` - The user giving up assignments
/// * `target_user_id` - The user receiving assignments
/// * `snapshots` - Display-field snapshots of the tasks to transfer,
///   captured by the caller immediately before planning
/// * `merge_type` - Whether the merge is permanent or temporary
/// * `temporary_end_date` - Required for temporary merges, forbidden for
///   permanent ones
///
/// # Errors
///
/// Returns an error if:
/// - `source_user_id == target_user_id`
/// - `snapshots` is empty
/// - the end date is missing for a temporary merge or present for a
///   permanent one
pub fn plan_merge(
    source_user_id: i64,
    target_user_id: i64,
    snapshots: Vec<TaskSnapshot>,
    merge_type: MergeType,
    temporary_end_date: Option<Date>,
) -> Result<MergePlan, CoreError> {
    if source_user_id == target_user_id {
        return Err(CoreError::SameUser {
            user_id: source_user_id,
        });
    }
    if snapshots.is_empty() {
        return Err(CoreError::EmptyTaskSet);
    }
    match (merge_type, temporary_end_date) {
        (MergeType::Temporary, None) => return Err(CoreError::MissingEndDate),
        (MergeType::Permanent, Some(_)) => return Err(CoreError::UnexpectedEndDate),
        _ => {}
    }

    let transfers: Vec<TaskTransfer> = snapshots
        .iter()
        .map(|snapshot| TaskTransfer {
            task_id: snapshot.task_id,
            to_user_id: target_user_id,
        })
        .collect();

    Ok(MergePlan {
        source_user_id,
        target_user_id,
        merge_type,
        initial_status: MergeStatus::initial_for(merge_type),
        temporary_end_date,
        transfers,
        snapshots,
    })
}

/// Whether a temporary merge is due for automatic reversion.
///
/// The comparison is date-only: a merge ending today is due regardless of
/// the time of day.
///
/// # Arguments
///
/// * `temporary_end_date` - The merge's end date
/// * `today` - The current date
#[must_use]
pub fn revert_due(temporary_end_date: Date, today: Date) -> bool {
    temporary_end_date <= today
}
