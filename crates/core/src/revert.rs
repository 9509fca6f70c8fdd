// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Revert planning and conflict detection.
//!
//! Reverting a merge runs the compensating reassignment for every task in
//! the log's snapshot. A task whose assignee changed again after the merge
//! is not silently overwritten: the planner flags it as a conflict and the
//! executor skips it with a warning.

use dealroom_domain::{DomainError, MergeStatus};

use crate::error::CoreError;
use crate::snapshot::TaskSnapshot;

/// What to do with one task at revert time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertDecision {
    /// The task is still assigned to the merge target; restore the source.
    Restore,
    /// The task already points at the source; fix assignment rows only.
    AlreadyRestored,
    /// A third party reassigned the task after the merge; skip it.
    Conflict {
        /// The assignee found at revert time.
        current_assignee: Option<i64>,
    },
}

/// Decides the revert action for one task.
///
/// # Arguments
///
/// * `current_assignee` - The task's primary assignee at revert time
/// * `source_user_id` - The original owner the revert restores
/// * `target_user_id` - The user the merge transferred the task to
#[must_use]
pub const fn decide_revert(
    current_assignee: Option<i64>,
    source_user_id: i64,
    target_user_id: i64,
) -> RevertDecision {
    match current_assignee {
        Some(user_id) if user_id == target_user_id => RevertDecision::Restore,
        Some(user_id) if user_id == source_user_id => RevertDecision::AlreadyRestored,
        other => RevertDecision::Conflict {
            current_assignee: other,
        },
    }
}

/// A validated revert, ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevertPlan {
    /// The user assignments are restored to.
    pub source_user_id: i64,
    /// The user assignments are taken from.
    pub target_user_id: i64,
    /// The snapshotted tasks to compensate, in merge order.
    pub snapshots: Vec<TaskSnapshot>,
}

/// Plans the reversion of a merge log entry.
///
/// # Arguments
///
/// * `status` - The log entry's current status
/// * `source_user_id` - The user assignments are restored to
/// * `target_user_id` - The user assignments are taken from
/// * `snapshots` - The task snapshots recorded at merge time
///
/// # Errors
///
/// Returns an error if the entry's status does not permit the
/// `pending_revert` → `reverted` transition (permanent merges are
/// terminal, and an entry cannot revert twice).
pub fn plan_revert(
    status: MergeStatus,
    source_user_id: i64,
    target_user_id: i64,
    snapshots: Vec<TaskSnapshot>,
) -> Result<RevertPlan, CoreError> {
    if !status.can_transition_to(MergeStatus::Reverted) {
        return Err(CoreError::DomainViolation(
            DomainError::InvalidMergeTransition {
                from: status,
                to: MergeStatus::Reverted,
            },
        ));
    }

    Ok(RevertPlan {
        source_user_id,
        target_user_id,
        snapshots,
    })
}
