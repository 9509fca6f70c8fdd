// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Task merge/revert engine execution.
//!
//! Planning is pure and lives in the core crate; this module loads the
//! rows, executes each per-task step sequence (one transaction per
//! task), and writes the merge log. The privileged reassignment in the
//! revert path (`apply_task_restore`) is reachable only from here,
//! never from generic request handlers.

use std::str::FromStr;
use time::OffsetDateTime;

use dealroom::{
    decide_revert, plan_merge, plan_revert, reminder_due, MergePlan, RevertDecision, RevertPlan,
    TaskSnapshot,
};
use dealroom_domain::{render_date, render_timestamp, MergeStatus, MergeType};
use dealroom_persistence::{MergeLogData, OperatorData, Persistence, TaskData, UserData};
use tracing::{error, info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    translate_core_error, translate_domain_error, translate_persistence_error, ApiError,
};
use crate::request_response::{
    ListMergeLogsResponse, ListNotificationsResponse, MergeLogInfo, NotificationInfo,
    PerformMergeRequest, PerformMergeResponse, ReminderSweepReport, RevertMergeRequest,
    RevertMergeResponse, RevertSweepReport, SkippedTask, TaskSnapshotInfo,
};

/// Outcome of one merge log entry's compensating sequence.
struct RevertOutcome {
    reverted_task_ids: Vec<i64>,
    skipped: Vec<SkippedTask>,
}

fn snapshot_of(task: &TaskData) -> TaskSnapshot {
    TaskSnapshot::new(
        task.task_id,
        task.title.clone(),
        task.project.clone(),
        task.due_date.clone(),
        task.priority.clone(),
    )
}

/// Transfers a set of tasks' assignments from a source user to a target
/// user and records the merge log entry.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, a referenced user or
/// task is absent, planning rejects the request, or execution fails.
pub fn perform_merge(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    operator: &OperatorData,
    request: &PerformMergeRequest,
) -> Result<PerformMergeResponse, ApiError> {
    AuthorizationService::authorize_perform_merge(actor)?;

    let merge_type: MergeType =
        MergeType::from_str(&request.merge_type).map_err(translate_domain_error)?;
    let temporary_end_date = request
        .temporary_end_date
        .as_deref()
        .map(dealroom_domain::parse_date)
        .transpose()
        .map_err(translate_domain_error)?;

    let source: UserData = persistence
        .get_user(request.source_user_id)
        .map_err(translate_persistence_error)?;
    let target: UserData = persistence
        .get_user(request.target_user_id)
        .map_err(translate_persistence_error)?;

    // Every requested task must exist; a silent partial merge would
    // desynchronize the snapshot from reality.
    let tasks: Vec<TaskData> = persistence
        .get_tasks(&request.task_ids)
        .map_err(translate_persistence_error)?;
    if tasks.len() != request.task_ids.len() {
        let found: Vec<i64> = tasks.iter().map(|t| t.task_id).collect();
        let missing: Vec<i64> = request
            .task_ids
            .iter()
            .copied()
            .filter(|id| !found.contains(id))
            .collect();
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Task"),
            message: format!("Tasks not found: {missing:?}"),
        });
    }

    let snapshots: Vec<TaskSnapshot> = tasks.iter().map(snapshot_of).collect();
    let plan: MergePlan = plan_merge(
        source.user_id,
        target.user_id,
        snapshots,
        merge_type,
        temporary_end_date,
    )
    .map_err(translate_core_error)?;

    for transfer in &plan.transfers {
        persistence
            .apply_task_transfer(transfer.task_id, transfer.to_user_id)
            .map_err(|e| {
                error!(task_id = transfer.task_id, error = %e, "Task transfer failed");
                translate_persistence_error(e)
            })?;
    }

    let end_date_str = plan
        .temporary_end_date
        .map(render_date)
        .transpose()
        .map_err(translate_domain_error)?;
    let merge_log_id: i64 = persistence
        .insert_merge_log(
            request.organization_id,
            operator.operator_id,
            plan.source_user_id,
            plan.target_user_id,
            plan.merge_type.as_str(),
            end_date_str.as_deref(),
            &plan.snapshots,
            plan.initial_status,
        )
        .map_err(translate_persistence_error)?;

    info!(
        merge_log_id,
        source_user_id = plan.source_user_id,
        target_user_id = plan.target_user_id,
        tasks = plan.transfers.len(),
        "Merge performed"
    );

    Ok(PerformMergeResponse {
        merge_log_id,
        status: plan.initial_status.as_str().to_string(),
        transferred_task_ids: plan.transfers.iter().map(|t| t.task_id).collect(),
    })
}

/// Runs the compensating sequence for one merge log entry.
///
/// Per snapshotted task: a task still assigned to the merge target is
/// restored to the source; a task already back on the source only gets
/// its assignment rows fixed; a task reassigned to a third party in the
/// meantime is skipped with a warning instead of silently overwritten.
fn execute_revert(
    persistence: &mut Persistence,
    log: &MergeLogData,
) -> Result<RevertOutcome, ApiError> {
    let status: MergeStatus =
        MergeStatus::from_str(&log.status).map_err(translate_domain_error)?;
    let snapshots: Vec<TaskSnapshot> =
        log.task_snapshots().map_err(translate_persistence_error)?;

    let plan: RevertPlan = plan_revert(
        status,
        log.source_user_id,
        log.target_user_id,
        snapshots,
    )
    .map_err(translate_core_error)?;

    let mut reverted_task_ids: Vec<i64> = Vec::new();
    let mut skipped: Vec<SkippedTask> = Vec::new();

    for snapshot in &plan.snapshots {
        let task: TaskData = match persistence.get_task(snapshot.task_id) {
            Ok(task) => task,
            Err(e) => {
                // A task deleted since the merge cannot be restored;
                // treat it like a conflict rather than aborting the
                // whole entry.
                warn!(task_id = snapshot.task_id, error = %e, "Snapshotted task is gone; skipping");
                skipped.push(SkippedTask {
                    task_id: snapshot.task_id,
                    current_assignee_user_id: None,
                });
                continue;
            }
        };

        match decide_revert(
            task.assignee_user_id,
            plan.source_user_id,
            plan.target_user_id,
        ) {
            RevertDecision::Restore | RevertDecision::AlreadyRestored => {
                persistence
                    .apply_task_restore(task.task_id, plan.source_user_id, plan.target_user_id)
                    .map_err(|e| {
                        error!(task_id = task.task_id, error = %e, "Task restore failed");
                        translate_persistence_error(e)
                    })?;
                reverted_task_ids.push(task.task_id);
            }
            RevertDecision::Conflict { current_assignee } => {
                warn!(
                    task_id = task.task_id,
                    ?current_assignee,
                    expected = plan.target_user_id,
                    "Task was reassigned after the merge; skipping revert for it"
                );
                skipped.push(SkippedTask {
                    task_id: task.task_id,
                    current_assignee_user_id: current_assignee,
                });
            }
        }
    }

    persistence
        .mark_merge_reverted(log.merge_log_id)
        .map_err(translate_persistence_error)?;

    Ok(RevertOutcome {
        reverted_task_ids,
        skipped,
    })
}

/// Manually reverts a merge log entry.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the entry is absent
/// or not in `pending_revert`, or the compensating sequence fails.
pub fn revert_merge(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &RevertMergeRequest,
) -> Result<RevertMergeResponse, ApiError> {
    AuthorizationService::authorize_revert_merge(actor)?;

    let log: MergeLogData = persistence
        .get_merge_log(request.merge_log_id)
        .map_err(translate_persistence_error)?;

    let outcome: RevertOutcome = execute_revert(persistence, &log)?;

    info!(
        merge_log_id = log.merge_log_id,
        reverted = outcome.reverted_task_ids.len(),
        skipped = outcome.skipped.len(),
        "Merge reverted manually"
    );

    Ok(RevertMergeResponse {
        merge_log_id: log.merge_log_id,
        status: MergeStatus::Reverted.as_str().to_string(),
        reverted_task_ids: outcome.reverted_task_ids,
        skipped: outcome.skipped,
    })
}

/// Runs the scheduled revert sweep.
///
/// Selects temporary `pending_revert` entries whose end date is on or
/// before today (date-only comparison) and runs each one's compensating
/// sequence. A failing entry is logged and left pending; the batch
/// continues. Each successful reversion notifies the admin who
/// performed the original merge.
///
/// # Errors
///
/// Returns an error only if the due-entry query itself fails; per-entry
/// failures are isolated.
pub fn run_revert_sweep(persistence: &mut Persistence) -> Result<RevertSweepReport, ApiError> {
    let today: String =
        render_date(OffsetDateTime::now_utc().date()).map_err(translate_domain_error)?;

    let due_entries: Vec<MergeLogData> = persistence
        .pending_reverts_due(&today)
        .map_err(translate_persistence_error)?;

    let mut report: RevertSweepReport = RevertSweepReport {
        due: due_entries.len(),
        reverted: 0,
        failed: 0,
    };

    for log in &due_entries {
        match execute_revert(persistence, log) {
            Ok(outcome) => {
                report.reverted += 1;
                let message: String = format!(
                    "Temporary merge {} ended: {} task(s) returned to user {}, {} skipped",
                    log.merge_log_id,
                    outcome.reverted_task_ids.len(),
                    log.source_user_id,
                    outcome.skipped.len()
                );
                if let Err(e) = persistence.notify_operator(log.performed_by, &message) {
                    warn!(
                        merge_log_id = log.merge_log_id,
                        error = %e,
                        "Failed to notify merge admin; continuing"
                    );
                }
            }
            Err(e) => {
                report.failed += 1;
                error!(
                    merge_log_id = log.merge_log_id,
                    error = %e,
                    "Scheduled revert failed for entry; continuing with batch"
                );
            }
        }
    }

    if report.due > 0 {
        info!(
            due = report.due,
            reverted = report.reverted,
            failed = report.failed,
            "Revert sweep finished"
        );
    }

    Ok(report)
}

/// Runs the pending-task reminder sweep.
///
/// Every task with a pending assignee gets at most one reminder per
/// hour, tracked via the task's `last_reminded_at`; invoking the sweep
/// repeatedly inside the window sends nothing.
///
/// # Errors
///
/// Returns an error only if the pending-task query itself fails.
pub fn run_reminder_sweep(persistence: &mut Persistence) -> Result<ReminderSweepReport, ApiError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let now_str: String = render_timestamp(now).map_err(translate_domain_error)?;

    let pending: Vec<TaskData> = persistence
        .tasks_with_pending_assignee()
        .map_err(translate_persistence_error)?;

    let mut report: ReminderSweepReport = ReminderSweepReport {
        sent: 0,
        suppressed: 0,
    };

    for task in &pending {
        let Some(pending_user_id) = task.pending_assignee_user_id else {
            continue;
        };

        let last_reminded = match task.last_reminded_at.as_deref() {
            None => None,
            Some(value) => match dealroom_domain::parse_timestamp(value) {
                Ok(ts) => Some(ts),
                Err(e) => {
                    warn!(task_id = task.task_id, error = %e, "Unparseable reminder timestamp; treating as never reminded");
                    None
                }
            },
        };

        if !reminder_due(last_reminded, now) {
            report.suppressed += 1;
            continue;
        }

        let message: String = format!(
            "Task '{}' is still awaiting your acceptance",
            task.title
        );
        if let Err(e) = persistence.notify_user(pending_user_id, &message) {
            warn!(task_id = task.task_id, error = %e, "Failed to write reminder; continuing");
            continue;
        }
        persistence
            .set_task_last_reminded(task.task_id, &now_str)
            .map_err(translate_persistence_error)?;
        report.sent += 1;
    }

    Ok(report)
}

/// Lists an organization's merge log entries, newest first.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the query fails.
pub fn list_merge_logs(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    organization_id: i64,
) -> Result<ListMergeLogsResponse, ApiError> {
    AuthorizationService::authorize_perform_merge(actor)?;

    let logs: Vec<MergeLogData> = persistence
        .list_merge_logs(organization_id)
        .map_err(translate_persistence_error)?;

    let merge_logs: Vec<MergeLogInfo> = logs
        .into_iter()
        .map(|log| {
            let tasks: Vec<TaskSnapshotInfo> = log
                .task_snapshots()
                .unwrap_or_default()
                .into_iter()
                .map(|s| TaskSnapshotInfo {
                    task_id: s.task_id,
                    title: s.title,
                    project: s.project,
                    due_date: s.due_date,
                    priority: s.priority,
                })
                .collect();
            MergeLogInfo {
                merge_log_id: log.merge_log_id,
                source_user_id: log.source_user_id,
                target_user_id: log.target_user_id,
                merge_type: log.merge_type,
                temporary_end_date: log.temporary_end_date,
                status: log.status,
                created_at: log.created_at,
                completed_at: log.completed_at,
                reverted_at: log.reverted_at,
                tasks,
            }
        })
        .collect();

    Ok(ListMergeLogsResponse { merge_logs })
}

/// Lists the calling operator's notifications, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_notifications(
    persistence: &mut Persistence,
    operator: &OperatorData,
) -> Result<ListNotificationsResponse, ApiError> {
    let rows = persistence
        .list_operator_notifications(operator.operator_id)
        .map_err(translate_persistence_error)?;

    Ok(ListNotificationsResponse {
        notifications: rows
            .into_iter()
            .map(|n| NotificationInfo {
                notification_id: n.notification_id,
                message: n.message,
                created_at: n.created_at,
            })
            .collect(),
    })
}
