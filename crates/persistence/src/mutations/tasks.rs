// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Task assignment mutations used by the merge/revert engine.
//!
//! The per-task delete/insert/update sequences run inside a single
//! Diesel transaction so concurrent merges and reverts touching the same
//! task cannot observe a half-applied transfer.

use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::diesel_schema::{task_assignments, tasks};
use crate::error::PersistenceError;

fn assignment_row_exists(
    conn: &mut SqliteConnection,
    task_id: i64,
    user_id: i64,
) -> Result<bool, PersistenceError> {
    Ok(select(exists(
        task_assignments::table
            .filter(task_assignments::task_id.eq(task_id))
            .filter(task_assignments::user_id.eq(user_id)),
    ))
    .get_result(conn)?)
}

/// Transfers one task's assignment to the merge target.
///
/// Within a single transaction: drops the target's existing assignment
/// row if present, inserts a fresh one, sets the task's primary assignee
/// to the target, and clears pending-assignment bookkeeping.
///
/// # Errors
///
/// Returns an error if the task does not exist or any step fails; a
/// failed step rolls back the whole transfer.
pub fn apply_task_transfer(
    conn: &mut SqliteConnection,
    task_id: i64,
    target_user_id: i64,
) -> Result<(), PersistenceError> {
    debug!(task_id, target_user_id, "Transferring task assignment");

    let created_at: String = super::now_timestamp()?;
    conn.transaction::<(), PersistenceError, _>(|conn| {
        diesel::delete(task_assignments::table)
            .filter(task_assignments::task_id.eq(task_id))
            .filter(task_assignments::user_id.eq(target_user_id))
            .execute(conn)?;

        diesel::insert_into(task_assignments::table)
            .values((
                task_assignments::task_id.eq(task_id),
                task_assignments::user_id.eq(target_user_id),
                task_assignments::created_at.eq(&created_at),
            ))
            .execute(conn)?;

        let rows_affected: usize = diesel::update(tasks::table)
            .filter(tasks::task_id.eq(task_id))
            .set((
                tasks::assignee_user_id.eq(Some(target_user_id)),
                tasks::pending_assignee_user_id.eq(None::<i64>),
            ))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::TaskNotFound(task_id));
        }

        Ok(())
    })
}

/// Restores one task's assignment to the merge source.
///
/// This is the privileged reassignment used only by the revert path:
/// it writes another user's assignment rows, which no generic request
/// handler is allowed to do. Within a single transaction: deletes the
/// target's assignment row, inserts a source assignment only if one does
/// not already exist (the table has a unique `(task, user)` constraint),
/// and points the task's primary assignee back at the source.
///
/// # Errors
///
/// Returns an error if the task does not exist or any step fails; a
/// failed step rolls back the whole restore.
pub fn apply_task_restore(
    conn: &mut SqliteConnection,
    task_id: i64,
    source_user_id: i64,
    target_user_id: i64,
) -> Result<(), PersistenceError> {
    debug!(task_id, source_user_id, "Restoring task assignment");

    let created_at: String = super::now_timestamp()?;
    conn.transaction::<(), PersistenceError, _>(|conn| {
        diesel::delete(task_assignments::table)
            .filter(task_assignments::task_id.eq(task_id))
            .filter(task_assignments::user_id.eq(target_user_id))
            .execute(conn)?;

        if !assignment_row_exists(conn, task_id, source_user_id)? {
            diesel::insert_into(task_assignments::table)
                .values((
                    task_assignments::task_id.eq(task_id),
                    task_assignments::user_id.eq(source_user_id),
                    task_assignments::created_at.eq(&created_at),
                ))
                .execute(conn)?;
        }

        let rows_affected: usize = diesel::update(tasks::table)
            .filter(tasks::task_id.eq(task_id))
            .set(tasks::assignee_user_id.eq(Some(source_user_id)))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::TaskNotFound(task_id));
        }

        Ok(())
    })
}

/// Records when a pending-assignment reminder was last sent for a task.
///
/// # Errors
///
/// Returns an error if the task does not exist or the update fails.
pub fn set_task_last_reminded(
    conn: &mut SqliteConnection,
    task_id: i64,
    reminded_at: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(tasks::table)
        .filter(tasks::task_id.eq(task_id))
        .set(tasks::last_reminded_at.eq(Some(reminded_at)))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::TaskNotFound(task_id));
    }

    Ok(())
}
