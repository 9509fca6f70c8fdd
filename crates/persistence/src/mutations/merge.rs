// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Merge log mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use dealroom::TaskSnapshot;
use dealroom_domain::MergeStatus;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::merge_logs;
use crate::error::PersistenceError;

/// Creates a merge log entry with the task snapshot captured at merge
/// time.
///
/// The snapshot is historical and never refreshed afterwards, even if
/// the tasks change. `completed_at` is stamped immediately for
/// permanent merges (they are created in their terminal status).
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
#[allow(clippy::too_many_arguments)]
pub fn insert_merge_log(
    conn: &mut SqliteConnection,
    organization_id: i64,
    performed_by: i64,
    source_user_id: i64,
    target_user_id: i64,
    merge_type: &str,
    temporary_end_date: Option<&str>,
    snapshots: &[TaskSnapshot],
    status: MergeStatus,
) -> Result<i64, PersistenceError> {
    let task_snapshot_json: String = serde_json::to_string(snapshots)?;
    let now: String = super::now_timestamp()?;
    let completed_at: Option<String> = match status {
        MergeStatus::Completed => Some(now.clone()),
        MergeStatus::PendingRevert | MergeStatus::Reverted => None,
    };

    info!(
        source_user_id,
        target_user_id,
        merge_type,
        tasks = snapshots.len(),
        "Creating merge log entry"
    );

    diesel::insert_into(merge_logs::table)
        .values((
            merge_logs::organization_id.eq(organization_id),
            merge_logs::performed_by.eq(performed_by),
            merge_logs::source_user_id.eq(source_user_id),
            merge_logs::target_user_id.eq(target_user_id),
            merge_logs::merge_type.eq(merge_type),
            merge_logs::temporary_end_date.eq(temporary_end_date),
            merge_logs::task_snapshot_json.eq(&task_snapshot_json),
            merge_logs::status.eq(status.as_str()),
            merge_logs::created_at.eq(&now),
            merge_logs::completed_at.eq(completed_at),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Marks a merge log entry as reverted.
///
/// # Errors
///
/// Returns an error if the entry does not exist or the update fails.
pub fn mark_merge_reverted(
    conn: &mut SqliteConnection,
    merge_log_id: i64,
) -> Result<(), PersistenceError> {
    info!(merge_log_id, "Marking merge log entry as reverted");

    let reverted_at: String = super::now_timestamp()?;
    let rows_affected: usize = diesel::update(merge_logs::table)
        .filter(merge_logs::merge_log_id.eq(merge_log_id))
        .set((
            merge_logs::status.eq(MergeStatus::Reverted.as_str()),
            merge_logs::reverted_at.eq(Some(reverted_at)),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::MergeLogNotFound(merge_log_id));
    }

    Ok(())
}
