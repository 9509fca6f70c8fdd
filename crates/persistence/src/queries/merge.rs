// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Merge log queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::MergeLogData;
use crate::diesel_schema::merge_logs;
use crate::error::PersistenceError;

/// Diesel Queryable struct for merge log rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = merge_logs)]
struct MergeLogRow {
    merge_log_id: i64,
    organization_id: i64,
    performed_by: i64,
    source_user_id: i64,
    target_user_id: i64,
    merge_type: String,
    temporary_end_date: Option<String>,
    task_snapshot_json: String,
    status: String,
    created_at: String,
    completed_at: Option<String>,
    reverted_at: Option<String>,
}

impl From<MergeLogRow> for MergeLogData {
    fn from(row: MergeLogRow) -> Self {
        Self {
            merge_log_id: row.merge_log_id,
            organization_id: row.organization_id,
            performed_by: row.performed_by,
            source_user_id: row.source_user_id,
            target_user_id: row.target_user_id,
            merge_type: row.merge_type,
            temporary_end_date: row.temporary_end_date,
            task_snapshot_json: row.task_snapshot_json,
            status: row.status,
            created_at: row.created_at,
            completed_at: row.completed_at,
            reverted_at: row.reverted_at,
        }
    }
}

/// Retrieves a merge log entry by ID.
///
/// # Errors
///
/// Returns `MergeLogNotFound` if the entry does not exist.
pub fn get_merge_log(
    conn: &mut SqliteConnection,
    merge_log_id: i64,
) -> Result<MergeLogData, PersistenceError> {
    let result: Result<MergeLogRow, diesel::result::Error> = merge_logs::table
        .filter(merge_logs::merge_log_id.eq(merge_log_id))
        .select(MergeLogRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(row.into()),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::MergeLogNotFound(merge_log_id))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists an organization's merge log entries, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_merge_logs(
    conn: &mut SqliteConnection,
    organization_id: i64,
) -> Result<Vec<MergeLogData>, PersistenceError> {
    let rows: Vec<MergeLogRow> = merge_logs::table
        .filter(merge_logs::organization_id.eq(organization_id))
        .select(MergeLogRow::as_select())
        .order_by(merge_logs::merge_log_id.desc())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Lists temporary merges that are due for automatic reversion.
///
/// Selects `pending_revert` temporary entries whose end date is on or
/// before the given day. End dates are stored as `YYYY-MM-DD`, so the
/// lexicographic comparison is a calendar comparison.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `today` - The current date rendered as `YYYY-MM-DD`
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn pending_reverts_due(
    conn: &mut SqliteConnection,
    today: &str,
) -> Result<Vec<MergeLogData>, PersistenceError> {
    debug!(today, "Querying merge logs due for reversion");

    let rows: Vec<MergeLogRow> = merge_logs::table
        .filter(merge_logs::merge_type.eq("temporary"))
        .filter(merge_logs::status.eq("pending_revert"))
        .filter(merge_logs::temporary_end_date.le(today))
        .select(MergeLogRow::as_select())
        .order_by(merge_logs::merge_log_id.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}
