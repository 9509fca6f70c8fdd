// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

/// Inserts a notification addressed to an operator.
///
/// Written by the revert sweep when a temporary merge is automatically
/// reverted, addressed to the admin who performed the merge.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn notify_operator(
    conn: &mut SqliteConnection,
    operator_id: i64,
    message: &str,
) -> Result<i64, PersistenceError> {
    debug!(operator_id, "Inserting operator notification");

    let created_at: String = super::now_timestamp()?;
    diesel::insert_into(notifications::table)
        .values((
            notifications::operator_id.eq(Some(operator_id)),
            notifications::message.eq(message),
            notifications::created_at.eq(&created_at),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Inserts a notification addressed to an organization member.
///
/// Written by the pending-task reminder sweep.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn notify_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    message: &str,
) -> Result<i64, PersistenceError> {
    debug!(user_id, "Inserting user notification");

    let created_at: String = super::now_timestamp()?;
    diesel::insert_into(notifications::table)
        .values((
            notifications::user_id.eq(Some(user_id)),
            notifications::message.eq(message),
            notifications::created_at.eq(&created_at),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}
