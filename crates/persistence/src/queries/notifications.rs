// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification queries.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::NotificationData;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

/// Diesel Queryable struct for notification rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = notifications)]
struct NotificationRow {
    notification_id: i64,
    operator_id: Option<i64>,
    user_id: Option<i64>,
    message: String,
    created_at: String,
}

impl From<NotificationRow> for NotificationData {
    fn from(row: NotificationRow) -> Self {
        Self {
            notification_id: row.notification_id,
            operator_id: row.operator_id,
            user_id: row.user_id,
            message: row.message,
            created_at: row.created_at,
        }
    }
}

/// Lists notifications addressed to an operator, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_operator_notifications(
    conn: &mut SqliteConnection,
    operator_id: i64,
) -> Result<Vec<NotificationData>, PersistenceError> {
    let rows: Vec<NotificationRow> = notifications::table
        .filter(notifications::operator_id.eq(operator_id))
        .select(NotificationRow::as_select())
        .order_by(notifications::notification_id.desc())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Lists notifications addressed to an organization member, newest
/// first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_user_notifications(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<NotificationData>, PersistenceError> {
    let rows: Vec<NotificationRow> = notifications::table
        .filter(notifications::user_id.eq(user_id))
        .select(NotificationRow::as_select())
        .order_by(notifications::notification_id.desc())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}
