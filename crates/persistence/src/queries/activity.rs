// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Activity event queries.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::ActivityEventData;
use crate::diesel_schema::activity_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for activity event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = activity_events)]
struct ActivityEventRow {
    event_id: i64,
    data_room_id: i64,
    organization_id: i64,
    actor_name: String,
    actor_email: String,
    is_guest: i32,
    action: String,
    details_json: String,
    created_at: String,
}

/// Lists a room's activity feed, newest first.
///
/// Events share timestamps when written in the same second, so the row
/// id breaks ties to keep the feed order stable.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_activity_for_room(
    conn: &mut SqliteConnection,
    data_room_id: i64,
) -> Result<Vec<ActivityEventData>, PersistenceError> {
    let rows: Vec<ActivityEventRow> = activity_events::table
        .filter(activity_events::data_room_id.eq(data_room_id))
        .select(ActivityEventRow::as_select())
        .order_by((
            activity_events::created_at.desc(),
            activity_events::event_id.desc(),
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| ActivityEventData {
            event_id: row.event_id,
            data_room_id: row.data_room_id,
            organization_id: row.organization_id,
            actor_name: row.actor_name,
            actor_email: row.actor_email,
            is_guest: row.is_guest != 0,
            action: row.action,
            details_json: row.details_json,
            created_at: row.created_at,
        })
        .collect())
}
