// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Activity event mutations.
//!
//! Activity events are append-only: there is no update or delete path.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use dealroom_audit::ActivityEvent;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::activity_events;
use crate::error::PersistenceError;

/// Appends one activity event row.
///
/// The action column is derived from the details payload so the two
/// never disagree; the payload itself is stored as tagged JSON.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn insert_activity_event(
    conn: &mut SqliteConnection,
    event: &ActivityEvent,
) -> Result<i64, PersistenceError> {
    let details_json: String = serde_json::to_string(&event.details)?;
    let created_at: String = super::now_timestamp()?;

    debug!(
        data_room_id = event.data_room_id,
        action = %event.action(),
        "Recording activity event"
    );

    diesel::insert_into(activity_events::table)
        .values((
            activity_events::data_room_id.eq(event.data_room_id),
            activity_events::organization_id.eq(event.organization_id),
            activity_events::actor_name.eq(&event.actor_name),
            activity_events::actor_email.eq(&event.actor_email),
            activity_events::is_guest.eq(i32::from(event.is_guest)),
            activity_events::action.eq(event.action().as_str()),
            activity_events::details_json.eq(&details_json),
            activity_events::created_at.eq(&created_at),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}
