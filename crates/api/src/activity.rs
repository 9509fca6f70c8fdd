// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Activity recording and the admin activity feed.

use tracing::{debug, warn};

use dealroom_audit::{ActivityDetails, ActivityEvent};
use dealroom_persistence::{ActivityEventData, Persistence};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{translate_persistence_error, ApiError};
use crate::request_response::{ActivityEventInfo, ActivityFeedResponse};

/// Appends an activity event, swallowing failures.
///
/// By the time logging runs, the primary mutation it describes has
/// already succeeded; a logging failure must not abort it. Failures are
/// traced at `warn` for operators and otherwise dropped.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `event` - The event to append
pub fn record_activity(persistence: &mut Persistence, event: &ActivityEvent) {
    match persistence.insert_activity_event(event) {
        Ok(event_id) => {
            debug!(event_id, action = %event.action(), "Activity recorded");
        }
        Err(e) => {
            warn!(
                action = %event.action(),
                data_room_id = event.data_room_id,
                error = %e,
                "Failed to record activity event; continuing"
            );
        }
    }
}

/// Appends an activity event that IS the primary operation.
///
/// Guest messages have no other persistent effect, so here a failure
/// does propagate.
///
/// # Errors
///
/// Returns an error if the event cannot be appended.
pub fn record_activity_strict(
    persistence: &mut Persistence,
    event: &ActivityEvent,
) -> Result<i64, ApiError> {
    persistence
        .insert_activity_event(event)
        .map_err(translate_persistence_error)
}

/// Returns a room's activity feed, newest first (operator-facing).
///
/// Rows whose stored details no longer parse are skipped with a warning
/// rather than failing the whole feed.
///
/// # Errors
///
/// Returns an error if the room does not exist or the query fails.
pub fn list_activity(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    data_room_id: i64,
) -> Result<ActivityFeedResponse, ApiError> {
    AuthorizationService::authorize_view_activity(actor)?;

    // Reject unknown rooms with a 404 rather than an empty feed.
    persistence
        .get_data_room(data_room_id)
        .map_err(translate_persistence_error)?;

    let rows: Vec<ActivityEventData> = persistence
        .list_activity_for_room(data_room_id)
        .map_err(translate_persistence_error)?;

    let events: Vec<ActivityEventInfo> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_str::<ActivityDetails>(&row.details_json) {
            Ok(details) => Some(ActivityEventInfo {
                event_id: row.event_id,
                actor_name: row.actor_name,
                actor_email: row.actor_email,
                is_guest: row.is_guest,
                action: row.action,
                details,
                created_at: row.created_at,
            }),
            Err(e) => {
                warn!(
                    event_id = row.event_id,
                    error = %e,
                    "Skipping activity event with unparseable details"
                );
                None
            }
        })
        .collect();

    Ok(ActivityFeedResponse {
        data_room_id,
        events,
    })
}
