// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use dealroom_audit::{ActivityDetails, ActivityEvent};

use crate::tests::helpers::{seed_room, test_persistence};
use crate::{ActivityEventData, Persistence};

fn guest_event(room_id: i64, org_id: i64, details: ActivityDetails) -> ActivityEvent {
    ActivityEvent::new(
        room_id,
        org_id,
        String::from("Alice Guest"),
        String::from("alice@example.com"),
        true,
        details,
    )
}

#[test]
fn test_events_round_trip_through_json() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);

    let details: ActivityDetails = ActivityDetails::Comment {
        file_name: String::from("report.pdf"),
        comment: String::from("Page 3 needs a signature"),
    };
    persistence
        .insert_activity_event(&guest_event(
            room.data_room_id,
            room.organization_id,
            details.clone(),
        ))
        .unwrap();

    let events: Vec<ActivityEventData> = persistence
        .list_activity_for_room(room.data_room_id)
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, "comment");
    assert!(events[0].is_guest);

    let parsed: ActivityDetails = serde_json::from_str(&events[0].details_json).unwrap();
    assert_eq!(parsed, details);
}

#[test]
fn test_feed_is_newest_first() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);

    for n in 0..3 {
        persistence
            .insert_activity_event(&guest_event(
                room.data_room_id,
                room.organization_id,
                ActivityDetails::FileView {
                    file_name: format!("file-{n}.pdf"),
                },
            ))
            .unwrap();
    }

    let events: Vec<ActivityEventData> = persistence
        .list_activity_for_room(room.data_room_id)
        .unwrap();

    let ids: Vec<i64> = events.iter().map(|e| e.event_id).collect();
    let mut sorted: Vec<i64> = ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted);
}

#[test]
fn test_feed_is_scoped_to_the_room() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let other_room_id: i64 = persistence
        .create_data_room(room.organization_id, "Other room")
        .unwrap();

    persistence
        .insert_activity_event(&guest_event(
            room.data_room_id,
            room.organization_id,
            ActivityDetails::GuestMessage {
                message: String::from("hello"),
            },
        ))
        .unwrap();

    assert_eq!(
        persistence.list_activity_for_room(other_room_id).unwrap().len(),
        0
    );
    assert_eq!(
        persistence
            .list_activity_for_room(room.data_room_id)
            .unwrap()
            .len(),
        1
    );
}
