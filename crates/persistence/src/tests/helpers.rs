// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test fixtures shared across the persistence suite.

use time::{Duration, OffsetDateTime};

use dealroom_domain::{access_hash, render_timestamp};

use crate::data_models::NewFile;
use crate::Persistence;

pub fn test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// Renders `now + hours` as a storage timestamp.
pub fn timestamp_in_hours(hours: i64) -> String {
    render_timestamp(OffsetDateTime::now_utc() + Duration::hours(hours))
        .expect("Failed to render timestamp")
}

pub struct RoomFixture {
    pub organization_id: i64,
    pub data_room_id: i64,
}

pub fn seed_room(persistence: &mut Persistence) -> RoomFixture {
    let organization_id: i64 = persistence
        .create_organization("Acme Holdings")
        .expect("Failed to create organization");
    let data_room_id: i64 = persistence
        .create_data_room(organization_id, "Series B diligence")
        .expect("Failed to create data room");

    RoomFixture {
        organization_id,
        data_room_id,
    }
}

pub fn seed_invitation(
    persistence: &mut Persistence,
    room: &RoomFixture,
    email: &str,
    password: &str,
    expires_in_hours: i64,
) -> i64 {
    persistence
        .create_invitation(
            room.data_room_id,
            room.organization_id,
            email,
            Some("Alice Guest"),
            &access_hash(password),
            &timestamp_in_hours(expires_in_hours),
        )
        .expect("Failed to create invitation")
}

pub fn new_file(room: &RoomFixture, name: &str, restricted: bool) -> NewFile {
    NewFile {
        data_room_id: room.data_room_id,
        organization_id: room.organization_id,
        name: name.to_string(),
        storage_path: format!("rooms/{}/{}", room.data_room_id, name),
        size_bytes: 2048,
        mime_type: String::from("application/pdf"),
        is_restricted: restricted,
        parent_file_id: None,
        version: 1,
        status: String::from("not_opened"),
        uploaded_by: String::from("alice@example.com"),
    }
}

/// Inserts a root file plus `extra_versions` descendants and returns
/// (root id, all ids in version order).
pub fn seed_chain(
    persistence: &mut Persistence,
    room: &RoomFixture,
    name: &str,
    extra_versions: i32,
) -> (i64, Vec<i64>) {
    let root: NewFile = new_file(room, name, false);
    let root_id: i64 = persistence.insert_file(&root).expect("Failed to insert root");

    let mut ids: Vec<i64> = vec![root_id];
    for version in 2..=(extra_versions + 1) {
        let clone: NewFile = NewFile {
            parent_file_id: Some(root_id),
            version,
            ..new_file(room, name, false)
        };
        ids.push(
            persistence
                .insert_file(&clone)
                .expect("Failed to insert version"),
        );
    }

    (root_id, ids)
}

pub struct MergeFixture {
    pub organization_id: i64,
    pub operator_id: i64,
    pub source_user_id: i64,
    pub target_user_id: i64,
    pub task_ids: Vec<i64>,
}

pub fn seed_merge_users(persistence: &mut Persistence, task_count: usize) -> MergeFixture {
    let organization_id: i64 = persistence
        .create_organization("Acme Holdings")
        .expect("Failed to create organization");
    let operator_id: i64 = persistence
        .create_operator("admin", "Admin", "Adm1n-Passw0rd!", "Admin")
        .expect("Failed to create operator");
    let source_user_id: i64 = persistence
        .create_user(organization_id, "Sam Source", "sam@acme.test")
        .expect("Failed to create source user");
    let target_user_id: i64 = persistence
        .create_user(organization_id, "Tara Target", "tara@acme.test")
        .expect("Failed to create target user");

    let mut task_ids: Vec<i64> = Vec::new();
    for n in 0..task_count {
        task_ids.push(
            persistence
                .create_task(
                    organization_id,
                    &format!("Task {n}"),
                    Some("Q3 close"),
                    Some("2026-09-30"),
                    Some("high"),
                    Some(source_user_id),
                    None,
                )
                .expect("Failed to create task"),
        );
    }

    MergeFixture {
        organization_id,
        operator_id,
        source_user_id,
        target_user_id,
        task_ids,
    }
}
