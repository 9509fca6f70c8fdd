// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test fixtures for the API suite.

use time::{Duration, OffsetDateTime};

use dealroom_domain::render_timestamp;
use dealroom_persistence::{OperatorData, Persistence};

use crate::auth::{AuthenticatedActor, Role};
use crate::request_response::{
    CreateInvitationRequest, GuestCredentials, UploadFileRequest,
};
use crate::{create_invitation, upload_file};

pub const GUEST_EMAIL: &str = "alice@example.com";
pub const GUEST_PASSWORD: &str = "Secret1";

pub fn test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn timestamp_in_hours(hours: i64) -> String {
    render_timestamp(OffsetDateTime::now_utc() + Duration::hours(hours))
        .expect("Failed to render timestamp")
}

/// Seeds an admin operator and returns (actor, operator row).
pub fn seed_admin(persistence: &mut Persistence) -> (AuthenticatedActor, OperatorData) {
    let operator_id: i64 = persistence
        .create_operator("admin", "Admin One", "Adm1n-Passw0rd!", "Admin")
        .expect("Failed to create admin");
    let operator: OperatorData = persistence
        .get_operator_by_id(operator_id)
        .expect("Failed to load admin")
        .expect("Admin missing");

    (
        AuthenticatedActor::new(operator.login_name.clone(), Role::Admin),
        operator,
    )
}

pub fn member_actor() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("MEMBER"), Role::Member)
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

pub fn guest_credentials() -> GuestCredentials {
    GuestCredentials {
        email: String::from(GUEST_EMAIL),
        password: String::from(GUEST_PASSWORD),
    }
}

/// Invites the default guest through the admin API (exercising the
/// hashing path) and returns the invitation id.
pub fn invite_guest(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    room: &RoomFixture,
    expires_in_hours: i64,
) -> i64 {
    create_invitation(
        persistence,
        actor,
        &CreateInvitationRequest {
            data_room_id: room.data_room_id,
            email: String::from(GUEST_EMAIL),
            guest_name: Some(String::from("Alice Guest")),
            password: String::from(GUEST_PASSWORD),
            expires_at: timestamp_in_hours(expires_in_hours),
        },
    )
    .expect("Failed to invite guest")
    .invitation_id
}

/// Uploads a file as the default guest and returns its id.
pub fn upload_guest_file(persistence: &mut Persistence, room: &RoomFixture, name: &str) -> i64 {
    upload_file(
        persistence,
        &UploadFileRequest {
            credentials: guest_credentials(),
            data_room_id: room.data_room_id,
            name: name.to_string(),
            size_bytes: 2048,
            mime_type: String::from("application/pdf"),
        },
    )
    .expect("Failed to upload file")
    .file_id
}
