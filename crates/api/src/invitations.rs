// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin invitation management.

use time::OffsetDateTime;
use tracing::info;

use dealroom_domain::{access_hash, EmailAddress, InvitationStatus};
use dealroom_persistence::{DataRoomData, Persistence};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{translate_domain_error, translate_persistence_error, ApiError};
use crate::request_response::{
    AckResponse, CreateInvitationRequest, CreateInvitationResponse, InvitationInfo,
    ListInvitationsResponse, RevokeInvitationRequest,
};

/// Invites a guest to a data room.
///
/// The access password is hashed with the case-insensitive SHA-256
/// scheme before storage; the plain text is handed to the guest out of
/// band and never persisted. Re-inviting an email creates a fresh row;
/// lookups prefer the latest-expiring one.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the email or expiry
/// is invalid, the expiry is already in the past, or the room is
/// absent.
pub fn create_invitation(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateInvitationRequest,
) -> Result<CreateInvitationResponse, ApiError> {
    AuthorizationService::authorize_invite_guest(actor)?;

    let email: EmailAddress =
        EmailAddress::parse(&request.email).map_err(translate_domain_error)?;
    let expires_at: OffsetDateTime =
        dealroom_domain::parse_timestamp(&request.expires_at).map_err(translate_domain_error)?;
    if expires_at <= OffsetDateTime::now_utc() {
        return Err(ApiError::InvalidInput {
            field: String::from("expires_at"),
            message: String::from("Expiry must be in the future"),
        });
    }
    if request.password.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("password"),
            message: String::from("Access password must not be empty"),
        });
    }

    let room: DataRoomData = persistence
        .get_data_room(request.data_room_id)
        .map_err(translate_persistence_error)?;

    let invitation_id: i64 = persistence
        .create_invitation(
            room.data_room_id,
            room.organization_id,
            email.value(),
            request.guest_name.as_deref(),
            &access_hash(&request.password),
            &request.expires_at,
        )
        .map_err(translate_persistence_error)?;

    info!(
        invitation_id,
        data_room_id = room.data_room_id,
        "Guest invited: {}",
        email
    );

    Ok(CreateInvitationResponse {
        invitation_id,
        email: email.value().to_string(),
        expires_at: request.expires_at.clone(),
    })
}

/// Lists a room's invitations, newest first (admin).
///
/// The stored access hash stays server-side; the listing carries status
/// and expiry only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the room is absent,
/// or the query fails.
pub fn list_invitations(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    data_room_id: i64,
) -> Result<ListInvitationsResponse, ApiError> {
    AuthorizationService::authorize_invite_guest(actor)?;

    persistence
        .get_data_room(data_room_id)
        .map_err(translate_persistence_error)?;

    let invitations: Vec<InvitationInfo> = persistence
        .list_invitations_for_room(data_room_id)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|i| InvitationInfo {
            invitation_id: i.invitation_id,
            email: i.email,
            guest_name: i.guest_name,
            status: i.status,
            expires_at: i.expires_at,
            nda_signed_at: i.nda_signed_at,
            created_at: i.created_at,
        })
        .collect();

    Ok(ListInvitationsResponse {
        data_room_id,
        invitations,
    })
}

/// Revokes an invitation.
///
/// The row is never deleted; its status moves to `revoked` and lookups
/// stop considering it.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the invitation is
/// absent.
pub fn revoke_invitation(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &RevokeInvitationRequest,
) -> Result<AckResponse, ApiError> {
    AuthorizationService::authorize_invite_guest(actor)?;

    persistence
        .set_invitation_status(request.invitation_id, InvitationStatus::Revoked.as_str())
        .map_err(translate_persistence_error)?;

    Ok(AckResponse {
        message: format!("Invitation {} revoked", request.invitation_id),
    })
}
