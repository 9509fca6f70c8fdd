// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Guest credential verification.
//!
//! Guests are anonymous external parties authenticated per request by
//! email+password against a stored invitation. Verification is a
//! predicate plus a data fetch; its only side effect is the first-touch
//! promotion of a `pending` invitation to `accepted`.

use time::OffsetDateTime;

use dealroom_audit::{ActivityDetails, ActivityEvent};
use dealroom_domain::{
    EmailAddress, InvitationStatus, access_expired, render_timestamp, verify_access_password,
};
use dealroom_persistence::{InvitationData, Persistence};

use crate::activity::record_activity;
use crate::error::{translate_domain_error, ApiError};
use crate::request_response::{SignNdaRequest, SignNdaResponse, VerifyGuestRequest,
    VerifyGuestResponse};

/// Guest access service.
pub struct GuestAccess;

impl GuestAccess {
    /// Verifies guest credentials and returns the matching invitation.
    ///
    /// The email is lowercased for lookup; the password is verified via
    /// the case-insensitive SHA-256 scheme. When the email was invited
    /// more than once, the latest-expiring non-revoked invitation is
    /// authoritative. Failure messages never reveal whether the email or
    /// the password was wrong beyond the fixed message set.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The guest email as supplied
    /// * `password` - The access password as supplied
    /// * `data_room_id` - Restricts the lookup to one room when given
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` when no invitation matches, the
    /// password hash differs, or the invitation has expired.
    pub fn verify(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
        data_room_id: Option<i64>,
    ) -> Result<InvitationData, ApiError> {
        let email: EmailAddress = EmailAddress::parse(email).map_err(translate_domain_error)?;

        let mut invitation: InvitationData = persistence
            .find_latest_invitation(email.value(), data_room_id)
            .map_err(|e| ApiError::Internal {
                message: format!("Invitation lookup failed: {e}"),
            })?
            .ok_or_else(|| ApiError::AuthenticationFailed {
                reason: String::from("Invalid credentials"),
            })?;

        let status: InvitationStatus = invitation
            .status
            .parse()
            .map_err(translate_domain_error)?;
        if !status.grants_access() {
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Invalid credentials"),
            });
        }

        if !verify_access_password(password, &invitation.access_password_hash) {
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Invalid password"),
            });
        }

        let expires_at: OffsetDateTime =
            dealroom_domain::parse_timestamp(&invitation.expires_at)
                .map_err(translate_domain_error)?;
        if access_expired(expires_at, OffsetDateTime::now_utc()) {
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Access expired"),
            });
        }

        // First successful access accepts the invitation.
        if status == InvitationStatus::Pending {
            persistence
                .set_invitation_status(invitation.invitation_id, InvitationStatus::Accepted.as_str())
                .map_err(|e| ApiError::Internal {
                    message: format!("Failed to accept invitation: {e}"),
                })?;
            invitation.status = InvitationStatus::Accepted.as_str().to_string();
        }

        Ok(invitation)
    }

    /// Verifies guest credentials and reports the invitation's state.
    ///
    /// # Errors
    ///
    /// Returns an error if verification fails.
    pub fn verify_guest(
        persistence: &mut Persistence,
        request: &VerifyGuestRequest,
    ) -> Result<VerifyGuestResponse, ApiError> {
        let invitation: InvitationData = Self::verify(
            persistence,
            &request.credentials.email,
            &request.credentials.password,
            request.data_room_id,
        )?;

        Ok(VerifyGuestResponse {
            invitation_id: invitation.invitation_id,
            data_room_id: invitation.data_room_id,
            organization_id: invitation.organization_id,
            email: invitation.email,
            guest_name: invitation.guest_name,
            nda_signed: invitation.nda_signed_at.is_some(),
            expires_at: invitation.expires_at,
        })
    }

    /// Signs the room's NDA for a verified guest.
    ///
    /// Signing is idempotent: if the NDA was already signed, the call
    /// succeeds and reports the original signature time rather than
    /// erroring.
    ///
    /// # Errors
    ///
    /// Returns an error if verification fails or the signature cannot be
    /// recorded.
    pub fn sign_nda(
        persistence: &mut Persistence,
        request: &SignNdaRequest,
    ) -> Result<SignNdaResponse, ApiError> {
        let invitation: InvitationData = Self::verify(
            persistence,
            &request.credentials.email,
            &request.credentials.password,
            Some(request.data_room_id),
        )?;

        if let Some(signed_at) = invitation.nda_signed_at {
            return Ok(SignNdaResponse {
                already_signed: true,
                signed_at,
            });
        }

        let signed_at: String = render_timestamp(OffsetDateTime::now_utc())
            .map_err(translate_domain_error)?;
        persistence
            .set_nda_signed(invitation.invitation_id, &signed_at)
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to record NDA signature: {e}"),
            })?;

        record_activity(
            persistence,
            &ActivityEvent::new(
                invitation.data_room_id,
                invitation.organization_id,
                invitation.display_name().to_string(),
                invitation.email.clone(),
                true,
                ActivityDetails::NdaSignature {
                    guest_name: invitation.display_name().to_string(),
                },
            ),
        );

        Ok(SignNdaResponse {
            already_signed: false,
            signed_at,
        })
    }
}
