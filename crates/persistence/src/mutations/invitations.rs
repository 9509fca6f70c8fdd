// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Guest invitation mutations.
//!
//! Invitations are never hard-deleted. Revocation and acceptance are
//! status changes; re-inviting the same email creates a fresh row and the
//! lookup side picks the latest-expiring match.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::invitations;
use crate::error::PersistenceError;

/// Creates a new guest invitation in `pending` status.
///
/// The caller is responsible for normalizing the email to lowercase and
/// for computing the access password hash; this function stores both
/// verbatim.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `data_room_id` - The room the guest is invited to
/// * `organization_id` - The owning organization
/// * `email` - The normalized (lowercase) guest email
/// * `guest_name` - Optional display name
/// * `access_password_hash` - The SHA-256 access hash
/// * `expires_at` - The expiry timestamp (RFC 3339)
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_invitation(
    conn: &mut SqliteConnection,
    data_room_id: i64,
    organization_id: i64,
    email: &str,
    guest_name: Option<&str>,
    access_password_hash: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    info!(data_room_id, "Creating invitation for {}", email);

    let created_at: String = super::now_timestamp()?;
    diesel::insert_into(invitations::table)
        .values((
            invitations::data_room_id.eq(data_room_id),
            invitations::organization_id.eq(organization_id),
            invitations::email.eq(email),
            invitations::guest_name.eq(guest_name),
            invitations::access_password_hash.eq(access_password_hash),
            invitations::status.eq("pending"),
            invitations::expires_at.eq(expires_at),
            invitations::created_at.eq(&created_at),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Sets an invitation's status.
///
/// Used both for the first-touch `pending` → `accepted` promotion and
/// for revocation.
///
/// # Errors
///
/// Returns an error if the invitation does not exist or the update
/// fails.
pub fn set_invitation_status(
    conn: &mut SqliteConnection,
    invitation_id: i64,
    status: &str,
) -> Result<(), PersistenceError> {
    debug!(invitation_id, "Setting invitation status to {}", status);

    let rows_affected: usize = diesel::update(invitations::table)
        .filter(invitations::invitation_id.eq(invitation_id))
        .set(invitations::status.eq(status))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::InvitationNotFound(invitation_id));
    }

    Ok(())
}

/// Records the NDA signature timestamp for an invitation.
///
/// # Errors
///
/// Returns an error if the invitation does not exist or the update
/// fails.
pub fn set_nda_signed(
    conn: &mut SqliteConnection,
    invitation_id: i64,
    signed_at: &str,
) -> Result<(), PersistenceError> {
    info!(invitation_id, "Recording NDA signature");

    let rows_affected: usize = diesel::update(invitations::table)
        .filter(invitations::invitation_id.eq(invitation_id))
        .set(invitations::nda_signed_at.eq(Some(signed_at)))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::InvitationNotFound(invitation_id));
    }

    Ok(())
}
