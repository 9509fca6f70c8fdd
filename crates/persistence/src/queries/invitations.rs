// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Guest invitation queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::{debug, warn};

use crate::data_models::InvitationData;
use crate::diesel_schema::invitations;
use crate::error::PersistenceError;

/// Diesel Queryable struct for invitation rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = invitations)]
struct InvitationRow {
    invitation_id: i64,
    data_room_id: i64,
    organization_id: i64,
    email: String,
    guest_name: Option<String>,
    access_password_hash: String,
    status: String,
    expires_at: String,
    nda_signed_at: Option<String>,
    created_at: String,
}

impl From<InvitationRow> for InvitationData {
    fn from(row: InvitationRow) -> Self {
        Self {
            invitation_id: row.invitation_id,
            data_room_id: row.data_room_id,
            organization_id: row.organization_id,
            email: row.email,
            guest_name: row.guest_name,
            access_password_hash: row.access_password_hash,
            status: row.status,
            expires_at: row.expires_at,
            nda_signed_at: row.nda_signed_at,
            created_at: row.created_at,
        }
    }
}

/// Finds the authoritative invitation for an email.
///
/// Revoked rows are excluded. When an email was invited more than once
/// (e.g., re-invited after expiry), the row with the latest expiry wins.
/// Expiry ordering is decided on parsed timestamps, not raw strings;
/// rows with unparseable expiries are skipped with a warning.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The normalized (lowercase) guest email
/// * `data_room_id` - Restricts the lookup to one room when given
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no candidate row exists.
pub fn find_latest_invitation(
    conn: &mut SqliteConnection,
    email: &str,
    data_room_id: Option<i64>,
) -> Result<Option<InvitationData>, PersistenceError> {
    debug!(?data_room_id, "Looking up invitation for {}", email);

    let mut query = invitations::table
        .filter(invitations::email.eq(email))
        .filter(invitations::status.ne("revoked"))
        .select(InvitationRow::as_select())
        .into_boxed();

    if let Some(room_id) = data_room_id {
        query = query.filter(invitations::data_room_id.eq(room_id));
    }

    let rows: Vec<InvitationRow> = query.load(conn)?;

    let latest: Option<InvitationData> = rows
        .into_iter()
        .map(InvitationData::from)
        .filter_map(|invitation| {
            match dealroom_domain::parse_timestamp(&invitation.expires_at) {
                Ok(expiry) => Some((expiry, invitation)),
                Err(e) => {
                    warn!(
                        invitation_id = invitation.invitation_id,
                        error = %e,
                        "Invitation has unparseable expiry; skipping"
                    );
                    None
                }
            }
        })
        .max_by_key(|(expiry, _)| *expiry)
        .map(|(_, invitation)| invitation);

    Ok(latest)
}

/// Retrieves an invitation by ID.
///
/// # Errors
///
/// Returns an error if the invitation does not exist or the query fails.
pub fn get_invitation(
    conn: &mut SqliteConnection,
    invitation_id: i64,
) -> Result<InvitationData, PersistenceError> {
    let result: Result<InvitationRow, diesel::result::Error> = invitations::table
        .filter(invitations::invitation_id.eq(invitation_id))
        .select(InvitationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(row.into()),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::InvitationNotFound(invitation_id))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists all invitations for a data room, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_invitations_for_room(
    conn: &mut SqliteConnection,
    data_room_id: i64,
) -> Result<Vec<InvitationData>, PersistenceError> {
    let rows: Vec<InvitationRow> = invitations::table
        .filter(invitations::data_room_id.eq(data_room_id))
        .select(InvitationRow::as_select())
        .order_by(invitations::invitation_id.desc())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}
