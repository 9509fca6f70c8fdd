// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Organization and data room queries.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::{DataRoomData, OrganizationData};
use crate::diesel_schema::{data_rooms, organizations};
use crate::error::PersistenceError;

/// Retrieves an organization by ID.
///
/// # Errors
///
/// Returns an error if the organization does not exist or the query
/// fails.
pub fn get_organization(
    conn: &mut SqliteConnection,
    organization_id: i64,
) -> Result<OrganizationData, PersistenceError> {
    let row: Result<(i64, String, String), diesel::result::Error> = organizations::table
        .filter(organizations::organization_id.eq(organization_id))
        .select((
            organizations::organization_id,
            organizations::name,
            organizations::created_at,
        ))
        .first(conn);

    match row {
        Ok((organization_id, name, created_at)) => Ok(OrganizationData {
            organization_id,
            name,
            created_at,
        }),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::NotFound(format!(
            "Organization {organization_id} not found"
        ))),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a data room by ID.
///
/// # Errors
///
/// Returns an error if the room does not exist or the query fails.
pub fn get_data_room(
    conn: &mut SqliteConnection,
    data_room_id: i64,
) -> Result<DataRoomData, PersistenceError> {
    let row: Result<(i64, i64, String, String), diesel::result::Error> = data_rooms::table
        .filter(data_rooms::data_room_id.eq(data_room_id))
        .select((
            data_rooms::data_room_id,
            data_rooms::organization_id,
            data_rooms::name,
            data_rooms::created_at,
        ))
        .first(conn);

    match row {
        Ok((data_room_id, organization_id, name, created_at)) => Ok(DataRoomData {
            data_room_id,
            organization_id,
            name,
            created_at,
        }),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::NotFound(format!(
            "Data room {data_room_id} not found"
        ))),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
