// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! File, content, and permission grant mutations.
//!
//! Version history is append-only: new rows are inserted, existing rows
//! are never overwritten, and deletion is a soft-delete timestamp.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewFile;
use crate::diesel_schema::{file_contents, files, permission_grants};
use crate::error::PersistenceError;

/// Inserts a new file row.
///
/// Used for both fresh uploads (version 1, no parent) and version
/// restores (clone with the parent forced to the chain root).
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_file(conn: &mut SqliteConnection, file: &NewFile) -> Result<i64, PersistenceError> {
    info!(
        data_room_id = file.data_room_id,
        version = file.version,
        "Inserting file '{}'",
        file.name
    );

    let created_at: String = super::now_timestamp()?;
    diesel::insert_into(files::table)
        .values((
            files::data_room_id.eq(file.data_room_id),
            files::organization_id.eq(file.organization_id),
            files::name.eq(&file.name),
            files::storage_path.eq(&file.storage_path),
            files::size_bytes.eq(file.size_bytes),
            files::mime_type.eq(&file.mime_type),
            files::is_restricted.eq(i32::from(file.is_restricted)),
            files::parent_file_id.eq(file.parent_file_id),
            files::version.eq(file.version),
            files::status.eq(&file.status),
            files::uploaded_by.eq(&file.uploaded_by),
            files::created_at.eq(&created_at),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Updates a file's review status.
///
/// # Errors
///
/// Returns an error if the file does not exist or the update fails.
pub fn update_file_status(
    conn: &mut SqliteConnection,
    file_id: i64,
    status: &str,
) -> Result<(), PersistenceError> {
    debug!(file_id, "Setting file status to {}", status);

    let rows_affected: usize = diesel::update(files::table)
        .filter(files::file_id.eq(file_id))
        .filter(files::deleted_at.is_null())
        .set(files::status.eq(status))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::FileNotFound(file_id));
    }

    Ok(())
}

/// Soft-deletes a file by stamping `deleted_at`.
///
/// The row stays in place; all queries exclude it from then on.
///
/// # Errors
///
/// Returns an error if the file does not exist or the update fails.
pub fn soft_delete_file(conn: &mut SqliteConnection, file_id: i64) -> Result<(), PersistenceError> {
    info!(file_id, "Soft-deleting file");

    let deleted_at: String = super::now_timestamp()?;
    let rows_affected: usize = diesel::update(files::table)
        .filter(files::file_id.eq(file_id))
        .filter(files::deleted_at.is_null())
        .set(files::deleted_at.eq(Some(deleted_at)))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::FileNotFound(file_id));
    }

    Ok(())
}

/// Sets a file's restriction flag.
///
/// Callers are expected to target the chain root; the flag on descendant
/// versions is ignored by permission resolution either way.
///
/// # Errors
///
/// Returns an error if the file does not exist or the update fails.
pub fn set_file_restriction(
    conn: &mut SqliteConnection,
    file_id: i64,
    restricted: bool,
) -> Result<(), PersistenceError> {
    info!(file_id, restricted, "Setting file restriction flag");

    let rows_affected: usize = diesel::update(files::table)
        .filter(files::file_id.eq(file_id))
        .filter(files::deleted_at.is_null())
        .set(files::is_restricted.eq(i32::from(restricted)))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::FileNotFound(file_id));
    }

    Ok(())
}

/// Writes the document content row for a file version.
///
/// Content rows are per-version and never shared; the first save inserts,
/// later saves to the same version update in place.
///
/// # Errors
///
/// Returns an error if the database access fails.
pub fn upsert_file_content(
    conn: &mut SqliteConnection,
    file_id: i64,
    body: &str,
) -> Result<(), PersistenceError> {
    let updated_at: String = super::now_timestamp()?;

    let rows_affected: usize = diesel::update(file_contents::table)
        .filter(file_contents::file_id.eq(file_id))
        .set((
            file_contents::body.eq(body),
            file_contents::updated_at.eq(&updated_at),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        diesel::insert_into(file_contents::table)
            .values((
                file_contents::file_id.eq(file_id),
                file_contents::body.eq(body),
                file_contents::updated_at.eq(&updated_at),
            ))
            .execute(conn)?;
    }

    Ok(())
}

/// Creates or updates an explicit permission grant.
///
/// Grants are keyed by `(file, invitation)`; re-granting replaces the
/// level rather than violating the unique constraint.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `file_id` - The chain root file id
/// * `invitation_id` - The grantee invitation
/// * `level` - The permission level (`view` or `edit`)
///
/// # Errors
///
/// Returns an error if the database access fails.
pub fn upsert_permission_grant(
    conn: &mut SqliteConnection,
    file_id: i64,
    invitation_id: i64,
    level: &str,
) -> Result<(), PersistenceError> {
    info!(file_id, invitation_id, "Granting '{}' permission", level);

    let rows_affected: usize = diesel::update(permission_grants::table)
        .filter(permission_grants::file_id.eq(file_id))
        .filter(permission_grants::invitation_id.eq(invitation_id))
        .set(permission_grants::level.eq(level))
        .execute(conn)?;

    if rows_affected == 0 {
        diesel::insert_into(permission_grants::table)
            .values((
                permission_grants::file_id.eq(file_id),
                permission_grants::invitation_id.eq(invitation_id),
                permission_grants::level.eq(level),
            ))
            .execute(conn)?;
    }

    Ok(())
}
