// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! File, version chain, content, and permission grant queries.
//!
//! Soft-deleted rows are excluded everywhere: a deleted file is absent
//! from this layer's point of view.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::{FileContentData, FileData};
use crate::diesel_schema::{file_contents, files, permission_grants};
use crate::error::PersistenceError;

/// Diesel Queryable struct for file rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = files)]
struct FileRow {
    file_id: i64,
    data_room_id: i64,
    organization_id: i64,
    name: String,
    storage_path: String,
    size_bytes: i64,
    mime_type: String,
    is_restricted: i32,
    parent_file_id: Option<i64>,
    version: i32,
    status: String,
    uploaded_by: String,
    deleted_at: Option<String>,
    created_at: String,
}

impl From<FileRow> for FileData {
    fn from(row: FileRow) -> Self {
        Self {
            file_id: row.file_id,
            data_room_id: row.data_room_id,
            organization_id: row.organization_id,
            name: row.name,
            storage_path: row.storage_path,
            size_bytes: row.size_bytes,
            mime_type: row.mime_type,
            is_restricted: row.is_restricted != 0,
            parent_file_id: row.parent_file_id,
            version: row.version,
            status: row.status,
            uploaded_by: row.uploaded_by,
            deleted_at: row.deleted_at,
            created_at: row.created_at,
        }
    }
}

/// Retrieves a non-deleted file by ID.
///
/// # Errors
///
/// Returns `FileNotFound` if the file does not exist or is soft-deleted.
pub fn get_file(conn: &mut SqliteConnection, file_id: i64) -> Result<FileData, PersistenceError> {
    let result: Result<FileRow, diesel::result::Error> = files::table
        .filter(files::file_id.eq(file_id))
        .filter(files::deleted_at.is_null())
        .select(FileRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(row.into()),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::FileNotFound(file_id)),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists a version chain, newest version first.
///
/// The chain is the root row plus every row whose parent reference
/// points at the root. Soft-deleted versions are excluded.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `root_id` - The chain root's file id
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_chain(
    conn: &mut SqliteConnection,
    root_id: i64,
) -> Result<Vec<FileData>, PersistenceError> {
    debug!(root_id, "Listing version chain");

    let rows: Vec<FileRow> = files::table
        .filter(
            files::file_id
                .eq(root_id)
                .or(files::parent_file_id.eq(root_id)),
        )
        .filter(files::deleted_at.is_null())
        .select(FileRow::as_select())
        .order_by(files::version.desc())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Returns the highest version number present in a chain.
///
/// Soft-deleted versions still occupy their version numbers, so they
/// participate here: a restore must never reuse a number.
///
/// # Errors
///
/// Returns an error if the chain has no rows at all or the query fails.
pub fn max_version_in_chain(
    conn: &mut SqliteConnection,
    root_id: i64,
) -> Result<i32, PersistenceError> {
    use diesel::dsl::max;

    let highest: Option<i32> = files::table
        .filter(
            files::file_id
                .eq(root_id)
                .or(files::parent_file_id.eq(root_id)),
        )
        .select(max(files::version))
        .first(conn)?;

    highest.ok_or(PersistenceError::FileNotFound(root_id))
}

/// Retrieves the permission grant level for `(file, invitation)`.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no grant exists.
pub fn get_permission_grant(
    conn: &mut SqliteConnection,
    file_id: i64,
    invitation_id: i64,
) -> Result<Option<String>, PersistenceError> {
    let result: Result<String, diesel::result::Error> = permission_grants::table
        .filter(permission_grants::file_id.eq(file_id))
        .filter(permission_grants::invitation_id.eq(invitation_id))
        .select(permission_grants::level)
        .first(conn);

    match result {
        Ok(level) => Ok(Some(level)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the document content row for a file version.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the version has no content row.
pub fn get_file_content(
    conn: &mut SqliteConnection,
    file_id: i64,
) -> Result<Option<FileContentData>, PersistenceError> {
    let result: Result<(i64, i64, String, String), diesel::result::Error> = file_contents::table
        .filter(file_contents::file_id.eq(file_id))
        .select((
            file_contents::content_id,
            file_contents::file_id,
            file_contents::body,
            file_contents::updated_at,
        ))
        .first(conn);

    match result {
        Ok((content_id, file_id, body, updated_at)) => Ok(Some(FileContentData {
            content_id,
            file_id,
            body,
            updated_at,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
