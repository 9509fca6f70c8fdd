// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Version chain operations: listing history and restoring versions.
//!
//! Chains are append-only. Restoring clones an old version as a fresh
//! highest version; nothing is ever overwritten or renumbered, so the
//! audit trail of "what was live when" stays intact.

use dealroom_audit::{ActivityDetails, ActivityEvent};
use dealroom_domain::FileStatus;
use dealroom_persistence::{FileContentData, FileData, InvitationData, NewFile, Persistence};

use crate::activity::record_activity;
use crate::error::{translate_persistence_error, ApiError};
use crate::guest::GuestAccess;
use crate::permission::{resolve_file_permission, ResolvedFile};
use crate::request_response::{
    ListVersionsRequest, ListVersionsResponse, RestoreVersionRequest, RestoreVersionResponse,
    SaveAsVersionRequest, SaveAsVersionResponse, VersionInfo,
};

/// Lists a file's version history, newest first.
///
/// Any version in the chain may be named; the listing always covers the
/// whole chain from the root down.
///
/// # Errors
///
/// Returns an error if verification or permission checks fail, or the
/// file is absent.
pub fn list_versions(
    persistence: &mut Persistence,
    request: &ListVersionsRequest,
) -> Result<ListVersionsResponse, ApiError> {
    let invitation: InvitationData = GuestAccess::verify(
        persistence,
        &request.credentials.email,
        &request.credentials.password,
        None,
    )?;
    let resolved: ResolvedFile =
        resolve_file_permission(persistence, &invitation, request.file_id)?;
    resolved.require_view("list_versions")?;

    let chain: Vec<FileData> = persistence
        .list_chain(resolved.root.file_id)
        .map_err(translate_persistence_error)?;

    let versions: Vec<VersionInfo> = chain
        .into_iter()
        .map(|file| VersionInfo {
            file_id: file.file_id,
            version: file.version,
            name: file.name,
            size_bytes: file.size_bytes,
            mime_type: file.mime_type,
            status: file.status,
            uploaded_by: file.uploaded_by,
            created_at: file.created_at,
        })
        .collect();

    Ok(ListVersionsResponse {
        root_file_id: resolved.root.file_id,
        versions,
    })
}

/// Appends a new version of an existing file.
///
/// The new row hangs off the chain root with `chain max + 1` as its
/// version number and a fresh storage key; earlier versions are never
/// overwritten. On restricted chains this is an edit-type action, so a
/// `view` grant is not sufficient.
///
/// # Errors
///
/// Returns an error if verification or permission checks fail, the file
/// is absent, or the insert fails.
pub fn save_as_version(
    persistence: &mut Persistence,
    request: &SaveAsVersionRequest,
) -> Result<SaveAsVersionResponse, ApiError> {
    let invitation: InvitationData = GuestAccess::verify(
        persistence,
        &request.credentials.email,
        &request.credentials.password,
        None,
    )?;
    let resolved: ResolvedFile =
        resolve_file_permission(persistence, &invitation, request.file_id)?;
    resolved.require_content_save("save_as_version")?;

    let root: &FileData = &resolved.root;
    let new_version: i32 = persistence
        .max_version_in_chain(root.file_id)
        .map_err(translate_persistence_error)?
        + 1;

    let storage_path: String = format!(
        "rooms/{}/{:016x}-{}",
        root.data_room_id,
        rand::random::<u64>(),
        root.name
    );
    let file: NewFile = NewFile {
        data_room_id: root.data_room_id,
        organization_id: root.organization_id,
        name: root.name.clone(),
        storage_path: storage_path.clone(),
        size_bytes: request.size_bytes,
        mime_type: request.mime_type.clone(),
        is_restricted: root.is_restricted,
        parent_file_id: Some(root.file_id),
        version: new_version,
        status: FileStatus::NotOpened.as_str().to_string(),
        uploaded_by: invitation.display_name().to_string(),
    };

    let new_file_id: i64 = persistence
        .insert_file(&file)
        .map_err(translate_persistence_error)?;

    record_activity(
        persistence,
        &ActivityEvent::new(
            invitation.data_room_id,
            invitation.organization_id,
            invitation.display_name().to_string(),
            invitation.email.clone(),
            true,
            ActivityDetails::FileUpload {
                file_name: root.name.clone(),
                version: new_version,
            },
        ),
    );

    Ok(SaveAsVersionResponse {
        root_file_id: root.file_id,
        new_file_id,
        new_version,
        storage_path,
    })
}

/// Restores an old version by cloning it as a new highest version.
///
/// The clone copies the restored version's attributes, forces the
/// parent reference to the chain root, takes `chain max + 1` as its
/// version number, and resets the review status. If the restored
/// version carries document content, the content is copied into a new
/// per-version row. The source version and every other version remain
/// untouched.
///
/// # Errors
///
/// Returns an error if verification or permission checks fail, the
/// version is absent, or the insert fails.
pub fn restore_version(
    persistence: &mut Persistence,
    request: &RestoreVersionRequest,
) -> Result<RestoreVersionResponse, ApiError> {
    let invitation: InvitationData = GuestAccess::verify(
        persistence,
        &request.credentials.email,
        &request.credentials.password,
        None,
    )?;
    let resolved: ResolvedFile =
        resolve_file_permission(persistence, &invitation, request.version_id)?;
    resolved.require_view("restore_version")?;

    let source: &FileData = &resolved.file;
    let root_id: i64 = resolved.root.file_id;

    let new_version: i32 = persistence
        .max_version_in_chain(root_id)
        .map_err(translate_persistence_error)?
        + 1;

    let clone: NewFile = NewFile {
        data_room_id: source.data_room_id,
        organization_id: source.organization_id,
        name: source.name.clone(),
        storage_path: source.storage_path.clone(),
        size_bytes: source.size_bytes,
        mime_type: source.mime_type.clone(),
        is_restricted: source.is_restricted,
        parent_file_id: Some(root_id),
        version: new_version,
        status: FileStatus::NotOpened.as_str().to_string(),
        uploaded_by: source.uploaded_by.clone(),
    };

    let new_file_id: i64 = persistence
        .insert_file(&clone)
        .map_err(translate_persistence_error)?;

    // Content rows are per-version; copy rather than share.
    let content: Option<FileContentData> = persistence
        .get_file_content(source.file_id)
        .map_err(translate_persistence_error)?;
    if let Some(content) = content {
        persistence
            .upsert_file_content(new_file_id, &content.body)
            .map_err(translate_persistence_error)?;
    }

    record_activity(
        persistence,
        &ActivityEvent::new(
            invitation.data_room_id,
            invitation.organization_id,
            invitation.display_name().to_string(),
            invitation.email.clone(),
            true,
            ActivityDetails::VersionRestore {
                file_name: source.name.clone(),
                restored_from_version: source.version,
                new_version,
            },
        ),
    );

    Ok(RestoreVersionResponse {
        root_file_id: root_id,
        new_file_id,
        new_version,
        restored_from_version: source.version,
    })
}
