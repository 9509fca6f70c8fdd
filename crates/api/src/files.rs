// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Guest file operations: upload, status, comment, content, download,
//! and room messages.
//!
//! Every operation re-verifies the guest's credentials and, for
//! existing files, re-derives the permission from the chain root. The
//! activity log entry is appended after the primary mutation succeeds.

use std::str::FromStr;

use dealroom_audit::{ActivityDetails, ActivityEvent};
use dealroom_domain::{validate_comment, validate_file_name, validate_message, FileStatus};
use dealroom_persistence::{FileContentData, InvitationData, NewFile, Persistence};

use crate::activity::{record_activity, record_activity_strict};
use crate::error::{translate_domain_error, translate_persistence_error, ApiError};
use crate::guest::GuestAccess;
use crate::permission::{resolve_file_permission, ResolvedFile};
use crate::request_response::{
    AddCommentRequest, AddCommentResponse, DownloadFileRequest, DownloadFileResponse,
    GetContentRequest, GetContentResponse, GuestMessageRequest, GuestMessageResponse,
    SaveContentRequest, SaveContentResponse, UpdateFileStatusRequest, UpdateFileStatusResponse,
    UploadFileRequest, UploadFileResponse,
};

fn guest_event(invitation: &InvitationData, details: ActivityDetails) -> ActivityEvent {
    ActivityEvent::new(
        invitation.data_room_id,
        invitation.organization_id,
        invitation.display_name().to_string(),
        invitation.email.clone(),
        true,
        details,
    )
}

/// Generates an object storage key for a fresh upload.
///
/// The actual byte transfer happens against the storage service; this
/// core only tracks the key.
fn new_storage_path(data_room_id: i64, name: &str) -> String {
    format!("rooms/{data_room_id}/{:016x}-{name}", rand::random::<u64>())
}

/// Registers a new root file (version 1) uploaded by a guest.
///
/// # Errors
///
/// Returns an error if verification fails, the name is invalid, or the
/// insert fails.
pub fn upload_file(
    persistence: &mut Persistence,
    request: &UploadFileRequest,
) -> Result<UploadFileResponse, ApiError> {
    let invitation: InvitationData = GuestAccess::verify(
        persistence,
        &request.credentials.email,
        &request.credentials.password,
        Some(request.data_room_id),
    )?;

    validate_file_name(&request.name).map_err(translate_domain_error)?;

    let storage_path: String = new_storage_path(invitation.data_room_id, &request.name);
    let file: NewFile = NewFile {
        data_room_id: invitation.data_room_id,
        organization_id: invitation.organization_id,
        name: request.name.clone(),
        storage_path: storage_path.clone(),
        size_bytes: request.size_bytes,
        mime_type: request.mime_type.clone(),
        is_restricted: false,
        parent_file_id: None,
        version: 1,
        status: FileStatus::NotOpened.as_str().to_string(),
        uploaded_by: invitation.display_name().to_string(),
    };

    let file_id: i64 = persistence
        .insert_file(&file)
        .map_err(translate_persistence_error)?;

    record_activity(
        persistence,
        &guest_event(
            &invitation,
            ActivityDetails::FileUpload {
                file_name: request.name.clone(),
                version: 1,
            },
        ),
    );

    Ok(UploadFileResponse {
        file_id,
        version: 1,
        status: FileStatus::NotOpened.as_str().to_string(),
        storage_path,
    })
}

/// Updates a file's review status on behalf of a guest.
///
/// The status vocabulary is closed; anything else is rejected before
/// the database is touched.
///
/// # Errors
///
/// Returns an error if verification, validation, or permission checks
/// fail, or the update fails.
pub fn update_file_status(
    persistence: &mut Persistence,
    request: &UpdateFileStatusRequest,
) -> Result<UpdateFileStatusResponse, ApiError> {
    let status: FileStatus =
        FileStatus::from_str(&request.status).map_err(translate_domain_error)?;

    let invitation: InvitationData = GuestAccess::verify(
        persistence,
        &request.credentials.email,
        &request.credentials.password,
        None,
    )?;
    let resolved: ResolvedFile =
        resolve_file_permission(persistence, &invitation, request.file_id)?;
    resolved.require_view("update_file_status")?;

    persistence
        .update_file_status(resolved.file.file_id, status.as_str())
        .map_err(translate_persistence_error)?;

    record_activity(
        persistence,
        &guest_event(
            &invitation,
            ActivityDetails::StatusChange {
                file_name: resolved.file.name.clone(),
                new_status: status,
            },
        ),
    );

    Ok(UpdateFileStatusResponse {
        file_id: resolved.file.file_id,
        status: status.as_str().to_string(),
    })
}

/// Records a guest comment on a file.
///
/// Comments live in the activity trail; a `view` grant suffices.
///
/// # Errors
///
/// Returns an error if verification, validation, or permission checks
/// fail.
pub fn add_comment(
    persistence: &mut Persistence,
    request: &AddCommentRequest,
) -> Result<AddCommentResponse, ApiError> {
    validate_comment(&request.comment).map_err(translate_domain_error)?;

    let invitation: InvitationData = GuestAccess::verify(
        persistence,
        &request.credentials.email,
        &request.credentials.password,
        None,
    )?;
    let resolved: ResolvedFile =
        resolve_file_permission(persistence, &invitation, request.file_id)?;
    resolved.require_view("add_comment")?;

    let event_id: i64 = record_activity_strict(
        persistence,
        &guest_event(
            &invitation,
            ActivityDetails::Comment {
                file_name: resolved.file.name.clone(),
                comment: request.comment.clone(),
            },
        ),
    )?;

    Ok(AddCommentResponse {
        file_id: resolved.file.file_id,
        event_id,
    })
}

/// Fetches a file version's document content for viewing.
///
/// # Errors
///
/// Returns an error if verification or permission checks fail.
pub fn get_content(
    persistence: &mut Persistence,
    request: &GetContentRequest,
) -> Result<GetContentResponse, ApiError> {
    let invitation: InvitationData = GuestAccess::verify(
        persistence,
        &request.credentials.email,
        &request.credentials.password,
        None,
    )?;
    let resolved: ResolvedFile =
        resolve_file_permission(persistence, &invitation, request.file_id)?;
    resolved.require_view("get_content")?;

    let content: Option<FileContentData> = persistence
        .get_file_content(resolved.file.file_id)
        .map_err(translate_persistence_error)?;

    record_activity(
        persistence,
        &guest_event(
            &invitation,
            ActivityDetails::FileView {
                file_name: resolved.file.name.clone(),
            },
        ),
    );

    Ok(GetContentResponse {
        file_id: resolved.file.file_id,
        version: resolved.file.version,
        body: content.map(|c| c.body),
    })
}

/// Saves a file version's document content.
///
/// This is the one guest action gated on an `edit` grant when the chain
/// is restricted; `view` is not sufficient.
///
/// # Errors
///
/// Returns an error if verification or permission checks fail, or the
/// write fails.
pub fn save_content(
    persistence: &mut Persistence,
    request: &SaveContentRequest,
) -> Result<SaveContentResponse, ApiError> {
    let invitation: InvitationData = GuestAccess::verify(
        persistence,
        &request.credentials.email,
        &request.credentials.password,
        None,
    )?;
    let resolved: ResolvedFile =
        resolve_file_permission(persistence, &invitation, request.file_id)?;
    resolved.require_content_save("save_content")?;

    persistence
        .upsert_file_content(resolved.file.file_id, &request.body)
        .map_err(translate_persistence_error)?;

    record_activity(
        persistence,
        &guest_event(
            &invitation,
            ActivityDetails::ContentSave {
                file_name: resolved.file.name.clone(),
                version: resolved.file.version,
            },
        ),
    );

    Ok(SaveContentResponse {
        file_id: resolved.file.file_id,
        version: resolved.file.version,
    })
}

/// Resolves a file's storage location for download.
///
/// # Errors
///
/// Returns an error if verification or permission checks fail.
pub fn download_file(
    persistence: &mut Persistence,
    request: &DownloadFileRequest,
) -> Result<DownloadFileResponse, ApiError> {
    let invitation: InvitationData = GuestAccess::verify(
        persistence,
        &request.credentials.email,
        &request.credentials.password,
        None,
    )?;
    let resolved: ResolvedFile =
        resolve_file_permission(persistence, &invitation, request.file_id)?;
    resolved.require_view("download_file")?;

    record_activity(
        persistence,
        &guest_event(
            &invitation,
            ActivityDetails::FileDownload {
                file_name: resolved.file.name.clone(),
            },
        ),
    );

    Ok(DownloadFileResponse {
        file_id: resolved.file.file_id,
        name: resolved.file.name,
        storage_path: resolved.file.storage_path,
        mime_type: resolved.file.mime_type,
        size_bytes: resolved.file.size_bytes,
    })
}

/// Records a guest message to the room.
///
/// The activity entry is the message's only persistent form, so unlike
/// the other operations a logging failure here is an error.
///
/// # Errors
///
/// Returns an error if verification or validation fails, or the event
/// cannot be appended.
pub fn send_message(
    persistence: &mut Persistence,
    request: &GuestMessageRequest,
) -> Result<GuestMessageResponse, ApiError> {
    validate_message(&request.message).map_err(translate_domain_error)?;

    let invitation: InvitationData = GuestAccess::verify(
        persistence,
        &request.credentials.email,
        &request.credentials.password,
        Some(request.data_room_id),
    )?;

    let event_id: i64 = record_activity_strict(
        persistence,
        &guest_event(
            &invitation,
            ActivityDetails::GuestMessage {
                message: request.message.clone(),
            },
        ),
    )?;

    Ok(GuestMessageResponse { event_id })
}
