// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tenant directory administration: organizations, rooms, members,
//! tasks, and file deletion.

use dealroom_persistence::{FileData, Persistence};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{translate_persistence_error, ApiError};
use crate::request_response::{
    AckResponse, CreateDataRoomRequest, CreateDataRoomResponse, CreateOrganizationRequest,
    CreateOrganizationResponse, CreateTaskRequest, CreateTaskResponse, CreateUserRequest,
    CreateUserResponse, DeleteFileRequest,
};

/// Creates an organization (admin).
///
/// # Errors
///
/// Returns an error if the actor is not an admin or persistence fails.
pub fn create_organization(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateOrganizationRequest,
) -> Result<CreateOrganizationResponse, ApiError> {
    AuthorizationService::authorize_manage_directory(actor)?;

    if request.name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("Organization name must not be empty"),
        });
    }

    let organization_id: i64 = persistence
        .create_organization(&request.name)
        .map_err(translate_persistence_error)?;

    Ok(CreateOrganizationResponse { organization_id })
}

/// Creates a data room (admin).
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the organization is
/// absent, or persistence fails.
pub fn create_data_room(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateDataRoomRequest,
) -> Result<CreateDataRoomResponse, ApiError> {
    AuthorizationService::authorize_manage_directory(actor)?;

    // Surface a 404 for a bad organization rather than a raw FK error.
    persistence
        .get_organization(request.organization_id)
        .map_err(translate_persistence_error)?;

    if request.name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("Data room name must not be empty"),
        });
    }

    let data_room_id: i64 = persistence
        .create_data_room(request.organization_id, &request.name)
        .map_err(translate_persistence_error)?;

    Ok(CreateDataRoomResponse { data_room_id })
}

/// Creates an organization member (admin).
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the organization is
/// absent, or persistence fails.
pub fn create_user(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateUserRequest,
) -> Result<CreateUserResponse, ApiError> {
    AuthorizationService::authorize_manage_directory(actor)?;

    persistence
        .get_organization(request.organization_id)
        .map_err(translate_persistence_error)?;

    let user_id: i64 = persistence
        .create_user(
            request.organization_id,
            &request.display_name,
            &request.email,
        )
        .map_err(translate_persistence_error)?;

    Ok(CreateUserResponse { user_id })
}

/// Creates a task (admin).
///
/// # Errors
///
/// Returns an error if the actor is not an admin, a referenced user is
/// absent, or persistence fails.
pub fn create_task(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateTaskRequest,
) -> Result<CreateTaskResponse, ApiError> {
    AuthorizationService::authorize_manage_directory(actor)?;

    if request.title.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("title"),
            message: String::from("Task title must not be empty"),
        });
    }
    if let Some(due_date) = request.due_date.as_deref() {
        dealroom_domain::parse_date(due_date).map_err(crate::error::translate_domain_error)?;
    }

    let task_id: i64 = persistence
        .create_task(
            request.organization_id,
            &request.title,
            request.project.as_deref(),
            request.due_date.as_deref(),
            request.priority.as_deref(),
            request.assignee_user_id,
            request.pending_assignee_user_id,
        )
        .map_err(translate_persistence_error)?;

    Ok(CreateTaskResponse { task_id })
}

/// Soft-deletes a file (admin).
///
/// The row keeps its version number so restores never renumber; it just
/// stops appearing in queries.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the file is absent.
pub fn delete_file(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &DeleteFileRequest,
) -> Result<AckResponse, ApiError> {
    AuthorizationService::authorize_manage_files(actor)?;

    let file: FileData = persistence
        .get_file(request.file_id)
        .map_err(translate_persistence_error)?;
    persistence
        .soft_delete_file(file.file_id)
        .map_err(translate_persistence_error)?;

    Ok(AckResponse {
        message: format!("File {} deleted", file.file_id),
    })
}
