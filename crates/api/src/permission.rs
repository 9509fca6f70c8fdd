// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-request permission resolution, plus the admin operations that
//! manage restrictions and grants.
//!
//! Every handler that touches a file re-derives the chain root and
//! re-queries the grant table here. There is deliberately no caching:
//! guest requests are stateless and a revoked grant must take effect on
//! the very next request.

use std::str::FromStr;

use dealroom_domain::{
    resolve_effective_permission, EffectivePermission, PermissionLevel,
};
use dealroom_persistence::{FileData, InvitationData, Persistence};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    translate_domain_error, translate_persistence_error, ApiError,
};
use crate::request_response::{AckResponse, GrantPermissionRequest, SetFileRestrictionRequest};

/// A file resolved against a guest invitation.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    /// The file the request named (any version in the chain).
    pub file: FileData,
    /// The chain root; restriction is authoritative only here.
    pub root: FileData,
    /// The invitation's effective permission for the whole chain.
    pub permission: EffectivePermission,
}

/// Resolves a file and the guest's effective permission for its chain.
///
/// The root is the parent reference when present, the file itself
/// otherwise. Only the root's restriction flag is consulted; flags on
/// descendant versions are ignored.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `invitation` - The verified guest invitation
/// * `file_id` - Any version's file id
///
/// # Errors
///
/// Returns `ResourceNotFound` if the file (or its root) is absent or
/// soft-deleted, and `Unauthorized` if the file belongs to a different
/// data room than the invitation.
pub fn resolve_file_permission(
    persistence: &mut Persistence,
    invitation: &InvitationData,
    file_id: i64,
) -> Result<ResolvedFile, ApiError> {
    let file: FileData = persistence
        .get_file(file_id)
        .map_err(translate_persistence_error)?;

    if file.data_room_id != invitation.data_room_id {
        return Err(ApiError::Unauthorized {
            action: String::from("access_file"),
            reason: String::from("file belongs to a different data room"),
        });
    }

    let root: FileData = match file.parent_file_id {
        Some(parent_id) => persistence
            .get_file(parent_id)
            .map_err(translate_persistence_error)?,
        None => file.clone(),
    };

    let grant: Option<PermissionLevel> = if root.is_restricted {
        persistence
            .get_permission_grant(root.file_id, invitation.invitation_id)
            .map_err(translate_persistence_error)?
            .map(|level| PermissionLevel::from_str(&level).map_err(translate_domain_error))
            .transpose()?
    } else {
        None
    };

    Ok(ResolvedFile {
        permission: resolve_effective_permission(root.is_restricted, grant),
        file,
        root,
    })
}

impl ResolvedFile {
    /// Requires read-side access (view, preview, download, comment).
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the chain is restricted and no grant
    /// exists.
    pub fn require_view(&self, action: &str) -> Result<(), ApiError> {
        if self.permission.allows_view() {
            return Ok(());
        }
        Err(ApiError::Unauthorized {
            action: action.to_string(),
            reason: String::from("no permission grant for this file"),
        })
    }

    /// Requires content-save access.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the chain is restricted and the grant
    /// is absent or only `view`.
    pub fn require_content_save(&self, action: &str) -> Result<(), ApiError> {
        if self.permission.allows_content_save() {
            return Ok(());
        }
        Err(ApiError::Unauthorized {
            action: action.to_string(),
            reason: String::from("content saves require an 'edit' grant"),
        })
    }
}

/// Sets a file's restriction flag (admin).
///
/// The flag is always written on the chain root, whichever version the
/// request named.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the file is absent.
pub fn set_file_restriction(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &SetFileRestrictionRequest,
) -> Result<AckResponse, ApiError> {
    AuthorizationService::authorize_manage_files(actor)?;

    let file: FileData = persistence
        .get_file(request.file_id)
        .map_err(translate_persistence_error)?;
    let root_id: i64 = file.root_id();

    persistence
        .set_file_restriction(root_id, request.restricted)
        .map_err(translate_persistence_error)?;

    Ok(AckResponse {
        message: format!(
            "File {root_id} is now {}",
            if request.restricted {
                "restricted"
            } else {
                "unrestricted"
            }
        ),
    })
}

/// Grants a guest access to a restricted file (admin).
///
/// The grant is keyed by the chain root; a version id in the request is
/// resolved to its root first. Re-granting replaces the level.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the level is unknown,
/// or the file or invitation is absent.
pub fn grant_permission(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &GrantPermissionRequest,
) -> Result<AckResponse, ApiError> {
    AuthorizationService::authorize_manage_files(actor)?;

    let level: PermissionLevel =
        PermissionLevel::from_str(&request.level).map_err(translate_domain_error)?;
    let file: FileData = persistence
        .get_file(request.file_id)
        .map_err(translate_persistence_error)?;
    let root_id: i64 = file.root_id();

    // The invitation must exist; a dangling grant would never match.
    persistence
        .get_invitation(request.invitation_id)
        .map_err(translate_persistence_error)?;

    persistence
        .upsert_permission_grant(root_id, request.invitation_id, level.as_str())
        .map_err(translate_persistence_error)?;

    Ok(AckResponse {
        message: format!(
            "Granted '{}' on file {root_id} to invitation {}",
            level.as_str(),
            request.invitation_id
        ),
    })
}
