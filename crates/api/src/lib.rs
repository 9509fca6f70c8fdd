// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod activity;
mod auth;
mod directory;
mod error;
mod files;
mod guest;
mod invitations;
mod merge;
mod operators;
mod password_policy;
mod permission;
mod request_response;
mod versions;

#[cfg(test)]
mod tests;

pub use activity::{list_activity, record_activity, record_activity_strict};
pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
pub use directory::{create_data_room, create_organization, create_task, create_user, delete_file};
pub use error::{
    translate_core_error, translate_domain_error, translate_persistence_error, ApiError, AuthError,
};
pub use files::{
    add_comment, download_file, get_content, save_content, send_message, update_file_status,
    upload_file,
};
pub use guest::GuestAccess;
pub use invitations::{create_invitation, list_invitations, revoke_invitation};
pub use merge::{
    list_merge_logs, list_notifications, perform_merge, revert_merge, run_reminder_sweep,
    run_revert_sweep,
};
pub use operators::{create_operator, disable_operator, list_operators, login, logout};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use permission::{
    grant_permission, resolve_file_permission, set_file_restriction, ResolvedFile,
};
pub use request_response::{
    AckResponse, ActivityEventInfo, ActivityFeedResponse, AddCommentRequest, AddCommentResponse,
    CreateDataRoomRequest, CreateDataRoomResponse, CreateInvitationRequest,
    CreateInvitationResponse, CreateOperatorRequest, CreateOperatorResponse,
    CreateOrganizationRequest, CreateOrganizationResponse, CreateTaskRequest, CreateTaskResponse,
    CreateUserRequest, CreateUserResponse, DeleteFileRequest, DisableOperatorRequest,
    DownloadFileRequest, DownloadFileResponse, GetContentRequest, GetContentResponse,
    GrantPermissionRequest, GuestCredentials, GuestMessageRequest, GuestMessageResponse,
    InvitationInfo, ListInvitationsResponse,
    ListMergeLogsResponse, ListNotificationsResponse, ListOperatorsResponse, ListVersionsRequest,
    ListVersionsResponse, LoginRequest, LoginResponse, MergeLogInfo, NotificationInfo,
    OperatorInfo, PerformMergeRequest, PerformMergeResponse, ReminderSweepReport,
    RestoreVersionRequest, RestoreVersionResponse, RevertMergeRequest, RevertMergeResponse,
    RevertSweepReport, RevokeInvitationRequest, SaveAsVersionRequest, SaveAsVersionResponse,
    SaveContentRequest, SaveContentResponse,
    SetFileRestrictionRequest, SignNdaRequest, SignNdaResponse, SkippedTask, TaskSnapshotInfo,
    UpdateFileStatusRequest, UpdateFileStatusResponse, UploadFileRequest, UploadFileResponse,
    VerifyGuestRequest, VerifyGuestResponse, VersionInfo,
};
pub use versions::{list_versions, restore_version, save_as_version};
