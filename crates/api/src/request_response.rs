// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response DTOs for the API boundary.
//!
//! These types are the wire contract; they are distinct from domain and
//! persistence types. Guest requests authenticate with email+password in
//! the body because the caller is an anonymous external guest rather
//! than a platform account holder; `token` is accepted as an alias for
//! `password`.

use serde::{Deserialize, Serialize};

use dealroom_audit::ActivityDetails;

/// Guest credentials carried in every guest request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestCredentials {
    /// The guest's email address (case-insensitive).
    pub email: String,
    /// The access password (case-insensitive); `token` is an accepted
    /// alias for this field.
    #[serde(alias = "token")]
    pub password: String,
}

// ============================================================================
// Guest requests
// ============================================================================

/// Request to verify guest credentials against a data room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyGuestRequest {
    #[serde(flatten)]
    pub credentials: GuestCredentials,
    /// Restricts verification to one room; any room otherwise.
    pub data_room_id: Option<i64>,
}

/// Response for a successful guest verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyGuestResponse {
    pub invitation_id: i64,
    pub data_room_id: i64,
    pub organization_id: i64,
    pub email: String,
    pub guest_name: Option<String>,
    pub nda_signed: bool,
    pub expires_at: String,
}

/// Request to sign a room's NDA.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignNdaRequest {
    #[serde(flatten)]
    pub credentials: GuestCredentials,
    pub data_room_id: i64,
}

/// Response for an NDA signature (idempotent: re-signing succeeds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignNdaResponse {
    /// True when the NDA had already been signed before this call.
    pub already_signed: bool,
    pub signed_at: String,
}

/// Request to register a new root file (version 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadFileRequest {
    #[serde(flatten)]
    pub credentials: GuestCredentials,
    pub data_room_id: i64,
    pub name: String,
    pub size_bytes: i64,
    pub mime_type: String,
}

/// Response for a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadFileResponse {
    pub file_id: i64,
    pub version: i32,
    pub status: String,
    pub storage_path: String,
}

/// Request to update a file's review status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFileStatusRequest {
    #[serde(flatten)]
    pub credentials: GuestCredentials,
    pub file_id: i64,
    pub status: String,
}

/// Response for a status update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFileStatusResponse {
    pub file_id: i64,
    pub status: String,
}

/// Request to comment on a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCommentRequest {
    #[serde(flatten)]
    pub credentials: GuestCredentials,
    pub file_id: i64,
    pub comment: String,
}

/// Response for a recorded comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCommentResponse {
    pub file_id: i64,
    pub event_id: i64,
}

/// Request to fetch a file's document content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetContentRequest {
    #[serde(flatten)]
    pub credentials: GuestCredentials,
    pub file_id: i64,
}

/// Response carrying a file version's document content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetContentResponse {
    pub file_id: i64,
    pub version: i32,
    /// Absent when the version has no content row yet.
    pub body: Option<String>,
}

/// Request to save a file's document content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveContentRequest {
    #[serde(flatten)]
    pub credentials: GuestCredentials,
    pub file_id: i64,
    pub body: String,
}

/// Response for a content save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveContentResponse {
    pub file_id: i64,
    pub version: i32,
}

/// Request to resolve a file for download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadFileRequest {
    #[serde(flatten)]
    pub credentials: GuestCredentials,
    pub file_id: i64,
}

/// Response carrying the storage location for a download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadFileResponse {
    pub file_id: i64,
    pub name: String,
    pub storage_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

/// Request to list a file's version history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListVersionsRequest {
    #[serde(flatten)]
    pub credentials: GuestCredentials,
    pub file_id: i64,
}

/// One version row in a history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub file_id: i64,
    pub version: i32,
    pub name: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub status: String,
    pub uploaded_by: String,
    pub created_at: String,
}

/// Response listing a chain's versions, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListVersionsResponse {
    pub root_file_id: i64,
    pub versions: Vec<VersionInfo>,
}

/// Request to append a new version of an existing file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAsVersionRequest {
    #[serde(flatten)]
    pub credentials: GuestCredentials,
    /// Any version in the chain; the new version hangs off the root.
    pub file_id: i64,
    pub size_bytes: i64,
    pub mime_type: String,
}

/// Response for an appended version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAsVersionResponse {
    pub root_file_id: i64,
    pub new_file_id: i64,
    pub new_version: i32,
    pub storage_path: String,
}

/// Request to restore an old version as a new highest version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreVersionRequest {
    #[serde(flatten)]
    pub credentials: GuestCredentials,
    pub version_id: i64,
}

/// Response for a successful restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreVersionResponse {
    pub root_file_id: i64,
    pub new_file_id: i64,
    pub new_version: i32,
    pub restored_from_version: i32,
}

/// Request to send a guest message to the room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestMessageRequest {
    #[serde(flatten)]
    pub credentials: GuestCredentials,
    pub data_room_id: i64,
    pub message: String,
}

/// Response for a recorded guest message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestMessageResponse {
    pub event_id: i64,
}

// ============================================================================
// Operator requests
// ============================================================================

/// Request to log in as an operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login_name: String,
    pub password: String,
}

/// Response for a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub session_token: String,
    pub login_name: String,
    pub display_name: String,
    pub role: String,
    pub expires_at: String,
}

/// Request to create an operator.
///
/// The first operator may be created without a session; afterwards only
/// admins may create operators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOperatorRequest {
    pub login_name: String,
    pub display_name: String,
    pub password: String,
    pub password_confirmation: String,
    pub role: String,
}

/// Response for a created operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOperatorResponse {
    pub operator_id: i64,
    pub login_name: String,
    pub role: String,
}

/// Request to disable an operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisableOperatorRequest {
    pub operator_id: i64,
}

/// One operator row in a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorInfo {
    pub operator_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub role: String,
    pub is_disabled: bool,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// Response listing all operators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOperatorsResponse {
    pub operators: Vec<OperatorInfo>,
}

/// Request to create an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
}

/// Response for a created organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganizationResponse {
    pub organization_id: i64,
}

/// Request to create a data room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDataRoomRequest {
    pub organization_id: i64,
    pub name: String,
}

/// Response for a created data room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDataRoomResponse {
    pub data_room_id: i64,
}

/// Request to create an organization member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub organization_id: i64,
    pub display_name: String,
    pub email: String,
}

/// Response for a created member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub user_id: i64,
}

/// Request to create a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub organization_id: i64,
    pub title: String,
    pub project: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub assignee_user_id: Option<i64>,
    pub pending_assignee_user_id: Option<i64>,
}

/// Response for a created task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskResponse {
    pub task_id: i64,
}

/// Request to invite a guest to a data room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvitationRequest {
    pub data_room_id: i64,
    pub email: String,
    pub guest_name: Option<String>,
    /// The access password handed to the guest out of band; only its
    /// hash is stored.
    pub password: String,
    pub expires_at: String,
}

/// Response for a created invitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvitationResponse {
    pub invitation_id: i64,
    pub email: String,
    pub expires_at: String,
}

/// Request to revoke an invitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeInvitationRequest {
    pub invitation_id: i64,
}

/// One invitation row in a listing. The access hash is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationInfo {
    pub invitation_id: i64,
    pub email: String,
    pub guest_name: Option<String>,
    pub status: String,
    pub expires_at: String,
    pub nda_signed_at: Option<String>,
    pub created_at: String,
}

/// Response listing a room's invitations, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListInvitationsResponse {
    pub data_room_id: i64,
    pub invitations: Vec<InvitationInfo>,
}

/// Request to set a file's restriction flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetFileRestrictionRequest {
    pub file_id: i64,
    pub restricted: bool,
}

/// Request to grant a guest access to a restricted file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantPermissionRequest {
    /// The chain root file id; a version id is resolved to its root.
    pub file_id: i64,
    pub invitation_id: i64,
    pub level: String,
}

/// Request to soft-delete a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteFileRequest {
    pub file_id: i64,
}

/// Generic acknowledgement response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub message: String,
}

/// One activity event in a feed listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEventInfo {
    pub event_id: i64,
    pub actor_name: String,
    pub actor_email: String,
    pub is_guest: bool,
    pub action: String,
    pub details: ActivityDetails,
    pub created_at: String,
}

/// Response listing a room's activity feed, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityFeedResponse {
    pub data_room_id: i64,
    pub events: Vec<ActivityEventInfo>,
}

// ============================================================================
// Merge engine
// ============================================================================

/// Request to merge a set of tasks from one user to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformMergeRequest {
    pub organization_id: i64,
    pub source_user_id: i64,
    pub target_user_id: i64,
    pub task_ids: Vec<i64>,
    pub merge_type: String,
    /// `YYYY-MM-DD`; required for temporary merges.
    pub temporary_end_date: Option<String>,
}

/// Response for a performed merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformMergeResponse {
    pub merge_log_id: i64,
    pub status: String,
    pub transferred_task_ids: Vec<i64>,
}

/// Request to manually revert a merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevertMergeRequest {
    pub merge_log_id: i64,
}

/// A task skipped at revert time because its assignee changed again
/// after the merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTask {
    pub task_id: i64,
    pub current_assignee_user_id: Option<i64>,
}

/// Response for a reverted merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevertMergeResponse {
    pub merge_log_id: i64,
    pub status: String,
    pub reverted_task_ids: Vec<i64>,
    pub skipped: Vec<SkippedTask>,
}

/// One task snapshot in a merge log listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSnapshotInfo {
    pub task_id: i64,
    pub title: String,
    pub project: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
}

/// One merge log entry in a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeLogInfo {
    pub merge_log_id: i64,
    pub source_user_id: i64,
    pub target_user_id: i64,
    pub merge_type: String,
    pub temporary_end_date: Option<String>,
    pub status: String,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub reverted_at: Option<String>,
    pub tasks: Vec<TaskSnapshotInfo>,
}

/// Response listing an organization's merge logs, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMergeLogsResponse {
    pub merge_logs: Vec<MergeLogInfo>,
}

/// One notification in a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationInfo {
    pub notification_id: i64,
    pub message: String,
    pub created_at: String,
}

/// Response listing an operator's notifications, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListNotificationsResponse {
    pub notifications: Vec<NotificationInfo>,
}

/// Outcome of one revert sweep run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevertSweepReport {
    /// Entries whose end date had passed.
    pub due: usize,
    /// Entries successfully reverted.
    pub reverted: usize,
    /// Entries whose compensating sequence failed (left pending).
    pub failed: usize,
}

/// Outcome of one reminder sweep run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSweepReport {
    /// Reminders written this run.
    pub sent: usize,
    /// Tasks still inside the one-hour window.
    pub suppressed: usize,
}
