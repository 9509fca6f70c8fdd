// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plain data carriers returned by the persistence layer.
//!
//! These structs are deliberately stringly-typed where the database is:
//! status and level columns carry their wire vocabulary and are parsed
//! into domain enums at the API boundary.

use dealroom::TaskSnapshot;
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

/// An operator (admin account) row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorData {
    pub operator_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    pub is_disabled: bool,
    pub created_at: String,
    pub disabled_at: Option<String>,
    pub last_login_at: Option<String>,
}

/// A session row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub operator_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// An organization (tenant) row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationData {
    pub organization_id: i64,
    pub name: String,
    pub created_at: String,
}

/// A data room row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRoomData {
    pub data_room_id: i64,
    pub organization_id: i64,
    pub name: String,
    pub created_at: String,
}

/// A guest invitation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationData {
    pub invitation_id: i64,
    pub data_room_id: i64,
    pub organization_id: i64,
    pub email: String,
    pub guest_name: Option<String>,
    pub access_password_hash: String,
    pub status: String,
    pub expires_at: String,
    pub nda_signed_at: Option<String>,
    pub created_at: String,
}

impl InvitationData {
    /// The display name used on activity events: the guest name when one
    /// was recorded, the email otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.guest_name.as_deref().unwrap_or(&self.email)
    }
}

/// A data room file row (one version within a chain).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    pub file_id: i64,
    pub data_room_id: i64,
    pub organization_id: i64,
    pub name: String,
    pub storage_path: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub is_restricted: bool,
    pub parent_file_id: Option<i64>,
    pub version: i32,
    pub status: String,
    pub uploaded_by: String,
    pub deleted_at: Option<String>,
    pub created_at: String,
}

impl FileData {
    /// The id of this file's chain root.
    ///
    /// A file with no parent reference is its own root.
    #[must_use]
    pub fn root_id(&self) -> i64 {
        self.parent_file_id.unwrap_or(self.file_id)
    }
}

/// A per-version document content row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContentData {
    pub content_id: i64,
    pub file_id: i64,
    pub body: String,
    pub updated_at: String,
}

/// An activity event row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEventData {
    pub event_id: i64,
    pub data_room_id: i64,
    pub organization_id: i64,
    pub actor_name: String,
    pub actor_email: String,
    pub is_guest: bool,
    pub action: String,
    pub details_json: String,
    pub created_at: String,
}

/// An organization member row (task assignee).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub user_id: i64,
    pub organization_id: i64,
    pub display_name: String,
    pub email: String,
}

/// A task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskData {
    pub task_id: i64,
    pub organization_id: i64,
    pub title: String,
    pub project: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub assignee_user_id: Option<i64>,
    pub pending_assignee_user_id: Option<i64>,
    pub last_reminded_at: Option<String>,
}

/// A merge log row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeLogData {
    pub merge_log_id: i64,
    pub organization_id: i64,
    pub performed_by: i64,
    pub source_user_id: i64,
    pub target_user_id: i64,
    pub merge_type: String,
    pub temporary_end_date: Option<String>,
    pub task_snapshot_json: String,
    pub status: String,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub reverted_at: Option<String>,
}

impl MergeLogData {
    /// Deserializes the task snapshot captured at merge time.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored JSON does not parse.
    pub fn task_snapshots(&self) -> Result<Vec<TaskSnapshot>, PersistenceError> {
        Ok(serde_json::from_str(&self.task_snapshot_json)?)
    }
}

/// A notification row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationData {
    pub notification_id: i64,
    pub operator_id: Option<i64>,
    pub user_id: Option<i64>,
    pub message: String,
    pub created_at: String,
}

/// Serializable request payload for inserting a new file row.
///
/// Used by both upload (version 1, no parent) and restore (clone with the
/// parent forced to the chain root).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFile {
    pub data_room_id: i64,
    pub organization_id: i64,
    pub name: String,
    pub storage_path: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub is_restricted: bool,
    pub parent_file_id: Option<i64>,
    pub version: i32,
    pub status: String,
    pub uploaded_by: String,
}
