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

use serde::{Deserialize, Serialize};

use dealroom_domain::FileStatus;

/// The fixed set of guest-observable action codes.
///
/// Every activity event carries exactly one action code; the code is
/// derived from the details payload so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    /// A file was uploaded (version 1 of a new chain).
    FileUpload,
    /// A comment was left on a file.
    Comment,
    /// A file's content was fetched for viewing.
    FileView,
    /// A file's storage location was resolved for download.
    FileDownload,
    /// A file's review status changed.
    StatusChange,
    /// The guest signed the room's NDA.
    NdaSignature,
    /// The guest sent a message to the room.
    GuestMessage,
    /// An old version was restored as a new highest version.
    VersionRestore,
    /// Document content was saved.
    ContentSave,
}

impl ActivityAction {
    /// Converts this action to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FileUpload => "file_upload",
            Self::Comment => "comment",
            Self::FileView => "file_view",
            Self::FileDownload => "file_download",
            Self::StatusChange => "status_change",
            Self::NdaSignature => "nda_signature",
            Self::GuestMessage => "guest_message",
            Self::VersionRestore => "version_restore",
            Self::ContentSave => "content_save",
        }
    }
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Action-specific detail payload of an activity event.
///
/// This is a closed set of tagged variants, one per action code, rather
/// than an open string-keyed map. Processing an event is therefore
/// exhaustive at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityDetails {
    /// A file was uploaded.
    FileUpload {
        /// The uploaded file's name.
        file_name: String,
        /// The version assigned to the upload (always 1 for new chains).
        version: i32,
    },
    /// A comment was left on a file.
    Comment {
        /// The commented file's name.
        file_name: String,
        /// The comment body.
        comment: String,
    },
    /// A file's content was fetched.
    FileView {
        /// The viewed file's name.
        file_name: String,
    },
    /// A file download was requested.
    FileDownload {
        /// The downloaded file's name.
        file_name: String,
    },
    /// A file's review status changed.
    StatusChange {
        /// The file's name.
        file_name: String,
        /// The new status.
        new_status: FileStatus,
    },
    /// The guest signed the room's NDA.
    NdaSignature {
        /// The signing guest's display name.
        guest_name: String,
    },
    /// The guest sent a message to the room.
    GuestMessage {
        /// The message body.
        message: String,
    },
    /// An old version was restored.
    VersionRestore {
        /// The file's name.
        file_name: String,
        /// The version the clone was taken from.
        restored_from_version: i32,
        /// The freshly assigned version number.
        new_version: i32,
    },
    /// Document content was saved.
    ContentSave {
        /// The file's name.
        file_name: String,
        /// The version whose content row was written.
        version: i32,
    },
}

impl ActivityDetails {
    /// Returns the action code this payload belongs to.
    #[must_use]
    pub const fn action(&self) -> ActivityAction {
        match self {
            Self::FileUpload { .. } => ActivityAction::FileUpload,
            Self::Comment { .. } => ActivityAction::Comment,
            Self::FileView { .. } => ActivityAction::FileView,
            Self::FileDownload { .. } => ActivityAction::FileDownload,
            Self::StatusChange { .. } => ActivityAction::StatusChange,
            Self::NdaSignature { .. } => ActivityAction::NdaSignature,
            Self::GuestMessage { .. } => ActivityAction::GuestMessage,
            Self::VersionRestore { .. } => ActivityAction::VersionRestore,
            Self::ContentSave { .. } => ActivityAction::ContentSave,
        }
    }
}

/// An immutable audit record of one guest-observable action.
///
/// Activity events are append-only: they are never updated or deleted
/// once recorded, and are displayed newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    /// The data room the action happened in.
    pub data_room_id: i64,
    /// The owning organization.
    pub organization_id: i64,
    /// Display name of the acting party.
    pub actor_name: String,
    /// Email of the acting party.
    pub actor_email: String,
    /// Whether the actor was an external guest (as opposed to an operator).
    pub is_guest: bool,
    /// The action-specific payload.
    pub details: ActivityDetails,
}

impl ActivityEvent {
    /// Creates a new `ActivityEvent`.
    ///
    /// Once created, an activity event is immutable.
    ///
    /// # Arguments
    ///
    /// * `data_room_id` - The data room the action happened in
    /// * `organization_id` - The owning organization
    /// * `actor_name` - Display name of the acting party
    /// * `actor_email` - Email of the acting party
    /// * `is_guest` - Whether the actor was an external guest
    /// * `details` - The action-specific payload
    #[must_use]
    pub const fn new(
        data_room_id: i64,
        organization_id: i64,
        actor_name: String,
        actor_email: String,
        is_guest: bool,
        details: ActivityDetails,
    ) -> Self {
        Self {
            data_room_id,
            organization_id,
            actor_name,
            actor_email,
            is_guest,
            details,
        }
    }

    /// Returns the action code of this event.
    #[must_use]
    pub const fn action(&self) -> ActivityAction {
        self.details.action()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_event() -> ActivityEvent {
        ActivityEvent::new(
            7,
            3,
            String::from("Alice Guest"),
            String::from("alice@example.com"),
            true,
            ActivityDetails::FileUpload {
                file_name: String::from("report.pdf"),
                version: 1,
            },
        )
    }

    #[test]
    fn test_action_is_derived_from_details() {
        let event: ActivityEvent = sample_event();
        assert_eq!(event.action(), ActivityAction::FileUpload);

        let event: ActivityEvent = ActivityEvent::new(
            7,
            3,
            String::from("Alice Guest"),
            String::from("alice@example.com"),
            true,
            ActivityDetails::NdaSignature {
                guest_name: String::from("Alice Guest"),
            },
        );
        assert_eq!(event.action(), ActivityAction::NdaSignature);
    }

    #[test]
    fn test_every_details_variant_maps_to_its_action() {
        let cases: Vec<(ActivityDetails, ActivityAction)> = vec![
            (
                ActivityDetails::Comment {
                    file_name: String::from("report.pdf"),
                    comment: String::from("Looks good"),
                },
                ActivityAction::Comment,
            ),
            (
                ActivityDetails::FileView {
                    file_name: String::from("report.pdf"),
                },
                ActivityAction::FileView,
            ),
            (
                ActivityDetails::FileDownload {
                    file_name: String::from("report.pdf"),
                },
                ActivityAction::FileDownload,
            ),
            (
                ActivityDetails::StatusChange {
                    file_name: String::from("report.pdf"),
                    new_status: FileStatus::InReview,
                },
                ActivityAction::StatusChange,
            ),
            (
                ActivityDetails::GuestMessage {
                    message: String::from("hello"),
                },
                ActivityAction::GuestMessage,
            ),
            (
                ActivityDetails::VersionRestore {
                    file_name: String::from("report.pdf"),
                    restored_from_version: 1,
                    new_version: 4,
                },
                ActivityAction::VersionRestore,
            ),
            (
                ActivityDetails::ContentSave {
                    file_name: String::from("report.pdf"),
                    version: 2,
                },
                ActivityAction::ContentSave,
            ),
        ];

        for (details, action) in cases {
            assert_eq!(details.action(), action);
        }
    }

    #[test]
    fn test_details_serialize_with_kind_tag() {
        let details: ActivityDetails = ActivityDetails::StatusChange {
            file_name: String::from("report.pdf"),
            new_status: FileStatus::InReview,
        };

        let json: String = serde_json::to_string(&details).unwrap();
        assert!(json.contains("\"kind\":\"status_change\""));
        assert!(json.contains("\"new_status\":\"in_review\""));

        let parsed: ActivityDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, details);
    }

    #[test]
    fn test_event_is_immutable_once_created() {
        let event: ActivityEvent = sample_event();
        let cloned: ActivityEvent = event.clone();

        assert_eq!(event, cloned);
        assert_eq!(event.actor_email, "alice@example.com");
        assert!(event.is_guest);
    }
}
