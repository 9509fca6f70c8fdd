// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::merge::MergeStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Email address is empty or malformed.
    InvalidEmail(String),
    /// File name is empty or contains forbidden characters.
    InvalidFileName(&'static str),
    /// Comment body is empty.
    InvalidComment(&'static str),
    /// Guest message body is empty.
    InvalidMessage(&'static str),
    /// File status is not part of the fixed vocabulary.
    InvalidFileStatus(String),
    /// Permission level is not `view` or `edit`.
    InvalidPermissionLevel(String),
    /// Invitation status is not part of the fixed vocabulary.
    InvalidInvitationStatus(String),
    /// Merge type is not `permanent` or `temporary`.
    InvalidMergeType(String),
    /// Merge log status is not part of the fixed vocabulary.
    InvalidMergeStatus(String),
    /// Requested merge log status transition is not allowed.
    InvalidMergeTransition {
        /// The current status.
        from: MergeStatus,
        /// The requested status.
        to: MergeStatus,
    },
    /// Failed to parse a timestamp or date from a string.
    DateParseError {
        /// The invalid date string.
        value: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to render a timestamp or date as a string.
    DateRenderError {
        /// The rendering error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidFileName(msg) => write!(f, "Invalid file name: {msg}"),
            Self::InvalidComment(msg) => write!(f, "Invalid comment: {msg}"),
            Self::InvalidMessage(msg) => write!(f, "Invalid message: {msg}"),
            Self::InvalidFileStatus(value) => {
                write!(
                    f,
                    "Invalid file status: '{value}'. Must be one of not_opened, in_review, review_failed, being_amended, completed"
                )
            }
            Self::InvalidPermissionLevel(value) => {
                write!(
                    f,
                    "Invalid permission level: '{value}'. Must be 'view' or 'edit'"
                )
            }
            Self::InvalidInvitationStatus(value) => {
                write!(f, "Invalid invitation status: '{value}'")
            }
            Self::InvalidMergeType(value) => {
                write!(
                    f,
                    "Invalid merge type: '{value}'. Must be 'permanent' or 'temporary'"
                )
            }
            Self::InvalidMergeStatus(value) => write!(f, "Invalid merge status: '{value}'"),
            Self::InvalidMergeTransition { from, to } => {
                write!(f, "Merge log cannot transition from '{from}' to '{to}'")
            }
            Self::DateParseError { value, error } => {
                write!(f, "Failed to parse date '{value}': {error}")
            }
            Self::DateRenderError { error } => {
                write!(f, "Failed to render date: {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
