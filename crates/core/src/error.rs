// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use dealroom_domain::DomainError;

/// Errors that can occur while planning a merge or revert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A merge must transfer at least one task.
    EmptyTaskSet,
    /// Source and target user must differ.
    SameUser {
        /// The user id that appeared on both sides.
        user_id: i64,
    },
    /// A temporary merge requires an end date.
    MissingEndDate,
    /// A permanent merge must not carry an end date.
    UnexpectedEndDate,
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::EmptyTaskSet => write!(f, "Merge must include at least one task"),
            Self::SameUser { user_id } => {
                write!(f, "Cannot merge user {user_id} into themselves")
            }
            Self::MissingEndDate => {
                write!(f, "Temporary merges require a temporary end date")
            }
            Self::UnexpectedEndDate => {
                write!(f, "Permanent merges must not carry a temporary end date")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
