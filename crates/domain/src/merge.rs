// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;

/// Kind of a task merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeType {
    /// Assignments transfer for good; the log entry is terminal.
    Permanent,
    /// Assignments transfer until the end date, then revert.
    Temporary,
}

impl FromStr for MergeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permanent" => Ok(Self::Permanent),
            "temporary" => Ok(Self::Temporary),
            _ => Err(DomainError::InvalidMergeType(s.to_string())),
        }
    }
}

impl std::fmt::Display for MergeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl MergeType {
    /// Converts this type to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Permanent => "permanent",
            Self::Temporary => "temporary",
        }
    }
}

/// Lifecycle status of a merge log entry.
///
/// Permanent merges are created `completed` and never change. Temporary
/// merges are created `pending_revert` and transition to `reverted` once
/// the compensating reassignment has run, either manually or via the
/// scheduled sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStatus {
    /// Terminal state for permanent merges.
    Completed,
    /// Awaiting reversion.
    PendingRevert,
    /// The compensating reassignment has run.
    Reverted,
}

impl FromStr for MergeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Self::Completed),
            "pending_revert" => Ok(Self::PendingRevert),
            "reverted" => Ok(Self::Reverted),
            _ => Err(DomainError::InvalidMergeStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for MergeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl MergeStatus {
    /// Converts this status to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::PendingRevert => "pending_revert",
            Self::Reverted => "reverted",
        }
    }

    /// The status a freshly created merge log receives.
    #[must_use]
    pub const fn initial_for(merge_type: MergeType) -> Self {
        match merge_type {
            MergeType::Permanent => Self::Completed,
            MergeType::Temporary => Self::PendingRevert,
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// The only valid transition is `PendingRevert` → `Reverted`.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::PendingRevert, Self::Reverted))
    }
}
