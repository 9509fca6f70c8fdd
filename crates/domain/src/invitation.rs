// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

use crate::error::DomainError;

/// Lifecycle status of a guest invitation.
///
/// Invitations are created `pending`, flip to `accepted` on first
/// successful credential verification (or NDA signing), and are never
/// hard-deleted: revocation sets `revoked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Created but not yet used.
    #[default]
    Pending,
    /// The guest has successfully accessed the room at least once.
    Accepted,
    /// Access withdrawn by an admin.
    Revoked,
}

impl FromStr for InvitationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "revoked" => Ok(Self::Revoked),
            _ => Err(DomainError::InvalidInvitationStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl InvitationStatus {
    /// Converts this status to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Revoked => "revoked",
        }
    }

    /// Whether this status can still grant access (expiry checked
    /// separately).
    #[must_use]
    pub const fn grants_access(&self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }
}

/// Whether an invitation's validity window has closed.
///
/// Access succeeds for all request times strictly before the expiry and
/// fails at or after it.
///
/// # Arguments
///
/// * `expires_at` - The invitation expiry timestamp
/// * `now` - The current time
#[must_use]
pub fn access_expired(expires_at: OffsetDateTime, now: OffsetDateTime) -> bool {
    now >= expires_at
}
