// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Effective permission resolution for data room files.
//!
//! Restriction is authoritative only on the root of a version chain.
//! When the root is restricted, access requires an explicit grant keyed by
//! `(root file, invitation)`; the absence of a grant means no access.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;

/// Permission level recorded on an explicit grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    /// Read, preview, download, and comment.
    View,
    /// Everything `view` permits, plus content saves.
    Edit,
}

impl FromStr for PermissionLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Self::View),
            "edit" => Ok(Self::Edit),
            _ => Err(DomainError::InvalidPermissionLevel(s.to_string())),
        }
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PermissionLevel {
    /// Converts this level to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
        }
    }
}

/// The resolved permission of one invitation for one version chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectivePermission {
    /// The chain root is not restricted; all actions are permitted.
    Unrestricted,
    /// The chain root is restricted and a grant exists at this level.
    Granted(PermissionLevel),
    /// The chain root is restricted and no grant exists.
    Denied,
}

impl EffectivePermission {
    /// Whether read-side actions (view, preview, download, comment) are
    /// permitted.
    #[must_use]
    pub const fn allows_view(&self) -> bool {
        matches!(self, Self::Unrestricted | Self::Granted(_))
    }

    /// Whether content saves are permitted.
    ///
    /// A `view` grant is not sufficient; restricted chains require an
    /// explicit `edit` grant.
    #[must_use]
    pub const fn allows_content_save(&self) -> bool {
        matches!(self, Self::Unrestricted | Self::Granted(PermissionLevel::Edit))
    }
}

/// Resolves the effective permission for a version chain.
///
/// Only the root file's restriction flag participates; flags on descendant
/// versions are ignored by construction because callers must pass the
/// root's flag.
///
/// # Arguments
///
/// * `root_is_restricted` - The restriction flag of the chain root
/// * `grant` - The explicit grant for `(root, invitation)` if one exists
#[must_use]
pub const fn resolve_effective_permission(
    root_is_restricted: bool,
    grant: Option<PermissionLevel>,
) -> EffectivePermission {
    if !root_is_restricted {
        return EffectivePermission::Unrestricted;
    }
    match grant {
        Some(level) => EffectivePermission::Granted(level),
        None => EffectivePermission::Denied,
    }
}
