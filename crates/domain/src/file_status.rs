// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;

/// Review status of a data room file.
///
/// The vocabulary is fixed; any other value is rejected at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Initial state for newly uploaded files and restored versions.
    #[default]
    NotOpened,
    /// A reviewer has opened the file.
    InReview,
    /// Review finished with objections.
    ReviewFailed,
    /// The uploader is amending the file.
    BeingAmended,
    /// Review finished successfully.
    Completed,
}

impl FromStr for FileStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_opened" => Ok(Self::NotOpened),
            "in_review" => Ok(Self::InReview),
            "review_failed" => Ok(Self::ReviewFailed),
            "being_amended" => Ok(Self::BeingAmended),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidFileStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FileStatus {
    /// Converts this status to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotOpened => "not_opened",
            Self::InReview => "in_review",
            Self::ReviewFailed => "review_failed",
            Self::BeingAmended => "being_amended",
            Self::Completed => "completed",
        }
    }
}
