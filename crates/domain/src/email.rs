// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Represents a guest email address.
///
/// Email addresses are the lookup key for invitations and are normalized
/// to lowercase to ensure case-insensitive matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress {
    /// The normalized (lowercase) address.
    value: String,
}

impl EmailAddress {
    /// Parses and normalizes an email address.
    ///
    /// The address is trimmed and lowercased. Validation is intentionally
    /// shallow: the address must be non-empty and contain exactly one `@`
    /// with text on both sides. Deliverability is not checked here.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw email address
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmail` if the address is empty or
    /// structurally malformed.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let normalized: String = value.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(DomainError::InvalidEmail(String::from(
                "address must not be empty",
            )));
        }

        let mut parts = normalized.splitn(2, '@');
        let local: &str = parts.next().unwrap_or_default();
        let domain: &str = parts.next().unwrap_or_default();

        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(DomainError::InvalidEmail(format!(
                "'{normalized}' is not a valid address"
            )));
        }

        Ok(Self { value: normalized })
    }

    /// Returns the normalized address.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
