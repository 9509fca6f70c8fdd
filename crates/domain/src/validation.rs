// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level validation shared by the API boundary.

use crate::error::DomainError;

/// Validates a file name.
///
/// # Arguments
///
/// * `name` - The file name to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidFileName` if the name is empty, is longer
/// than 255 bytes, or contains a path separator or NUL byte.
pub fn validate_file_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidFileName("name must not be empty"));
    }
    if name.len() > 255 {
        return Err(DomainError::InvalidFileName(
            "name must not exceed 255 bytes",
        ));
    }
    if name.contains('/') || name.contains('\\') || name.contains('\0') {
        return Err(DomainError::InvalidFileName(
            "name must not contain path separators",
        ));
    }
    Ok(())
}

/// Validates a comment body.
///
/// # Errors
///
/// Returns `DomainError::InvalidComment` if the comment is empty.
pub fn validate_comment(comment: &str) -> Result<(), DomainError> {
    if comment.trim().is_empty() {
        return Err(DomainError::InvalidComment("comment must not be empty"));
    }
    Ok(())
}

/// Validates a guest message body.
///
/// # Errors
///
/// Returns `DomainError::InvalidMessage` if the message is empty.
pub fn validate_message(message: &str) -> Result<(), DomainError> {
    if message.trim().is_empty() {
        return Err(DomainError::InvalidMessage("message must not be empty"));
    }
    Ok(())
}
