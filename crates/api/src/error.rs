// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use dealroom::CoreError;
use dealroom_domain::DomainError;
use dealroom_persistence::PersistenceError;

use crate::password_policy::PasswordPolicyError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    ///
    /// For guest credential failures the reason is deliberately generic
    /// and never distinguishes "unknown email" from "wrong password"
    /// beyond the fixed message set.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the actor may not perform it.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, reason } => {
                write!(f, "Unauthorized: '{action}': {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core/persistence errors and represent
/// the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed (bad credentials or expired access).
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - valid identity, insufficient permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the actor may not perform it.
        reason: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, reason } => {
                write!(f, "Unauthorized: '{action}': {reason}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized { action, reason } => Self::Unauthorized { action, reason },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidEmail(msg) => ApiError::InvalidInput {
            field: String::from("email"),
            message: msg,
        },
        DomainError::InvalidFileName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg.to_string(),
        },
        DomainError::InvalidComment(msg) => ApiError::InvalidInput {
            field: String::from("comment"),
            message: msg.to_string(),
        },
        DomainError::InvalidMessage(msg) => ApiError::InvalidInput {
            field: String::from("message"),
            message: msg.to_string(),
        },
        DomainError::InvalidFileStatus(value) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!(
                "Invalid file status: '{value}'. Must be one of not_opened, in_review, review_failed, being_amended, completed"
            ),
        },
        DomainError::InvalidPermissionLevel(value) => ApiError::InvalidInput {
            field: String::from("level"),
            message: format!("Invalid permission level: '{value}'. Must be 'view' or 'edit'"),
        },
        DomainError::InvalidInvitationStatus(value) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid invitation status: '{value}'"),
        },
        DomainError::InvalidMergeType(value) => ApiError::InvalidInput {
            field: String::from("merge_type"),
            message: format!("Invalid merge type: '{value}'. Must be 'permanent' or 'temporary'"),
        },
        DomainError::InvalidMergeStatus(value) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid merge status: '{value}'"),
        },
        DomainError::InvalidMergeTransition { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("merge_status_transition"),
            message: format!("Merge log cannot transition from '{from}' to '{to}'"),
        },
        DomainError::DateParseError { value, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{value}': {error}"),
        },
        DomainError::DateRenderError { error } => ApiError::Internal {
            message: format!("Failed to render date: {error}"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked
/// directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::EmptyTaskSet => ApiError::InvalidInput {
            field: String::from("task_ids"),
            message: String::from("Merge must include at least one task"),
        },
        CoreError::SameUser { user_id } => ApiError::InvalidInput {
            field: String::from("target_user_id"),
            message: format!("Cannot merge user {user_id} into themselves"),
        },
        CoreError::MissingEndDate => ApiError::InvalidInput {
            field: String::from("temporary_end_date"),
            message: String::from("Temporary merges require a temporary end date"),
        },
        CoreError::UnexpectedEndDate => ApiError::InvalidInput {
            field: String::from("temporary_end_date"),
            message: String::from("Permanent merges must not carry a temporary end date"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Not-found variants surface as `ResourceNotFound`; everything else is
/// an internal dependency failure and is reported generically after
/// being traced at the call site.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::FileNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("File"),
            message: format!("File {id} does not exist"),
        },
        PersistenceError::InvitationNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Invitation"),
            message: format!("Invitation {id} does not exist"),
        },
        PersistenceError::TaskNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Task"),
            message: format!("Task {id} does not exist"),
        },
        PersistenceError::UserNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {id} does not exist"),
        },
        PersistenceError::MergeLogNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Merge log"),
            message: format!("Merge log entry {id} does not exist"),
        },
        PersistenceError::OperatorNotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Operator"),
            message: msg,
        },
        PersistenceError::NotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Resource"),
            message: msg,
        },
        other => ApiError::Internal {
            message: format!("Persistence failure: {other}"),
        },
    }
}
