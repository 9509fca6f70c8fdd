// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator account management and login.

use tracing::info;

use dealroom_persistence::{OperatorData, Persistence, SessionData};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
use crate::error::{translate_persistence_error, ApiError};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AckResponse, CreateOperatorRequest, CreateOperatorResponse, DisableOperatorRequest,
    ListOperatorsResponse, LoginRequest, LoginResponse, OperatorInfo,
};

/// Logs an operator in and returns the session token.
///
/// # Errors
///
/// Returns an error if the credentials do not verify.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (session_token, _actor, operator): (String, AuthenticatedActor, OperatorData) =
        AuthenticationService::login(persistence, &request.login_name, &request.password)?;

    let session: SessionData = persistence
        .get_session_by_token(&session_token)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Session not found after creation"),
        })?;

    Ok(LoginResponse {
        session_token,
        login_name: operator.login_name,
        display_name: operator.display_name,
        role: operator.role,
        expires_at: session.expires_at,
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<AckResponse, ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(AckResponse {
        message: String::from("Logged out"),
    })
}

/// Creates an operator.
///
/// The very first operator may be created without a session (initial
/// bootstrap of an empty system); afterwards only admins may create
/// operators. Passwords must satisfy the policy.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The authenticated actor, absent only during bootstrap
/// * `request` - The creation request
///
/// # Errors
///
/// Returns an error if authorization or the password policy rejects the
/// request, the role is unknown, or the login name is taken.
pub fn create_operator(
    persistence: &mut Persistence,
    actor: Option<&AuthenticatedActor>,
    request: &CreateOperatorRequest,
) -> Result<CreateOperatorResponse, ApiError> {
    let existing: i64 = persistence
        .count_operators()
        .map_err(translate_persistence_error)?;

    if existing > 0 {
        let actor: &AuthenticatedActor = actor.ok_or_else(|| ApiError::AuthenticationFailed {
            reason: String::from("A session is required to create operators"),
        })?;
        AuthorizationService::authorize_create_operator(actor)?;
    } else {
        info!("Creating the initial operator for an empty system");
    }

    let role: Role = Role::parse(&request.role).map_err(|_| ApiError::InvalidInput {
        field: String::from("role"),
        message: format!("Invalid role: '{}'. Must be 'Admin' or 'Member'", request.role),
    })?;

    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &request.login_name,
        &request.display_name,
    )?;

    let operator_id: i64 = persistence
        .create_operator(
            &request.login_name,
            &request.display_name,
            &request.password,
            role.as_str(),
        )
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to create operator: {e}"),
        })?;

    Ok(CreateOperatorResponse {
        operator_id,
        login_name: request.login_name.to_uppercase(),
        role: role.as_str().to_string(),
    })
}

/// Lists all operators (admin).
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the query fails.
pub fn list_operators(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListOperatorsResponse, ApiError> {
    AuthorizationService::authorize_create_operator(actor)?;

    let operators: Vec<OperatorInfo> = persistence
        .list_operators()
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|o| OperatorInfo {
            operator_id: o.operator_id,
            login_name: o.login_name,
            display_name: o.display_name,
            role: o.role,
            is_disabled: o.is_disabled,
            created_at: o.created_at,
            last_login_at: o.last_login_at,
        })
        .collect();

    Ok(ListOperatorsResponse { operators })
}

/// Disables an operator (admin).
///
/// # Errors
///
/// Returns an error if the actor is not an admin, tries to disable
/// themselves, or the operator is absent.
pub fn disable_operator(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    operator: &OperatorData,
    request: &DisableOperatorRequest,
) -> Result<AckResponse, ApiError> {
    AuthorizationService::authorize_create_operator(actor)?;

    if request.operator_id == operator.operator_id {
        return Err(ApiError::InvalidInput {
            field: String::from("operator_id"),
            message: String::from("Operators cannot disable themselves"),
        });
    }

    persistence
        .disable_operator(request.operator_id)
        .map_err(translate_persistence_error)?;

    Ok(AckResponse {
        message: format!("Operator {} disabled", request.operator_id),
    })
}
