// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use dealroom_persistence::Persistence;

use crate::auth::AuthenticationService;
use crate::error::ApiError;
use crate::request_response::{CreateOperatorRequest, LoginRequest};
use crate::tests::helpers::{member_actor, seed_admin, test_persistence};
use crate::{create_operator, login, logout};

fn operator_request(login_name: &str, role: &str) -> CreateOperatorRequest {
    CreateOperatorRequest {
        login_name: login_name.to_string(),
        display_name: format!("{login_name} display"),
        password: String::from("Adm1n-Passw0rd!"),
        password_confirmation: String::from("Adm1n-Passw0rd!"),
        role: role.to_string(),
    }
}

#[test]
fn test_first_operator_is_created_without_a_session() {
    let mut persistence: Persistence = test_persistence();

    let response =
        create_operator(&mut persistence, None, &operator_request("admin", "Admin")).unwrap();

    assert_eq!(response.login_name, "ADMIN");
    assert_eq!(response.role, "Admin");
}

#[test]
fn test_later_operators_require_an_admin_session() {
    let mut persistence: Persistence = test_persistence();
    let (admin, _) = seed_admin(&mut persistence);

    // No session at all.
    assert!(matches!(
        create_operator(&mut persistence, None, &operator_request("second", "Member")),
        Err(ApiError::AuthenticationFailed { .. })
    ));

    // A member session is not enough.
    assert!(matches!(
        create_operator(
            &mut persistence,
            Some(&member_actor()),
            &operator_request("second", "Member")
        ),
        Err(ApiError::Unauthorized { .. })
    ));

    // An admin session is.
    create_operator(
        &mut persistence,
        Some(&admin),
        &operator_request("second", "Member"),
    )
    .unwrap();
}

#[test]
fn test_weak_passwords_are_rejected() {
    let mut persistence: Persistence = test_persistence();

    let mut request: CreateOperatorRequest = operator_request("admin", "Admin");
    request.password = String::from("short");
    request.password_confirmation = String::from("short");

    assert!(matches!(
        create_operator(&mut persistence, None, &request),
        Err(ApiError::PasswordPolicyViolation { .. })
    ));
}

#[test]
fn test_unknown_role_is_rejected() {
    let mut persistence: Persistence = test_persistence();

    assert!(matches!(
        create_operator(
            &mut persistence,
            None,
            &operator_request("admin", "Superuser")
        ),
        Err(ApiError::InvalidInput { .. })
    ));
}

#[test]
fn test_login_round_trip() {
    let mut persistence: Persistence = test_persistence();
    seed_admin(&mut persistence);

    let response = login(
        &mut persistence,
        &LoginRequest {
            login_name: String::from("admin"),
            password: String::from("Adm1n-Passw0rd!"),
        },
    )
    .unwrap();

    assert_eq!(response.login_name, "ADMIN");
    assert_eq!(response.role, "Admin");

    // The issued token validates to the same operator.
    let (actor, operator) =
        AuthenticationService::validate_session(&mut persistence, &response.session_token)
            .unwrap();
    assert_eq!(actor.id, "ADMIN");
    assert_eq!(operator.login_name, "ADMIN");
}

#[test]
fn test_login_rejects_wrong_password() {
    let mut persistence: Persistence = test_persistence();
    seed_admin(&mut persistence);

    let result = login(
        &mut persistence,
        &LoginRequest {
            login_name: String::from("admin"),
            password: String::from("not-the-password"),
        },
    );
    assert!(matches!(
        result,
        Err(ApiError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_login_rejects_disabled_operator() {
    let mut persistence: Persistence = test_persistence();
    let (_, operator) = seed_admin(&mut persistence);
    persistence.disable_operator(operator.operator_id).unwrap();

    let result = login(
        &mut persistence,
        &LoginRequest {
            login_name: String::from("admin"),
            password: String::from("Adm1n-Passw0rd!"),
        },
    );
    assert!(matches!(
        result,
        Err(ApiError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_logout_invalidates_the_session() {
    let mut persistence: Persistence = test_persistence();
    seed_admin(&mut persistence);

    let response = login(
        &mut persistence,
        &LoginRequest {
            login_name: String::from("admin"),
            password: String::from("Adm1n-Passw0rd!"),
        },
    )
    .unwrap();

    logout(&mut persistence, &response.session_token).unwrap();

    assert!(
        AuthenticationService::validate_session(&mut persistence, &response.session_token)
            .is_err()
    );
}

#[test]
fn test_expired_sessions_fail_validation() {
    let mut persistence: Persistence = test_persistence();
    let (_, operator) = seed_admin(&mut persistence);

    persistence
        .create_session(
            "stale-token",
            operator.operator_id,
            &crate::tests::helpers::timestamp_in_hours(-1),
        )
        .unwrap();

    assert!(
        AuthenticationService::validate_session(&mut persistence, "stale-token").is_err()
    );
}
