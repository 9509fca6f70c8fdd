// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;
use time::{Duration, OffsetDateTime};

use crate::{InvitationStatus, access_expired};

#[test]
fn test_access_succeeds_strictly_before_expiry() {
    let expires_at: OffsetDateTime = OffsetDateTime::now_utc() + Duration::hours(1);

    assert!(!access_expired(expires_at, expires_at - Duration::hours(2)));
    assert!(!access_expired(expires_at, expires_at - Duration::seconds(1)));
}

#[test]
fn test_access_fails_at_and_after_expiry() {
    let expires_at: OffsetDateTime = OffsetDateTime::now_utc();

    assert!(access_expired(expires_at, expires_at));
    assert!(access_expired(expires_at, expires_at + Duration::seconds(1)));
    assert!(access_expired(expires_at, expires_at + Duration::days(30)));
}

#[test]
fn test_invitation_status_round_trip() {
    for status in [
        InvitationStatus::Pending,
        InvitationStatus::Accepted,
        InvitationStatus::Revoked,
    ] {
        assert_eq!(InvitationStatus::from_str(status.as_str()), Ok(status));
    }
}

#[test]
fn test_unknown_invitation_status_is_rejected() {
    assert!(InvitationStatus::from_str("expired").is_err());
}

#[test]
fn test_revoked_invitations_do_not_grant_access() {
    assert!(InvitationStatus::Pending.grants_access());
    assert!(InvitationStatus::Accepted.grants_access());
    assert!(!InvitationStatus::Revoked.grants_access());
}
