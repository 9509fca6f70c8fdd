// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use dealroom_domain::access_hash;

use crate::tests::helpers::{seed_invitation, seed_room, test_persistence, timestamp_in_hours};
use crate::{InvitationData, Persistence, PersistenceError};

#[test]
fn test_created_invitation_is_pending() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);

    let invitation_id: i64 =
        seed_invitation(&mut persistence, &room, "alice@example.com", "Secret1", 1);

    let invitation: InvitationData = persistence.get_invitation(invitation_id).unwrap();
    assert_eq!(invitation.status, "pending");
    assert_eq!(invitation.email, "alice@example.com");
    assert_eq!(invitation.access_password_hash, access_hash("Secret1"));
    assert_eq!(invitation.nda_signed_at, None);
}

#[test]
fn test_find_latest_invitation_by_email() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let invitation_id: i64 =
        seed_invitation(&mut persistence, &room, "alice@example.com", "Secret1", 1);

    let found: InvitationData = persistence
        .find_latest_invitation("alice@example.com", Some(room.data_room_id))
        .unwrap()
        .unwrap();
    assert_eq!(found.invitation_id, invitation_id);

    // Unknown email finds nothing.
    assert!(
        persistence
            .find_latest_invitation("bob@example.com", Some(room.data_room_id))
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_lookup_is_scoped_to_the_room_when_given() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let other_room_id: i64 = persistence
        .create_data_room(room.organization_id, "Other room")
        .unwrap();
    seed_invitation(&mut persistence, &room, "alice@example.com", "Secret1", 1);

    assert!(
        persistence
            .find_latest_invitation("alice@example.com", Some(other_room_id))
            .unwrap()
            .is_none()
    );

    // An unscoped lookup finds the invitation in any room.
    assert!(
        persistence
            .find_latest_invitation("alice@example.com", None)
            .unwrap()
            .is_some()
    );
}

#[test]
fn test_latest_expiry_wins_on_duplicate_invitations() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);

    let _early: i64 = seed_invitation(&mut persistence, &room, "alice@example.com", "Old1", 1);
    let late: i64 = seed_invitation(&mut persistence, &room, "alice@example.com", "New1", 48);
    let _middle: i64 = seed_invitation(&mut persistence, &room, "alice@example.com", "Mid1", 24);

    let found: InvitationData = persistence
        .find_latest_invitation("alice@example.com", Some(room.data_room_id))
        .unwrap()
        .unwrap();

    assert_eq!(found.invitation_id, late);
    assert_eq!(found.access_password_hash, access_hash("New1"));
}

#[test]
fn test_revoked_invitations_are_excluded_from_lookup() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let invitation_id: i64 =
        seed_invitation(&mut persistence, &room, "alice@example.com", "Secret1", 1);

    persistence
        .set_invitation_status(invitation_id, "revoked")
        .unwrap();

    assert!(
        persistence
            .find_latest_invitation("alice@example.com", Some(room.data_room_id))
            .unwrap()
            .is_none()
    );

    // The row itself survives revocation.
    let invitation: InvitationData = persistence.get_invitation(invitation_id).unwrap();
    assert_eq!(invitation.status, "revoked");
}

#[test]
fn test_status_update_on_missing_invitation_fails() {
    let mut persistence: Persistence = test_persistence();

    let result = persistence.set_invitation_status(9999, "accepted");
    assert_eq!(result, Err(PersistenceError::InvitationNotFound(9999)));
}

#[test]
fn test_nda_signature_is_recorded() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let invitation_id: i64 =
        seed_invitation(&mut persistence, &room, "alice@example.com", "Secret1", 1);

    let signed_at: String = timestamp_in_hours(0);
    persistence.set_nda_signed(invitation_id, &signed_at).unwrap();

    let invitation: InvitationData = persistence.get_invitation(invitation_id).unwrap();
    assert_eq!(invitation.nda_signed_at, Some(signed_at));
}

#[test]
fn test_list_invitations_for_room() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    seed_invitation(&mut persistence, &room, "alice@example.com", "Secret1", 1);
    seed_invitation(&mut persistence, &room, "bob@example.com", "Secret2", 2);

    let invitations: Vec<InvitationData> = persistence
        .list_invitations_for_room(room.data_room_id)
        .unwrap();

    assert_eq!(invitations.len(), 2);
    // Newest first.
    assert_eq!(invitations[0].email, "bob@example.com");
}
