// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::data_models::NewFile;
use crate::tests::helpers::{new_file, seed_chain, seed_invitation, seed_room, test_persistence};
use crate::{FileData, Persistence, PersistenceError};

#[test]
fn test_root_file_is_its_own_root() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let (root_id, _) = seed_chain(&mut persistence, &room, "report.pdf", 0);

    let file: FileData = persistence.get_file(root_id).unwrap();
    assert_eq!(file.parent_file_id, None);
    assert_eq!(file.version, 1);
    assert_eq!(file.root_id(), root_id);
}

#[test]
fn test_descendants_point_at_the_root() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let (root_id, ids) = seed_chain(&mut persistence, &room, "report.pdf", 2);

    for &id in &ids[1..] {
        let version: FileData = persistence.get_file(id).unwrap();
        assert_eq!(version.parent_file_id, Some(root_id));
        assert_eq!(version.root_id(), root_id);
    }
}

#[test]
fn test_chain_lists_newest_version_first() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let (root_id, _) = seed_chain(&mut persistence, &room, "report.pdf", 3);

    let chain: Vec<FileData> = persistence.list_chain(root_id).unwrap();

    assert_eq!(chain.len(), 4);
    let versions: Vec<i32> = chain.iter().map(|f| f.version).collect();
    assert_eq!(versions, vec![4, 3, 2, 1]);
}

#[test]
fn test_max_version_in_chain() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let (root_id, _) = seed_chain(&mut persistence, &room, "report.pdf", 2);

    assert_eq!(persistence.max_version_in_chain(root_id).unwrap(), 3);
}

#[test]
fn test_max_version_fails_for_unknown_chain() {
    let mut persistence: Persistence = test_persistence();

    assert_eq!(
        persistence.max_version_in_chain(424_242),
        Err(PersistenceError::FileNotFound(424_242))
    );
}

#[test]
fn test_soft_deleted_file_disappears_from_queries() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let (root_id, ids) = seed_chain(&mut persistence, &room, "report.pdf", 2);

    persistence.soft_delete_file(ids[2]).unwrap();

    assert_eq!(
        persistence.get_file(ids[2]),
        Err(PersistenceError::FileNotFound(ids[2]))
    );
    let chain: Vec<FileData> = persistence.list_chain(root_id).unwrap();
    assert_eq!(chain.len(), 2);

    // The deleted row still holds its version number.
    assert_eq!(persistence.max_version_in_chain(root_id).unwrap(), 3);
}

#[test]
fn test_soft_delete_is_not_repeatable() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let (root_id, _) = seed_chain(&mut persistence, &room, "report.pdf", 0);

    persistence.soft_delete_file(root_id).unwrap();
    assert_eq!(
        persistence.soft_delete_file(root_id),
        Err(PersistenceError::FileNotFound(root_id))
    );
}

#[test]
fn test_status_update() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let (root_id, _) = seed_chain(&mut persistence, &room, "report.pdf", 0);

    persistence.update_file_status(root_id, "in_review").unwrap();

    let file: FileData = persistence.get_file(root_id).unwrap();
    assert_eq!(file.status, "in_review");
}

#[test]
fn test_restriction_flag_update() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let (root_id, _) = seed_chain(&mut persistence, &room, "report.pdf", 0);

    persistence.set_file_restriction(root_id, true).unwrap();
    assert!(persistence.get_file(root_id).unwrap().is_restricted);

    persistence.set_file_restriction(root_id, false).unwrap();
    assert!(!persistence.get_file(root_id).unwrap().is_restricted);
}

#[test]
fn test_content_rows_are_per_version() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let (root_id, ids) = seed_chain(&mut persistence, &room, "notes.md", 1);

    persistence.upsert_file_content(root_id, "v1 body").unwrap();
    persistence.upsert_file_content(ids[1], "v2 body").unwrap();

    assert_eq!(
        persistence.get_file_content(root_id).unwrap().unwrap().body,
        "v1 body"
    );
    assert_eq!(
        persistence.get_file_content(ids[1]).unwrap().unwrap().body,
        "v2 body"
    );
}

#[test]
fn test_content_save_updates_in_place() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let (root_id, _) = seed_chain(&mut persistence, &room, "notes.md", 0);

    persistence.upsert_file_content(root_id, "first").unwrap();
    persistence.upsert_file_content(root_id, "second").unwrap();

    assert_eq!(
        persistence.get_file_content(root_id).unwrap().unwrap().body,
        "second"
    );
}

#[test]
fn test_permission_grants_upsert_and_lookup() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);
    let (root_id, _) = seed_chain(&mut persistence, &room, "report.pdf", 0);
    let invitation_id: i64 =
        seed_invitation(&mut persistence, &room, "alice@example.com", "Secret1", 1);

    assert_eq!(
        persistence.get_permission_grant(root_id, invitation_id).unwrap(),
        None
    );

    persistence
        .upsert_permission_grant(root_id, invitation_id, "view")
        .unwrap();
    assert_eq!(
        persistence.get_permission_grant(root_id, invitation_id).unwrap(),
        Some(String::from("view"))
    );

    // Re-granting replaces the level rather than hitting the unique
    // constraint.
    persistence
        .upsert_permission_grant(root_id, invitation_id, "edit")
        .unwrap();
    assert_eq!(
        persistence.get_permission_grant(root_id, invitation_id).unwrap(),
        Some(String::from("edit"))
    );
}

#[test]
fn test_insert_rejects_unknown_room() {
    let mut persistence: Persistence = test_persistence();
    let room = seed_room(&mut persistence);

    let mut file: NewFile = new_file(&room, "report.pdf", false);
    file.data_room_id = 9999;

    assert!(persistence.insert_file(&file).is_err());
}
