// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use dealroom_persistence::{OperatorData, Persistence};

use crate::auth::AuthenticatedActor;
use crate::error::ApiError;
use crate::request_response::{PerformMergeRequest, RevertMergeRequest};
use crate::tests::helpers::{member_actor, seed_admin, test_persistence};
use crate::{perform_merge, revert_merge};

struct MergeWorld {
    persistence: Persistence,
    admin: AuthenticatedActor,
    operator: OperatorData,
    organization_id: i64,
    source_user_id: i64,
    target_user_id: i64,
    task_ids: Vec<i64>,
}

fn merge_world(task_count: usize) -> MergeWorld {
    let mut persistence: Persistence = test_persistence();
    let (admin, operator) = seed_admin(&mut persistence);
    let organization_id: i64 = persistence.create_organization("Acme Holdings").unwrap();
    let source_user_id: i64 = persistence
        .create_user(organization_id, "Sam Source", "sam@acme.test")
        .unwrap();
    let target_user_id: i64 = persistence
        .create_user(organization_id, "Tara Target", "tara@acme.test")
        .unwrap();

    let mut task_ids: Vec<i64> = Vec::new();
    for n in 0..task_count {
        task_ids.push(
            persistence
                .create_task(
                    organization_id,
                    &format!("Task {n}"),
                    Some("Q3 close"),
                    Some("2026-09-30"),
                    Some("high"),
                    Some(source_user_id),
                    None,
                )
                .unwrap(),
        );
    }

    MergeWorld {
        persistence,
        admin,
        operator,
        organization_id,
        source_user_id,
        target_user_id,
        task_ids,
    }
}

fn permanent_request(world: &MergeWorld) -> PerformMergeRequest {
    PerformMergeRequest {
        organization_id: world.organization_id,
        source_user_id: world.source_user_id,
        target_user_id: world.target_user_id,
        task_ids: world.task_ids.clone(),
        merge_type: String::from("permanent"),
        temporary_end_date: None,
    }
}

fn temporary_request(world: &MergeWorld, end_date: &str) -> PerformMergeRequest {
    PerformMergeRequest {
        merge_type: String::from("temporary"),
        temporary_end_date: Some(end_date.to_string()),
        ..permanent_request(world)
    }
}

#[test]
fn test_permanent_merge_transfers_assignments() {
    let mut world: MergeWorld = merge_world(3);

    let request = permanent_request(&world);
    let response = perform_merge(
        &mut world.persistence,
        &world.admin,
        &world.operator,
        &request,
    )
    .unwrap();

    assert_eq!(response.status, "completed");
    assert_eq!(response.transferred_task_ids, world.task_ids);

    for &task_id in &world.task_ids {
        let task = world.persistence.get_task(task_id).unwrap();
        assert_eq!(task.assignee_user_id, Some(world.target_user_id));
        assert!(
            world
                .persistence
                .assignment_exists(task_id, world.target_user_id)
                .unwrap()
        );
    }
}

#[test]
fn test_merge_snapshot_is_not_refreshed_later() {
    let mut world: MergeWorld = merge_world(1);

    let request = temporary_request(&world, "2026-12-31");
    let response = perform_merge(
        &mut world.persistence,
        &world.admin,
        &world.operator,
        &request,
    )
    .unwrap();

    // The task changes after the merge; the log keeps the original
    // display fields.
    let log = world.persistence.get_merge_log(response.merge_log_id).unwrap();
    let snapshots = log.task_snapshots().unwrap();
    assert_eq!(snapshots[0].title, "Task 0");
    assert_eq!(snapshots[0].priority, Some(String::from("high")));
}

#[test]
fn test_temporary_merge_and_manual_revert_round_trip() {
    let mut world: MergeWorld = merge_world(2);

    let request = temporary_request(&world, "2026-12-31");
    let merged = perform_merge(
        &mut world.persistence,
        &world.admin,
        &world.operator,
        &request,
    )
    .unwrap();
    assert_eq!(merged.status, "pending_revert");

    let reverted = revert_merge(
        &mut world.persistence,
        &world.admin,
        &RevertMergeRequest {
            merge_log_id: merged.merge_log_id,
        },
    )
    .unwrap();

    assert_eq!(reverted.status, "reverted");
    assert_eq!(reverted.reverted_task_ids, world.task_ids);
    assert!(reverted.skipped.is_empty());

    // Every task is back on the source with no lingering target row.
    for &task_id in &world.task_ids {
        let task = world.persistence.get_task(task_id).unwrap();
        assert_eq!(task.assignee_user_id, Some(world.source_user_id));
        assert!(
            !world
                .persistence
                .assignment_exists(task_id, world.target_user_id)
                .unwrap()
        );
        assert!(
            world
                .persistence
                .assignment_exists(task_id, world.source_user_id)
                .unwrap()
        );
    }

    let log = world.persistence.get_merge_log(merged.merge_log_id).unwrap();
    assert_eq!(log.status, "reverted");
    assert!(log.reverted_at.is_some());
}

#[test]
fn test_revert_skips_tasks_reassigned_to_a_third_party() {
    let mut world: MergeWorld = merge_world(2);
    let third_party: i64 = world
        .persistence
        .create_user(world.organization_id, "Theo Third", "theo@acme.test")
        .unwrap();

    let request = temporary_request(&world, "2026-12-31");
    let merged = perform_merge(
        &mut world.persistence,
        &world.admin,
        &world.operator,
        &request,
    )
    .unwrap();

    // A third party takes over the second task between merge and
    // revert.
    world
        .persistence
        .apply_task_transfer(world.task_ids[1], third_party)
        .unwrap();

    let reverted = revert_merge(
        &mut world.persistence,
        &world.admin,
        &RevertMergeRequest {
            merge_log_id: merged.merge_log_id,
        },
    )
    .unwrap();

    assert_eq!(reverted.reverted_task_ids, vec![world.task_ids[0]]);
    assert_eq!(reverted.skipped.len(), 1);
    assert_eq!(reverted.skipped[0].task_id, world.task_ids[1]);
    assert_eq!(
        reverted.skipped[0].current_assignee_user_id,
        Some(third_party)
    );

    // The conflicting task keeps its new assignee.
    assert_eq!(
        world
            .persistence
            .get_task(world.task_ids[1])
            .unwrap()
            .assignee_user_id,
        Some(third_party)
    );
}

#[test]
fn test_permanent_merges_cannot_be_reverted() {
    let mut world: MergeWorld = merge_world(1);

    let request = permanent_request(&world);
    let merged = perform_merge(
        &mut world.persistence,
        &world.admin,
        &world.operator,
        &request,
    )
    .unwrap();

    let result = revert_merge(
        &mut world.persistence,
        &world.admin,
        &RevertMergeRequest {
            merge_log_id: merged.merge_log_id,
        },
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { .. })
    ));
}

#[test]
fn test_revert_is_not_repeatable() {
    let mut world: MergeWorld = merge_world(1);

    let request = temporary_request(&world, "2026-12-31");
    let merged = perform_merge(
        &mut world.persistence,
        &world.admin,
        &world.operator,
        &request,
    )
    .unwrap();
    revert_merge(
        &mut world.persistence,
        &world.admin,
        &RevertMergeRequest {
            merge_log_id: merged.merge_log_id,
        },
    )
    .unwrap();

    let result = revert_merge(
        &mut world.persistence,
        &world.admin,
        &RevertMergeRequest {
            merge_log_id: merged.merge_log_id,
        },
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { .. })
    ));
}

#[test]
fn test_merge_validation_failures() {
    let mut world: MergeWorld = merge_world(1);

    // Missing task.
    let mut request: PerformMergeRequest = permanent_request(&world);
    request.task_ids.push(999_999);
    let (admin, operator) = (world.admin.clone(), world.operator.clone());
    assert!(matches!(
        perform_merge(&mut world.persistence, &admin, &operator, &request),
        Err(ApiError::ResourceNotFound { .. })
    ));

    // Source equals target.
    let mut request: PerformMergeRequest = permanent_request(&world);
    request.target_user_id = world.source_user_id;
    assert!(matches!(
        perform_merge(&mut world.persistence, &admin, &operator, &request),
        Err(ApiError::InvalidInput { .. })
    ));

    // Empty task set.
    let mut request: PerformMergeRequest = permanent_request(&world);
    request.task_ids.clear();
    assert!(matches!(
        perform_merge(&mut world.persistence, &admin, &operator, &request),
        Err(ApiError::InvalidInput { .. })
    ));

    // Temporary without an end date.
    let mut request: PerformMergeRequest = permanent_request(&world);
    request.merge_type = String::from("temporary");
    assert!(matches!(
        perform_merge(&mut world.persistence, &admin, &operator, &request),
        Err(ApiError::InvalidInput { .. })
    ));

    // Unknown merge type.
    let mut request: PerformMergeRequest = permanent_request(&world);
    request.merge_type = String::from("forever");
    assert!(matches!(
        perform_merge(&mut world.persistence, &admin, &operator, &request),
        Err(ApiError::InvalidInput { .. })
    ));
}

#[test]
fn test_merges_require_admin_role() {
    let mut world: MergeWorld = merge_world(1);
    let request: PerformMergeRequest = permanent_request(&world);
    let operator: OperatorData = world.operator.clone();

    assert!(matches!(
        perform_merge(&mut world.persistence, &member_actor(), &operator, &request),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        revert_merge(
            &mut world.persistence,
            &member_actor(),
            &RevertMergeRequest { merge_log_id: 1 }
        ),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_merge_log_listing() {
    let mut world: MergeWorld = merge_world(1);

    let request = temporary_request(&world, "2026-12-31");
    let merged = perform_merge(
        &mut world.persistence,
        &world.admin,
        &world.operator,
        &request,
    )
    .unwrap();

    let listing =
        crate::list_merge_logs(&mut world.persistence, &world.admin, world.organization_id)
            .unwrap();

    assert_eq!(listing.merge_logs.len(), 1);
    let entry = &listing.merge_logs[0];
    assert_eq!(entry.merge_log_id, merged.merge_log_id);
    assert_eq!(entry.merge_type, "temporary");
    assert_eq!(entry.temporary_end_date, Some(String::from("2026-12-31")));
    assert_eq!(entry.tasks.len(), 1);
}
