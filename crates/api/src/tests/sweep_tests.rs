// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::{Duration, OffsetDateTime};

use dealroom_domain::{render_date, render_timestamp};
use dealroom_persistence::{OperatorData, Persistence};

use crate::auth::AuthenticatedActor;
use crate::request_response::PerformMergeRequest;
use crate::tests::helpers::{seed_admin, test_persistence};
use crate::{perform_merge, run_reminder_sweep, run_revert_sweep};

struct SweepWorld {
    persistence: Persistence,
    admin: AuthenticatedActor,
    operator: OperatorData,
    organization_id: i64,
    source_user_id: i64,
    target_user_id: i64,
    task_id: i64,
}

fn sweep_world() -> SweepWorld {
    let mut persistence: Persistence = test_persistence();
    let (admin, operator) = seed_admin(&mut persistence);
    let organization_id: i64 = persistence.create_organization("Acme Holdings").unwrap();
    let source_user_id: i64 = persistence
        .create_user(organization_id, "Sam Source", "sam@acme.test")
        .unwrap();
    let target_user_id: i64 = persistence
        .create_user(organization_id, "Tara Target", "tara@acme.test")
        .unwrap();
    let task_id: i64 = persistence
        .create_task(
            organization_id,
            "Close the books",
            Some("Q3 close"),
            Some("2026-09-30"),
            Some("high"),
            Some(source_user_id),
            None,
        )
        .unwrap();

    SweepWorld {
        persistence,
        admin,
        operator,
        organization_id,
        source_user_id,
        target_user_id,
        task_id,
    }
}

fn merge_ending(world: &mut SweepWorld, end_date: &str) -> i64 {
    perform_merge(
        &mut world.persistence,
        &world.admin,
        &world.operator,
        &PerformMergeRequest {
            organization_id: world.organization_id,
            source_user_id: world.source_user_id,
            target_user_id: world.target_user_id,
            task_ids: vec![world.task_id],
            merge_type: String::from("temporary"),
            temporary_end_date: Some(end_date.to_string()),
        },
    )
    .unwrap()
    .merge_log_id
}

fn today() -> String {
    render_date(OffsetDateTime::now_utc().date()).unwrap()
}

fn yesterday() -> String {
    render_date((OffsetDateTime::now_utc() - Duration::days(1)).date()).unwrap()
}

fn next_year() -> String {
    render_date((OffsetDateTime::now_utc() + Duration::days(365)).date()).unwrap()
}

#[test]
fn test_sweep_reverts_merges_whose_end_date_passed() {
    let mut world: SweepWorld = sweep_world();
    let merge_log_id: i64 = merge_ending(&mut world, &yesterday());

    let report = run_revert_sweep(&mut world.persistence).unwrap();

    assert_eq!(report.due, 1);
    assert_eq!(report.reverted, 1);
    assert_eq!(report.failed, 0);

    let task = world.persistence.get_task(world.task_id).unwrap();
    assert_eq!(task.assignee_user_id, Some(world.source_user_id));

    let log = world.persistence.get_merge_log(merge_log_id).unwrap();
    assert_eq!(log.status, "reverted");
}

#[test]
fn test_sweep_treats_end_date_today_as_due() {
    let mut world: SweepWorld = sweep_world();
    merge_ending(&mut world, &today());

    let report = run_revert_sweep(&mut world.persistence).unwrap();
    assert_eq!(report.due, 1);
    assert_eq!(report.reverted, 1);
}

#[test]
fn test_sweep_leaves_future_merges_alone() {
    let mut world: SweepWorld = sweep_world();
    merge_ending(&mut world, &next_year());

    let report = run_revert_sweep(&mut world.persistence).unwrap();
    assert_eq!(report.due, 0);

    let task = world.persistence.get_task(world.task_id).unwrap();
    assert_eq!(task.assignee_user_id, Some(world.target_user_id));
}

#[test]
fn test_sweep_notifies_the_merge_admin() {
    let mut world: SweepWorld = sweep_world();
    merge_ending(&mut world, &yesterday());

    run_revert_sweep(&mut world.persistence).unwrap();

    let inbox = world
        .persistence
        .list_operator_notifications(world.operator.operator_id)
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0].message.contains("Temporary merge"));
}

#[test]
fn test_sweep_is_quiescent_once_everything_reverted() {
    let mut world: SweepWorld = sweep_world();
    merge_ending(&mut world, &yesterday());

    run_revert_sweep(&mut world.persistence).unwrap();
    let second = run_revert_sweep(&mut world.persistence).unwrap();

    assert_eq!(second.due, 0);
    assert_eq!(second.reverted, 0);

    // Still exactly one notification.
    let inbox = world
        .persistence
        .list_operator_notifications(world.operator.operator_id)
        .unwrap();
    assert_eq!(inbox.len(), 1);
}

#[test]
fn test_reminder_sweep_reminds_pending_assignees_once_per_hour() {
    let mut world: SweepWorld = sweep_world();
    let pending_task_id: i64 = world
        .persistence
        .create_task(
            world.organization_id,
            "Review contract",
            None,
            None,
            None,
            None,
            Some(world.target_user_id),
        )
        .unwrap();

    let first = run_reminder_sweep(&mut world.persistence).unwrap();
    assert_eq!(first.sent, 1);
    assert_eq!(first.suppressed, 0);

    // A second invocation inside the window sends nothing.
    let second = run_reminder_sweep(&mut world.persistence).unwrap();
    assert_eq!(second.sent, 0);
    assert_eq!(second.suppressed, 1);

    let inbox = world
        .persistence
        .list_user_notifications(world.target_user_id)
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0].message.contains("Review contract"));

    // Once the window has elapsed, the reminder fires again.
    let two_hours_ago: String =
        render_timestamp(OffsetDateTime::now_utc() - Duration::hours(2)).unwrap();
    world
        .persistence
        .set_task_last_reminded(pending_task_id, &two_hours_ago)
        .unwrap();

    let third = run_reminder_sweep(&mut world.persistence).unwrap();
    assert_eq!(third.sent, 1);
}

#[test]
fn test_reminder_sweep_ignores_fully_assigned_tasks() {
    let mut world: SweepWorld = sweep_world();

    let report = run_reminder_sweep(&mut world.persistence).unwrap();
    assert_eq!(report.sent, 0);
    assert_eq!(report.suppressed, 0);
}
