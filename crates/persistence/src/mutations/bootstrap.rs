// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tenant directory mutations: organizations, data rooms, members, tasks.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{data_rooms, organizations, task_assignments, tasks, users};
use crate::error::PersistenceError;

/// Creates a new organization.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_organization(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<i64, PersistenceError> {
    info!("Creating organization: {}", name);

    diesel::insert_into(organizations::table)
        .values(organizations::name.eq(name))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Creates a new data room within an organization.
///
/// # Errors
///
/// Returns an error if the organization does not exist or the insert
/// fails.
pub fn create_data_room(
    conn: &mut SqliteConnection,
    organization_id: i64,
    name: &str,
) -> Result<i64, PersistenceError> {
    info!(organization_id, "Creating data room: {}", name);

    diesel::insert_into(data_rooms::table)
        .values((
            data_rooms::organization_id.eq(organization_id),
            data_rooms::name.eq(name),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Creates a new organization member.
///
/// # Errors
///
/// Returns an error if the organization does not exist or the insert
/// fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    organization_id: i64,
    display_name: &str,
    email: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(users::table)
        .values((
            users::organization_id.eq(organization_id),
            users::display_name.eq(display_name),
            users::email.eq(email),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Creates a new task, optionally assigned or pending acceptance.
///
/// When an assignee is given, the matching assignment row is created in
/// the same transaction so the task and assignment tables never disagree.
///
/// # Errors
///
/// Returns an error if a referenced user does not exist or an insert
/// fails.
#[allow(clippy::too_many_arguments)]
pub fn create_task(
    conn: &mut SqliteConnection,
    organization_id: i64,
    title: &str,
    project: Option<&str>,
    due_date: Option<&str>,
    priority: Option<&str>,
    assignee_user_id: Option<i64>,
    pending_assignee_user_id: Option<i64>,
) -> Result<i64, PersistenceError> {
    let created_at: String = super::now_timestamp()?;

    conn.transaction::<i64, PersistenceError, _>(|conn| {
        diesel::insert_into(tasks::table)
            .values((
                tasks::organization_id.eq(organization_id),
                tasks::title.eq(title),
                tasks::project.eq(project),
                tasks::due_date.eq(due_date),
                tasks::priority.eq(priority),
                tasks::assignee_user_id.eq(assignee_user_id),
                tasks::pending_assignee_user_id.eq(pending_assignee_user_id),
            ))
            .execute(conn)?;

        let task_id: i64 = get_last_insert_rowid(conn)?;

        if let Some(user_id) = assignee_user_id {
            diesel::insert_into(task_assignments::table)
                .values((
                    task_assignments::task_id.eq(task_id),
                    task_assignments::user_id.eq(user_id),
                    task_assignments::created_at.eq(&created_at),
                ))
                .execute(conn)?;
        }

        Ok(task_id)
    })
}
