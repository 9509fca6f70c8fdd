// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Task, assignment, and member queries.

use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::{TaskData, UserData};
use crate::diesel_schema::{task_assignments, tasks, users};
use crate::error::PersistenceError;

/// Diesel Queryable struct for task rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = tasks)]
struct TaskRow {
    task_id: i64,
    organization_id: i64,
    title: String,
    project: Option<String>,
    due_date: Option<String>,
    priority: Option<String>,
    assignee_user_id: Option<i64>,
    pending_assignee_user_id: Option<i64>,
    last_reminded_at: Option<String>,
}

impl From<TaskRow> for TaskData {
    fn from(row: TaskRow) -> Self {
        Self {
            task_id: row.task_id,
            organization_id: row.organization_id,
            title: row.title,
            project: row.project,
            due_date: row.due_date,
            priority: row.priority,
            assignee_user_id: row.assignee_user_id,
            pending_assignee_user_id: row.pending_assignee_user_id,
            last_reminded_at: row.last_reminded_at,
        }
    }
}

/// Retrieves a task by ID.
///
/// # Errors
///
/// Returns `TaskNotFound` if the task does not exist.
pub fn get_task(conn: &mut SqliteConnection, task_id: i64) -> Result<TaskData, PersistenceError> {
    let result: Result<TaskRow, diesel::result::Error> = tasks::table
        .filter(tasks::task_id.eq(task_id))
        .select(TaskRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(row.into()),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::TaskNotFound(task_id)),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a set of tasks by ID.
///
/// The result is ordered by task id; missing ids are simply absent, so
/// callers that need all of them must compare lengths.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_tasks(
    conn: &mut SqliteConnection,
    task_ids: &[i64],
) -> Result<Vec<TaskData>, PersistenceError> {
    let rows: Vec<TaskRow> = tasks::table
        .filter(tasks::task_id.eq_any(task_ids))
        .select(TaskRow::as_select())
        .order_by(tasks::task_id.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Whether an assignment row exists for `(task, user)`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn assignment_exists(
    conn: &mut SqliteConnection,
    task_id: i64,
    user_id: i64,
) -> Result<bool, PersistenceError> {
    Ok(select(exists(
        task_assignments::table
            .filter(task_assignments::task_id.eq(task_id))
            .filter(task_assignments::user_id.eq(user_id)),
    ))
    .get_result(conn)?)
}

/// Lists all tasks awaiting assignment acceptance.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn tasks_with_pending_assignee(
    conn: &mut SqliteConnection,
) -> Result<Vec<TaskData>, PersistenceError> {
    let rows: Vec<TaskRow> = tasks::table
        .filter(tasks::pending_assignee_user_id.is_not_null())
        .select(TaskRow::as_select())
        .order_by(tasks::task_id.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Retrieves an organization member by ID.
///
/// # Errors
///
/// Returns `UserNotFound` if the user does not exist.
pub fn get_user(conn: &mut SqliteConnection, user_id: i64) -> Result<UserData, PersistenceError> {
    let result: Result<(i64, i64, String, String), diesel::result::Error> = users::table
        .filter(users::user_id.eq(user_id))
        .select((
            users::user_id,
            users::organization_id,
            users::display_name,
            users::email,
        ))
        .first(conn);

    match result {
        Ok((user_id, organization_id, display_name, email)) => Ok(UserData {
            user_id,
            organization_id,
            display_name,
            email,
        }),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::UserNotFound(user_id)),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
