// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the DealRoom guest access system.
//!
//! This crate provides database persistence for invitations, files and
//! their version chains, permission grants, activity events, tasks,
//! merge logs, and operator accounts. It is built on Diesel over
//! `SQLite`.
//!
//! ## Testing Philosophy
//!
//! - Standard tests (`cargo test`) run against unique in-memory
//!   databases; the atomic counter in `new_in_memory()` guarantees
//!   deterministic isolation without time-based collisions
//! - File-backed databases get WAL mode for better read concurrency
//! - Foreign key enforcement is verified at startup and treated as a
//!   hard requirement

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use dealroom::TaskSnapshot;
use dealroom_audit::ActivityEvent;
use dealroom_domain::MergeStatus;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    ActivityEventData, DataRoomData, FileContentData, FileData, InvitationData, MergeLogData,
    NewFile, NotificationData, OperatorData, OrganizationData, SessionData, TaskData, UserData,
};
pub use error::PersistenceError;
pub use queries::operators::verify_password;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
///
/// All reads and writes go through this adapter; the underlying modules
/// are not public. Multi-step invariant-preserving sequences (the
/// per-task merge and revert steps) run inside a transaction internally.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_test_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Tenant directory
    // ========================================================================

    /// Creates a new organization.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn create_organization(&mut self, name: &str) -> Result<i64, PersistenceError> {
        mutations::bootstrap::create_organization(&mut self.conn, name)
    }

    /// Retrieves an organization by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the organization does not exist.
    pub fn get_organization(
        &mut self,
        organization_id: i64,
    ) -> Result<OrganizationData, PersistenceError> {
        queries::rooms::get_organization(&mut self.conn, organization_id)
    }

    /// Creates a new data room.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn create_data_room(
        &mut self,
        organization_id: i64,
        name: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::bootstrap::create_data_room(&mut self.conn, organization_id, name)
    }

    /// Retrieves a data room by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the room does not exist.
    pub fn get_data_room(&mut self, data_room_id: i64) -> Result<DataRoomData, PersistenceError> {
        queries::rooms::get_data_room(&mut self.conn, data_room_id)
    }

    /// Creates a new organization member.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn create_user(
        &mut self,
        organization_id: i64,
        display_name: &str,
        email: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::bootstrap::create_user(&mut self.conn, organization_id, display_name, email)
    }

    /// Retrieves an organization member by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist.
    pub fn get_user(&mut self, user_id: i64) -> Result<UserData, PersistenceError> {
        queries::tasks::get_user(&mut self.conn, user_id)
    }

    /// Creates a new task.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    #[allow(clippy::too_many_arguments)]
    pub fn create_task(
        &mut self,
        organization_id: i64,
        title: &str,
        project: Option<&str>,
        due_date: Option<&str>,
        priority: Option<&str>,
        assignee_user_id: Option<i64>,
        pending_assignee_user_id: Option<i64>,
    ) -> Result<i64, PersistenceError> {
        mutations::bootstrap::create_task(
            &mut self.conn,
            organization_id,
            title,
            project,
            due_date,
            priority,
            assignee_user_id,
            pending_assignee_user_id,
        )
    }

    // ========================================================================
    // Operators & sessions
    // ========================================================================

    /// Creates a new operator.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails or the login name is taken.
    pub fn create_operator(
        &mut self,
        login_name: &str,
        display_name: &str,
        password: &str,
        role: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::operators::create_operator(
            &mut self.conn,
            login_name,
            display_name,
            password,
            role,
        )
    }

    /// Retrieves an operator by login name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_operator_by_login(
        &mut self,
        login_name: &str,
    ) -> Result<Option<OperatorData>, PersistenceError> {
        queries::operators::get_operator_by_login(&mut self.conn, login_name)
    }

    /// Retrieves an operator by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_operator_by_id(
        &mut self,
        operator_id: i64,
    ) -> Result<Option<OperatorData>, PersistenceError> {
        queries::operators::get_operator_by_id(&mut self.conn, operator_id)
    }

    /// Lists all operators.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_operators(&mut self) -> Result<Vec<OperatorData>, PersistenceError> {
        queries::operators::list_operators(&mut self.conn)
    }

    /// Counts the total number of operators.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_operators(&mut self) -> Result<i64, PersistenceError> {
        queries::operators::count_operators(&mut self.conn)
    }

    /// Disables an operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator does not exist.
    pub fn disable_operator(&mut self, operator_id: i64) -> Result<(), PersistenceError> {
        mutations::operators::disable_operator(&mut self.conn, operator_id)
    }

    /// Updates the last login timestamp for an operator.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn update_last_login(&mut self, operator_id: i64) -> Result<(), PersistenceError> {
        mutations::operators::update_last_login(&mut self.conn, operator_id)
    }

    /// Creates a new session for an operator.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        operator_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::operators::create_session(&mut self.conn, session_token, operator_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::operators::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::operators::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token (logout).
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::operators::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all expired sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        mutations::operators::delete_expired_sessions(&mut self.conn)
    }

    // ========================================================================
    // Invitations
    // ========================================================================

    /// Creates a new guest invitation in `pending` status.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    #[allow(clippy::too_many_arguments)]
    pub fn create_invitation(
        &mut self,
        data_room_id: i64,
        organization_id: i64,
        email: &str,
        guest_name: Option<&str>,
        access_password_hash: &str,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::invitations::create_invitation(
            &mut self.conn,
            data_room_id,
            organization_id,
            email,
            guest_name,
            access_password_hash,
            expires_at,
        )
    }

    /// Finds the authoritative (latest-expiring, non-revoked) invitation
    /// for an email, optionally scoped to one room.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_latest_invitation(
        &mut self,
        email: &str,
        data_room_id: Option<i64>,
    ) -> Result<Option<InvitationData>, PersistenceError> {
        queries::invitations::find_latest_invitation(&mut self.conn, email, data_room_id)
    }

    /// Retrieves an invitation by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the invitation does not exist.
    pub fn get_invitation(&mut self, invitation_id: i64) -> Result<InvitationData, PersistenceError> {
        queries::invitations::get_invitation(&mut self.conn, invitation_id)
    }

    /// Lists all invitations for a data room.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_invitations_for_room(
        &mut self,
        data_room_id: i64,
    ) -> Result<Vec<InvitationData>, PersistenceError> {
        queries::invitations::list_invitations_for_room(&mut self.conn, data_room_id)
    }

    /// Sets an invitation's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the invitation does not exist.
    pub fn set_invitation_status(
        &mut self,
        invitation_id: i64,
        status: &str,
    ) -> Result<(), PersistenceError> {
        mutations::invitations::set_invitation_status(&mut self.conn, invitation_id, status)
    }

    /// Records the NDA signature timestamp for an invitation.
    ///
    /// # Errors
    ///
    /// Returns an error if the invitation does not exist.
    pub fn set_nda_signed(
        &mut self,
        invitation_id: i64,
        signed_at: &str,
    ) -> Result<(), PersistenceError> {
        mutations::invitations::set_nda_signed(&mut self.conn, invitation_id, signed_at)
    }

    // ========================================================================
    // Files, version chains, contents, grants
    // ========================================================================

    /// Inserts a new file row (upload or restore clone).
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn insert_file(&mut self, file: &NewFile) -> Result<i64, PersistenceError> {
        mutations::files::insert_file(&mut self.conn, file)
    }

    /// Retrieves a non-deleted file by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is soft-deleted.
    pub fn get_file(&mut self, file_id: i64) -> Result<FileData, PersistenceError> {
        queries::files::get_file(&mut self.conn, file_id)
    }

    /// Lists a version chain, newest version first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_chain(&mut self, root_id: i64) -> Result<Vec<FileData>, PersistenceError> {
        queries::files::list_chain(&mut self.conn, root_id)
    }

    /// Returns the highest version number present in a chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain does not exist.
    pub fn max_version_in_chain(&mut self, root_id: i64) -> Result<i32, PersistenceError> {
        queries::files::max_version_in_chain(&mut self.conn, root_id)
    }

    /// Updates a file's review status.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist.
    pub fn update_file_status(
        &mut self,
        file_id: i64,
        status: &str,
    ) -> Result<(), PersistenceError> {
        mutations::files::update_file_status(&mut self.conn, file_id, status)
    }

    /// Soft-deletes a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist.
    pub fn soft_delete_file(&mut self, file_id: i64) -> Result<(), PersistenceError> {
        mutations::files::soft_delete_file(&mut self.conn, file_id)
    }

    /// Sets a file's restriction flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist.
    pub fn set_file_restriction(
        &mut self,
        file_id: i64,
        restricted: bool,
    ) -> Result<(), PersistenceError> {
        mutations::files::set_file_restriction(&mut self.conn, file_id, restricted)
    }

    /// Writes the document content row for a file version.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn upsert_file_content(
        &mut self,
        file_id: i64,
        body: &str,
    ) -> Result<(), PersistenceError> {
        mutations::files::upsert_file_content(&mut self.conn, file_id, body)
    }

    /// Retrieves the document content row for a file version.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_file_content(
        &mut self,
        file_id: i64,
    ) -> Result<Option<FileContentData>, PersistenceError> {
        queries::files::get_file_content(&mut self.conn, file_id)
    }

    /// Creates or updates an explicit permission grant.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn upsert_permission_grant(
        &mut self,
        file_id: i64,
        invitation_id: i64,
        level: &str,
    ) -> Result<(), PersistenceError> {
        mutations::files::upsert_permission_grant(&mut self.conn, file_id, invitation_id, level)
    }

    /// Retrieves the permission grant level for `(file, invitation)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_permission_grant(
        &mut self,
        file_id: i64,
        invitation_id: i64,
    ) -> Result<Option<String>, PersistenceError> {
        queries::files::get_permission_grant(&mut self.conn, file_id, invitation_id)
    }

    // ========================================================================
    // Activity events
    // ========================================================================

    /// Appends one activity event row.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn insert_activity_event(&mut self, event: &ActivityEvent) -> Result<i64, PersistenceError> {
        mutations::activity::insert_activity_event(&mut self.conn, event)
    }

    /// Lists a room's activity feed, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_activity_for_room(
        &mut self,
        data_room_id: i64,
    ) -> Result<Vec<ActivityEventData>, PersistenceError> {
        queries::activity::list_activity_for_room(&mut self.conn, data_room_id)
    }

    // ========================================================================
    // Tasks & merge engine
    // ========================================================================

    /// Retrieves a task by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the task does not exist.
    pub fn get_task(&mut self, task_id: i64) -> Result<TaskData, PersistenceError> {
        queries::tasks::get_task(&mut self.conn, task_id)
    }

    /// Retrieves a set of tasks by ID, ordered by task id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_tasks(&mut self, task_ids: &[i64]) -> Result<Vec<TaskData>, PersistenceError> {
        queries::tasks::get_tasks(&mut self.conn, task_ids)
    }

    /// Whether an assignment row exists for `(task, user)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn assignment_exists(
        &mut self,
        task_id: i64,
        user_id: i64,
    ) -> Result<bool, PersistenceError> {
        queries::tasks::assignment_exists(&mut self.conn, task_id, user_id)
    }

    /// Lists all tasks awaiting assignment acceptance.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn tasks_with_pending_assignee(&mut self) -> Result<Vec<TaskData>, PersistenceError> {
        queries::tasks::tasks_with_pending_assignee(&mut self.conn)
    }

    /// Transfers one task's assignment to the merge target, atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the task does not exist or any step fails.
    pub fn apply_task_transfer(
        &mut self,
        task_id: i64,
        target_user_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::tasks::apply_task_transfer(&mut self.conn, task_id, target_user_id)
    }

    /// Restores one task's assignment to the merge source, atomically.
    ///
    /// This is the privileged reassignment path; it is intended to be
    /// called only by the merge/revert engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the task does not exist or any step fails.
    pub fn apply_task_restore(
        &mut self,
        task_id: i64,
        source_user_id: i64,
        target_user_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::tasks::apply_task_restore(&mut self.conn, task_id, source_user_id, target_user_id)
    }

    /// Records when a pending-assignment reminder was last sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the task does not exist.
    pub fn set_task_last_reminded(
        &mut self,
        task_id: i64,
        reminded_at: &str,
    ) -> Result<(), PersistenceError> {
        mutations::tasks::set_task_last_reminded(&mut self.conn, task_id, reminded_at)
    }

    /// Creates a merge log entry.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_merge_log(
        &mut self,
        organization_id: i64,
        performed_by: i64,
        source_user_id: i64,
        target_user_id: i64,
        merge_type: &str,
        temporary_end_date: Option<&str>,
        snapshots: &[TaskSnapshot],
        status: MergeStatus,
    ) -> Result<i64, PersistenceError> {
        mutations::merge::insert_merge_log(
            &mut self.conn,
            organization_id,
            performed_by,
            source_user_id,
            target_user_id,
            merge_type,
            temporary_end_date,
            snapshots,
            status,
        )
    }

    /// Retrieves a merge log entry by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist.
    pub fn get_merge_log(&mut self, merge_log_id: i64) -> Result<MergeLogData, PersistenceError> {
        queries::merge::get_merge_log(&mut self.conn, merge_log_id)
    }

    /// Lists an organization's merge log entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_merge_logs(
        &mut self,
        organization_id: i64,
    ) -> Result<Vec<MergeLogData>, PersistenceError> {
        queries::merge::list_merge_logs(&mut self.conn, organization_id)
    }

    /// Lists temporary merges due for automatic reversion.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn pending_reverts_due(
        &mut self,
        today: &str,
    ) -> Result<Vec<MergeLogData>, PersistenceError> {
        queries::merge::pending_reverts_due(&mut self.conn, today)
    }

    /// Marks a merge log entry as reverted.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist.
    pub fn mark_merge_reverted(&mut self, merge_log_id: i64) -> Result<(), PersistenceError> {
        mutations::merge::mark_merge_reverted(&mut self.conn, merge_log_id)
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Inserts a notification addressed to an operator.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn notify_operator(
        &mut self,
        operator_id: i64,
        message: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::notifications::notify_operator(&mut self.conn, operator_id, message)
    }

    /// Inserts a notification addressed to an organization member.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn notify_user(&mut self, user_id: i64, message: &str) -> Result<i64, PersistenceError> {
        mutations::notifications::notify_user(&mut self.conn, user_id, message)
    }

    /// Lists notifications addressed to an operator, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_operator_notifications(
        &mut self,
        operator_id: i64,
    ) -> Result<Vec<NotificationData>, PersistenceError> {
        queries::notifications::list_operator_notifications(&mut self.conn, operator_id)
    }

    /// Lists notifications addressed to an organization member, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_user_notifications(
        &mut self,
        user_id: i64,
    ) -> Result<Vec<NotificationData>, PersistenceError> {
        queries::notifications::list_user_notifications(&mut self.conn, user_id)
    }
}
