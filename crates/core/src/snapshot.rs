// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Display fields of one transferred task, captured at merge time.
///
/// Snapshots are historical: they are written once when the merge is
/// performed and are never refreshed, even if the task changes later.
/// The revert path reads task ids from here, not from a live query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    /// The transferred task's id.
    pub task_id: i64,
    /// The task title at merge time.
    pub title: String,
    /// The project label at merge time.
    pub project: Option<String>,
    /// The due date (`YYYY-MM-DD`) at merge time.
    pub due_date: Option<String>,
    /// The priority label at merge time.
    pub priority: Option<String>,
}

impl TaskSnapshot {
    /// Creates a new `TaskSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `task_id` - The transferred task's id
    /// * `title` - The task title at merge time
    /// * `project` - The project label at merge time
    /// * `due_date` - The due date at merge time
    /// * `priority` - The priority label at merge time
    #[must_use]
    pub const fn new(
        task_id: i64,
        title: String,
        project: Option<String>,
        due_date: Option<String>,
        priority: Option<String>,
    ) -> Self {
        Self {
            task_id,
            title,
            project,
            due_date,
            priority,
        }
    }
}
