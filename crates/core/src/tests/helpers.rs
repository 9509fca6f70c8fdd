// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test fixtures for merge and revert planning.

use crate::snapshot::TaskSnapshot;

pub const SOURCE_USER: i64 = 10;
pub const TARGET_USER: i64 = 20;

pub fn snapshot(task_id: i64) -> TaskSnapshot {
    TaskSnapshot::new(
        task_id,
        format!("Task {task_id}"),
        Some(String::from("Q3 close")),
        Some(String::from("2026-09-30")),
        Some(String::from("high")),
    )
}

pub fn snapshots(task_ids: &[i64]) -> Vec<TaskSnapshot> {
    task_ids.iter().copied().map(snapshot).collect()
}
