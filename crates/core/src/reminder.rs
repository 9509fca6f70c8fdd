// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::{Duration, OffsetDateTime};

/// Minimum spacing between two reminders for the same task.
pub const REMINDER_INTERVAL: Duration = Duration::hours(1);

/// Whether a pending-assignment reminder may be sent for a task.
///
/// A task that has never been reminded is always due. Otherwise a full
/// [`REMINDER_INTERVAL`] must have elapsed since the previous reminder,
/// so repeated sweep invocations inside the window send nothing.
///
/// # Arguments
///
/// * `last_reminded_at` - When the task was last reminded, if ever
/// * `now` - The current time
#[must_use]
pub fn reminder_due(last_reminded_at: Option<OffsetDateTime>, now: OffsetDateTime) -> bool {
    match last_reminded_at {
        None => true,
        Some(previous) => now - previous >= REMINDER_INTERVAL,
    }
}
