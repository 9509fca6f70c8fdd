// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! All mutations use Diesel DSL; the only backend-specific helper is
//! `last_insert_rowid()` from the `backend::sqlite` module. Multi-step
//! sequences that must not interleave (the per-task merge/revert steps)
//! run inside a single Diesel transaction.

use time::OffsetDateTime;

use crate::error::PersistenceError;

pub mod activity;
pub mod bootstrap;
pub mod files;
pub mod invitations;
pub mod merge;
pub mod notifications;
pub mod operators;
pub mod tasks;

/// Renders the current UTC time in the storage timestamp format.
pub(crate) fn now_timestamp() -> Result<String, PersistenceError> {
    dealroom_domain::render_timestamp(OffsetDateTime::now_utc())
        .map_err(|e| PersistenceError::Other(format!("Failed to render timestamp: {e}")))
}
