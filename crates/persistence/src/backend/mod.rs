// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-specific persistence utilities.
//!
//! `SQLite` is the only supported backend. All domain queries and
//! mutations are expressed in backend-agnostic Diesel DSL and live in
//! `queries/` and `mutations/`; this module is limited to connection
//! initialization, migrations, and `SQLite`-specific PRAGMA handling.

pub mod sqlite;
