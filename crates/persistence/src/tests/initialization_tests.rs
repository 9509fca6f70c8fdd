// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first: Persistence = Persistence::new_in_memory().unwrap();
    let mut second: Persistence = Persistence::new_in_memory().unwrap();

    first.create_organization("Only in first").unwrap();

    assert_eq!(first.count_operators().unwrap(), 0);
    assert!(second.get_organization(1).is_err());
}

#[test]
fn test_foreign_key_enforcement_is_active() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    persistence.verify_foreign_key_enforcement().unwrap();

    // And it actually bites: a child row without its parent is refused.
    assert!(persistence.create_data_room(12345, "Orphan room").is_err());
}
