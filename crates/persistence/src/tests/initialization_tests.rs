// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;

#[test]
fn test_in_memory_database_enforces_foreign_keys() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first = Persistence::new_in_memory().unwrap();
    let mut second = Persistence::new_in_memory().unwrap();

    first
        .create_user(
            "solo",
            "Solo",
            "password123",
            evently_domain::Role::User,
            &std::collections::BTreeSet::new(),
        )
        .unwrap();

    assert!(first.get_user_by_login("solo").unwrap().is_some());
    assert!(second.get_user_by_login("solo").unwrap().is_none());
}
