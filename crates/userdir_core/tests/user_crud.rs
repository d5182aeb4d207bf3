use std::collections::HashSet;
use userdir_core::db::open_db_in_memory;
use userdir_core::{
    RepoError, SqliteUserRepository, UserDetails, UserRepository, UserValidationError,
};

#[test]
fn save_assigns_id_and_makes_user_retrievable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let mut user = UserDetails::new("Alice", "alice@x.com").with_full_name("Alice Liddell");
    let id = repo.save(&mut user).unwrap();

    assert_eq!(user.id, Some(id));
    assert!(user.created_at.is_some());

    let by_id = repo.get_by_id(id).unwrap().unwrap();
    assert_eq!(by_id, user);
    assert_eq!(repo.get_by_name("Alice").unwrap().unwrap(), user);
    assert_eq!(repo.get_by_email("alice@x.com").unwrap().unwrap(), user);
}

#[test]
fn save_assigns_fresh_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let mut ids = HashSet::new();
    for idx in 0..5 {
        let mut user = UserDetails::new(format!("user{idx}"), format!("user{idx}@x.com"));
        assert!(ids.insert(repo.save(&mut user).unwrap()));
    }
    assert_eq!(repo.count().unwrap(), 5);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let first = repo
        .save(&mut UserDetails::new("alice", "alice@x.com"))
        .unwrap();
    conn.execute("DELETE FROM users WHERE id = ?1;", [first])
        .unwrap();

    let second = repo
        .save(&mut UserDetails::new("bob", "bob@x.com"))
        .unwrap();
    assert!(second > first);
}

#[test]
fn lookups_ignore_case() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let mut alice = UserDetails::new("Alice", "alice@x.com");
    repo.save(&mut alice).unwrap();

    assert_eq!(repo.get_by_name("ALICE").unwrap(), Some(alice.clone()));
    assert_eq!(repo.get_by_name("alice").unwrap(), Some(alice.clone()));
    assert_eq!(repo.get_by_email("Alice@X.COM").unwrap(), Some(alice));
}

#[test]
fn lookups_are_exact_not_substring() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    repo.save(&mut UserDetails::new("Alice", "alice@x.com"))
        .unwrap();

    assert!(repo.get_by_name("Ali").unwrap().is_none());
    assert!(repo.get_by_name("Alice%").unwrap().is_none());
    assert!(repo.get_by_email("x.com").unwrap().is_none());
}

#[test]
fn missing_users_are_absent_not_errors() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    assert!(repo.get_by_id(42).unwrap().is_none());
    assert!(repo.get_by_name("nobody").unwrap().is_none());
    assert!(repo.get_by_email("nobody@x.com").unwrap().is_none());
}

#[test]
fn duplicate_name_or_email_is_a_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    repo.save(&mut UserDetails::new("Alice", "alice@x.com"))
        .unwrap();

    let mut same_name = UserDetails::new("aLiCe", "other@x.com");
    let err = repo.save(&mut same_name).unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
    assert_eq!(same_name.id, None);

    let mut same_email = UserDetails::new("carol", "ALICE@x.com");
    let err = repo.save(&mut same_email).unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
    assert_eq!(same_email.id, None);

    assert_eq!(repo.count().unwrap(), 1);
    assert!(repo.get_by_name("carol").unwrap().is_none());
}

#[test]
fn invalid_user_is_rejected_before_insert() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let err = repo
        .save(&mut UserDetails::new("alice", "not-an-email"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(UserValidationError::InvalidEmail(_))
    ));
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn saving_a_persisted_user_again_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let mut user = UserDetails::new("alice", "alice@x.com");
    let id = repo.save(&mut user).unwrap();

    let err = repo.save(&mut user).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(UserValidationError::AlreadyPersisted(existing)) if existing == id
    ));
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn corrupted_rows_surface_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    conn.execute(
        "INSERT INTO users (name, email) VALUES ('broken', 'no-at-sign');",
        [],
    )
    .unwrap();

    let err = repo.get_by_name("broken").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn lookups_and_uniqueness_fold_non_ascii_case() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let mut emile = UserDetails::new("Émile", "émile@x.com");
    repo.save(&mut emile).unwrap();

    assert_eq!(repo.get_by_email("ÉMILE@X.COM").unwrap(), Some(emile.clone()));
    assert_eq!(repo.get_by_name("éMILE").unwrap(), Some(emile.clone()));

    let err = repo.save(&mut UserDetails::new("ÉMILE", "other@x.com")).unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));

    let err = repo.save(&mut UserDetails::new("emile2", "Émile@X.com")).unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
    assert_eq!(repo.count().unwrap(), 1);
}
