use std::sync::{Arc, Barrier};
use std::thread;
use userdir_core::db::open_db;
use userdir_core::{QueryParam, RepoError, SqliteUserRepository, UserDetails, UserRepository};

const WRITERS: usize = 4;
const USERS_PER_WRITER: usize = 10;

#[test]
fn writers_on_separate_connections_do_not_interfere() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");
    drop(open_db(&path).unwrap());

    let barrier = Arc::new(Barrier::new(WRITERS));
    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let repo = SqliteUserRepository::try_new(&conn).unwrap();
                barrier.wait();
                for idx in 0..USERS_PER_WRITER {
                    let mut user = UserDetails::new(
                        format!("w{writer}-u{idx}"),
                        format!("w{writer}-u{idx}@x.com"),
                    );
                    repo.save(&mut user).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let all = repo.find(&QueryParam::all()).unwrap();
    assert_eq!(all.len(), WRITERS * USERS_PER_WRITER);
    assert_eq!(repo.count().unwrap(), (WRITERS * USERS_PER_WRITER) as u64);

    let mut ids: Vec<_> = all.iter().filter_map(|user| user.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), WRITERS * USERS_PER_WRITER);
}

#[test]
fn racing_duplicate_inserts_leave_exactly_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");
    drop(open_db(&path).unwrap());

    let barrier = Arc::new(Barrier::new(WRITERS));
    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let repo = SqliteUserRepository::try_new(&conn).unwrap();
                barrier.wait();
                repo.save(&mut UserDetails::new("alice", "alice@x.com"))
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    let saved = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(saved, 1);
    assert!(results
        .iter()
        .filter_map(|result| result.as_ref().err())
        .all(|err| matches!(err, RepoError::ConstraintViolation(_))));

    let conn = open_db(&path).unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count().unwrap(), 1);
}
