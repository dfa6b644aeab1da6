//! Integration tests for the seed fixtures.

use taskboard::auth::verify_password;
use taskboard::db::seed::{self, FIXTURE_PASSWORD};
use taskboard::db::Database;

fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

#[test]
fn seed_populates_fixture_counts() {
    let db = setup_db();

    let summary = seed::run(&db).unwrap();

    assert_eq!(db.list_users().unwrap().len(), summary.users);
    assert_eq!(db.list_tags().unwrap().len(), summary.tags);
    assert_eq!(db.list_tasks().unwrap().len(), summary.tasks);
}

#[test]
fn seed_twice_does_not_duplicate_rows() {
    let db = setup_db();

    let first = seed::run(&db).unwrap();
    let second = seed::run(&db).unwrap();

    assert_eq!(first, second);
    assert_eq!(db.list_users().unwrap().len(), second.users);
    assert_eq!(db.list_tags().unwrap().len(), second.tags);
    assert_eq!(db.list_tasks().unwrap().len(), second.tasks);
}

#[test]
fn seed_clears_rows_from_previous_runs() {
    let db = setup_db();
    seed::run(&db).unwrap();
    let stale_ids: Vec<String> = db.list_tasks().unwrap().into_iter().map(|t| t.id).collect();

    seed::run(&db).unwrap();

    // Fresh ids every run; none of the old rows survive
    for id in stale_ids {
        assert!(db.get_task(&id).unwrap().is_none());
    }
}

#[test]
fn seeded_users_share_a_valid_password_hash() {
    let db = setup_db();
    seed::run(&db).unwrap();

    let users = db.list_users().unwrap();
    assert!(!users.is_empty());
    for user in users {
        assert!(user.password.starts_with("$argon2id$"));
        assert!(verify_password(FIXTURE_PASSWORD, &user.password).unwrap());
    }
}

#[test]
fn seeded_tasks_reference_seeded_users_and_tags() {
    let db = setup_db();
    seed::run(&db).unwrap();

    let mut saw_assignee = false;
    let mut saw_tag = false;
    for task in db.list_tasks().unwrap() {
        if let Some(user_id) = &task.assigned_to_id {
            assert!(db.get_user(user_id).unwrap().is_some());
            saw_assignee = true;
        }
        for tag in &task.tags {
            assert!(db.get_tag(&tag.id).unwrap().is_some());
            saw_tag = true;
        }
    }
    assert!(saw_assignee);
    assert!(saw_tag);
}

#[test]
fn seed_includes_completed_and_open_tasks() {
    let db = setup_db();
    seed::run(&db).unwrap();

    let tasks = db.list_tasks().unwrap();
    assert!(tasks.iter().any(|t| t.completed));
    assert!(tasks.iter().any(|t| !t.completed));
}
