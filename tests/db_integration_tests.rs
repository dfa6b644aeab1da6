//! Integration tests for the database layer.
//!
//! These tests verify the core database operations using an in-memory
//! SQLite database. Tests are organized by entity.

use taskboard::db::Database;
use taskboard::error::{ApiError, ErrorCode};
use taskboard::types::{
    CreateTaskInput, CreateUserInput, Priority, Role, TaskStatus, UpdateTaskInput,
};

/// Helper to create a fresh in-memory database for testing.
fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

fn task_input(title: &str) -> CreateTaskInput {
    CreateTaskInput {
        title: Some(title.to_string()),
        ..Default::default()
    }
}

fn user_input(name: &str, email: &str) -> CreateUserInput {
    CreateUserInput {
        name: name.to_string(),
        email: email.to_string(),
        password: "$argon2id$placeholder".to_string(),
        role: Role::User,
    }
}

fn error_code(err: anyhow::Error) -> ErrorCode {
    err.downcast::<ApiError>().expect("expected ApiError").code
}

mod task_tests {
    use super::*;

    #[test]
    fn create_task_applies_defaults() {
        let db = setup_db();

        let task = db.create_task(task_input("Write spec")).unwrap();

        assert_eq!(task.title, "Write spec");
        assert!(task.description.is_none());
        assert!(!task.completed);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.due_date.is_none());
        assert!(task.assigned_to_id.is_none());
        assert!(task.tags.is_empty());
        assert!(task.created_at > 0);
    }

    #[test]
    fn create_task_ids_are_unique() {
        let db = setup_db();

        let mut ids: Vec<String> = (0..20)
            .map(|i| db.create_task(task_input(&format!("task {}", i))).unwrap().id)
            .collect();

        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn create_task_rejects_missing_title_without_mutation() {
        let db = setup_db();

        let err = db.create_task(CreateTaskInput::default()).unwrap_err();

        assert_eq!(error_code(err), ErrorCode::MissingRequiredField);
        assert!(db.list_tasks().unwrap().is_empty());
    }

    #[test]
    fn create_task_rejects_blank_title() {
        let db = setup_db();

        let err = db.create_task(task_input("   ")).unwrap_err();

        assert_eq!(error_code(err), ErrorCode::MissingRequiredField);
        assert!(db.list_tasks().unwrap().is_empty());
    }

    #[test]
    fn create_task_rejects_unknown_assignee_without_mutation() {
        let db = setup_db();

        let err = db
            .create_task(CreateTaskInput {
                title: Some("assigned".to_string()),
                assigned_to_id: Some("no-such-user".to_string()),
                ..Default::default()
            })
            .unwrap_err();

        assert_eq!(error_code(err), ErrorCode::UserNotFound);
        assert!(db.list_tasks().unwrap().is_empty());
    }

    #[test]
    fn create_task_rejects_unknown_tag_without_mutation() {
        let db = setup_db();

        let err = db
            .create_task(CreateTaskInput {
                title: Some("tagged".to_string()),
                tags: Some(vec!["no-such-tag".to_string()]),
                ..Default::default()
            })
            .unwrap_err();

        assert_eq!(error_code(err), ErrorCode::TagNotFound);
        assert!(db.list_tasks().unwrap().is_empty());
    }

    #[test]
    fn create_task_associates_existing_tags() {
        let db = setup_db();
        let docs = db.create_tag("docs").unwrap();
        let backend = db.create_tag("backend").unwrap();

        let task = db
            .create_task(CreateTaskInput {
                title: Some("tagged".to_string()),
                tags: Some(vec![docs.id.clone(), backend.id.clone()]),
                ..Default::default()
            })
            .unwrap();

        // Ordered by tag name
        let names: Vec<&str> = task.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["backend", "docs"]);
    }

    #[test]
    fn get_task_returns_none_for_unknown_id() {
        let db = setup_db();

        let result = db.get_task("unknown-task-id").unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn list_tasks_preserves_insertion_order() {
        let db = setup_db();
        let first = db.create_task(task_input("first")).unwrap();
        let second = db.create_task(task_input("second")).unwrap();
        let third = db.create_task(task_input("third")).unwrap();

        let tasks = db.list_tasks().unwrap();

        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![&first.id, &second.id, &third.id]);
    }

    #[test]
    fn update_task_touches_only_supplied_fields() {
        let db = setup_db();
        let task = db
            .create_task(CreateTaskInput {
                title: Some("original".to_string()),
                description: Some("keep me".to_string()),
                priority: Some(Priority::High),
                ..Default::default()
            })
            .unwrap();

        let updated = db
            .update_task(
                &task.id,
                UpdateTaskInput {
                    status: Some(TaskStatus::InProgress),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(updated.title, "original");
        assert_eq!(updated.description.as_deref(), Some("keep me"));
        assert_eq!(updated.priority, Priority::High);

        // Read-after-write: the stored row agrees
        let fetched = db.get_task(&task.id).unwrap().unwrap();
        assert_eq!(fetched.description.as_deref(), Some("keep me"));
        assert_eq!(fetched.status, TaskStatus::InProgress);
    }

    #[test]
    fn update_task_clears_nullable_fields_on_explicit_null() {
        let db = setup_db();
        let task = db
            .create_task(CreateTaskInput {
                title: Some("with description".to_string()),
                description: Some("to be removed".to_string()),
                ..Default::default()
            })
            .unwrap();

        let updated = db
            .update_task(
                &task.id,
                UpdateTaskInput {
                    description: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(updated.description.is_none());
    }

    #[test]
    fn update_task_rejects_blank_title() {
        let db = setup_db();
        let task = db.create_task(task_input("fine")).unwrap();

        let err = db
            .update_task(
                &task.id,
                UpdateTaskInput {
                    title: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert_eq!(error_code(err), ErrorCode::InvalidFieldValue);
        assert_eq!(db.get_task(&task.id).unwrap().unwrap().title, "fine");
    }

    #[test]
    fn update_task_fails_for_unknown_id() {
        let db = setup_db();

        let err = db
            .update_task(
                "unknown-task-id",
                UpdateTaskInput {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert_eq!(error_code(err), ErrorCode::TaskNotFound);
    }

    #[test]
    fn toggle_complete_twice_restores_original_value() {
        let db = setup_db();
        let task = db.create_task(task_input("toggle me")).unwrap();
        assert!(!task.completed);

        let toggled = db
            .update_task(
                &task.id,
                UpdateTaskInput {
                    completed: Some(!task.completed),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(toggled.completed);

        let restored = db
            .update_task(
                &task.id,
                UpdateTaskInput {
                    completed: Some(!toggled.completed),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(restored.completed, task.completed);
    }

    #[test]
    fn update_task_replaces_tag_set() {
        let db = setup_db();
        let docs = db.create_tag("docs").unwrap();
        let backend = db.create_tag("backend").unwrap();
        let task = db
            .create_task(CreateTaskInput {
                title: Some("retag".to_string()),
                tags: Some(vec![docs.id.clone()]),
                ..Default::default()
            })
            .unwrap();

        let updated = db
            .update_task(
                &task.id,
                UpdateTaskInput {
                    tags: Some(vec![backend.id.clone()]),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.tags.len(), 1);
        assert_eq!(updated.tags[0].name, "backend");
    }

    #[test]
    fn delete_task_removes_row() {
        let db = setup_db();
        let task = db.create_task(task_input("doomed")).unwrap();

        db.delete_task(&task.id).unwrap();

        assert!(db.get_task(&task.id).unwrap().is_none());
    }

    #[test]
    fn delete_task_fails_for_unknown_id() {
        let db = setup_db();

        let err = db.delete_task("unknown-task-id").unwrap_err();

        assert_eq!(error_code(err), ErrorCode::TaskNotFound);
    }

    #[test]
    fn delete_task_leaves_tags_and_assignee_intact() {
        let db = setup_db();
        let tag = db.create_tag("survivor").unwrap();
        let user = db.create_user(user_input("Owner", "owner@example.com")).unwrap();
        let task = db
            .create_task(CreateTaskInput {
                title: Some("linked".to_string()),
                assigned_to_id: Some(user.id.clone()),
                tags: Some(vec![tag.id.clone()]),
                ..Default::default()
            })
            .unwrap();

        db.delete_task(&task.id).unwrap();

        assert!(db.get_tag(&tag.id).unwrap().is_some());
        assert!(db.get_user(&user.id).unwrap().is_some());
    }
}

mod user_tests {
    use super::*;

    #[test]
    fn create_user_assigns_id_and_role() {
        let db = setup_db();

        let user = db.create_user(user_input("Alice", "alice@example.com")).unwrap();

        assert!(!user.id.is_empty());
        assert_eq!(user.role, Role::User);
        assert!(user.created_at > 0);
    }

    #[test]
    fn create_user_rejects_duplicate_email() {
        let db = setup_db();
        db.create_user(user_input("Alice", "alice@example.com"))
            .unwrap();

        let err = db
            .create_user(user_input("Other Alice", "alice@example.com"))
            .unwrap_err();

        assert_eq!(error_code(err), ErrorCode::AlreadyExists);
        assert_eq!(db.list_users().unwrap().len(), 1);
    }

    #[test]
    fn create_user_rejects_blank_email() {
        let db = setup_db();

        let err = db.create_user(user_input("No Email", "  ")).unwrap_err();

        assert_eq!(error_code(err), ErrorCode::MissingRequiredField);
    }

    #[test]
    fn get_user_returns_none_for_unknown_id() {
        let db = setup_db();

        assert!(db.get_user("unknown-user-id").unwrap().is_none());
    }

    #[test]
    fn list_users_returns_all() {
        let db = setup_db();
        db.create_user(user_input("Alice", "alice@example.com"))
            .unwrap();
        db.create_user(user_input("Bruno", "bruno@example.com"))
            .unwrap();

        assert_eq!(db.list_users().unwrap().len(), 2);
    }
}

mod tag_tests {
    use super::*;

    #[test]
    fn create_tag_trims_and_stores_name() {
        let db = setup_db();

        let tag = db.create_tag("  docs  ").unwrap();

        assert_eq!(tag.name, "docs");
    }

    #[test]
    fn create_tag_rejects_duplicate_name() {
        let db = setup_db();
        db.create_tag("docs").unwrap();

        let err = db.create_tag("docs").unwrap_err();

        assert_eq!(error_code(err), ErrorCode::AlreadyExists);
        assert_eq!(db.list_tags().unwrap().len(), 1);
    }

    #[test]
    fn create_tag_rejects_blank_name() {
        let db = setup_db();

        let err = db.create_tag("   ").unwrap_err();

        assert_eq!(error_code(err), ErrorCode::MissingRequiredField);
    }

    #[test]
    fn list_tags_is_ordered_by_name() {
        let db = setup_db();
        db.create_tag("zeta").unwrap();
        db.create_tag("alpha").unwrap();

        let names: Vec<String> = db.list_tags().unwrap().into_iter().map(|t| t.name).collect();

        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
