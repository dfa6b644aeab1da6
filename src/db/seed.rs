//! Destructive fixture seeding for demos and testing.
//!
//! Each run clears existing rows before inserting, so repeated runs
//! always leave exactly the fixture-defined counts.

use super::Database;
use crate::auth::hash_password;
use crate::types::{CreateTaskInput, CreateUserInput, Priority, Role, TaskStatus};
use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

/// Shared plaintext password for all fixture users.
pub const FIXTURE_PASSWORD: &str = "password123";

/// Row counts inserted by a seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub tags: usize,
    pub tasks: usize,
}

/// Wipe and repopulate the database with fixture data.
pub fn run(db: &Database) -> Result<SeedSummary> {
    clear(db)?;
    info!("Cleared existing tasks, tags, and users");

    let tag_backend = db.create_tag("backend")?;
    let tag_frontend = db.create_tag("frontend")?;
    let tag_docs = db.create_tag("docs")?;

    let password = hash_password(FIXTURE_PASSWORD)?;
    let alice = db.create_user(CreateUserInput {
        name: "Alice Reed".to_string(),
        email: "alice@example.com".to_string(),
        password: password.clone(),
        role: Role::Admin,
    })?;
    let bruno = db.create_user(CreateUserInput {
        name: "Bruno Vidal".to_string(),
        email: "bruno@example.com".to_string(),
        password,
        role: Role::User,
    })?;

    let tasks = [
        CreateTaskInput {
            title: Some("Set up the database schema".to_string()),
            description: Some("Tables for users, tasks, and tags with migrations.".to_string()),
            completed: Some(true),
            status: Some(TaskStatus::Completed),
            priority: Some(Priority::High),
            assigned_to_id: Some(alice.id.clone()),
            tags: Some(vec![tag_backend.id.clone()]),
            ..Default::default()
        },
        CreateTaskInput {
            title: Some("Wire up the JSON API".to_string()),
            description: Some("Create, read, update, and delete endpoints for tasks.".to_string()),
            status: Some(TaskStatus::InProgress),
            priority: Some(Priority::High),
            assigned_to_id: Some(alice.id.clone()),
            tags: Some(vec![tag_backend.id.clone()]),
            ..Default::default()
        },
        CreateTaskInput {
            title: Some("Build the task list page".to_string()),
            description: Some("Form plus list with toggle and delete actions.".to_string()),
            assigned_to_id: Some(bruno.id.clone()),
            tags: Some(vec![tag_frontend.id.clone()]),
            due_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            ..Default::default()
        },
        CreateTaskInput {
            title: Some("Polish the page styling".to_string()),
            completed: Some(true),
            status: Some(TaskStatus::Completed),
            priority: Some(Priority::Low),
            tags: Some(vec![tag_frontend.id.clone()]),
            ..Default::default()
        },
        CreateTaskInput {
            title: Some("Write the setup guide".to_string()),
            description: Some("Document configuration, seeding, and the HTTP surface.".to_string()),
            assigned_to_id: Some(bruno.id.clone()),
            tags: Some(vec![tag_docs.id.clone(), tag_backend.id.clone()]),
            due_date: NaiveDate::from_ymd_opt(2026, 9, 15),
            ..Default::default()
        },
    ];

    let task_count = tasks.len();
    for input in tasks {
        db.create_task(input)?;
    }

    Ok(SeedSummary {
        users: 2,
        tags: 3,
        tasks: task_count,
    })
}

/// Delete all rows in dependency order: tasks first (junction rows
/// cascade), then tags and users.
fn clear(db: &Database) -> Result<()> {
    db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM tasks", [])?;
        tx.execute("DELETE FROM tags", [])?;
        tx.execute("DELETE FROM users", [])?;
        tx.commit()?;
        Ok(())
    })
}
