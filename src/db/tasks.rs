//! Task CRUD operations.

use super::{now_ms, Database};
use crate::error::ApiError;
use crate::types::{CreateTaskInput, Priority, Tag, Task, TaskStatus, UpdateTaskInput};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

/// Parse a task row. Tags live in a junction table and are loaded separately.
pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let id: String = row.get("id")?;
    let title: String = row.get("title")?;
    let description: Option<String> = row.get("description")?;
    let completed: bool = row.get("completed")?;
    let status: String = row.get("status")?;
    let priority: String = row.get("priority")?;
    let due_date: Option<String> = row.get("due_date")?;
    let assigned_to_id: Option<String> = row.get("assigned_to_id")?;
    let created_at: i64 = row.get("created_at")?;
    let updated_at: i64 = row.get("updated_at")?;

    Ok(Task {
        id,
        title,
        description,
        completed,
        status: TaskStatus::parse(&status).unwrap_or_default(),
        priority: Priority::parse(&priority).unwrap_or_default(),
        due_date: due_date.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        assigned_to_id,
        tags: Vec::new(),
        created_at,
        updated_at,
    })
}

/// Load the tags associated with a task, ordered by tag name.
fn load_task_tags(conn: &Connection, task_id: &str) -> Result<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT g.id, g.name, g.created_at FROM tags g
         INNER JOIN task_tags tt ON g.id = tt.tag_id
         WHERE tt.task_id = ?1
         ORDER BY g.name",
    )?;

    let tags = stmt
        .query_map(params![task_id], |row| {
            Ok(Tag {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(tags)
}

/// Replace the task's tag set in the task_tags junction table.
/// Every referenced tag must already exist.
fn sync_task_tags(conn: &Connection, task_id: &str, tag_ids: &[String]) -> Result<()> {
    for tag_id in tag_ids {
        ensure_tag_exists(conn, tag_id)?;
    }
    conn.execute("DELETE FROM task_tags WHERE task_id = ?1", params![task_id])?;
    for tag_id in tag_ids {
        conn.execute(
            "INSERT INTO task_tags (task_id, tag_id) VALUES (?1, ?2)",
            params![task_id, tag_id],
        )?;
    }
    Ok(())
}

fn ensure_tag_exists(conn: &Connection, tag_id: &str) -> Result<()> {
    let exists: bool = conn
        .query_row("SELECT 1 FROM tags WHERE id = ?1", params![tag_id], |_| {
            Ok(true)
        })
        .unwrap_or(false);
    if !exists {
        return Err(ApiError::tag_not_found(tag_id).into());
    }
    Ok(())
}

fn ensure_user_exists(conn: &Connection, user_id: &str) -> Result<()> {
    let exists: bool = conn
        .query_row("SELECT 1 FROM users WHERE id = ?1", params![user_id], |_| {
            Ok(true)
        })
        .unwrap_or(false);
    if !exists {
        return Err(ApiError::user_not_found(user_id).into());
    }
    Ok(())
}

/// Internal helper to get a task using an existing connection.
fn get_task_internal(conn: &Connection, task_id: &str) -> Result<Option<Task>> {
    let mut stmt = conn.prepare("SELECT * FROM tasks WHERE id = ?1")?;

    let result = stmt.query_row(params![task_id], parse_task_row);

    match result {
        Ok(mut task) => {
            task.tags = load_task_tags(conn, task_id)?;
            Ok(Some(task))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Database {
    /// Create a new task with a fresh UUID7 (time-sortable) id.
    ///
    /// Fails with a validation error when the title is missing or blank,
    /// and with a not-found error when the assignee or a tag id is unknown.
    pub fn create_task(&self, input: CreateTaskInput) -> Result<Task> {
        let title = match input.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => return Err(ApiError::missing_field("title").into()),
        };

        let task_id = Uuid::now_v7().to_string();
        let now = now_ms();
        let completed = input.completed.unwrap_or(false);
        let status = input.status.unwrap_or_default();
        let priority = input.priority.unwrap_or_default();
        let tag_ids = input.tags.unwrap_or_default();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if let Some(ref user_id) = input.assigned_to_id {
                ensure_user_exists(&tx, user_id)?;
            }

            tx.execute(
                "INSERT INTO tasks (
                    id, title, description, completed, status, priority,
                    due_date, assigned_to_id, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    &task_id,
                    &title,
                    &input.description,
                    completed,
                    status.as_str(),
                    priority.as_str(),
                    input.due_date.map(|d| d.to_string()),
                    &input.assigned_to_id,
                    now,
                    now,
                ],
            )?;

            sync_task_tags(&tx, &task_id, &tag_ids)?;
            let tags = load_task_tags(&tx, &task_id)?;

            tx.commit()?;

            Ok(Task {
                id: task_id,
                title,
                description: input.description,
                completed,
                status,
                priority,
                due_date: input.due_date,
                assigned_to_id: input.assigned_to_id,
                tags,
                created_at: now,
                updated_at: now,
            })
        })
    }

    /// Get a task by id.
    pub fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, task_id))
    }

    /// List all tasks in insertion order.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM tasks ORDER BY created_at, id")?;

            let mut tasks = stmt
                .query_map([], parse_task_row)?
                .collect::<Result<Vec<_>, _>>()?;

            for task in &mut tasks {
                task.tags = load_task_tags(conn, &task.id)?;
            }

            Ok(tasks)
        })
    }

    /// Apply a partial update to a task, leaving unsupplied fields unchanged.
    pub fn update_task(&self, task_id: &str, input: UpdateTaskInput) -> Result<Task> {
        let now = now_ms();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let task = get_task_internal(&tx, task_id)?
                .ok_or_else(|| ApiError::task_not_found(task_id))?;

            let new_title = match input.title {
                Some(t) => {
                    let t = t.trim().to_string();
                    if t.is_empty() {
                        return Err(
                            ApiError::invalid_value("title", "title must not be empty").into()
                        );
                    }
                    t
                }
                None => task.title,
            };
            let new_description = input.description.unwrap_or(task.description);
            let new_completed = input.completed.unwrap_or(task.completed);
            let new_status = input.status.unwrap_or(task.status);
            let new_priority = input.priority.unwrap_or(task.priority);
            let new_due_date = input.due_date.unwrap_or(task.due_date);
            let new_assigned_to = input.assigned_to_id.unwrap_or(task.assigned_to_id);

            if let Some(ref user_id) = new_assigned_to {
                ensure_user_exists(&tx, user_id)?;
            }

            tx.execute(
                "UPDATE tasks SET
                    title = ?1, description = ?2, completed = ?3, status = ?4,
                    priority = ?5, due_date = ?6, assigned_to_id = ?7, updated_at = ?8
                 WHERE id = ?9",
                params![
                    &new_title,
                    &new_description,
                    new_completed,
                    new_status.as_str(),
                    new_priority.as_str(),
                    new_due_date.map(|d| d.to_string()),
                    &new_assigned_to,
                    now,
                    task_id,
                ],
            )?;

            if let Some(ref tag_ids) = input.tags {
                sync_task_tags(&tx, task_id, tag_ids)?;
            }
            let tags = load_task_tags(&tx, task_id)?;

            tx.commit()?;

            Ok(Task {
                id: task_id.to_string(),
                title: new_title,
                description: new_description,
                completed: new_completed,
                status: new_status,
                priority: new_priority,
                due_date: new_due_date,
                assigned_to_id: new_assigned_to,
                tags,
                created_at: task.created_at,
                updated_at: now,
            })
        })
    }

    /// Delete a task. Junction rows cascade; tags and users are untouched.
    pub fn delete_task(&self, task_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let rows = conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            if rows == 0 {
                return Err(ApiError::task_not_found(task_id).into());
            }
            Ok(())
        })
    }
}
