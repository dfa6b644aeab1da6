//! User CRUD operations.
//!
//! Only the minimal set the seed script and task assignment need:
//! create, get, list.

use super::{now_ms, Database};
use crate::error::ApiError;
use crate::types::{CreateUserInput, Role, User};
use anyhow::Result;
use rusqlite::{params, Row};
use uuid::Uuid;

fn parse_user_row(row: &Row) -> rusqlite::Result<User> {
    let role: String = row.get("role")?;
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        password: row.get("password")?,
        role: Role::parse(&role).unwrap_or_default(),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

impl Database {
    /// Create a new user. Email addresses are unique.
    pub fn create_user(&self, input: CreateUserInput) -> Result<User> {
        if input.name.trim().is_empty() {
            return Err(ApiError::missing_field("name").into());
        }
        if input.email.trim().is_empty() {
            return Err(ApiError::missing_field("email").into());
        }

        let id = Uuid::now_v7().to_string();
        let now = now_ms();

        self.with_conn(|conn| {
            let exists: bool = conn
                .query_row(
                    "SELECT 1 FROM users WHERE email = ?1",
                    params![&input.email],
                    |_| Ok(true),
                )
                .unwrap_or(false);

            if exists {
                return Err(ApiError::already_exists("User", &input.email).into());
            }

            conn.execute(
                "INSERT INTO users (id, name, email, password, role, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    &id,
                    &input.name,
                    &input.email,
                    &input.password,
                    input.role.as_str(),
                    now,
                    now
                ],
            )?;

            Ok(User {
                id,
                name: input.name,
                email: input.email,
                password: input.password,
                role: input.role,
                created_at: now,
                updated_at: now,
            })
        })
    }

    /// Get a user by id.
    pub fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;

            let result = stmt.query_row(params![user_id], parse_user_row);

            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// List all users in insertion order.
    pub fn list_users(&self) -> Result<Vec<User>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM users ORDER BY created_at, id")?;

            let users = stmt
                .query_map([], parse_user_row)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(users)
        })
    }
}
