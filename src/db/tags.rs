//! Tag CRUD operations.

use super::{now_ms, Database};
use crate::error::ApiError;
use crate::types::Tag;
use anyhow::Result;
use rusqlite::params;
use uuid::Uuid;

impl Database {
    /// Create a new tag. Tag names are unique.
    pub fn create_tag(&self, name: &str) -> Result<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::missing_field("name").into());
        }

        let id = Uuid::now_v7().to_string();
        let now = now_ms();

        self.with_conn(|conn| {
            let exists: bool = conn
                .query_row("SELECT 1 FROM tags WHERE name = ?1", params![name], |_| {
                    Ok(true)
                })
                .unwrap_or(false);

            if exists {
                return Err(ApiError::already_exists("Tag", name).into());
            }

            conn.execute(
                "INSERT INTO tags (id, name, created_at) VALUES (?1, ?2, ?3)",
                params![&id, name, now],
            )?;

            Ok(Tag {
                id,
                name: name.to_string(),
                created_at: now,
            })
        })
    }

    /// Get a tag by id.
    pub fn get_tag(&self, tag_id: &str) -> Result<Option<Tag>> {
        self.with_conn(|conn| {
            let result = conn.query_row(
                "SELECT id, name, created_at FROM tags WHERE id = ?1",
                params![tag_id],
                |row| {
                    Ok(Tag {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            );

            match result {
                Ok(tag) => Ok(Some(tag)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// List all tags ordered by name.
    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, created_at FROM tags ORDER BY name")?;

            let tags = stmt
                .query_map([], |row| {
                    Ok(Tag {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(tags)
        })
    }
}
