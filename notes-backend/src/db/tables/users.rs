//! User account database operations

use chrono::Utc;
use rusqlite::{OptionalExtension, Row, params};

use crate::db::sqlite::parse_timestamp;
use crate::db::{Database, DbResult};
use crate::models::User;

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let created_at: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: parse_timestamp(3, &created_at)?,
    })
}

impl Database {
    /// Insert a new user. Fails with a unique violation if the username is taken.
    pub fn create_user(&self, username: &str, password_hash: &str) -> DbResult<User> {
        let conn = self.conn()?;
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
            params![username, password_hash, created_at.to_rfc3339()],
        )?;

        Ok(User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at,
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
                params![username],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    #[cfg(test)]
    pub fn username_exists(&self, username: &str) -> DbResult<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
