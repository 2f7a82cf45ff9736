//! Auth session database operations

use chrono::{Duration, Utc};
use rusqlite::{OptionalExtension, params};
use uuid::Uuid;

use super::users::user_from_row;
use crate::db::{Database, DbResult};
use crate::models::{Session, User};

impl Database {
    /// Create a new login session for a user
    pub fn create_session(&self, user_id: i64, ttl_hours: i64) -> DbResult<Session> {
        let conn = self.conn()?;
        let token = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let expires_at = created_at + Duration::hours(ttl_hours);

        conn.execute(
            "INSERT INTO auth_sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            params![token, user_id, created_at.to_rfc3339(), expires_at.to_rfc3339()],
        )?;

        Ok(Session {
            id: conn.last_insert_rowid(),
            token,
            user_id,
            created_at,
            expires_at,
        })
    }

    /// Resolve a session token to its user and extend the session expiry
    pub fn validate_session(&self, token: &str, ttl_hours: i64) -> DbResult<Option<User>> {
        let conn = self.conn()?;
        let now = Utc::now();

        let user = conn
            .query_row(
                "SELECT u.id, u.username, u.password_hash, u.created_at
                 FROM auth_sessions s
                 JOIN users u ON u.id = s.user_id
                 WHERE s.token = ?1 AND s.expires_at > ?2",
                params![token, now.to_rfc3339()],
                user_from_row,
            )
            .optional()?;

        // Keep active sessions alive
        if user.is_some() {
            let new_expires = (now + Duration::hours(ttl_hours)).to_rfc3339();
            conn.execute(
                "UPDATE auth_sessions SET expires_at = ?1 WHERE token = ?2",
                params![new_expires, token],
            )?;
        }

        Ok(user)
    }

    /// Delete a session (logout)
    pub fn delete_session(&self, token: &str) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows_affected = conn.execute("DELETE FROM auth_sessions WHERE token = ?1", params![token])?;
        Ok(rows_affected > 0)
    }

    /// Drop sessions whose expiry has passed
    pub fn purge_expired_sessions(&self) -> DbResult<usize> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM auth_sessions WHERE expires_at <= ?1",
            params![Utc::now().to_rfc3339()],
        )?;
        Ok(removed)
    }
}
