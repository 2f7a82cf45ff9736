//! Shared fixtures for handler tests

use actix_web::cookie::Cookie;
use actix_web::web;
use std::sync::Arc;
use tempfile::{TempDir, tempdir};

use crate::AppState;
use crate::config::{Config, SESSION_COOKIE};
use crate::db::Database;
use crate::models::{Note, User};

/// App state backed by a throwaway database file
pub struct TestContext {
    _dir: TempDir,
    pub state: web::Data<AppState>,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("notes.db");
        let db_url = db_path.to_str().expect("utf-8 temp path").to_string();

        let config = Config::with_database(&db_url);
        let db = Database::new(&db_url, 4).expect("Failed to open test database");
        let state = web::Data::new(AppState::new(Arc::new(db), config));

        Self { _dir: dir, state }
    }

    /// A user with a live session, and the cookie that carries it
    pub fn logged_in(&self, username: &str) -> (User, Cookie<'static>) {
        let user = self
            .state
            .db
            .create_user(username, "unusable")
            .expect("Failed to create user");
        let session = self
            .state
            .db
            .create_session(user.id, self.state.config.session_ttl_hours)
            .expect("Failed to create session");
        (user, Cookie::new(SESSION_COOKIE, session.token))
    }

    /// Note with the stock title and text
    pub fn note(&self, author: &User, slug: &str) -> Note {
        self.state
            .notes
            .create(author, "Заголовок", "Текст", slug)
            .expect("Failed to create note")
    }
}
