use std::env;
use std::str::FromStr;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const HOST: &str = "HOST";
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const DB_POOL_SIZE: &str = "DB_POOL_SIZE";
    /// Sliding lifetime of a login session, in hours.
    pub const SESSION_TTL_HOURS: &str = "SESSION_TTL_HOURS";
}

/// Default values
pub mod defaults {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8080;
    pub const DATABASE_URL: &str = "./.db/notes.db";
    pub const DB_POOL_SIZE: u32 = 8;
    pub const SESSION_TTL_HOURS: i64 = 24;
}

/// Route paths shared by controllers and redirects
pub mod paths {
    pub const HOME: &str = "/";
    pub const NOTES_LIST: &str = "/notes/";
    pub const NOTES_ADD: &str = "/add/";
    pub const NOTES_SUCCESS: &str = "/done/";
    pub const LOGIN: &str = "/auth/login/";
    pub const LOGOUT: &str = "/auth/logout/";
    pub const SIGNUP: &str = "/auth/signup/";

    pub fn note_detail(slug: &str) -> String {
        format!("/note/{}/", slug)
    }

    pub fn note_edit(slug: &str) -> String {
        format!("/edit/{}/", slug)
    }

    pub fn note_delete(slug: &str) -> String {
        format!("/delete/{}/", slug)
    }
}

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "sessionid";

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_pool_size: u32,
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var(env_vars::HOST).unwrap_or_else(|_| defaults::HOST.to_string()),
            port: parse_or_default(env_vars::PORT, defaults::PORT),
            database_url: env::var(env_vars::DATABASE_URL)
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_string()),
            db_pool_size: parse_or_default(env_vars::DB_POOL_SIZE, defaults::DB_POOL_SIZE).max(1),
            session_ttl_hours: parse_or_default(
                env_vars::SESSION_TTL_HOURS,
                defaults::SESSION_TTL_HOURS,
            )
            .max(1),
        }
    }

    /// Config pointing at an explicit database file, everything else defaulted.
    pub fn with_database(database_url: &str) -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            database_url: database_url.to_string(),
            db_pool_size: defaults::DB_POOL_SIZE,
            session_ttl_hours: defaults::SESSION_TTL_HOURS,
        }
    }
}

/// Read a numeric env var, falling back to the default when unset or malformed
fn parse_or_default<T>(name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("{} must be a valid number (got {:?}), using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_paths() {
        assert_eq!(paths::note_detail("note-slug"), "/note/note-slug/");
        assert_eq!(paths::note_edit("note-slug"), "/edit/note-slug/");
        assert_eq!(paths::note_delete("note-slug"), "/delete/note-slug/");
    }

    #[test]
    fn test_with_database_uses_defaults() {
        let config = Config::with_database("/tmp/notes-test.db");
        assert_eq!(config.database_url, "/tmp/notes-test.db");
        assert_eq!(config.port, defaults::PORT);
        assert_eq!(config.session_ttl_hours, defaults::SESSION_TTL_HOURS);
    }

    #[test]
    fn test_parse_or_default_missing_var() {
        let value: u16 = parse_or_default("NOTES_BACKEND_TEST_UNSET_VAR", 42);
        assert_eq!(value, 42);
    }
}
