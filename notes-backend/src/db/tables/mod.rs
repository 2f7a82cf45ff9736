//! Per-table database operations
//!
//! Each module contains an `impl Database` block for one table.

mod auth_sessions;
mod notes;
mod users;
