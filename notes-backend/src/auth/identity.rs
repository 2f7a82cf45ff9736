//! Request-scoped identity
//!
//! The acting user is resolved from the `sessionid` cookie, or from an
//! `Authorization: Bearer <token>` header, and handed explicitly to the
//! note store and access policy.

use actix_web::{HttpRequest, HttpResponse, http::header};

use crate::AppState;
use crate::config::{SESSION_COOKIE, paths};
use crate::models::User;
use crate::notes::{Access, Actor, NoteAccessPolicy};

/// Session token carried by the request, cookie first
pub fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolve who is making the request
pub fn actor_from_request(state: &AppState, req: &HttpRequest) -> Result<Actor, HttpResponse> {
    let token = match session_token(req) {
        Some(t) => t,
        None => return Ok(Actor::Anonymous),
    };

    match state.db.validate_session(&token, state.config.session_ttl_hours) {
        Ok(Some(user)) => Ok(Actor::User(user)),
        Ok(None) => Ok(Actor::Anonymous),
        Err(e) => {
            log::error!("Session validation error: {}", e);
            Err(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })))
        }
    }
}

/// Resolve the acting user, or the login redirect for anonymous requests
pub fn require_user(state: &AppState, req: &HttpRequest) -> Result<User, HttpResponse> {
    let actor = actor_from_request(state, req)?;
    match NoteAccessPolicy::require_user(&actor) {
        Access::Allowed(user) => Ok(user.clone()),
        Access::LoginRequired | Access::NotFound => Err(login_redirect(req)),
    }
}

/// Login URL carrying the originally requested path as `next`
pub fn login_url_with_next(next: &str) -> String {
    // Slashes stay literal so the target reads as a path
    let encoded = urlencoding::encode(next).replace("%2F", "/");
    format!("{}?next={}", paths::LOGIN, encoded)
}

/// 302 to the login page for the current request
pub fn login_redirect(req: &HttpRequest) -> HttpResponse {
    let next = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.path());
    HttpResponse::Found()
        .insert_header((header::LOCATION, login_url_with_next(next)))
        .finish()
}

/// Only local absolute paths are accepted as post-login targets
pub fn is_safe_next(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')
}
