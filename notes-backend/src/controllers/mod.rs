pub mod health;
pub mod home;
pub mod notes;
pub mod users;

use actix_web::{HttpResponse, http::header};

/// 302 to a local path
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// 500 with the failure logged
pub(crate) fn internal_error(context: &str, err: impl std::fmt::Display) -> HttpResponse {
    log::error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Internal server error"
    }))
}
