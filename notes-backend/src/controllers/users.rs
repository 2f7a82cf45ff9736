//! Login, logout and signup for local accounts

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{HttpRequest, HttpResponse, Responder, http::header, web};
use serde::Deserialize;

use super::{internal_error, redirect};
use crate::AppState;
use crate::auth::identity::is_safe_next;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session_token;
use crate::config::{SESSION_COOKIE, paths};
use crate::notes::FormErrors;

const USERNAME_MAX_LENGTH: usize = 150;
const REQUIRED: &str = "This field is required.";
const BAD_CREDENTIALS: &str = "Please enter a correct username and password.";

#[derive(Debug, Deserialize)]
struct NextQuery {
    next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    next: String,
}

#[derive(Debug, Default, Deserialize)]
struct SignupForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password1: String,
    #[serde(default)]
    password2: String,
}

fn login_page(username: &str, next: &str, errors: FormErrors) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "form": {
            "fields": { "username": username, "next": next },
            "errors": errors
        }
    }))
}

fn signup_page(username: &str, errors: FormErrors) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "form": {
            "fields": { "username": username },
            "errors": errors
        }
    }))
}

fn session_cookie(token: &str, ttl_hours: i64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::hours(ttl_hours))
        .finish()
}

// --- Login ---

async fn login_form(query: web::Query<NextQuery>) -> impl Responder {
    let next = query.next.as_deref().unwrap_or("");
    login_page("", next, FormErrors::default())
}

async fn login(
    data: web::Data<AppState>,
    query: web::Query<NextQuery>,
    form: web::Form<LoginForm>,
) -> impl Responder {
    let form = form.into_inner();
    let next = if form.next.is_empty() {
        query.next.clone().unwrap_or_default()
    } else {
        form.next.clone()
    };
    let username = form.username.trim();

    let mut errors = FormErrors::default();
    if username.is_empty() {
        errors.add("username", REQUIRED);
    }
    if form.password.is_empty() {
        errors.add("password", REQUIRED);
    }
    if !errors.is_empty() {
        return login_page(username, &next, errors);
    }

    let user = match data.db.get_user_by_username(username) {
        Ok(Some(user)) => user,
        Ok(None) => {
            errors.add("__all__", BAD_CREDENTIALS);
            return login_page(username, &next, errors);
        }
        Err(e) => return internal_error("Failed to look up user", e),
    };

    match verify_password(&form.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            errors.add("__all__", BAD_CREDENTIALS);
            return login_page(username, &next, errors);
        }
        Err(e) => return internal_error("Failed to verify password", e),
    }

    let ttl = data.config.session_ttl_hours;
    let session = match data.db.create_session(user.id, ttl) {
        Ok(s) => s,
        Err(e) => return internal_error("Failed to create session", e),
    };
    log::info!("User {} logged in", user.username);

    let target = if is_safe_next(&next) { next.as_str() } else { paths::HOME };
    HttpResponse::Found()
        .insert_header((header::LOCATION, target))
        .cookie(session_cookie(&session.token, ttl))
        .finish()
}

// --- Logout ---

async fn logout(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Some(token) = session_token(&req) {
        if let Err(e) = data.db.delete_session(&token) {
            return internal_error("Failed to delete session", e);
        }
    }

    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();

    HttpResponse::Ok().cookie(removal).json(serde_json::json!({
        "message": "You have been logged out.",
        "login": paths::LOGIN
    }))
}

// --- Signup ---

async fn signup_form() -> impl Responder {
    signup_page("", FormErrors::default())
}

async fn signup(data: web::Data<AppState>, form: web::Form<SignupForm>) -> impl Responder {
    let form = form.into_inner();
    let username = form.username.trim();

    let mut errors = FormErrors::default();
    if username.is_empty() {
        errors.add("username", REQUIRED);
    } else if username.chars().count() > USERNAME_MAX_LENGTH {
        errors.add(
            "username",
            format!("Ensure this value has at most {} characters.", USERNAME_MAX_LENGTH),
        );
    }
    if form.password1.is_empty() {
        errors.add("password1", REQUIRED);
    }
    if form.password2 != form.password1 {
        errors.add("password2", "The two password fields didn't match.");
    }
    if !errors.is_empty() {
        return signup_page(username, errors);
    }

    let password_hash = match hash_password(&form.password1) {
        Ok(h) => h,
        Err(e) => return internal_error("Failed to hash password", e),
    };

    match data.db.create_user(username, &password_hash) {
        Ok(user) => {
            log::info!("Registered user {}", user.username);
            redirect(paths::LOGIN)
        }
        Err(e) if e.is_unique_violation() => {
            errors.add("username", "A user with that username already exists.");
            signup_page(username, errors)
        }
        Err(e) => internal_error("Failed to create user", e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(paths::LOGIN)
            .route(web::get().to(login_form))
            .route(web::post().to(login)),
    )
    .service(
        web::resource(paths::LOGOUT)
            .route(web::get().to(logout))
            .route(web::post().to(logout)),
    )
    .service(
        web::resource(paths::SIGNUP)
            .route(web::get().to(signup_form))
            .route(web::post().to(signup)),
    );
}
