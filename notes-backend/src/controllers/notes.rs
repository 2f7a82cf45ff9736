//! Note pages: list, add, success, detail, edit, delete.
//!
//! Every route requires a logged-in user. Anonymous requests are redirected
//! to the login page with `next` set to the requested path; note-scoped
//! routes answer 404 unless the caller wrote the note.

use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Serialize;

use super::{internal_error, redirect};
use crate::AppState;
use crate::auth::{actor_from_request, login_redirect, require_user};
use crate::config::paths;
use crate::models::{Note, NoteResponse, User};
use crate::notes::form::FormView;
use crate::notes::{Access, FormErrors, NoteAccessPolicy, NoteError, NoteForm};

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "Note not found"
    }))
}

/// Failure of a write on a note the caller already owned; the row may have
/// gone away since the lookup.
fn write_failure(context: &str, err: NoteError) -> HttpResponse {
    match err {
        NoteError::NotFound | NoteError::Forbidden => not_found(),
        other => internal_error(context, other),
    }
}

/// Resolve a note the caller owns, or the response to send instead
fn owned_note(
    state: &AppState,
    req: &HttpRequest,
    slug: &str,
) -> Result<(User, Note), HttpResponse> {
    let actor = actor_from_request(state, req)?;
    let policy = NoteAccessPolicy::new(&state.notes);

    match policy.authorize_note(&actor, slug) {
        Ok(Access::Allowed((user, note))) => Ok((user.clone(), note)),
        Ok(Access::LoginRequired) => Err(login_redirect(req)),
        Ok(Access::NotFound) => Err(not_found()),
        Err(e) => Err(internal_error("Failed to load note", e)),
    }
}

#[derive(Debug, Serialize)]
struct FormPage {
    form: FormView,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<NoteResponse>,
}

fn form_page(form: &NoteForm, errors: FormErrors, note: Option<&Note>) -> HttpResponse {
    HttpResponse::Ok().json(FormPage {
        form: form.render(errors),
        note: note.map(NoteResponse::from),
    })
}

// --- List ---

async fn list_notes(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user = match require_user(&data, &req) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match data.notes.list_for(&user) {
        Ok(notes) => {
            let object_list: Vec<NoteResponse> = notes.iter().map(NoteResponse::from).collect();
            HttpResponse::Ok().json(serde_json::json!({ "object_list": object_list }))
        }
        Err(e) => internal_error("Failed to list notes", e),
    }
}

// --- Add ---

async fn add_form(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Err(resp) = require_user(&data, &req) {
        return resp;
    }
    form_page(&NoteForm::default(), FormErrors::default(), None)
}

async fn add_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    form: Option<web::Form<NoteForm>>,
) -> impl Responder {
    let user = match require_user(&data, &req) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let form = form.map(web::Form::into_inner).unwrap_or_default();

    let changes = match form.clean() {
        Ok(c) => c,
        Err(errors) => return form_page(&form, errors, None),
    };

    match data
        .notes
        .create(&user, &changes.title, &changes.text, &changes.slug)
    {
        Ok(_) => redirect(paths::NOTES_SUCCESS),
        Err(e) => match FormErrors::from_store_error(&e) {
            Some(errors) => form_page(&form, errors, None),
            None => internal_error("Failed to create note", e),
        },
    }
}

// --- Success ---

async fn success(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Err(resp) = require_user(&data, &req) {
        return resp;
    }
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Done!",
        "list": paths::NOTES_LIST
    }))
}

// --- Detail ---

async fn note_detail(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    match owned_note(&data, &req, &path) {
        Ok((_, note)) => HttpResponse::Ok().json(serde_json::json!({
            "note": NoteResponse::from(&note)
        })),
        Err(resp) => resp,
    }
}

// --- Edit ---

async fn edit_form(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    match owned_note(&data, &req, &path) {
        Ok((_, note)) => form_page(&NoteForm::from_note(&note), FormErrors::default(), Some(&note)),
        Err(resp) => resp,
    }
}

async fn edit_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    form: Option<web::Form<NoteForm>>,
) -> impl Responder {
    let (user, note) = match owned_note(&data, &req, &path) {
        Ok(found) => found,
        Err(resp) => return resp,
    };
    let form = form.map(web::Form::into_inner).unwrap_or_default();

    let changes = match form.clean() {
        Ok(c) => c,
        Err(errors) => return form_page(&form, errors, Some(&note)),
    };

    match data.notes.update(&note, &user, &changes) {
        Ok(_) => redirect(paths::NOTES_SUCCESS),
        Err(e) => match FormErrors::from_store_error(&e) {
            Some(errors) => form_page(&form, errors, Some(&note)),
            None => write_failure("Failed to update note", e),
        },
    }
}

// --- Delete ---

async fn delete_confirm(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    match owned_note(&data, &req, &path) {
        Ok((_, note)) => HttpResponse::Ok().json(serde_json::json!({
            "note": NoteResponse::from(&note),
            "confirm": paths::note_delete(&note.slug)
        })),
        Err(resp) => resp,
    }
}

async fn delete_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let (user, note) = match owned_note(&data, &req, &path) {
        Ok(found) => found,
        Err(resp) => return resp,
    };

    match data.notes.delete(&note, &user) {
        Ok(()) => redirect(paths::NOTES_SUCCESS),
        Err(e) => write_failure("Failed to delete note", e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(paths::NOTES_LIST).route(web::get().to(list_notes)))
        .service(
            web::resource(paths::NOTES_ADD)
                .route(web::get().to(add_form))
                .route(web::post().to(add_note)),
        )
        .service(web::resource(paths::NOTES_SUCCESS).route(web::get().to(success)))
        .service(web::resource("/note/{slug}/").route(web::get().to(note_detail)))
        .service(
            web::resource("/edit/{slug}/")
                .route(web::get().to(edit_form))
                .route(web::post().to(edit_note)),
        )
        .service(
            web::resource("/delete/{slug}/")
                .route(web::get().to(delete_confirm))
                .route(web::post().to(delete_note))
                .route(web::delete().to(delete_note)),
        );
}
