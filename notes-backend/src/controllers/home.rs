use actix_web::{HttpRequest, HttpResponse, Responder, web};

use crate::AppState;
use crate::auth::actor_from_request;
use crate::config::paths;
use crate::models::UserResponse;

/// Landing page, open to everyone
async fn home(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let actor = match actor_from_request(&data, &req) {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    HttpResponse::Ok().json(serde_json::json!({
        "title": "Notes",
        "authenticated": actor.is_authenticated(),
        "user": actor.user().map(UserResponse::from),
        "links": {
            "list": paths::NOTES_LIST,
            "add": paths::NOTES_ADD,
            "login": paths::LOGIN,
            "logout": paths::LOGOUT,
            "signup": paths::SIGNUP,
        }
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(paths::HOME).route(web::get().to(home)));
}

#[cfg(test)]
mod tests {
    use crate::test_support::TestContext;
    use actix_web::{App, http::StatusCode, test};

    #[actix_web::test]
    async fn test_home_is_public() {
        let ctx = TestContext::new();
        let app = test::init_service(
            App::new()
                .app_data(ctx.state.clone())
                .configure(crate::configure_routes),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["authenticated"], false);
    }

    #[actix_web::test]
    async fn test_home_shows_logged_in_user() {
        let ctx = TestContext::new();
        let (user, cookie) = ctx.logged_in("Автор заметки");
        let app = test::init_service(
            App::new()
                .app_data(ctx.state.clone())
                .configure(crate::configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["user"]["username"], user.username.as_str());
    }
}
