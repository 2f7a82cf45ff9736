use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;

mod auth;
mod config;
mod controllers;
mod db;
mod models;
mod notes;

#[cfg(test)]
mod test_support;

use config::Config;
use db::Database;
use notes::NoteStore;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub notes: NoteStore,
    pub config: Config,
}

impl AppState {
    pub fn new(db: Arc<Database>, config: Config) -> Self {
        Self {
            notes: NoteStore::new(Arc::clone(&db)),
            db,
            config,
        }
    }
}

/// Register every route of the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(controllers::health::config_routes)
        .configure(controllers::home::config)
        .configure(controllers::notes::config)
        .configure(controllers::users::config);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("notes-backend v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url, config.db_pool_size).map_err(|e| {
        log::error!("Failed to initialize database: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    let db = Arc::new(db);

    match db.purge_expired_sessions() {
        Ok(0) => {}
        Ok(n) => log::info!("Purged {} expired sessions", n),
        Err(e) => log::warn!("Failed to purge expired sessions: {}", e),
    }

    let host = config.host.clone();
    let port = config.port;
    let state = web::Data::new(AppState::new(db, config));

    log::info!("Listening on http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
