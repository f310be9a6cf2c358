//! # brittle-board Binary
//!
//! Assembles the deliberately vulnerable forum from the feature-selected
//! plugins and serves it on one port. The store is memory-resident and
//! reseeded identically on every start; nothing survives a restart.

use actix_files::Files;
use actix_web::{web, App, HttpServer};
use bb_api::handlers::AppState;
use bb_api::middleware;
use std::sync::RwLock;

// Feature-gated imports: plugins are compiled to order.
#[cfg(feature = "auth-weak")]
use bb_auth_weak::WeakSecurityGate;

#[cfg(feature = "db-sqlite")]
use bb_db_sqlite::SqliteForumStore;

#[cfg(feature = "pages-local")]
use bb_pages_local::LocalPageStore;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3000);
    let public_dir = std::env::var("PUBLIC_DIR").unwrap_or_else(|_| "./public".to_string());

    // 1. The weak input handling (hash, blocklist, sanitizer)
    #[cfg(feature = "auth-weak")]
    let gate = WeakSecurityGate::new();

    // 2. The in-memory store, reseeded on every start
    #[cfg(feature = "db-sqlite")]
    let store = SqliteForumStore::new("sqlite::memory:").await?;
    store.seed(&gate).await?;

    // 3. The page/file reader rooted at the public directory
    #[cfg(feature = "pages-local")]
    let pages = LocalPageStore::new(public_dir.clone().into());

    // 4. One AppState for everyone — including the single session slot
    let state = web::Data::new(AppState {
        store: Box::new(store),
        pages: Box::new(pages),
        gate: Box::new(gate),
        session: RwLock::new(None),
    });

    log::info!("brittle-board listening on http://127.0.0.1:{port}");
    log::warn!("this application is intentionally vulnerable; keep it off public networks");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::request_logger())
            .wrap(middleware::cors_policy())
            .configure(bb_api::configure_routes)
            // Static assets last, so the explicit routes win
            .service(Files::new("/", public_dir.clone()))
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await?;

    Ok(())
}
