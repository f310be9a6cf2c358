//! Shared fixtures for the end-to-end HTTP tests.
//!
//! Each harness gets its own freshly seeded in-memory store and a scratch
//! directory shaped for the traversal tests: the page base lives in a
//! `public/` subdirectory, with a `secret.txt` one level above it.

use actix_web::web;
use bb_api::handlers::AppState;
use bb_auth_weak::WeakSecurityGate;
use bb_db_sqlite::SqliteForumStore;
use bb_pages_local::LocalPageStore;
use std::sync::RwLock;
use tempfile::TempDir;

pub struct TestHarness {
    pub state: web::Data<AppState>,
    /// Keeps the scratch directory alive for the duration of the test.
    pub dir: TempDir,
}

pub async fn harness() -> TestHarness {
    let dir = tempfile::tempdir().expect("tempdir");
    let public = dir.path().join("public");
    std::fs::create_dir(&public).expect("public dir");
    std::fs::write(public.join("index.html"), "<h1>Brittle Board</h1>").expect("index");
    std::fs::write(dir.path().join("secret.txt"), "outside-the-base").expect("secret");

    let gate = WeakSecurityGate::new();
    let store = SqliteForumStore::new("sqlite::memory:")
        .await
        .expect("store");
    store.seed(&gate).await.expect("seed");

    let state = web::Data::new(AppState {
        store: Box::new(store),
        pages: Box::new(LocalPageStore::new(public)),
        gate: Box::new(gate),
        session: RwLock::new(None),
    });

    TestHarness { state, dir }
}
