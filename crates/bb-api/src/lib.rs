//! # bb-api
//!
//! The web routing and orchestration layer for brittle-board.
//!
//! Every endpoint of the deliberately vulnerable surface is registered here.
//! Static segments (`/documents/create`, `/documents/list`) are registered
//! before their `{id}` siblings; an unmatched method on a static path falls
//! through to the dynamic route, where the segment is interpolated into SQL
//! like any other id — the same shadowing the original exhibited.

pub mod handlers;
pub mod middleware;

use actix_web::web;

/// Configures the routes for the forum.
///
/// # Developer Note
/// A plain function over `ServiceConfig` so the binary (and the test
/// harness) can mount the same surface onto any `App`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Home
        .route("/", web::get().to(handlers::home))
        // Login / logout
        .route("/user/login", web::get().to(handlers::login_form))
        .route("/user/login", web::post().to(handlers::login_submit))
        .route("/user/logout", web::get().to(handlers::logout))
        // Community
        .route("/community", web::get().to(handlers::community))
        .route(
            "/community/topic/create",
            web::post().to(handlers::create_topic),
        )
        .route("/community/topic/{id}", web::get().to(handlers::view_topic))
        .route(
            "/community/topic/{id}/comment",
            web::post().to(handlers::post_comment),
        )
        // Comment edit/delete (no ownership checks)
        .route(
            "/comment/edit/{comment_id}",
            web::get().to(handlers::edit_comment_form),
        )
        .route(
            "/comment/update/{comment_id}",
            web::post().to(handlers::update_comment),
        )
        .route(
            "/comment/delete/{comment_id}",
            web::get().to(handlers::delete_comment),
        )
        // Admin panel and actions
        .route("/admin/panel", web::get().to(handlers::admin_panel))
        .route("/admin/user/ban", web::get().to(handlers::admin_ban_user))
        .route(
            "/admin/user/unban",
            web::get().to(handlers::admin_unban_user),
        )
        .route(
            "/admin/user/mod",
            web::get().to(handlers::admin_promote_user),
        )
        .route(
            "/admin/comment/warn",
            web::get().to(handlers::admin_warn_comment),
        )
        .route(
            "/admin/comment/delete",
            web::get().to(handlers::admin_delete_comment),
        )
        // Profiles
        .route(
            "/user/profile/{user_id}",
            web::get().to(handlers::user_profile),
        )
        // Documents
        .route(
            "/documents/create",
            web::get().to(handlers::document_form),
        )
        .route(
            "/documents/create",
            web::post().to(handlers::create_document),
        )
        .route("/documents/list", web::get().to(handlers::document_list))
        .route(
            "/documents/{document_id}",
            web::get().to(handlers::view_document),
        )
        // File access
        .route("/api/file", web::get().to(handlers::read_file))
        .route("/include", web::get().to(handlers::include_page));
}
