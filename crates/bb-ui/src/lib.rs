//! # bb-ui
//!
//! The shared page shell and the handful of HTML fragments used across
//! routes. Every hole in the shell is `|safe`: stored fields, request
//! values, and error details must reach the browser verbatim — the rendered
//! weaknesses (stored XSS, surfaced store errors) are the product.

use askama::Template;
use bb_core::models::Identity;

#[derive(Template)]
#[template(path = "layout.html")]
struct Layout<'a> {
    title: &'a str,
    body: &'a str,
}

/// Wraps a body fragment in the full HTML document shell.
pub fn page(title: &str, body: &str) -> String {
    Layout { title, body }
        .render()
        .expect("layout rendering failed")
}

/// The standard card with an optional back link above it.
pub fn card(back: Option<(&str, &str)>, inner: &str) -> String {
    let back_html = match back {
        Some((href, label)) => format!(r#"<a href="{href}" class="back-link">&larr; {label}</a>"#),
        None => String::new(),
    };
    format!(
        r#"{back_html}
    <div class="card card-page">
      {inner}
    </div>"#
    )
}

/// The "Logged in as ... / browsing as guest" line shown on community pages.
pub fn session_line(current: Option<&Identity>) -> String {
    match current {
        Some(user) => format!(
            r#"<span>Logged in as <strong>{}</strong> ({}, {})</span> &middot; <a href="/user/logout" class="back-link">Logout</a>"#,
            user.username, user.role, user.status
        ),
        None => concat!(
            r#"<span>You are browsing as guest.</span> &middot; "#,
            r#"<a href="/user/login" class="back-link">Login</a>"#
        )
        .to_string(),
    }
}

/// The shared "Database Error" page. `detail` carries the raw store message
/// on the routes that are required to surface it; the rest pass `None`.
pub fn db_error_page(context: &str, back: (&str, &str), detail: Option<&str>) -> String {
    let detail_html = match detail {
        Some(message) => format!(r#"<p class="hint">{message}</p>"#),
        None => String::new(),
    };
    let (href, label) = back;
    page(
        "Database Error",
        &card(
            None,
            &format!(
                r#"<h1 class="page-title">Database Error</h1>
      <p>{context}</p>
      {detail_html}
      <a href="{href}" class="btn">{label}</a>"#
            ),
        ),
    )
}
