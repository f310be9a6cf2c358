//! # bb-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the core
//! ports. It is the bulk of the system: ~20 endpoints, each with its own
//! (often deliberately absent) authorization check. The per-route behavior,
//! including which error pages surface raw store detail and which stay
//! generic, is contractual — see the table in `configure_routes`' crate docs.

use actix_web::{web, HttpResponse, Responder};
use bb_core::models::{Comment, Identity};
use bb_core::traits::{ForumStore, PageStore, SecurityGate};
use serde::Deserialize;
use std::sync::RwLock;

/// State shared across all workers.
pub struct AppState {
    pub store: Box<dyn ForumStore>,
    pub pages: Box<dyn PageStore>,
    pub gate: Box<dyn SecurityGate>,
    /// The "session": one process-wide slot shared by every caller. No
    /// cookies, no tokens. Whoever logs in last is logged in for everyone.
    pub session: RwLock<Option<Identity>>,
}

impl AppState {
    /// Copy of the identity currently in the slot, if any.
    pub fn current_identity(&self) -> Option<Identity> {
        match self.session.read() {
            Ok(guard) => guard.clone(),
            Err(_) => None,
        }
    }

    /// Overwrites the slot for all callers. Concurrent writers race and the
    /// last one wins; that bleed is part of the contract.
    pub fn set_identity(&self, identity: Option<Identity>) {
        if let Ok(mut guard) = self.session.write() {
            *guard = identity;
        }
    }
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type("text/html").body(body)
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

// ---------- HOME ----------

pub async fn home(data: web::Data<AppState>) -> impl Responder {
    match data.pages.read_page("index.html").await {
        Ok(content) => html(content),
        Err(e) => html(bb_ui::page(
            "File Read Error",
            &bb_ui::card(
                None,
                &format!(
                    r#"<h1 class="page-title">File Read Error</h1>
      <p>Error reading file: {e}</p>"#
                ),
            ),
        )),
    }
}

// ---------- LOGIN (SQLi-vulnerable, with the weak filter) ----------

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login_form() -> impl Responder {
    let body = bb_ui::card(
        Some(("/", "Back to Home")),
        r#"<h1 class="page-title">Login</h1>
      <p class="page-subtitle">Sign in to continue to your feedback dashboard.</p>

      <form method="POST" action="/user/login" class="form">
        <div class="form-group">
          <label>Username</label>
          <input name="username" class="input" />
        </div>
        <div class="form-group">
          <label>Password</label>
          <input type="password" name="password" class="input" />
        </div>
        <button type="submit" class="btn wide">Login</button>
      </form>
      <p class="hint">
        Demo accounts: <code>admin/admin123</code>, <code>alice/password</code>, <code>bob/password</code> (banned).
      </p>"#,
    );
    html(bb_ui::page("Login - Brittle Board", &body))
}

pub async fn login_submit(
    data: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> impl Responder {
    let password_hash = data.gate.hash_password(&form.password);

    // Weak filter: tries to block obvious SQLi but is easy to bypass, and
    // only guards this one endpoint.
    if data.gate.looks_like_injection(&form.username)
        || data.gate.looks_like_injection(&form.password)
    {
        let body = bb_ui::card(
            Some(("/user/login", "Back to Login")),
            r#"<h1 class="page-title">Suspicious input blocked</h1>
      <p>Your login request looks like it may contain SQL keywords. Please try again.</p>
      <p class="hint">Note: this filter is very simple and only checks for a few patterns.</p>"#,
        );
        return html(bb_ui::page("Blocked Input", &body));
    }

    log::debug!("login attempt for username {:?}", form.username);

    // Still vulnerable: the username lands in the statement text verbatim.
    let user = match data.store.login_lookup(&form.username, &password_hash).await {
        Err(e) => {
            return html(bb_ui::db_error_page(
                "An error occurred while processing your request.",
                ("/user/login", "Return to Login"),
                Some(&e.to_string()),
            ))
        }
        Ok(None) => {
            let body = bb_ui::card(
                Some(("/", "Back to Home")),
                r#"<h1 class="page-title">Login failed</h1>
      <p>The username or password you entered is incorrect.</p>
      <a href="/user/login" class="btn">Try Again</a>"#,
            );
            return html(bb_ui::page("Login Failed", &body));
        }
        Ok(Some(user)) => user,
    };

    if user.status == "banned" {
        data.set_identity(None);
        let body = bb_ui::card(
            Some(("/", "Back to Home")),
            r#"<h1 class="page-title">Account banned</h1>
      <p>Your account has been banned by an administrator. You cannot post or create topics.</p>"#,
        );
        return html(bb_ui::page("Account Banned", &body));
    }

    data.set_identity(Some(Identity::from(&user)));

    let admin_link = if user.role == "admin" {
        r#"<li class="comment-item"><a href="/admin/panel" class="back-link">Admin Panel</a></li>"#
    } else {
        ""
    };
    let body = bb_ui::card(
        Some(("/", "Back to Home")),
        &format!(
            r#"<h1 class="page-title">Welcome, {username}!</h1>
      <p>You are logged in as <strong>{role}</strong> (status: {status}).</p>

      <h2 class="section-title">Quick Links</h2>
      <ul class="comment-list">
        <li class="comment-item"><a href="/user/profile/{id}" class="back-link">View My Profile</a></li>
        <li class="comment-item"><a href="/community" class="back-link">Community Topics</a></li>
        <li class="comment-item"><a href="/documents/list" class="back-link">Browse Documents</a></li>
        {admin_link}
      </ul>

      <p class="hint">You can now create topics, post comments, and manage documents in the community (unless banned).</p>"#,
            username = user.username,
            role = user.role,
            status = user.status,
            id = user.id,
        ),
    );
    html(bb_ui::page(&format!("Welcome - {}", user.username), &body))
}

pub async fn logout(data: web::Data<AppState>) -> impl Responder {
    data.set_identity(None);
    let body = bb_ui::card(
        Some(("/", "Back to Home")),
        r#"<h1 class="page-title">You have been logged out.</h1>
      <p class="hint">This demo does not use real sessions, so this affects everyone using the app.</p>"#,
    );
    html(bb_ui::page("Logged Out", &body))
}

// ---------- COMMUNITY: TOPIC LIST / CREATE TOPIC ----------

#[derive(Deserialize)]
pub struct TopicForm {
    pub title: Option<String>,
    pub description: Option<String>,
}

pub async fn community(data: web::Data<AppState>) -> impl Responder {
    let topics = match data.store.list_topics().await {
        Err(_) => return html("DB error".to_string()),
        Ok(topics) => topics,
    };

    let mut topics_html: String = topics
        .iter()
        .map(|t| {
            format!(
                r#"
      <li class="comment-item">
        <div><strong>{title}</strong> by <a href="/user/profile/{author}" class="back-link">{author}</a></div>
        <div class="hint">{description}</div>
        <div style="margin-top:0.4rem;">
          <a href="/community/topic/{id}" class="btn">Open Topic</a>
        </div>
      </li>"#,
                title = t.title,
                author = t.author,
                description = t.description.as_deref().unwrap_or(""),
                id = t.id,
            )
        })
        .collect();
    if topics_html.is_empty() {
        topics_html =
            "<li class='comment-item empty'>No topics yet. Create the first one!</li>".to_string();
    }

    let current = data.current_identity();
    let create_html = if current.as_ref().map(|u| !u.is_banned()).unwrap_or(false) {
        r#"
      <form method="POST" action="/community/topic/create" class="form">
        <div class="form-group">
          <label>Topic Title</label>
          <input name="title" class="input" placeholder="What do you want to talk about?" />
        </div>
        <div class="form-group">
          <label>Description</label>
          <textarea name="description" class="textarea" placeholder="Optional short description"></textarea>
        </div>
        <button type="submit" class="btn wide">Create Topic</button>
      </form>"#
    } else {
        r#"
      <p class="hint">
        You must be logged in and not banned to create a topic.
        <a href="/user/login">Login here</a>.
      </p>"#
    };

    let body = bb_ui::card(
        Some(("/", "Back to Home")),
        &format!(
            r#"<h1 class="page-title">Community Topics</h1>
      <p class="page-subtitle">Open a topic and start chatting with others.</p>
      <p class="hint">{session_line}</p>

      <ul class="comment-list" style="margin-top:1rem;">
        {topics_html}
      </ul>

      <h2 class="section-title">Create a new topic</h2>
      {create_html}"#,
            session_line = bb_ui::session_line(current.as_ref()),
        ),
    );
    html(bb_ui::page("Community Topics - Brittle Board", &body))
}

pub async fn create_topic(
    data: web::Data<AppState>,
    form: web::Form<TopicForm>,
) -> impl Responder {
    let current = match data.current_identity() {
        Some(user) if !user.is_banned() => user,
        _ => return html("You must be logged in and not banned to create a topic.".to_string()),
    };

    let title = form.title.clone().unwrap_or_else(|| "Untitled Topic".to_string());
    let description = form.description.clone().unwrap_or_default();

    match data
        .store
        .create_topic(&title, &description, &current.username)
        .await
    {
        Err(_) => html("DB error".to_string()),
        Ok(()) => see_other("/community"),
    }
}

// ---------- TOPIC DETAIL + CHAT (stored XSS) ----------

#[derive(Deserialize)]
pub struct CommentForm {
    pub content: Option<String>,
}

fn comment_item(comment: &Comment, logged_in: bool) -> String {
    let status = comment.status_or_normal();
    let warned_tag = if status == "warned" {
        r#"<span class="tag tag-warned">Warned</span>"#
    } else {
        ""
    };
    let action_links = if logged_in {
        format!(
            r#" | <a href="/comment/edit/{id}" class="back-link">Edit</a> | <a href="/comment/delete/{id}" class="back-link">Delete</a>"#,
            id = comment.id,
        )
    } else {
        String::new()
    };
    // The content hole is raw on purpose: whatever the sanitizer let through
    // is served back to every viewer.
    format!(
        r#"
        <li class="comment-item">
          <div><strong><a href="/user/profile/{author}" class="back-link">{author}</a></strong> says:</div>
          <div>{content}</div>
          <div class="hint">Status: {status} {warned_tag}{action_links}</div>
        </li>"#,
        author = comment.author,
        content = comment.content,
    )
}

pub async fn view_topic(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let topic_id = path.into_inner();

    // The id lands in the statement text verbatim — no numeric validation.
    let topic = match data.store.topic_by_id(&topic_id).await {
        Err(e) => {
            return html(bb_ui::db_error_page(
                "An error occurred while loading the topic.",
                ("/community", "Return to Topics"),
                Some(&e.to_string()),
            ))
        }
        Ok(None) => return html("Topic not found or DB error".to_string()),
        Ok(Some(topic)) => topic,
    };

    let comments = match data.store.comments_for_topic(&topic_id).await {
        Err(e) => {
            return html(bb_ui::db_error_page(
                "An error occurred while loading comments.",
                ("/community", "Return to Topics"),
                Some(&e.to_string()),
            ))
        }
        Ok(comments) => comments,
    };

    let current = data.current_identity();
    let mut comments_html: String = comments
        .iter()
        .map(|c| comment_item(c, current.is_some()))
        .collect();
    if comments_html.is_empty() {
        comments_html =
            "<li class='comment-item empty'>No messages yet. Start the conversation!</li>"
                .to_string();
    }

    let post_form = if current.as_ref().map(|u| !u.is_banned()).unwrap_or(false) {
        format!(
            r#"
      <form method="POST" action="/community/topic/{id}/comment" class="form">
        <div class="form-group">
          <label>Message</label>
          <textarea name="content" class="textarea" placeholder="Write something..."></textarea>
        </div>
        <button type="submit" class="btn wide">Send</button>
      </form>"#,
            id = topic.id,
        )
    } else {
        r#"
      <p class="hint">You must be logged in and not banned to post a message.</p>"#
            .to_string()
    };

    let body = bb_ui::card(
        Some(("/community", "Back to Topics")),
        &format!(
            r#"<h1 class="page-title">{title}</h1>
      <p class="page-subtitle">{description}</p>
      <p class="hint">{session_line}</p>

      <ul class="comment-list" style="margin-top:1rem;">
        {comments_html}
      </ul>

      <h2 class="section-title">Post a message</h2>
      {post_form}"#,
            title = topic.title,
            description = topic.description.as_deref().unwrap_or(""),
            session_line = bb_ui::session_line(current.as_ref()),
        ),
    );
    html(bb_ui::page(&format!("{} - Chat", topic.title), &body))
}

pub async fn post_comment(
    data: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<CommentForm>,
) -> impl Responder {
    let topic_id = path.into_inner();

    let current = match data.current_identity() {
        Some(user) if !user.is_banned() => user,
        _ => return html("You must be logged in and not banned to post messages.".to_string()),
    };

    // Only removes the literal "<script" opener; everything else survives.
    let content = data
        .gate
        .sanitize_comment(form.content.as_deref().unwrap_or(""));

    match data
        .store
        .create_comment(&topic_id, &current.username, &content)
        .await
    {
        Err(_) => html("DB error".to_string()),
        Ok(()) => see_other(&format!("/community/topic/{topic_id}")),
    }
}

// ---------- COMMENT EDIT/DELETE (IDOR: no ownership checks) ----------

pub async fn edit_comment_form(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let comment_id = path.into_inner();

    if data.current_identity().is_none() {
        return html("You must be logged in to edit comments.".to_string());
    }

    // Any authenticated identity may load any comment into the editor.
    let comment = match data.store.comment_by_id(&comment_id).await {
        Err(_) => {
            return html(bb_ui::db_error_page(
                "An error occurred while processing your request.",
                ("/user/login", "Return to Login"),
                None,
            ))
        }
        Ok(None) => return html("Comment not found.".to_string()),
        Ok(Some(comment)) => comment,
    };

    let back_href = format!("/community/topic/{}", comment.topic_id);
    let body = bb_ui::card(
        Some((back_href.as_str(), "Back to Topic")),
        &format!(
            r#"<h1 class="page-title">Edit Comment</h1>
      <p class="hint">Original Author: {author}</p>
      <form method="POST" action="/comment/update/{id}" class="form">
        <div class="form-group">
          <label>Comment Content</label>
          <textarea name="content" class="textarea">{content}</textarea>
        </div>
        <button type="submit" class="btn wide">Update Comment</button>
      </form>"#,
            author = comment.author,
            id = comment_id,
            content = comment.content,
        ),
    );
    html(bb_ui::page("Edit Comment", &body))
}

pub async fn update_comment(
    data: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<CommentForm>,
) -> impl Responder {
    let comment_id = path.into_inner();

    if data.current_identity().is_none() {
        return html("You must be logged in to update comments.".to_string());
    }

    let content = data
        .gate
        .sanitize_comment(form.content.as_deref().unwrap_or(""));

    if data
        .store
        .update_comment_content(&comment_id, &content)
        .await
        .is_err()
    {
        return html(bb_ui::db_error_page(
            "An error occurred while processing your request.",
            ("/user/login", "Return to Login"),
            None,
        ));
    }

    match data.store.comment_topic_id(&comment_id).await {
        Ok(Some(topic_id)) => see_other(&format!("/community/topic/{topic_id}")),
        _ => html("Error redirecting".to_string()),
    }
}

pub async fn delete_comment(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let comment_id = path.into_inner();

    if data.current_identity().is_none() {
        return html("You must be logged in to delete comments.".to_string());
    }

    let comment = match data.store.comment_by_id(&comment_id).await {
        Err(_) => {
            return html(bb_ui::db_error_page(
                "An error occurred while processing your request.",
                ("/user/login", "Return to Login"),
                None,
            ))
        }
        Ok(None) => return html("Comment not found.".to_string()),
        Ok(Some(comment)) => comment,
    };

    if data.store.delete_comment(&comment_id).await.is_err() {
        return html(bb_ui::db_error_page(
            "An error occurred while deleting the comment.",
            ("/community", "Return to Community"),
            None,
        ));
    }

    see_other(&format!("/community/topic/{}", comment.topic_id))
}

// ---------- ADMIN PANEL (view checks the real identity...) ----------

pub async fn admin_panel(data: web::Data<AppState>) -> impl Responder {
    let current = data.current_identity();
    if !current.as_ref().map(|u| u.is_admin()).unwrap_or(false) {
        let body = bb_ui::card(
            Some(("/", "Back to Home")),
            r#"<h1 class="page-title">Access denied</h1>
      <p>This section is restricted to system administrators.</p>
      <p class="hint">You must log in as <code>admin</code> to view this panel.</p>"#,
        );
        return html(bb_ui::page("Access Denied", &body));
    }

    let users = match data.store.list_users().await {
        Err(_) => return html("DB error".to_string()),
        Ok(users) => users,
    };
    let comments = match data.store.list_comments().await {
        Err(_) => return html("DB error".to_string()),
        Ok(comments) => comments,
    };

    let users_html: String = users
        .iter()
        .map(|u| {
            format!(
                r#"
        <tr>
          <td>{id}</td>
          <td><a href="/user/profile/{id}" class="back-link">{username}</a></td>
          <td>{password}</td>
          <td>{role}</td>
          <td>{status}</td>
          <td>
            <a href="/admin/user/ban?id={id}&role=admin" class="back-link">Ban</a> |
            <a href="/admin/user/unban?id={id}&role=admin" class="back-link">Unban</a> |
            <a href="/admin/user/mod?id={id}&role=admin" class="back-link">Make Moderator</a>
          </td>
        </tr>"#,
                id = u.id,
                username = u.username,
                password = u.password,
                role = u.role,
                status = u.status,
            )
        })
        .collect();

    let mut comments_html: String = comments
        .iter()
        .map(|c| {
            format!(
                r#"
        <tr>
          <td>{id}</td>
          <td><a href="/community/topic/{topic_id}" class="back-link">Topic {topic_id}</a></td>
          <td><a href="/user/profile/{author}" class="back-link">{author}</a></td>
          <td>{content}</td>
          <td>{status}</td>
          <td>
            <a href="/admin/comment/warn?id={id}&role=admin" class="back-link">Warn</a> |
            <a href="/admin/comment/delete?id={id}&role=admin" class="back-link">Delete</a> |
            <a href="/comment/edit/{id}" class="back-link">Edit</a>
          </td>
        </tr>"#,
                id = c.id,
                topic_id = c.topic_id,
                author = c.author,
                content = c.content,
                status = c.status_or_normal(),
            )
        })
        .collect();
    if comments_html.is_empty() {
        comments_html = "<tr><td colspan='6'>No comments yet.</td></tr>".to_string();
    }

    let body = bb_ui::card(
        Some(("/", "Back to Home")),
        &format!(
            r#"<h1 class="page-title">Admin Panel</h1>
      <p class="page-subtitle">Manage users and moderate comments.</p>

      <h2 class="section-title">Users</h2>
      <table class="table">
        <thead>
          <tr>
            <th>ID</th>
            <th>Username</th>
            <th>Plain-text Password</th>
            <th>Role</th>
            <th>Status</th>
            <th>Actions</th>
          </tr>
        </thead>
        <tbody>
          {users_html}
        </tbody>
      </table>

      <h2 class="section-title" style="margin-top:2rem;">Comments</h2>
      <table class="table">
        <thead>
          <tr>
            <th>ID</th>
            <th>Topic</th>
            <th>Author</th>
            <th>Content</th>
            <th>Status</th>
            <th>Actions</th>
          </tr>
        </thead>
        <tbody>
          {comments_html}
        </tbody>
      </table>

      <h2 class="section-title" style="margin-top:2rem;">Documents</h2>
      <p class="hint"><a href="/documents/list" class="back-link">View All Documents</a></p>"#
        ),
    );
    html(bb_ui::page("Admin Panel", &body))
}

// ---------- ADMIN ACTIONS (...but the actions check a query parameter) ----------

#[derive(Deserialize)]
pub struct AdminActionQuery {
    pub id: Option<String>,
    pub role: Option<String>,
}

/// The whole authorization check for the mutation endpoints: a caller-supplied
/// query parameter compared to the literal string "admin". The server-held
/// identity is never consulted here — that asymmetry with the panel view is
/// the broken-access-control scenario this app exists to present.
fn admin_param_ok(query: &AdminActionQuery) -> bool {
    query.role.as_deref() == Some("admin")
}

fn generic_db_error_page() -> HttpResponse {
    html(bb_ui::db_error_page(
        "An error occurred while processing your request.",
        ("/user/login", "Return to Login"),
        None,
    ))
}

pub async fn admin_ban_user(
    data: web::Data<AppState>,
    query: web::Query<AdminActionQuery>,
) -> impl Responder {
    if !admin_param_ok(&query) {
        return html("Access denied.".to_string());
    }
    let id = query.id.clone().unwrap_or_default();
    match data.store.set_user_status(&id, "banned").await {
        Err(_) => generic_db_error_page(),
        Ok(()) => see_other("/admin/panel?role=admin"),
    }
}

pub async fn admin_unban_user(
    data: web::Data<AppState>,
    query: web::Query<AdminActionQuery>,
) -> impl Responder {
    if !admin_param_ok(&query) {
        return html("Access denied.".to_string());
    }
    let id = query.id.clone().unwrap_or_default();
    match data.store.set_user_status(&id, "active").await {
        Err(_) => generic_db_error_page(),
        Ok(()) => see_other("/admin/panel?role=admin"),
    }
}

pub async fn admin_promote_user(
    data: web::Data<AppState>,
    query: web::Query<AdminActionQuery>,
) -> impl Responder {
    if !admin_param_ok(&query) {
        return html("Access denied.".to_string());
    }
    let id = query.id.clone().unwrap_or_default();
    match data.store.set_user_role(&id, "moderator").await {
        Err(_) => generic_db_error_page(),
        Ok(()) => see_other("/admin/panel?role=admin"),
    }
}

pub async fn admin_warn_comment(
    data: web::Data<AppState>,
    query: web::Query<AdminActionQuery>,
) -> impl Responder {
    if !admin_param_ok(&query) {
        return html("Access denied.".to_string());
    }
    let id = query.id.clone().unwrap_or_default();
    match data.store.set_comment_status(&id, "warned").await {
        Err(_) => generic_db_error_page(),
        Ok(()) => see_other("/admin/panel?role=admin"),
    }
}

pub async fn admin_delete_comment(
    data: web::Data<AppState>,
    query: web::Query<AdminActionQuery>,
) -> impl Responder {
    if !admin_param_ok(&query) {
        return html("Access denied.".to_string());
    }
    let id = query.id.clone().unwrap_or_default();
    match data.store.delete_comment(&id).await {
        Err(_) => generic_db_error_page(),
        Ok(()) => see_other("/admin/panel?role=admin"),
    }
}

// ---------- USER PROFILE (IDOR: anyone can view anyone) ----------

pub async fn user_profile(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();

    // No check that the viewer is (or even knows) the subject.
    let user = match data.store.user_by_id(&user_id).await {
        Err(e) => {
            return html(bb_ui::db_error_page(
                "An error occurred while processing your request.",
                ("/user/login", "Return to Login"),
                Some(&e.to_string()),
            ))
        }
        Ok(None) => {
            let body = bb_ui::card(
                None,
                &format!(
                    r#"<h1 class="page-title">User Not Found</h1>
      <p>User ID {user_id} does not exist.</p>"#
                ),
            );
            return html(bb_ui::page("User Not Found", &body));
        }
        Ok(Some(user)) => user,
    };

    // Three dependent reads with no transaction around them; a failure in
    // any one collapses to an empty section rather than an error page.
    let documents = data
        .store
        .documents_by_owner(user.id)
        .await
        .unwrap_or_default();
    let topics = data
        .store
        .topics_by_author(&user.username)
        .await
        .unwrap_or_default();
    let comments = data
        .store
        .comments_by_author(&user.username)
        .await
        .unwrap_or_default();

    let docs_html = if documents.is_empty() {
        r#"<li class="comment-item empty">No documents</li>"#.to_string()
    } else {
        documents
            .iter()
            .map(|d| {
                let visibility = if d.is_private { "(Private)" } else { "(Public)" };
                format!(
                    r#"<li class="comment-item"><a href="/documents/{id}" class="back-link">{title}</a> {visibility}</li>"#,
                    id = d.id,
                    title = d.title,
                )
            })
            .collect()
    };

    let topics_html = if topics.is_empty() {
        r#"<li class="comment-item empty">No topics created</li>"#.to_string()
    } else {
        topics
            .iter()
            .map(|t| {
                format!(
                    r#"<li class="comment-item"><a href="/community/topic/{id}" class="back-link">{title}</a></li>"#,
                    id = t.id,
                    title = t.title,
                )
            })
            .collect()
    };

    let comments_html = if comments.is_empty() {
        r#"<li class="comment-item empty">No comments posted</li>"#.to_string()
    } else {
        comments
            .iter()
            .map(|c| {
                format!(
                    r#"<li class="comment-item"><a href="/community/topic/{topic_id}" class="back-link">Comment #{id}</a> in Topic {topic_id}</li>"#,
                    id = c.id,
                    topic_id = c.topic_id,
                )
            })
            .collect()
    };

    let body = bb_ui::card(
        Some(("/", "Back to Home")),
        &format!(
            r#"<h1 class="page-title">User Profile: {username}</h1>
      <p><strong>User ID:</strong> {id}</p>
      <p><strong>Username:</strong> {username}</p>
      <p><strong>Role:</strong> {role}</p>
      <p><strong>Status:</strong> {status}</p>

      <h2 class="section-title" style="margin-top:1.5rem;">Documents ({doc_count})</h2>
      <ul class="comment-list">
        {docs_html}
      </ul>

      <h2 class="section-title" style="margin-top:1.5rem;">Topics Created ({topic_count})</h2>
      <ul class="comment-list">
        {topics_html}
      </ul>

      <h2 class="section-title" style="margin-top:1.5rem;">Comments Posted ({comment_count})</h2>
      <ul class="comment-list">
        {comments_html}
      </ul>"#,
            username = user.username,
            id = user.id,
            role = user.role,
            status = user.status,
            doc_count = documents.len(),
            topic_count = topics.len(),
            comment_count = comments.len(),
        ),
    );
    html(bb_ui::page(
        &format!("User Profile - {}", user.username),
        &body,
    ))
}

// ---------- DOCUMENTS (IDOR: the private flag is never consulted) ----------

#[derive(Deserialize)]
pub struct DocumentForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_private: Option<String>,
}

pub async fn document_form(data: web::Data<AppState>) -> impl Responder {
    if data.current_identity().is_none() {
        return html("You must be logged in to create documents.".to_string());
    }

    let body = bb_ui::card(
        Some(("/documents/list", "Back to Documents")),
        r#"<h1 class="page-title">Create New Document</h1>
      <form method="POST" action="/documents/create" class="form">
        <div class="form-group">
          <label>Title</label>
          <input name="title" class="input" placeholder="Document title" required />
        </div>
        <div class="form-group">
          <label>Content</label>
          <textarea name="content" class="textarea" placeholder="Document content" required></textarea>
        </div>
        <div class="form-group">
          <label>
            <input type="checkbox" name="is_private" value="1" checked />
            Private Document
          </label>
        </div>
        <button type="submit" class="btn wide">Create Document</button>
      </form>"#,
    );
    html(bb_ui::page("Create Document", &body))
}

pub async fn create_document(
    data: web::Data<AppState>,
    form: web::Form<DocumentForm>,
) -> impl Responder {
    let current = match data.current_identity() {
        Some(user) => user,
        None => return html("You must be logged in to create documents.".to_string()),
    };

    let title = form.title.clone().unwrap_or_else(|| "Untitled".to_string());
    let content = form.content.clone().unwrap_or_default();
    let is_private = form.is_private.is_some();

    match data
        .store
        .create_document(&title, &content, current.id, is_private)
        .await
    {
        Err(e) => html(format!("DB error: {e}")),
        Ok(document_id) => see_other(&format!("/documents/{document_id}")),
    }
}

pub async fn document_list(data: web::Data<AppState>) -> impl Responder {
    let documents = match data.store.list_documents().await {
        Err(e) => {
            return html(bb_ui::db_error_page(
                "An error occurred while processing your request.",
                ("/documents/list", "Return to Documents"),
                Some(&e.to_string()),
            ))
        }
        Ok(documents) => documents,
    };

    let docs_html = if documents.is_empty() {
        r#"<li class="comment-item empty">No documents found</li>"#.to_string()
    } else {
        documents
            .iter()
            .map(|d| {
                let visibility = if d.is_private { "Private" } else { "Public" };
                format!(
                    r#"
        <li class="comment-item">
          <div><strong><a href="/documents/{id}" class="back-link">{title}</a></strong></div>
          <div class="hint">Owner: <a href="/user/profile/{owner_id}" class="back-link">{owner}</a> | {visibility}</div>
        </li>"#,
                    id = d.id,
                    title = d.title,
                    owner_id = d.owner_id,
                    owner = d.owner_name.as_deref().unwrap_or("Unknown"),
                )
            })
            .collect()
    };

    let create_link = if data.current_identity().is_some() {
        r#"<p class="hint" style="margin-top:1rem;"><a href="/documents/create" class="back-link">Create New Document</a></p>"#
    } else {
        ""
    };

    let body = bb_ui::card(
        Some(("/", "Back to Home")),
        &format!(
            r#"<h1 class="page-title">All Documents</h1>
      <p class="page-subtitle">Browse all available documents in the system.</p>
      <ul class="comment-list" style="margin-top:1rem;">
        {docs_html}
      </ul>
      {create_link}"#
        ),
    );
    html(bb_ui::page("Documents List", &body))
}

pub async fn view_document(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let document_id = path.into_inner();

    // No authorization check and no look at is_private: any caller can read
    // any document by walking the id space.
    let document = match data.store.document_by_id(&document_id).await {
        Err(e) => {
            return html(bb_ui::db_error_page(
                "An error occurred while processing your request.",
                ("/user/login", "Return to Login"),
                Some(&e.to_string()),
            ))
        }
        Ok(None) => {
            let body = bb_ui::card(
                None,
                &format!(
                    r#"<h1 class="page-title">Document Not Found</h1>
      <p>Document ID {document_id} does not exist.</p>"#
                ),
            );
            return html(bb_ui::page("Document Not Found", &body));
        }
        Ok(Some(document)) => document,
    };

    let owner_name = match data.store.owner_username(document.owner_id).await {
        Ok(Some(name)) => name,
        _ => format!("User {}", document.owner_id),
    };
    let visibility = if document.is_private { "Yes" } else { "No" };

    let body = bb_ui::card(
        Some(("/documents/list", "Back to Documents")),
        &format!(
            r#"<h1 class="page-title">{title}</h1>
      <p><strong>Document ID:</strong> {id}</p>
      <p><strong>Owner:</strong> <a href="/user/profile/{owner_id}" class="back-link">{owner_name}</a> (User ID: {owner_id})</p>
      <p><strong>Private Document:</strong> {visibility}</p>
      <div style="margin-top: 1rem; padding: 1rem; background: rgba(0,0,0,0.2); border-radius: 0.5rem;">
        <strong>Document Content:</strong>
        <pre style="white-space: pre-wrap; margin-top: 0.5rem;">{content}</pre>
      </div>"#,
            title = document.title,
            id = document.id,
            owner_id = document.owner_id,
            content = document.content,
        ),
    );
    html(bb_ui::page(&format!("Document - {}", document.title), &body))
}

// ---------- FILE ACCESS (path traversal) ----------

#[derive(Deserialize)]
pub struct FileQuery {
    pub file: Option<String>,
}

#[derive(Deserialize)]
pub struct IncludeQuery {
    pub page: Option<String>,
}

pub async fn read_file(data: web::Data<AppState>, query: web::Query<FileQuery>) -> impl Responder {
    let file_name = query.file.clone().unwrap_or_default();
    if file_name.is_empty() {
        return html("Error: file parameter required. Usage: /api/file?file=filename".to_string());
    }

    // The name is joined onto the base directory as-is; ascending segments
    // reach anything the process can read.
    match data.pages.read_page(&file_name).await {
        Err(e) => {
            let body = bb_ui::card(
                None,
                &format!(
                    r#"<h1 class="page-title">File Read Error</h1>
      <p>Error reading file: {e}</p>"#
                ),
            );
            html(bb_ui::page("File Read Error", &body))
        }
        Ok(content) => {
            let body = bb_ui::card(
                None,
                &format!(
                    r#"<h1 class="page-title">File Contents</h1>
      <p><strong>File:</strong> {file_name}</p>
      <pre style="background: rgba(0,0,0,0.3); padding: 1rem; border-radius: 0.5rem; overflow-x: auto;">{content}</pre>"#
                ),
            );
            html(bb_ui::page("File Contents", &body))
        }
    }
}

pub async fn include_page(
    data: web::Data<AppState>,
    query: web::Query<IncludeQuery>,
) -> impl Responder {
    let include_file = query
        .page
        .clone()
        .unwrap_or_else(|| "index.html".to_string());

    match data.pages.read_page(&include_file).await {
        Err(e) => html(format!("Error including file: {e}")),
        Ok(content) => {
            let body = bb_ui::card(
                None,
                &format!(
                    r#"<h1 class="page-title">Included File</h1>
      <p><strong>File:</strong> {include_file}</p>
      <pre style="background: rgba(0,0,0,0.3); padding: 1rem; border-radius: 0.5rem; overflow-x: auto;">{content}</pre>"#
                ),
            );
            html(bb_ui::page("Included File", &body))
        }
    }
}
