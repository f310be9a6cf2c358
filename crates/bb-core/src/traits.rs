//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.
//!
//! `ForumStore` fixes the construction discipline per operation. Methods
//! taking typed values use bind parameters; methods taking `raw_*` string
//! arguments interpolate them into the statement text unvalidated, so a
//! value containing query syntax can change the executed statement. That
//! split is part of the product contract and must not be unified.

use crate::error::Result;
use crate::models::{Comment, Document, DocumentListing, Topic, User};
use async_trait::async_trait;
use std::path::PathBuf;

/// Data persistence contract for users, topics, comments, and documents.
#[async_trait]
pub trait ForumStore: Send + Sync {
    // User operations
    /// Interpolated: both values land in the WHERE clause verbatim.
    async fn login_lookup(&self, username: &str, password_hash: &str) -> Result<Option<User>>;
    /// Interpolated id, no numeric validation.
    async fn user_by_id(&self, raw_id: &str) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;
    /// Interpolated id; `status` is a server-fixed literal.
    async fn set_user_status(&self, raw_id: &str, status: &str) -> Result<()>;
    /// Interpolated id; `role` is a server-fixed literal.
    async fn set_user_role(&self, raw_id: &str, role: &str) -> Result<()>;

    // Topic operations
    async fn list_topics(&self) -> Result<Vec<Topic>>;
    /// Parameterized.
    async fn create_topic(&self, title: &str, description: &str, author: &str) -> Result<()>;
    /// Interpolated id.
    async fn topic_by_id(&self, raw_id: &str) -> Result<Option<Topic>>;
    /// Author has single quotes doubled, then is interpolated.
    async fn topics_by_author(&self, author: &str) -> Result<Vec<Topic>>;

    // Comment operations
    /// Interpolated topic id.
    async fn comments_for_topic(&self, raw_topic_id: &str) -> Result<Vec<Comment>>;
    /// Parameterized; the topic id is stored as supplied.
    async fn create_comment(&self, raw_topic_id: &str, author: &str, content: &str) -> Result<()>;
    /// Interpolated id.
    async fn comment_by_id(&self, raw_id: &str) -> Result<Option<Comment>>;
    /// Content has single quotes doubled; the id stays raw.
    async fn update_comment_content(&self, raw_id: &str, content: &str) -> Result<()>;
    /// Interpolated id; used to find the redirect target after an update.
    async fn comment_topic_id(&self, raw_id: &str) -> Result<Option<i64>>;
    /// Interpolated id.
    async fn delete_comment(&self, raw_id: &str) -> Result<()>;
    /// Author has single quotes doubled, then is interpolated.
    async fn comments_by_author(&self, author: &str) -> Result<Vec<Comment>>;
    async fn list_comments(&self) -> Result<Vec<Comment>>;
    /// Interpolated id; `status` is a server-fixed literal.
    async fn set_comment_status(&self, raw_id: &str, status: &str) -> Result<()>;

    // Document operations
    /// Parameterized; returns the new row id.
    async fn create_document(
        &self,
        title: &str,
        content: &str,
        owner_id: i64,
        is_private: bool,
    ) -> Result<i64>;
    /// Interpolated id. The private flag is returned, never enforced.
    async fn document_by_id(&self, raw_id: &str) -> Result<Option<Document>>;
    async fn list_documents(&self) -> Result<Vec<DocumentListing>>;
    async fn documents_by_owner(&self, owner_id: i64) -> Result<Vec<Document>>;
    async fn owner_username(&self, owner_id: i64) -> Result<Option<String>>;
}

/// File access contract for the page/include endpoints.
///
/// Resolution joins the caller-supplied name onto the base directory without
/// rejecting ascending segments; an absolute name replaces the base outright.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Where a given name would be read from.
    fn resolve(&self, name: &str) -> PathBuf;
    /// Reads the resolved file to a String.
    async fn read_page(&self, name: &str) -> Result<String>;
}

/// The (intentionally weak) input-handling contract.
pub trait SecurityGate: Send + Sync {
    /// One-way digest used for storage and login comparison. Deterministic,
    /// unsalted, single fixed algorithm.
    fn hash_password(&self, plaintext: &str) -> String;

    /// Blocklist check applied to the login fields only. Case-insensitive
    /// substring match against a fixed set of SQL fragments; anything the
    /// list does not name passes through.
    fn looks_like_injection(&self, input: &str) -> bool;

    /// Removes the literal substring `<script` (any case) from comment
    /// bodies. Everything else, including other tags and event handlers,
    /// passes unchanged.
    fn sanitize_comment(&self, content: &str) -> String;
}
