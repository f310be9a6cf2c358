//! # Domain Models
//!
//! These structs represent the core entities of brittle-board. Rows use the
//! store's auto-increment integer ids. `role` and `status` stay free-form
//! strings on purpose: the schema enforces nothing, and injected queries may
//! surface values outside the seeded vocabulary — those rows must still flow
//! to the page unmodified.

use serde::{Deserialize, Serialize};

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Free text; duplicates are permitted.
    pub username: String,
    /// Hex digest of the password as produced by `SecurityGate::hash_password`.
    pub password: String,
    /// Seeded vocabulary: "admin", "user", "moderator".
    pub role: String,
    /// Seeded vocabulary: "active", "banned".
    pub status: String,
}

/// A discussion topic. `author` is a username copied at creation time, not a
/// foreign key; deleting the user leaves the string dangling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub author: String,
}

/// A message inside a topic. `topic_id` is not enforced as a foreign key and
/// may reference a topic that does not exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub topic_id: i64,
    pub author: String,
    /// May contain any byte sequence the sanitizer did not match.
    pub content: String,
    /// "normal" or "warned"; NULL collapses to "normal" at render time.
    pub status: Option<String>,
}

impl Comment {
    pub fn status_or_normal(&self) -> &str {
        self.status.as_deref().unwrap_or("normal")
    }
}

/// A stored document. `is_private` is advisory only — read endpoints never
/// consult it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Numeric owner id, not validated against the users table.
    pub owner_id: i64,
    pub is_private: bool,
}

/// A document row joined with its owner's username for the listing page.
/// `owner_name` is absent when the owner id matches no user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListing {
    pub id: i64,
    pub title: String,
    pub owner_id: i64,
    pub is_private: bool,
    pub owner_name: Option<String>,
}

/// The identity held by the process-wide session slot: a copy of a user
/// row's identifying fields taken at login. It is never refreshed from the
/// table afterwards — a ban applied later is only noticed at the next login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub status: String,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn is_banned(&self) -> bool {
        self.status == "banned"
    }
}

/// The identity copy taken from a freshly matched user row at login.
impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
            status: user.status.clone(),
        }
    }
}
