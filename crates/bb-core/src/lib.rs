//! brittle-board/crates/bb-core/src/lib.rs
//!
//! The central domain types and interface definitions for brittle-board, a
//! deliberately vulnerable forum used to validate security scanners. The
//! weaknesses the plugins implement are contractual behavior, not bugs.

pub mod error;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;

    #[test]
    fn test_identity_role_checks() {
        let identity = Identity {
            id: 1,
            username: "admin".to_string(),
            role: "admin".to_string(),
            status: "active".to_string(),
        };
        assert!(identity.is_admin());
        assert!(!identity.is_banned());
    }

    #[test]
    fn test_comment_status_fallback() {
        let comment = Comment {
            id: 7,
            topic_id: 1,
            author: "alice".to_string(),
            content: "hello".to_string(),
            status: None,
        };
        assert_eq!(comment.status_or_normal(), "normal");
    }
}
