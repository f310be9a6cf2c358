//! # bb-db-sqlite Implementation
//!
//! This module implements the data mapping between the in-memory SQLite
//! store and the `bb-core` domain models, and owns every SQL statement in
//! the system.
//!
//! Two construction disciplines coexist here on purpose. Creation paths use
//! bind parameters; everything else interpolates request-derived strings
//! straight into the statement text, so a value carrying query syntax can
//! rewrite the executed statement. The split follows the port docs in
//! `bb-core::traits` and must not be "fixed".

use async_trait::async_trait;
use bb_core::error::{AppError, Result};
use bb_core::models::{Comment, Document, DocumentListing, Topic, User};
use bb_core::traits::{ForumStore, SecurityGate};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

pub struct SqliteForumStore {
    pool: SqlitePool,
}

fn db_err(e: sqlx::Error) -> AppError {
    AppError::Database(e.to_string())
}

// SQL string-literal escaping as the original did it: double the quotes,
// nothing else. Only applied where the original applied it.
fn quote_escape(value: &str) -> String {
    value.replace('\'', "''")
}

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        password: row.get("password"),
        role: row.get("role"),
        status: row.get("status"),
    }
}

fn topic_from_row(row: &SqliteRow) -> Topic {
    Topic {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        author: row.get("author"),
    }
}

fn comment_from_row(row: &SqliteRow) -> Comment {
    Comment {
        id: row.get("id"),
        topic_id: row.get("topic_id"),
        author: row.get("author"),
        content: row.get("content"),
        status: row.get("status"),
    }
}

fn document_from_row(row: &SqliteRow) -> Document {
    Document {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        owner_id: row.get("owner_id"),
        is_private: row.get("is_private"),
    }
}

impl SqliteForumStore {
    /// Opens the store and creates the schema. The pool is capped at one
    /// connection: each additional connection to `sqlite::memory:` would
    /// open its own empty database, and the store serializes statement
    /// execution on that single connection anyway.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;
        let store = Self { pool };
        store.create_schema().await?;
        Ok(store)
    }

    async fn create_schema(&self) -> anyhow::Result<()> {
        let ddl = [
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT,
                password TEXT,
                role TEXT,
                status TEXT
            )",
            "CREATE TABLE topics (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT,
                description TEXT,
                author TEXT
            )",
            "CREATE TABLE comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                topic_id INTEGER,
                author TEXT,
                content TEXT,
                status TEXT
            )",
            "CREATE TABLE documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT,
                content TEXT,
                owner_id INTEGER,
                is_private INTEGER DEFAULT 1
            )",
        ];
        for statement in ddl {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Seeds the four fixed accounts, one topic, and four documents. Runs on
    /// every process start; the store never persists across restarts.
    pub async fn seed(&self, gate: &dyn SecurityGate) -> anyhow::Result<()> {
        let admin_hash = gate.hash_password("admin123");
        let alice_hash = gate.hash_password("password");
        let willie_hash = gate.hash_password("mylove3000");
        let bob_hash = gate.hash_password("password");

        let statements = [
            format!(
                "INSERT INTO users (username, password, role, status)
                 VALUES ('admin', '{admin_hash}', 'admin', 'active')"
            ),
            format!(
                "INSERT INTO users (username, password, role, status)
                 VALUES ('alice', '{alice_hash}', 'user', 'active')"
            ),
            format!(
                "INSERT INTO users (username, password, role, status)
                 VALUES ('Willie', '{willie_hash}', 'user', 'active')"
            ),
            format!(
                "INSERT INTO users (username, password, role, status)
                 VALUES ('bob', '{bob_hash}', 'user', 'banned')"
            ),
            "INSERT INTO documents (title, content, owner_id, is_private)
             VALUES ('Admin Secret Notes', 'Password: admin123\nAPI Key: sk_live_abc123xyz\nDatabase credentials: admin/password', 1, 1)"
                .to_string(),
            "INSERT INTO documents (title, content, owner_id, is_private)
             VALUES ('Alice Personal Notes', 'My secret: I love chocolate\nBank account: 123456789\nSSN: 555-55-5555', 2, 1)"
                .to_string(),
            "INSERT INTO documents (title, content, owner_id, is_private)
             VALUES ('Willie Private Diary', 'Dear diary, today I learned about SQL injection...', 3, 1)"
                .to_string(),
            "INSERT INTO documents (title, content, owner_id, is_private)
             VALUES ('Public Announcement', 'This is a public document everyone can see', 1, 0)"
                .to_string(),
            "INSERT INTO topics (title, description, author)
             VALUES ('General Feedback', 'Share anything about the site here.', 'admin')"
                .to_string(),
        ];
        for statement in statements {
            sqlx::query(&statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn exec(&self, sql: String) -> Result<()> {
        log::debug!("SQL: {sql}");
        sqlx::query(&sql).execute(&self.pool).await.map_err(db_err)?;
        Ok(())
    }

    /// First matching row, if any. Extra matches are ignored — an injected
    /// always-true predicate therefore resolves to the first user row.
    async fn fetch_first(&self, sql: String) -> Result<Option<SqliteRow>> {
        log::debug!("SQL: {sql}");
        sqlx::query(&sql)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn fetch_rows(&self, sql: String) -> Result<Vec<SqliteRow>> {
        log::debug!("SQL: {sql}");
        sqlx::query(&sql).fetch_all(&self.pool).await.map_err(db_err)
    }
}

#[async_trait]
impl ForumStore for SqliteForumStore {
    async fn login_lookup(&self, username: &str, password_hash: &str) -> Result<Option<User>> {
        let sql = format!(
            "SELECT * FROM users WHERE username = '{username}' AND password = '{password_hash}'"
        );
        Ok(self.fetch_first(sql).await?.map(|row| user_from_row(&row)))
    }

    async fn user_by_id(&self, raw_id: &str) -> Result<Option<User>> {
        let sql = format!("SELECT id, username, password, role, status FROM users WHERE id = {raw_id}");
        Ok(self.fetch_first(sql).await?.map(|row| user_from_row(&row)))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = self.fetch_rows("SELECT * FROM users".to_string()).await?;
        Ok(rows.iter().map(user_from_row).collect())
    }

    async fn set_user_status(&self, raw_id: &str, status: &str) -> Result<()> {
        self.exec(format!("UPDATE users SET status = '{status}' WHERE id = {raw_id}"))
            .await
    }

    async fn set_user_role(&self, raw_id: &str, role: &str) -> Result<()> {
        self.exec(format!("UPDATE users SET role = '{role}' WHERE id = {raw_id}"))
            .await
    }

    async fn list_topics(&self) -> Result<Vec<Topic>> {
        let rows = self.fetch_rows("SELECT * FROM topics".to_string()).await?;
        Ok(rows.iter().map(topic_from_row).collect())
    }

    async fn create_topic(&self, title: &str, description: &str, author: &str) -> Result<()> {
        sqlx::query("INSERT INTO topics (title, description, author) VALUES (?, ?, ?)")
            .bind(title)
            .bind(description)
            .bind(author)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn topic_by_id(&self, raw_id: &str) -> Result<Option<Topic>> {
        let sql = format!("SELECT * FROM topics WHERE id = {raw_id}");
        Ok(self.fetch_first(sql).await?.map(|row| topic_from_row(&row)))
    }

    async fn topics_by_author(&self, author: &str) -> Result<Vec<Topic>> {
        let sql = format!(
            "SELECT * FROM topics WHERE author = '{}'",
            quote_escape(author)
        );
        let rows = self.fetch_rows(sql).await?;
        Ok(rows.iter().map(topic_from_row).collect())
    }

    async fn comments_for_topic(&self, raw_topic_id: &str) -> Result<Vec<Comment>> {
        let sql = format!("SELECT * FROM comments WHERE topic_id = {raw_topic_id}");
        let rows = self.fetch_rows(sql).await?;
        Ok(rows.iter().map(comment_from_row).collect())
    }

    async fn create_comment(&self, raw_topic_id: &str, author: &str, content: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO comments (topic_id, author, content, status) VALUES (?, ?, ?, 'normal')",
        )
        .bind(raw_topic_id)
        .bind(author)
        .bind(content)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn comment_by_id(&self, raw_id: &str) -> Result<Option<Comment>> {
        let sql = format!("SELECT * FROM comments WHERE id = {raw_id}");
        Ok(self
            .fetch_first(sql)
            .await?
            .map(|row| comment_from_row(&row)))
    }

    async fn update_comment_content(&self, raw_id: &str, content: &str) -> Result<()> {
        let sql = format!(
            "UPDATE comments SET content = '{}' WHERE id = {raw_id}",
            quote_escape(content)
        );
        self.exec(sql).await
    }

    async fn comment_topic_id(&self, raw_id: &str) -> Result<Option<i64>> {
        let sql = format!("SELECT topic_id FROM comments WHERE id = {raw_id}");
        Ok(self
            .fetch_first(sql)
            .await?
            .map(|row| row.get("topic_id")))
    }

    async fn delete_comment(&self, raw_id: &str) -> Result<()> {
        self.exec(format!("DELETE FROM comments WHERE id = {raw_id}"))
            .await
    }

    async fn comments_by_author(&self, author: &str) -> Result<Vec<Comment>> {
        let sql = format!(
            "SELECT * FROM comments WHERE author = '{}'",
            quote_escape(author)
        );
        let rows = self.fetch_rows(sql).await?;
        Ok(rows.iter().map(comment_from_row).collect())
    }

    async fn list_comments(&self) -> Result<Vec<Comment>> {
        let rows = self.fetch_rows("SELECT * FROM comments".to_string()).await?;
        Ok(rows.iter().map(comment_from_row).collect())
    }

    async fn set_comment_status(&self, raw_id: &str, status: &str) -> Result<()> {
        self.exec(format!(
            "UPDATE comments SET status = '{status}' WHERE id = {raw_id}"
        ))
        .await
    }

    async fn create_document(
        &self,
        title: &str,
        content: &str,
        owner_id: i64,
        is_private: bool,
    ) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO documents (title, content, owner_id, is_private) VALUES (?, ?, ?, ?)",
        )
        .bind(title)
        .bind(content)
        .bind(owner_id)
        .bind(is_private)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.last_insert_rowid())
    }

    async fn document_by_id(&self, raw_id: &str) -> Result<Option<Document>> {
        let sql = format!(
            "SELECT id, title, content, owner_id, is_private FROM documents WHERE id = {raw_id}"
        );
        Ok(self
            .fetch_first(sql)
            .await?
            .map(|row| document_from_row(&row)))
    }

    async fn list_documents(&self) -> Result<Vec<DocumentListing>> {
        let sql = "SELECT d.id, d.title, d.owner_id, d.is_private, u.username AS owner_name
                   FROM documents d LEFT JOIN users u ON d.owner_id = u.id ORDER BY d.id"
            .to_string();
        let rows = self.fetch_rows(sql).await?;
        Ok(rows
            .iter()
            .map(|row| DocumentListing {
                id: row.get("id"),
                title: row.get("title"),
                owner_id: row.get("owner_id"),
                is_private: row.get("is_private"),
                owner_name: row.get("owner_name"),
            })
            .collect())
    }

    async fn documents_by_owner(&self, owner_id: i64) -> Result<Vec<Document>> {
        let sql = format!("SELECT * FROM documents WHERE owner_id = {owner_id}");
        let rows = self.fetch_rows(sql).await?;
        Ok(rows.iter().map(document_from_row).collect())
    }

    async fn owner_username(&self, owner_id: i64) -> Result<Option<String>> {
        let sql = format!("SELECT username FROM users WHERE id = {owner_id}");
        Ok(self
            .fetch_first(sql)
            .await?
            .map(|row| row.get("username")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_auth_weak::WeakSecurityGate;

    async fn seeded_store() -> SqliteForumStore {
        let store = SqliteForumStore::new("sqlite::memory:")
            .await
            .expect("store");
        store.seed(&WeakSecurityGate::new()).await.expect("seed");
        store
    }

    #[tokio::test]
    async fn test_seed_accounts_match_their_digests() {
        let store = seeded_store().await;
        let gate = WeakSecurityGate::new();

        let admin = store
            .login_lookup("admin", &gate.hash_password("admin123"))
            .await
            .expect("query")
            .expect("row");
        assert_eq!(admin.id, 1);
        assert_eq!(admin.role, "admin");
        assert_eq!(admin.status, "active");

        let bob = store
            .login_lookup("bob", &gate.hash_password("password"))
            .await
            .expect("query")
            .expect("row");
        assert_eq!(bob.status, "banned");

        let wrong = store
            .login_lookup("alice", &gate.hash_password("wrong"))
            .await
            .expect("query");
        assert!(wrong.is_none());
    }

    #[tokio::test]
    async fn test_always_true_predicate_returns_first_row() {
        let store = seeded_store().await;
        // Quote breakout with no space-delimited OR; the password clause is
        // ORed away, so the first seeded row (admin) comes back.
        let user = store
            .login_lookup("x'or(1=1)or'", "not-a-real-digest")
            .await
            .expect("query")
            .expect("row");
        assert_eq!(user.username, "admin");
    }

    #[tokio::test]
    async fn test_malformed_interpolated_id_surfaces_store_error() {
        let store = seeded_store().await;
        let err = store.topic_by_id("abc").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert!(!err.to_string().is_empty());

        assert!(store.user_by_id("").await.is_err());
    }

    #[tokio::test]
    async fn test_comment_lifecycle_ignores_authorship() {
        let store = seeded_store().await;
        store
            .create_comment("1", "alice", "first!")
            .await
            .expect("create");

        let comment = store
            .comment_by_id("1")
            .await
            .expect("query")
            .expect("row");
        assert_eq!(comment.author, "alice");
        assert_eq!(comment.status_or_normal(), "normal");

        // No author predicate anywhere in the update or delete statements.
        store
            .update_comment_content("1", "it's edited")
            .await
            .expect("update");
        let edited = store
            .comment_by_id("1")
            .await
            .expect("query")
            .expect("row");
        assert_eq!(edited.content, "it's edited");

        assert_eq!(store.comment_topic_id("1").await.expect("query"), Some(1));

        store.delete_comment("1").await.expect("delete");
        assert!(store.comment_by_id("1").await.expect("query").is_none());
    }

    #[tokio::test]
    async fn test_admin_mutations_by_raw_id() {
        let store = seeded_store().await;
        store.set_user_status("2", "banned").await.expect("ban");
        let alice = store.user_by_id("2").await.expect("query").expect("row");
        assert_eq!(alice.status, "banned");

        store.set_user_role("3", "moderator").await.expect("mod");
        let willie = store.user_by_id("3").await.expect("query").expect("row");
        assert_eq!(willie.role, "moderator");

        // A crafted id reaches every row — the predicate is the caller's.
        store
            .set_user_status("0 OR 1=1", "active")
            .await
            .expect("mass update");
        let bob = store.user_by_id("4").await.expect("query").expect("row");
        assert_eq!(bob.status, "active");
    }

    #[tokio::test]
    async fn test_documents_ignore_the_private_flag() {
        let store = seeded_store().await;
        let secret = store
            .document_by_id("1")
            .await
            .expect("query")
            .expect("row");
        assert!(secret.is_private);
        assert!(secret.content.contains("sk_live_abc123xyz"));

        let listing = store.list_documents().await.expect("query");
        assert_eq!(listing.len(), 4);
        assert_eq!(listing[0].owner_name.as_deref(), Some("admin"));

        let id = store
            .create_document("Fifth", "body", 2, true)
            .await
            .expect("create");
        assert_eq!(id, 5);

        let owned = store.documents_by_owner(2).await.expect("query");
        assert_eq!(owned.len(), 2);
    }

    #[tokio::test]
    async fn test_author_lookups_double_quotes_only() {
        let store = seeded_store().await;
        // A quote in the author name must not break the statement.
        let topics = store.topics_by_author("O'Brien").await.expect("query");
        assert!(topics.is_empty());

        let seeded = store.topics_by_author("admin").await.expect("query");
        assert_eq!(seeded.len(), 1);
        assert_eq!(seeded[0].title, "General Feedback");
    }
}
