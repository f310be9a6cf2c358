//! # bb-pages-local
//!
//! Local filesystem implementation of `PageStore`, backing the `/api/file`
//! and `/include` endpoints. The resolution rule reproduces the original
//! behavior exactly: the caller-supplied name is joined onto the base
//! directory with no rejection of ascending segments, so a crafted relative
//! path reaches any file the process can read. That traversal is the point.

use async_trait::async_trait;
use bb_core::error::{AppError, Result};
use bb_core::traits::PageStore;
use std::path::PathBuf;
use tokio::fs;

pub struct LocalPageStore {
    /// Intended base directory for page files (e.g., "./public").
    base: PathBuf,
}

impl LocalPageStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }
}

#[async_trait]
impl PageStore for LocalPageStore {
    /// `..` segments pass straight through; an absolute name replaces the
    /// base entirely, matching `path.resolve` in the original.
    fn resolve(&self, name: &str) -> PathBuf {
        self.base.join(name)
    }

    async fn read_page(&self, name: &str) -> Result<String> {
        let path = self.resolve(name);
        fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::FileRead(e.to_string()))
    }
}
