//! # AppError
//!
//! Centralized error handling for the brittle-board ecosystem.
//!
//! Variant messages carry the underlying failure text verbatim: several
//! routes are required to surface the raw store or filesystem message in
//! their rendered error pages so that external scanners can observe it.

use thiserror::Error;

/// The primary error type for all bb-core port operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Store-level failure. Holds the database driver's own message,
    /// including syntax errors provoked by interpolated request values.
    #[error("{0}")]
    Database(String),

    /// Filesystem failure from the page store. Holds the io error message.
    #[error("{0}")]
    FileRead(String),
}

/// A specialized Result type for brittle-board logic.
pub type Result<T> = std::result::Result<T, AppError>;
