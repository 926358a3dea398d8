// src/error.rs
use thiserror::Error;

/// Every failure a user action can surface. Payloads are plain strings so the
/// values can cross worker channels and be compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("{0}")]
    Validation(String),
    #[error("generation failed: {0}")]
    Generation(String),
    #[error("file error: {0}")]
    File(String),
    #[error("{0}")]
    MissingPrecondition(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Validation and missing-precondition problems are the user's to fix; they
    /// show as warnings rather than errors.
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::MissingPrecondition(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
