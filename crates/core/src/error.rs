// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
///
/// Every failure surfaced to callers carries one of these kinds. None of them
/// is retried inside the service.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Queue not found: {0}")]
    NotFound(String),

    #[error("Missing name: a non-empty display name is required")]
    MissingName,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StoreUnavailable(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::StoreUnavailable(format!("Corrupt store document: {}", err))
    }
}

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by converting to AppError::StoreUnavailable(String)
