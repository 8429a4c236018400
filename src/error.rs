//! Error types for the CreatorCRM core
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to the frontend.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Deal not found: {0}")]
    DealNotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Course not found: {0}")]
    CourseNotFound(String),

    #[error("Chapter not found: {0}")]
    ChapterNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("A user with email {0} already exists")]
    DuplicateEmail(String),

    #[error("No account registered for this email")]
    UnknownEmail,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Import rejected: {0}")]
    ImportFormat(String),

    #[error("API key is missing. Please add it in Settings")]
    MissingApiKey,

    #[error("Invalid API key. Please check Settings")]
    InvalidApiKey,

    #[error("Script generation failed: {0}")]
    ScriptGeneration(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
