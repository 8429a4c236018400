//! Application configuration constants
//!
//! Central location for all configuration constants, business rules,
//! and validation boundaries used throughout the application.

// ===== Deal Conversion Rules =====

/// Share of the deal value recognized as income when the upfront
/// payment lands (the remaining half is invoiced at Final Payment)
pub const UPFRONT_SHARE: f64 = 0.5;

/// Days between deal conversion and the spawned project's due date
pub const PROJECT_DUE_DAYS: i64 = 14;

// ===== Validation Boundaries =====

/// Maximum length for deal/project/course titles and brand names.
/// Prevents excessively long values from being stored.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for free-text notes and generated scripts
pub const MAX_TEXT_LENGTH: usize = 100_000;

// ===== Script Generation =====

/// Generative model used for video script drafts
pub const GENERATION_MODEL: &str = "gemini-3-flash-preview";

/// Base URL of the generative-text API
pub const GENERATION_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Environment variable consulted for the API key when none is
/// configured explicitly
pub const API_KEY_ENV_VAR: &str = "CREATORCRM_API_KEY";

// ===== Database =====

/// Maximum connections for the application pool
pub const DB_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const DB_BUSY_TIMEOUT_SECS: u64 = 5;
