//! User directory models
//!
//! Rust structs for the local account directory. The public [`User`]
//! never carries the password hash; [`StoredUser`] is the full row and
//! stays inside the auth/database layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account as exposed to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company_name: String,
}

/// Full directory row, including the Argon2 password hash.
#[derive(Debug, Clone, FromRow)]
pub struct StoredUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    /// Strip the credential material before handing the account out.
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            company_name: self.company_name,
        }
    }
}

/// Registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub company_name: String,
    pub password: String,
}
