//! Auth service
//!
//! Register and login against the local credential directory. This is
//! a single-machine account table, not a network identity system:
//! passwords are hashed with Argon2id and verified locally, and the
//! only privilege a login grants is access to that user's collections.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};
use chrono::Utc;
use uuid::Uuid;

use crate::database::{RegisterRequest, Repository, StoredUser, User};
use crate::engine::Workspace;
use crate::error::{AppError, Result};

/// Service for account registration and login
#[derive(Clone)]
pub struct AuthService {
    repo: Repository,
}

impl AuthService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Register a new account. Fails with `DuplicateEmail` when the
    /// address is already in the directory, leaving the existing
    /// account untouched. The new user starts with an empty workspace.
    pub async fn register(&self, req: RegisterRequest) -> Result<User> {
        let email = req.email.trim().to_string();
        if email.is_empty() {
            return Err(AppError::Validation("email must not be blank".to_string()));
        }
        if req.password.is_empty() {
            return Err(AppError::Validation("password must not be blank".to_string()));
        }

        if self.repo.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateEmail(email));
        }

        let user = StoredUser {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            email,
            company_name: req.company_name,
            password_hash: hash_password(&req.password)?,
            created_at: Utc::now(),
        };
        self.repo.insert_user(&user).await?;

        // Initialize empty collections so the first load never misses.
        self.repo.save_workspace(&user.id, &Workspace::new()).await?;

        tracing::info!("Registered user: {}", user.id);
        Ok(user.into_user())
    }

    /// Log in with email and password. The failure cause is
    /// distinguishable (unknown address vs wrong password) and no
    /// state changes either way.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .repo
            .find_user_by_email(email.trim())
            .await?
            .ok_or(AppError::UnknownEmail)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidPassword);
        }

        tracing::info!("User logged in: {}", user.id);
        Ok(user.into_user())
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| AppError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_service() -> AuthService {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        AuthService::new(Repository::new(pool))
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Mora".to_string(),
            email: email.to_string(),
            company_name: "ReachMora".to_string(),
            password: "correct horse battery staple".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let auth = create_test_service().await;

        let user = auth
            .register(register_request("mora@reachmora.com"))
            .await
            .unwrap();
        assert_eq!(user.email, "mora@reachmora.com");

        let logged_in = auth
            .login("mora@reachmora.com", "correct horse battery staple")
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_leaves_original_intact() {
        let auth = create_test_service().await;

        let original = auth
            .register(register_request("mora@reachmora.com"))
            .await
            .unwrap();

        let mut second = register_request("mora@reachmora.com");
        second.name = "Impostor".to_string();
        second.password = "different password".to_string();

        let err = auth.register(second).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail(_)));

        // The original credentials still work.
        let logged_in = auth
            .login("mora@reachmora.com", "correct horse battery staple")
            .await
            .unwrap();
        assert_eq!(logged_in.id, original.id);
        assert_eq!(logged_in.name, "Mora");
    }

    #[tokio::test]
    async fn test_login_failures_are_distinguished() {
        let auth = create_test_service().await;
        auth.register(register_request("mora@reachmora.com"))
            .await
            .unwrap();

        assert!(matches!(
            auth.login("nobody@reachmora.com", "whatever").await,
            Err(AppError::UnknownEmail)
        ));
        assert!(matches!(
            auth.login("mora@reachmora.com", "wrong password").await,
            Err(AppError::InvalidPassword)
        ));
    }

    #[tokio::test]
    async fn test_password_is_stored_hashed() {
        let auth = create_test_service().await;
        auth.register(register_request("mora@reachmora.com"))
            .await
            .unwrap();

        let stored = auth
            .repo
            .find_user_by_email("mora@reachmora.com")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.password_hash.starts_with("$argon2"));
        assert_ne!(stored.password_hash, "correct horse battery staple");
    }

    #[tokio::test]
    async fn test_registration_initializes_empty_workspace() {
        let auth = create_test_service().await;
        let user = auth
            .register(register_request("mora@reachmora.com"))
            .await
            .unwrap();

        let ws = auth.repo.load_workspace(&user.id).await.unwrap();
        assert!(ws.deals.is_empty());
        assert!(ws.projects.is_empty());
        assert!(ws.transactions.is_empty());
    }
}
