//! Application state and initialization
//!
//! This module wires the database and services together for a host
//! UI. All state a frontend needs is initialized here and carried in
//! AppState.

use std::path::{Path, PathBuf};

use crate::database::{create_pool, Repository};
use crate::error::Result;
use crate::services::{AuthService, WorkspaceService};

/// Central application state holding the shared repository
#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub repository: Repository,
}

impl AppState {
    /// The auth surface for the login/registration screens.
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.repository.clone())
    }

    /// Open the workspace of a signed-in user.
    pub async fn open_workspace(&self, user_id: &str) -> Result<WorkspaceService> {
        WorkspaceService::open(self.repository.clone(), user_id).await
    }
}

/// Application setup - called once on startup
pub async fn setup(data_dir: &Path) -> Result<AppState> {
    tracing::info!("Initializing application");
    tracing::info!("App data directory: {:?}", data_dir);

    std::fs::create_dir_all(data_dir)?;

    let pool = create_pool(&data_dir.join("db.sqlite")).await?;
    let state = AppState {
        data_dir: data_dir.to_path_buf(),
        repository: Repository::new(pool),
    };

    tracing::info!("Application initialized successfully");
    Ok(state)
}

/// Initialize logging. Call before `setup` from the host binary.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "creatorcrm=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_setup_creates_data_dir_and_database() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("creatorcrm");

        let state = setup(&data_dir).await.unwrap();
        assert!(data_dir.exists());
        assert!(data_dir.join("db.sqlite").exists());

        // The wired repository is usable immediately.
        assert!(state
            .repository
            .find_user_by_email("nobody@reachmora.com")
            .await
            .unwrap()
            .is_none());
    }
}
