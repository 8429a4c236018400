//! Workspace service
//!
//! Coordination layer between a signed-in user's in-memory workspace
//! and durable storage. Every mutation applies the engine operation
//! first, then mirrors the collections to the repository; the engine
//! result stands even if the mirror write fails, so a crash loses at
//! most the latest mutation.

use chrono::Utc;

use crate::database::Repository;
use crate::engine::models::*;
use crate::engine::workspace::DealConversion;
use crate::engine::{sample, DealStage, ProjectStage, Workspace};
use crate::error::{AppError, Result};
use crate::services::exchange;
use crate::services::script::ScriptGenerator;

/// Service owning the signed-in user's collections
pub struct WorkspaceService {
    repo: Repository,
    user_id: String,
    workspace: Workspace,
}

impl WorkspaceService {
    /// Load the user's collections from storage and take ownership of
    /// them for the session.
    pub async fn open(repo: Repository, user_id: impl Into<String>) -> Result<Self> {
        let user_id = user_id.into();
        let workspace = repo.load_workspace(&user_id).await?;

        tracing::info!(
            "Opened workspace for {}: {} deals, {} projects, {} transactions",
            user_id,
            workspace.deals.len(),
            workspace.projects.len(),
            workspace.transactions.len()
        );

        Ok(Self {
            repo,
            user_id,
            workspace,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Read access for boards and dashboard aggregation.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    async fn persist(&self) -> Result<()> {
        self.repo.save_workspace(&self.user_id, &self.workspace).await
    }

    // ===== Deals =====

    pub async fn create_deal(&mut self, input: NewDeal) -> Result<Deal> {
        let deal = self.workspace.create_deal(input, Utc::now())?.clone();
        self.persist().await?;

        tracing::info!("New inquiry added to the pipeline: {}", deal.brand_name);
        Ok(deal)
    }

    pub async fn update_deal(&mut self, deal_id: &str, patch: DealPatch) -> Result<Deal> {
        let deal = self.workspace.update_deal(deal_id, patch, Utc::now())?.clone();
        self.persist().await?;

        tracing::debug!("Deal updated: {}", deal_id);
        Ok(deal)
    }

    /// Move a deal between stages. When the move crosses into Upfront
    /// Received, the returned conversion names the spawned project and
    /// income transaction.
    pub async fn move_deal(
        &mut self,
        deal_id: &str,
        stage: DealStage,
    ) -> Result<Option<DealConversion>> {
        let conversion = self.workspace.move_deal(deal_id, stage, Utc::now())?;
        self.persist().await?;

        if let Some(conversion) = &conversion {
            tracing::info!(
                "Deal {} converted: project {} and upfront transaction {} created",
                conversion.deal_id,
                conversion.project_id,
                conversion.transaction_id
            );
        } else {
            tracing::debug!("Deal {} moved to {}", deal_id, stage);
        }
        Ok(conversion)
    }

    pub async fn remove_deal(&mut self, deal_id: &str) -> Result<()> {
        self.workspace.remove_deal(deal_id)?;
        self.persist().await?;

        tracing::info!("Deal removed from pipeline: {}", deal_id);
        Ok(())
    }

    // ===== Projects =====

    pub async fn create_tutorial(&mut self, input: NewTutorial) -> Result<Project> {
        let project = self.workspace.create_tutorial(input)?.clone();
        self.persist().await?;

        tracing::info!("Tutorial project created: {}", project.title);
        Ok(project)
    }

    pub async fn move_project(&mut self, project_id: &str, stage: ProjectStage) -> Result<Project> {
        let project = self.workspace.move_project(project_id, stage)?.clone();
        self.persist().await?;

        tracing::debug!(
            "Project {} moved to {} ({}%)",
            project_id,
            stage,
            project.progress
        );
        Ok(project)
    }

    pub async fn update_project(&mut self, project_id: &str, patch: ProjectPatch) -> Result<Project> {
        let project = self.workspace.update_project(project_id, patch)?.clone();
        self.persist().await?;

        tracing::debug!("Project updated: {}", project_id);
        Ok(project)
    }

    pub async fn archive_project(&mut self, project_id: &str) -> Result<()> {
        self.workspace.archive_project(project_id)?;
        self.persist().await?;

        tracing::info!("Project archived to finished projects: {}", project_id);
        Ok(())
    }

    pub async fn cancel_project(&mut self, project_id: &str) -> Result<()> {
        self.workspace.cancel_project(project_id)?;
        self.persist().await?;

        tracing::info!("Project cancelled: {}", project_id);
        Ok(())
    }

    pub async fn restore_project(&mut self, project_id: &str) -> Result<Project> {
        let project = self.workspace.restore_project(project_id)?.clone();
        self.persist().await?;

        tracing::info!("Project restored to {}: {}", project.stage, project_id);
        Ok(project)
    }

    pub async fn delete_project(&mut self, project_id: &str) -> Result<()> {
        self.workspace.delete_project(project_id)?;
        self.persist().await?;

        tracing::info!("Project deleted: {}", project_id);
        Ok(())
    }

    pub async fn attach_script(&mut self, project_id: &str, text: String) -> Result<()> {
        self.workspace.attach_script(project_id, text)?;
        self.persist().await?;
        Ok(())
    }

    pub async fn attach_video_url(&mut self, project_id: &str, url: String) -> Result<()> {
        self.workspace.attach_video_url(project_id, url)?;
        self.persist().await?;
        Ok(())
    }

    /// Draft a script for the project through the injected generator
    /// and attach it. Best-effort: a generation failure surfaces as an
    /// error and leaves the project (and storage) untouched.
    pub async fn generate_script(
        &mut self,
        generator: &impl ScriptGenerator,
        project_id: &str,
    ) -> Result<String> {
        let project = self
            .workspace
            .project(project_id)
            .ok_or_else(|| AppError::ProjectNotFound(project_id.to_string()))?;

        let title = project.title.clone();
        let brand_name = project.brand_name.clone();
        let kind = project.kind;

        let script = generator.generate(&title, &brand_name, kind).await?;

        self.workspace.attach_script(project_id, script.clone())?;
        self.persist().await?;

        tracing::info!("Generated script attached to project: {}", project_id);
        Ok(script)
    }

    // ===== Transactions =====

    pub async fn add_transaction(&mut self, input: NewTransaction) -> Result<Transaction> {
        let transaction = self.workspace.add_transaction(input)?.clone();
        self.persist().await?;

        tracing::info!(
            "{:?} recorded: {} ({})",
            transaction.kind,
            transaction.description,
            transaction.amount
        );
        Ok(transaction)
    }

    pub async fn delete_transaction(&mut self, transaction_id: &str) -> Result<()> {
        self.workspace.delete_transaction(transaction_id)?;
        self.persist().await?;

        tracing::info!("Transaction deleted: {}", transaction_id);
        Ok(())
    }

    // ===== Courses =====

    pub async fn create_course(&mut self, input: NewCourse) -> Result<Course> {
        let course = self.workspace.create_course(input)?.clone();
        self.persist().await?;

        tracing::info!("Course created: {}", course.title);
        Ok(course)
    }

    pub async fn update_course(&mut self, course_id: &str, patch: CoursePatch) -> Result<Course> {
        let course = self.workspace.update_course(course_id, patch)?.clone();
        self.persist().await?;
        Ok(course)
    }

    pub async fn delete_course(&mut self, course_id: &str) -> Result<()> {
        self.workspace.delete_course(course_id)?;
        self.persist().await?;
        Ok(())
    }

    pub async fn add_chapter(&mut self, course_id: &str, title: String) -> Result<Chapter> {
        let chapter = self.workspace.add_chapter(course_id, title)?.clone();
        self.persist().await?;
        Ok(chapter)
    }

    pub async fn move_chapter(
        &mut self,
        course_id: &str,
        chapter_id: &str,
        stage: ProjectStage,
    ) -> Result<()> {
        self.workspace.move_chapter(course_id, chapter_id, stage)?;
        self.persist().await?;
        Ok(())
    }

    pub async fn remove_chapter(&mut self, course_id: &str, chapter_id: &str) -> Result<()> {
        self.workspace.remove_chapter(course_id, chapter_id)?;
        self.persist().await?;
        Ok(())
    }

    // ===== Settings actions =====

    /// Wipe all collections.
    pub async fn reset(&mut self) -> Result<()> {
        self.workspace = Workspace::new();
        self.persist().await?;

        tracing::info!("All data reset for user: {}", self.user_id);
        Ok(())
    }

    /// Replace all collections with the demo dataset.
    pub async fn load_sample_data(&mut self) -> Result<()> {
        self.workspace = sample::workspace();
        self.persist().await?;

        tracing::info!("Demo data loaded for user: {}", self.user_id);
        Ok(())
    }

    /// Export the collections as a transferable byte blob.
    pub fn export(&self) -> Result<Vec<u8>> {
        exchange::export_bytes(&self.workspace)
    }

    /// Validate and import a byte blob, replacing all collections. A
    /// rejected blob leaves the current data untouched.
    pub async fn import(&mut self, bytes: &[u8]) -> Result<()> {
        let imported = exchange::import_bytes(bytes)?;
        self.workspace = imported;
        self.persist().await?;

        tracing::info!("Imported workspace for user: {}", self.user_id);
        Ok(())
    }
}
