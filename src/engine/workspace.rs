//! The workspace: one user's collections and every pipeline operation
//!
//! This is the reducer-style core of the application. A [`Workspace`]
//! owns the deal, project, transaction and course collections; every
//! operation takes `&mut self` plus its inputs (including the clock,
//! injected as `now`), mutates the collections synchronously and
//! returns before the next event is processed. Persistence is the
//! caller's concern; see `services::workspace`.
//!
//! Operations referencing an unknown id fail with a typed not-found
//! error rather than silently no-opping.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{MAX_NAME_LENGTH, MAX_TEXT_LENGTH, PROJECT_DUE_DAYS, UPFRONT_SHARE};
use crate::error::{AppError, Result};

use super::models::*;
use super::stages::{DealStage, ProjectKind, ProjectStage};

/// One user's data: the owned store every pipeline operation works on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub deals: Vec<Deal>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// Side effects produced when a deal crosses into Upfront Received:
/// the ids of the spawned project and income transaction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealConversion {
    pub deal_id: String,
    pub project_id: String,
    pub transaction_id: String,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn validate_value(value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!(
            "value must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::Validation(format!(
            "amount must be a positive magnitude, got {amount}"
        )));
    }
    Ok(())
}

fn validate_name(field: &str, text: &str) -> Result<()> {
    if text.len() > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "{field} exceeds {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Deals =====

    pub fn deal(&self, deal_id: &str) -> Option<&Deal> {
        self.deals.iter().find(|d| d.id == deal_id)
    }

    fn deal_index(&self, deal_id: &str) -> Result<usize> {
        self.deals
            .iter()
            .position(|d| d.id == deal_id)
            .ok_or_else(|| AppError::DealNotFound(deal_id.to_string()))
    }

    /// Create a deal in the New Inquiry stage. A blank brand name
    /// falls back to the tool name.
    pub fn create_deal(&mut self, input: NewDeal, now: DateTime<Utc>) -> Result<&Deal> {
        validate_value(input.value)?;
        validate_name("tool name", &input.tool_name)?;
        validate_name("brand name", &input.brand_name)?;
        if input.tool_name.trim().is_empty() {
            return Err(AppError::Validation("tool name must not be blank".to_string()));
        }

        let brand_name = if input.brand_name.trim().is_empty() {
            input.tool_name.clone()
        } else {
            input.brand_name
        };

        let deal = Deal {
            id: new_id(),
            brand_name,
            tool_name: input.tool_name,
            contact_email: input.contact_email,
            value: input.value,
            stage: DealStage::NewInquiry,
            last_activity: now,
            expected_publish_date: input.expected_publish_date,
            notes: input.notes,
        };
        let idx = self.deals.len();
        self.deals.push(deal);
        Ok(&self.deals[idx])
    }

    /// Merge field edits into a deal. Always refreshes `last_activity`.
    pub fn update_deal(
        &mut self,
        deal_id: &str,
        patch: DealPatch,
        now: DateTime<Utc>,
    ) -> Result<&Deal> {
        if let Some(value) = patch.value {
            validate_value(value)?;
        }
        let idx = self.deal_index(deal_id)?;
        let deal = &mut self.deals[idx];

        if let Some(brand_name) = patch.brand_name {
            validate_name("brand name", &brand_name)?;
            deal.brand_name = brand_name;
        }
        if let Some(tool_name) = patch.tool_name {
            validate_name("tool name", &tool_name)?;
            deal.tool_name = tool_name;
        }
        if let Some(contact_email) = patch.contact_email {
            deal.contact_email = contact_email;
        }
        if let Some(value) = patch.value {
            deal.value = value;
        }
        if let Some(date) = patch.expected_publish_date {
            deal.expected_publish_date = Some(date);
        }
        if let Some(notes) = patch.notes {
            deal.notes = Some(notes);
        }
        deal.last_activity = now;
        Ok(&self.deals[idx])
    }

    /// Move a deal to any stage of the deal pipeline. No ordering is
    /// enforced; arbitrary jumps and restorations are legal.
    ///
    /// Edge-triggered side effect: if and only if the deal was not in
    /// Upfront Received and lands there now, one sponsored project and
    /// one upfront income transaction are spawned. Re-entering the
    /// same stage never fires; leaving and returning through another
    /// stage fires again.
    pub fn move_deal(
        &mut self,
        deal_id: &str,
        new_stage: DealStage,
        now: DateTime<Utc>,
    ) -> Result<Option<DealConversion>> {
        let idx = self.deal_index(deal_id)?;
        let previous = self.deals[idx].stage;
        self.deals[idx].stage = new_stage;
        self.deals[idx].last_activity = now;

        if previous == DealStage::UpfrontReceived || new_stage != DealStage::UpfrontReceived {
            return Ok(None);
        }

        // Upfront landed: spawn the production project and recognize
        // half the deal value as income.
        let deal = self.deals[idx].clone();
        let kind = ProjectKind::Sponsored;

        let project = Project {
            id: new_id(),
            deal_id: Some(deal.id.clone()),
            kind,
            title: format!("{} Tutorial", deal.tool_name),
            brand_name: deal.brand_name.clone(),
            stage: kind.first_stage(),
            due_date: now + Duration::days(PROJECT_DUE_DAYS),
            upfront_paid: true,
            final_paid: false,
            total_value: deal.value,
            progress: kind.initial_progress(),
            script: None,
            video_url: None,
            archived: false,
            cancelled: false,
        };
        let project_id = project.id.clone();
        self.projects.push(project);

        let transaction = Transaction {
            id: new_id(),
            date: now.date_naive(),
            description: format!("Upfront Payment: {}", deal.brand_name),
            amount: deal.value * UPFRONT_SHARE,
            kind: TransactionKind::Income,
            category: TransactionCategory::Sponsorship,
        };
        let transaction_id = transaction.id.clone();
        self.transactions.insert(0, transaction);

        Ok(Some(DealConversion {
            deal_id: deal.id,
            project_id,
            transaction_id,
        }))
    }

    /// Permanently remove a deal. Irreversible; confirmation is a UI
    /// concern.
    pub fn remove_deal(&mut self, deal_id: &str) -> Result<()> {
        let idx = self.deal_index(deal_id)?;
        self.deals.remove(idx);
        Ok(())
    }

    // ===== Projects =====

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    fn project_index(&self, project_id: &str) -> Result<usize> {
        self.projects
            .iter()
            .position(|p| p.id == project_id)
            .ok_or_else(|| AppError::ProjectNotFound(project_id.to_string()))
    }

    /// Manually create a tutorial project in the first tutorial stage.
    pub fn create_tutorial(&mut self, input: NewTutorial) -> Result<&Project> {
        validate_name("title", &input.title)?;
        validate_name("brand name", &input.brand_name)?;

        let kind = ProjectKind::Tutorial;

        let project = Project {
            id: new_id(),
            deal_id: None,
            kind,
            title: input.title,
            brand_name: input.brand_name,
            stage: kind.first_stage(),
            due_date: input.due_date,
            upfront_paid: false,
            final_paid: false,
            total_value: 0.0,
            progress: kind.initial_progress(),
            script: None,
            video_url: None,
            archived: false,
            cancelled: false,
        };
        let idx = self.projects.len();
        self.projects.push(project);
        Ok(&self.projects[idx])
    }

    /// Move a project to a stage of its own kind's pipeline and
    /// re-derive progress from the stage position. No other side
    /// effects.
    pub fn move_project(&mut self, project_id: &str, new_stage: ProjectStage) -> Result<&Project> {
        let idx = self.project_index(project_id)?;
        let kind = self.projects[idx].kind;
        let progress = kind.progress_for(new_stage).ok_or_else(|| {
            AppError::Validation(format!(
                "stage \"{new_stage}\" is not part of the {kind:?} pipeline"
            ))
        })?;

        let project = &mut self.projects[idx];
        project.stage = new_stage;
        project.progress = progress;
        Ok(&self.projects[idx])
    }

    /// Merge field edits into a project. Stage and progress are only
    /// changed through `move_project`.
    pub fn update_project(&mut self, project_id: &str, patch: ProjectPatch) -> Result<&Project> {
        if let Some(value) = patch.total_value {
            validate_value(value)?;
        }
        let idx = self.project_index(project_id)?;
        let project = &mut self.projects[idx];

        if let Some(title) = patch.title {
            validate_name("title", &title)?;
            project.title = title;
        }
        if let Some(brand_name) = patch.brand_name {
            validate_name("brand name", &brand_name)?;
            project.brand_name = brand_name;
        }
        if let Some(due_date) = patch.due_date {
            project.due_date = due_date;
        }
        if let Some(upfront_paid) = patch.upfront_paid {
            project.upfront_paid = upfront_paid;
        }
        if let Some(final_paid) = patch.final_paid {
            project.final_paid = final_paid;
        }
        if let Some(total_value) = patch.total_value {
            project.total_value = total_value;
        }
        Ok(&self.projects[idx])
    }

    /// Archive a published project, hiding it from active boards.
    /// Requires the terminal stage; cancelled projects cannot be
    /// archived.
    pub fn archive_project(&mut self, project_id: &str) -> Result<()> {
        let idx = self.project_index(project_id)?;
        let project = &mut self.projects[idx];
        if project.cancelled {
            return Err(AppError::Validation(
                "a cancelled project cannot be archived".to_string(),
            ));
        }
        if project.stage != ProjectStage::Published {
            return Err(AppError::Validation(
                "only published projects can be archived".to_string(),
            ));
        }
        project.archived = true;
        Ok(())
    }

    /// Cancel a project, hiding it from active boards but keeping it
    /// restorable.
    pub fn cancel_project(&mut self, project_id: &str) -> Result<()> {
        let idx = self.project_index(project_id)?;
        let project = &mut self.projects[idx];
        if project.archived {
            return Err(AppError::Validation(
                "an archived project cannot be cancelled".to_string(),
            ));
        }
        project.cancelled = true;
        Ok(())
    }

    /// Restore a cancelled project to the first stage of its pipeline.
    pub fn restore_project(&mut self, project_id: &str) -> Result<&Project> {
        let idx = self.project_index(project_id)?;
        if !self.projects[idx].cancelled {
            return Err(AppError::Validation(
                "only cancelled projects can be restored".to_string(),
            ));
        }
        let kind = self.projects[idx].kind;
        let project = &mut self.projects[idx];
        project.cancelled = false;
        project.stage = kind.first_stage();
        project.progress = kind.initial_progress();
        Ok(&self.projects[idx])
    }

    /// Permanently delete a project. Only permitted once cancelled.
    pub fn delete_project(&mut self, project_id: &str) -> Result<()> {
        let idx = self.project_index(project_id)?;
        if !self.projects[idx].cancelled {
            return Err(AppError::Validation(
                "only cancelled projects can be deleted".to_string(),
            ));
        }
        self.projects.remove(idx);
        Ok(())
    }

    /// Attach (or replace) the script text of a project.
    pub fn attach_script(&mut self, project_id: &str, text: String) -> Result<()> {
        if text.len() > MAX_TEXT_LENGTH {
            return Err(AppError::Validation(format!(
                "script exceeds {MAX_TEXT_LENGTH} characters"
            )));
        }
        let idx = self.project_index(project_id)?;
        self.projects[idx].script = Some(text);
        Ok(())
    }

    /// Attach (or replace) the published-video URL of a project.
    pub fn attach_video_url(&mut self, project_id: &str, url: String) -> Result<()> {
        let idx = self.project_index(project_id)?;
        self.projects[idx].video_url = Some(url);
        Ok(())
    }

    // ===== Transactions =====

    /// Record a ledger entry. Newest entries sit at the front of the
    /// collection, matching the activity feed.
    pub fn add_transaction(&mut self, input: NewTransaction) -> Result<&Transaction> {
        validate_amount(input.amount)?;
        if !input.category.valid_for(input.kind) {
            return Err(AppError::Validation(format!(
                "category {:?} is not valid for {:?} entries",
                input.category, input.kind
            )));
        }

        let transaction = Transaction {
            id: new_id(),
            date: input.date,
            description: input.description,
            amount: input.amount,
            kind: input.kind,
            category: input.category,
        };
        self.transactions.insert(0, transaction);
        Ok(&self.transactions[0])
    }

    pub fn delete_transaction(&mut self, transaction_id: &str) -> Result<()> {
        let idx = self
            .transactions
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or_else(|| AppError::TransactionNotFound(transaction_id.to_string()))?;
        self.transactions.remove(idx);
        Ok(())
    }

    // ===== Courses =====

    fn course_index(&self, course_id: &str) -> Result<usize> {
        self.courses
            .iter()
            .position(|c| c.id == course_id)
            .ok_or_else(|| AppError::CourseNotFound(course_id.to_string()))
    }

    pub fn create_course(&mut self, input: NewCourse) -> Result<&Course> {
        validate_name("title", &input.title)?;

        let course = Course {
            id: new_id(),
            title: input.title,
            description: input.description,
            total_chapters: input.total_chapters,
            chapters: Vec::new(),
            progress: 0,
            thumbnail_url: input.thumbnail_url,
        };
        let idx = self.courses.len();
        self.courses.push(course);
        Ok(&self.courses[idx])
    }

    pub fn update_course(&mut self, course_id: &str, patch: CoursePatch) -> Result<&Course> {
        let idx = self.course_index(course_id)?;
        let course = &mut self.courses[idx];

        if let Some(title) = patch.title {
            validate_name("title", &title)?;
            course.title = title;
        }
        if let Some(description) = patch.description {
            course.description = description;
        }
        if let Some(total_chapters) = patch.total_chapters {
            course.total_chapters = total_chapters;
        }
        if let Some(thumbnail_url) = patch.thumbnail_url {
            course.thumbnail_url = Some(thumbnail_url);
        }
        course.progress = derive_course_progress(course);
        Ok(&self.courses[idx])
    }

    pub fn delete_course(&mut self, course_id: &str) -> Result<()> {
        let idx = self.course_index(course_id)?;
        self.courses.remove(idx);
        Ok(())
    }

    /// Add a chapter in the first tutorial stage.
    pub fn add_chapter(&mut self, course_id: &str, title: String) -> Result<&Chapter> {
        validate_name("title", &title)?;
        let idx = self.course_index(course_id)?;

        let chapter = Chapter {
            id: new_id(),
            title,
            stage: ProjectKind::Tutorial.first_stage(),
        };
        let course = &mut self.courses[idx];
        course.chapters.push(chapter);
        course.progress = derive_course_progress(course);
        let last = course.chapters.len() - 1;
        Ok(&self.courses[idx].chapters[last])
    }

    /// Move a chapter along the tutorial pipeline.
    pub fn move_chapter(
        &mut self,
        course_id: &str,
        chapter_id: &str,
        new_stage: ProjectStage,
    ) -> Result<()> {
        if !ProjectKind::Tutorial.contains(new_stage) {
            return Err(AppError::Validation(format!(
                "stage \"{new_stage}\" is not part of the Tutorial pipeline"
            )));
        }
        let idx = self.course_index(course_id)?;
        let course = &mut self.courses[idx];
        let chapter = course
            .chapters
            .iter_mut()
            .find(|c| c.id == chapter_id)
            .ok_or_else(|| AppError::ChapterNotFound(chapter_id.to_string()))?;
        chapter.stage = new_stage;
        course.progress = derive_course_progress(course);
        Ok(())
    }

    pub fn remove_chapter(&mut self, course_id: &str, chapter_id: &str) -> Result<()> {
        let idx = self.course_index(course_id)?;
        let course = &mut self.courses[idx];
        let pos = course
            .chapters
            .iter()
            .position(|c| c.id == chapter_id)
            .ok_or_else(|| AppError::ChapterNotFound(chapter_id.to_string()))?;
        course.chapters.remove(pos);
        course.progress = derive_course_progress(course);
        Ok(())
    }
}

/// Course progress: chapters that have left the initial stage, over
/// the planned chapter count. Capped at 100 when more chapters exist
/// than were planned.
fn derive_course_progress(course: &Course) -> u8 {
    if course.total_chapters == 0 {
        return 0;
    }
    let first = ProjectKind::Tutorial.first_stage();
    let started = course.chapters.iter().filter(|c| c.stage != first).count();
    let percent = (started as f64 / course.total_chapters as f64) * 100.0;
    percent.round().min(100.0) as u8
}
