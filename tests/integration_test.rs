//! Integration tests for the CreatorCRM core
//!
//! These tests verify end-to-end functionality including:
//! - Registration and login against an on-disk database
//! - The deal pipeline, conversion side effects and dashboard metrics
//! - Export/import round trips through the service layer

use chrono::{Duration, Utc};
use creatorcrm::app;
use creatorcrm::database::RegisterRequest;
use creatorcrm::engine::metrics;
use creatorcrm::engine::models::{NewDeal, NewTransaction, NewTutorial, TransactionCategory, TransactionKind};
use creatorcrm::error::AppError;
use creatorcrm::services::{ScriptGenerator, WorkspaceService};
use creatorcrm::{DealStage, ProjectKind, ProjectStage};
use tempfile::TempDir;

/// Helper to bootstrap an application against a temp directory
async fn create_test_app() -> (app::AppState, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let state = app::setup(temp_dir.path()).await.unwrap();
    (state, temp_dir)
}

async fn register_and_open(state: &app::AppState, email: &str) -> WorkspaceService {
    let user = state
        .auth()
        .register(RegisterRequest {
            name: "Mora".to_string(),
            email: email.to_string(),
            company_name: "ReachMora".to_string(),
            password: "correct horse battery staple".to_string(),
        })
        .await
        .unwrap();

    state.open_workspace(&user.id).await.unwrap()
}

fn nexus_deal(value: f64) -> NewDeal {
    NewDeal {
        brand_name: "NexusAI".to_string(),
        tool_name: "Nexus Generative Suite".to_string(),
        contact_email: "partners@nexusai.com".to_string(),
        value,
        expected_publish_date: None,
        notes: None,
    }
}

#[tokio::test]
async fn test_register_login_and_persisted_workspace() {
    let (state, _temp) = create_test_app().await;

    let mut service = register_and_open(&state, "mora@reachmora.com").await;
    let deal = service.create_deal(nexus_deal(2500.0)).await.unwrap();
    assert_eq!(deal.stage, DealStage::NewInquiry);

    // Log back in and reopen: the deal survived the round trip to disk.
    let user = state
        .auth()
        .login("mora@reachmora.com", "correct horse battery staple")
        .await
        .unwrap();
    let reopened = state.open_workspace(&user.id).await.unwrap();
    assert_eq!(reopened.workspace().deals.len(), 1);
    assert_eq!(reopened.workspace().deals[0].brand_name, "NexusAI");
}

#[tokio::test]
async fn test_accounts_are_isolated() {
    let (state, _temp) = create_test_app().await;

    let mut first = register_and_open(&state, "first@reachmora.com").await;
    first.create_deal(nexus_deal(1000.0)).await.unwrap();

    let second = register_and_open(&state, "second@reachmora.com").await;
    assert!(second.workspace().deals.is_empty());
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let (state, _temp) = create_test_app().await;
    register_and_open(&state, "mora@reachmora.com").await;

    let err = state
        .auth()
        .register(RegisterRequest {
            name: "Impostor".to_string(),
            email: "mora@reachmora.com".to_string(),
            company_name: "Shadow Inc".to_string(),
            password: "different".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateEmail(_)));
}

#[tokio::test]
async fn test_deal_lifecycle_to_published_project() {
    let (state, _temp) = create_test_app().await;
    let mut service = register_and_open(&state, "mora@reachmora.com").await;

    let deal = service.create_deal(nexus_deal(2000.0)).await.unwrap();
    service
        .move_deal(&deal.id, DealStage::RateSent)
        .await
        .unwrap();
    service
        .move_deal(&deal.id, DealStage::Negotiation)
        .await
        .unwrap();
    service
        .move_deal(&deal.id, DealStage::AcceptedAwaitingUpfront)
        .await
        .unwrap();

    // One urgency signal: the deal waits on its upfront payment.
    assert_eq!(
        metrics::action_required_count(service.workspace(), Utc::now()),
        1
    );

    let conversion = service
        .move_deal(&deal.id, DealStage::UpfrontReceived)
        .await
        .unwrap()
        .expect("upfront crossing converts the deal");

    let project = service
        .workspace()
        .project(&conversion.project_id)
        .unwrap()
        .clone();
    assert_eq!(project.kind, ProjectKind::Sponsored);
    assert_eq!(project.stage, ProjectStage::ToolAccess);
    assert_eq!(project.total_value, 2000.0);
    assert!(project.upfront_paid);

    let upfront = &service.workspace().transactions[0];
    assert_eq!(upfront.amount, 1000.0);
    assert_eq!(upfront.kind, TransactionKind::Income);
    assert_eq!(upfront.category, TransactionCategory::Sponsorship);

    // Walk the project through its pipeline to publication.
    for stage in [
        ProjectStage::TestingResearch,
        ProjectStage::Scripting,
        ProjectStage::Filming,
        ProjectStage::Editing,
        ProjectStage::Review,
        ProjectStage::FinalPayment,
        ProjectStage::Published,
    ] {
        service.move_project(&project.id, stage).await.unwrap();
    }
    let project = service.workspace().project(&project.id).unwrap().clone();
    assert_eq!(project.progress, 100);

    service.archive_project(&project.id).await.unwrap();
    assert_eq!(metrics::active_project_count(service.workspace()), 0);
}

#[tokio::test]
async fn test_dashboard_metrics_over_a_working_month() {
    let (state, _temp) = create_test_app().await;
    let mut service = register_and_open(&state, "mora@reachmora.com").await;

    service.create_deal(nexus_deal(2500.0)).await.unwrap();
    let converted = service.create_deal(nexus_deal(1500.0)).await.unwrap();
    service
        .move_deal(&converted.id, DealStage::UpfrontReceived)
        .await
        .unwrap();

    let today = Utc::now().date_naive();
    service
        .add_transaction(NewTransaction {
            date: today,
            description: "Editor Payment".to_string(),
            amount: 300.0,
            kind: TransactionKind::Expense,
            category: TransactionCategory::EditingServices,
        })
        .await
        .unwrap();

    let ws = service.workspace();
    // Only the unconverted deal still counts toward the pipeline.
    assert_eq!(metrics::pipeline_value(ws), 2500.0);
    // 750 upfront income this month, 300 out.
    assert_eq!(metrics::current_month_income(ws, Utc::now()), 750.0);
    let totals = metrics::ledger_totals(ws);
    assert_eq!(totals.net, 450.0);

    let series = metrics::net_worth_series(ws);
    assert_eq!(series.last().unwrap().balance, 450.0);
}

#[tokio::test]
async fn test_overdue_tutorial_demands_action() {
    let (state, _temp) = create_test_app().await;
    let mut service = register_and_open(&state, "mora@reachmora.com").await;

    let project = service
        .create_tutorial(NewTutorial {
            title: "Rust for Creators".to_string(),
            brand_name: "Self".to_string(),
            due_date: Utc::now() - Duration::days(1),
        })
        .await
        .unwrap();

    assert_eq!(
        metrics::action_required_count(service.workspace(), Utc::now()),
        1
    );

    // Cancelling parks the project away from the urgency signals.
    service.cancel_project(&project.id).await.unwrap();
    assert_eq!(
        metrics::action_required_count(service.workspace(), Utc::now()),
        0
    );
}

#[tokio::test]
async fn test_export_import_round_trip_across_accounts() {
    let (state, _temp) = create_test_app().await;

    let mut source = register_and_open(&state, "source@reachmora.com").await;
    source.load_sample_data().await.unwrap();
    let blob = source.export().unwrap();

    let mut target = register_and_open(&state, "target@reachmora.com").await;
    target.import(&blob).await.unwrap();

    assert_eq!(target.workspace(), source.workspace());
}

#[tokio::test]
async fn test_import_rejection_preserves_existing_data() {
    let (state, _temp) = create_test_app().await;
    let mut service = register_and_open(&state, "mora@reachmora.com").await;
    service.create_deal(nexus_deal(999.0)).await.unwrap();

    // Blob missing the projects sequence must be rejected outright.
    let err = service.import(br#"{"deals": []}"#).await.unwrap_err();
    assert!(matches!(err, AppError::ImportFormat(_)));
    assert_eq!(service.workspace().deals.len(), 1);
    assert_eq!(service.workspace().deals[0].value, 999.0);

    // And the rejection never reached the durable copy either.
    let user = state
        .auth()
        .login("mora@reachmora.com", "correct horse battery staple")
        .await
        .unwrap();
    let reopened = state.open_workspace(&user.id).await.unwrap();
    assert_eq!(reopened.workspace().deals.len(), 1);
}

struct CannedGenerator;

impl ScriptGenerator for CannedGenerator {
    async fn generate(
        &self,
        title: &str,
        brand_name: &str,
        _kind: ProjectKind,
    ) -> creatorcrm::Result<String> {
        Ok(format!("## {title}\nBrought to you by {brand_name}."))
    }
}

#[tokio::test]
async fn test_script_generation_through_injected_capability() {
    let (state, _temp) = create_test_app().await;
    let mut service = register_and_open(&state, "mora@reachmora.com").await;

    let project = service
        .create_tutorial(NewTutorial {
            title: "Rust for Creators".to_string(),
            brand_name: "Self".to_string(),
            due_date: Utc::now() + Duration::days(30),
        })
        .await
        .unwrap();

    let script = service
        .generate_script(&CannedGenerator, &project.id)
        .await
        .unwrap();
    assert!(script.contains("Rust for Creators"));
    assert_eq!(
        service.workspace().project(&project.id).unwrap().script.as_deref(),
        Some(script.as_str())
    );
}
