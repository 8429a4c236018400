//! Demo dataset
//!
//! A populated workspace for the demo account and the "load sample
//! data" action in settings. Progress values follow the derivation
//! rules, so the sample is indistinguishable from organically entered
//! data.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use super::models::*;
use super::stages::{DealStage, ProjectKind, ProjectStage};
use super::workspace::Workspace;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("sample dates are valid")
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0)
        .single()
        .expect("sample timestamps are valid")
}

fn derived(kind: ProjectKind, stage: ProjectStage) -> u8 {
    kind.progress_for(stage).expect("sample stages match their pipeline")
}

/// The demo workspace: a handful of deals mid-funnel, projects in
/// production and a month of ledger activity.
pub fn workspace() -> Workspace {
    let deals = vec![
        Deal {
            id: "d-1".to_string(),
            brand_name: "NexusAI".to_string(),
            tool_name: "Nexus Generative Suite".to_string(),
            contact_email: "partners@nexusai.com".to_string(),
            value: 2500.0,
            stage: DealStage::Negotiation,
            last_activity: at(2024, 5, 20),
            expected_publish_date: Some(day(2024, 6, 15)),
            notes: None,
        },
        Deal {
            id: "d-2".to_string(),
            brand_name: "VidGen".to_string(),
            tool_name: "VidGen Pro".to_string(),
            contact_email: "marketing@vidgen.io".to_string(),
            value: 1800.0,
            stage: DealStage::NewInquiry,
            last_activity: at(2024, 5, 22),
            expected_publish_date: None,
            notes: None,
        },
        Deal {
            id: "d-3".to_string(),
            brand_name: "SoundScape".to_string(),
            tool_name: "AudioCleaner AI".to_string(),
            contact_email: "hello@soundscape.ai".to_string(),
            value: 3000.0,
            stage: DealStage::AcceptedAwaitingUpfront,
            last_activity: at(2024, 5, 18),
            expected_publish_date: None,
            notes: Some("Contract signed, waiting for invoice #004 payment.".to_string()),
        },
        Deal {
            id: "d-4".to_string(),
            brand_name: "CodeWiz".to_string(),
            tool_name: "CodeWiz IDE".to_string(),
            contact_email: "devrel@codewiz.com".to_string(),
            value: 4500.0,
            stage: DealStage::RateSent,
            last_activity: at(2024, 5, 21),
            expected_publish_date: None,
            notes: None,
        },
    ];

    let projects = vec![
        Project {
            id: "p-1".to_string(),
            deal_id: Some("d-old-1".to_string()),
            kind: ProjectKind::Sponsored,
            title: "PhotoMagic AI Review".to_string(),
            brand_name: "PhotoMagic".to_string(),
            stage: ProjectStage::Editing,
            due_date: at(2024, 5, 28),
            upfront_paid: true,
            final_paid: false,
            total_value: 2000.0,
            progress: derived(ProjectKind::Sponsored, ProjectStage::Editing),
            script: None,
            video_url: None,
            archived: false,
            cancelled: false,
        },
        Project {
            id: "p-2".to_string(),
            deal_id: Some("d-old-2".to_string()),
            kind: ProjectKind::Sponsored,
            title: "How to use DataSift for Analytics".to_string(),
            brand_name: "DataSift".to_string(),
            stage: ProjectStage::Scripting,
            due_date: at(2024, 6, 5),
            upfront_paid: true,
            final_paid: false,
            total_value: 3200.0,
            progress: derived(ProjectKind::Sponsored, ProjectStage::Scripting),
            script: None,
            video_url: None,
            archived: false,
            cancelled: false,
        },
        Project {
            id: "p-3".to_string(),
            deal_id: Some("d-old-3".to_string()),
            kind: ProjectKind::Sponsored,
            title: "Voiceify vs The World".to_string(),
            brand_name: "Voiceify".to_string(),
            stage: ProjectStage::Published,
            due_date: at(2024, 5, 10),
            upfront_paid: true,
            final_paid: true,
            total_value: 1500.0,
            progress: derived(ProjectKind::Sponsored, ProjectStage::Published),
            script: None,
            video_url: None,
            archived: false,
            cancelled: false,
        },
    ];

    let transactions = vec![
        Transaction {
            id: "t-7".to_string(),
            date: day(2024, 5, 20),
            description: "Jasper AI Affiliate Payout".to_string(),
            amount: 120.0,
            kind: TransactionKind::Income,
            category: TransactionCategory::AffiliatePayment,
        },
        Transaction {
            id: "t-6".to_string(),
            date: day(2024, 5, 15),
            description: "Midjourney Subscription".to_string(),
            amount: 30.0,
            kind: TransactionKind::Expense,
            category: TransactionCategory::SoftwareSubscription,
        },
        Transaction {
            id: "t-5".to_string(),
            date: day(2024, 5, 12),
            description: "Notion Creator Course Sales".to_string(),
            amount: 450.0,
            kind: TransactionKind::Income,
            category: TransactionCategory::CourseSales,
        },
        Transaction {
            id: "t-4".to_string(),
            date: day(2024, 5, 10),
            description: "Editor Payment (Project P-3)".to_string(),
            amount: 300.0,
            kind: TransactionKind::Expense,
            category: TransactionCategory::EditingServices,
        },
        Transaction {
            id: "t-3".to_string(),
            date: day(2024, 5, 5),
            description: "Voiceify Sponsorship (Upfront)".to_string(),
            amount: 750.0,
            kind: TransactionKind::Income,
            category: TransactionCategory::Sponsorship,
        },
        Transaction {
            id: "t-2".to_string(),
            date: day(2024, 5, 3),
            description: "Epidemic Sound Subscription".to_string(),
            amount: 15.0,
            kind: TransactionKind::Expense,
            category: TransactionCategory::SoftwareSubscription,
        },
        Transaction {
            id: "t-1".to_string(),
            date: day(2024, 5, 1),
            description: "YouTube AdSense April".to_string(),
            amount: 1250.0,
            kind: TransactionKind::Income,
            category: TransactionCategory::YouTubePartner,
        },
    ];

    Workspace {
        deals,
        projects,
        transactions,
        courses: Vec::new(),
    }
}
