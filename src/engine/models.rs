//! Domain entities
//!
//! Rust structs for the collections a user owns: deals, projects,
//! transactions and courses. All models use serde with the camelCase
//! field names the frontend (and the export format) expects, so a
//! serialized workspace is interchangeable with previously exported
//! data.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::stages::{DealStage, ProjectKind, ProjectStage};

/// A sponsorship negotiation tracked through the acquisition pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub brand_name: String,
    pub tool_name: String,
    pub contact_email: String,
    pub value: f64,
    pub stage: DealStage,
    /// Refreshed on every mutation of the deal
    pub last_activity: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_publish_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Input for creating a deal. A blank brand name falls back to the
/// tool name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeal {
    pub brand_name: String,
    pub tool_name: String,
    pub contact_email: String,
    pub value: f64,
    #[serde(default)]
    pub expected_publish_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial edit of a deal; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealPatch {
    pub brand_name: Option<String>,
    pub tool_name: Option<String>,
    pub contact_email: Option<String>,
    pub value: Option<f64>,
    pub expected_publish_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// A content-production task tracked through a production pipeline,
/// optionally originating from a deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: ProjectKind,
    pub title: String,
    /// Brand for sponsored work; topic label for tutorials
    pub brand_name: String,
    pub stage: ProjectStage,
    pub due_date: DateTime<Utc>,
    pub upfront_paid: bool,
    pub final_paid: bool,
    /// Total contracted value; zero for tutorials
    pub total_value: f64,
    /// Always derived from the stage's position in the kind's list
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub cancelled: bool,
}

/// Input for manually creating a tutorial project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTutorial {
    pub title: String,
    /// Topic label shown where sponsored projects show a brand
    pub brand_name: String,
    pub due_date: DateTime<Utc>,
}

/// Partial edit of a project; absent fields are left unchanged.
/// Stage and progress are never edited this way, only by `move_project`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub brand_name: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub upfront_paid: Option<bool>,
    pub final_paid: Option<bool>,
    pub total_value: Option<f64>,
}

/// Direction of a ledger entry. Amounts are stored as positive
/// magnitudes; the direction lives here, never in the magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "INCOME")]
    Income,
    #[serde(rename = "EXPENSE")]
    Expense,
}

/// Ledger category. The income and expense sets are fixed; "Other" is
/// shared by both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionCategory {
    #[serde(rename = "YouTube Partner")]
    YouTubePartner,
    #[serde(rename = "Affiliate Payment")]
    AffiliatePayment,
    #[serde(rename = "Link Placement")]
    LinkPlacement,
    #[serde(rename = "Course Sales")]
    CourseSales,
    #[serde(rename = "Digital Products")]
    DigitalProducts,
    #[serde(rename = "Sponsorship")]
    Sponsorship,
    #[serde(rename = "Software Subscription")]
    SoftwareSubscription,
    #[serde(rename = "Editing Services")]
    EditingServices,
    #[serde(rename = "Equipment/Tools")]
    EquipmentTools,
    #[serde(rename = "Freelancers")]
    Freelancers,
    #[serde(rename = "Marketing")]
    Marketing,
    #[serde(rename = "Other")]
    Other,
}

impl TransactionCategory {
    /// Whether this category belongs to the given ledger direction.
    pub fn valid_for(self, kind: TransactionKind) -> bool {
        use TransactionCategory::*;
        match self {
            YouTubePartner | AffiliatePayment | LinkPlacement | CourseSales | DigitalProducts
            | Sponsorship => kind == TransactionKind::Income,
            SoftwareSubscription | EditingServices | EquipmentTools | Freelancers | Marketing => {
                kind == TransactionKind::Expense
            }
            Other => true,
        }
    }
}

/// A single income or expense ledger entry. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    /// Positive magnitude; direction is carried by `kind`
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: TransactionCategory,
}

/// Input for recording a ledger entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: TransactionCategory,
}

/// One chapter of a course, running the tutorial pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub stage: ProjectStage,
}

/// A structured educational production: planned chapter count plus the
/// chapters created so far, each on its own tutorial pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub total_chapters: u32,
    pub chapters: Vec<Chapter>,
    /// Derived: share of chapters that have left the initial stage,
    /// measured against the planned chapter count
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// Input for creating a course.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub total_chapters: u32,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Partial edit of a course; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub total_chapters: Option<u32>,
    pub thumbnail_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_direction_membership() {
        assert!(TransactionCategory::Sponsorship.valid_for(TransactionKind::Income));
        assert!(!TransactionCategory::Sponsorship.valid_for(TransactionKind::Expense));
        assert!(TransactionCategory::Freelancers.valid_for(TransactionKind::Expense));
        assert!(!TransactionCategory::Freelancers.valid_for(TransactionKind::Income));
        assert!(TransactionCategory::Other.valid_for(TransactionKind::Income));
        assert!(TransactionCategory::Other.valid_for(TransactionKind::Expense));
    }

    #[test]
    fn test_transaction_wire_format_matches_exports() {
        let txn = Transaction {
            id: "t-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            description: "YouTube AdSense April".to_string(),
            amount: 1250.0,
            kind: TransactionKind::Income,
            category: TransactionCategory::YouTubePartner,
        };

        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "INCOME");
        assert_eq!(json["category"], "YouTube Partner");
        assert_eq!(json["date"], "2024-05-01");
    }

    #[test]
    fn test_project_kind_wire_format() {
        let json = serde_json::to_string(&ProjectKind::Sponsored).unwrap();
        assert_eq!(json, "\"SPONSORED\"");
    }
}
