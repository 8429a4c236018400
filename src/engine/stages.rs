//! Pipeline stage definitions
//!
//! Stage sets for the deal (acquisition) pipeline and the two project
//! (production) pipelines. Each project kind owns its ordered stage
//! list; progress is always derived from a stage's position within the
//! list it belongs to, never stored independently.

use serde::{Deserialize, Serialize};

/// Stage of a sponsorship deal in the acquisition pipeline.
///
/// Serialized with the board labels the frontend renders, so exported
/// data stays readable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DealStage {
    #[serde(rename = "New Inquiry")]
    NewInquiry,
    #[serde(rename = "Rate Sent")]
    RateSent,
    #[serde(rename = "Negotiation")]
    Negotiation,
    #[serde(rename = "Accepted Awaiting Upfront")]
    AcceptedAwaitingUpfront,
    #[serde(rename = "Upfront Received")]
    UpfrontReceived,
    #[serde(rename = "Rejected")]
    Rejected,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl DealStage {
    /// The ordered funnel columns of the deal board. Rejected and
    /// Cancelled are parking lanes, not funnel positions.
    pub const PIPELINE: [DealStage; 5] = [
        DealStage::NewInquiry,
        DealStage::RateSent,
        DealStage::Negotiation,
        DealStage::AcceptedAwaitingUpfront,
        DealStage::UpfrontReceived,
    ];

    /// A deal still counts toward the open pipeline when it is neither
    /// dead (Rejected/Cancelled) nor already converted into a project.
    pub fn is_open(self) -> bool {
        !matches!(
            self,
            DealStage::Rejected | DealStage::Cancelled | DealStage::UpfrontReceived
        )
    }

    /// 0-based position within the funnel, if the stage is a funnel column.
    pub fn pipeline_position(self) -> Option<usize> {
        Self::PIPELINE.iter().position(|s| *s == self)
    }

    pub fn label(self) -> &'static str {
        match self {
            DealStage::NewInquiry => "New Inquiry",
            DealStage::RateSent => "Rate Sent",
            DealStage::Negotiation => "Negotiation",
            DealStage::AcceptedAwaitingUpfront => "Accepted Awaiting Upfront",
            DealStage::UpfrontReceived => "Upfront Received",
            DealStage::Rejected => "Rejected",
            DealStage::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for DealStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Stage of a production project. The full set covers both pipelines;
/// which members are legal for a given project is decided by its
/// [`ProjectKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStage {
    #[serde(rename = "Tool Access")]
    ToolAccess,
    #[serde(rename = "Testing & Research")]
    TestingResearch,
    #[serde(rename = "Concept & Research")]
    Concept,
    #[serde(rename = "Scripting")]
    Scripting,
    #[serde(rename = "Filming & Screen Cap")]
    Filming,
    #[serde(rename = "Voiceover & Editing")]
    Editing,
    #[serde(rename = "Review Pending")]
    Review,
    #[serde(rename = "Final Payment")]
    FinalPayment,
    #[serde(rename = "Published")]
    Published,
}

impl ProjectStage {
    pub fn label(self) -> &'static str {
        match self {
            ProjectStage::ToolAccess => "Tool Access",
            ProjectStage::TestingResearch => "Testing & Research",
            ProjectStage::Concept => "Concept & Research",
            ProjectStage::Scripting => "Scripting",
            ProjectStage::Filming => "Filming & Screen Cap",
            ProjectStage::Editing => "Voiceover & Editing",
            ProjectStage::Review => "Review Pending",
            ProjectStage::FinalPayment => "Final Payment",
            ProjectStage::Published => "Published",
        }
    }
}

impl std::fmt::Display for ProjectStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which production pipeline a project runs through. Each kind owns its
/// ordered stage list; sponsored projects carry payment stages,
/// tutorials do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectKind {
    #[serde(rename = "SPONSORED")]
    Sponsored,
    #[serde(rename = "TUTORIAL")]
    Tutorial,
}

const SPONSORED_STAGES: [ProjectStage; 8] = [
    ProjectStage::ToolAccess,
    ProjectStage::TestingResearch,
    ProjectStage::Scripting,
    ProjectStage::Filming,
    ProjectStage::Editing,
    ProjectStage::Review,
    ProjectStage::FinalPayment,
    ProjectStage::Published,
];

const TUTORIAL_STAGES: [ProjectStage; 5] = [
    ProjectStage::Concept,
    ProjectStage::Scripting,
    ProjectStage::Filming,
    ProjectStage::Editing,
    ProjectStage::Published,
];

impl ProjectKind {
    /// The ordered stage list this kind of project moves through.
    pub fn stages(self) -> &'static [ProjectStage] {
        match self {
            ProjectKind::Sponsored => &SPONSORED_STAGES,
            ProjectKind::Tutorial => &TUTORIAL_STAGES,
        }
    }

    pub fn first_stage(self) -> ProjectStage {
        self.stages()[0]
    }

    pub fn contains(self, stage: ProjectStage) -> bool {
        self.stages().contains(&stage)
    }

    /// 0-based position of `stage` within this kind's list.
    pub fn stage_position(self, stage: ProjectStage) -> Option<usize> {
        self.stages().iter().position(|s| *s == stage)
    }

    /// Progress percentage derived from stage position:
    /// `round(100 * (index + 1) / stage_count)`. Two projects of the
    /// same kind in the same stage always report the same progress.
    ///
    /// Returns None when the stage is not part of this kind's list.
    pub fn progress_for(self, stage: ProjectStage) -> Option<u8> {
        let stages = self.stages();
        let index = self.stage_position(stage)?;
        Some((((index + 1) as f64 / stages.len() as f64) * 100.0).round() as u8)
    }

    /// Progress of a project entering this pipeline at its first stage.
    pub fn initial_progress(self) -> u8 {
        ((1.0 / self.stages().len() as f64) * 100.0).round() as u8
    }
}
