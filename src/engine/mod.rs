//! Pipeline engine
//!
//! The pure core of the application:
//! - Stage sets and progress derivation for both pipelines
//! - Domain entities
//! - The workspace reducer holding one user's collections and every
//!   pipeline operation, including the deal→project conversion
//! - Read-only dashboard aggregation
//!
//! Nothing in this module performs I/O; persistence and external
//! services live in `database` and `services`.

pub mod metrics;
pub mod models;
pub mod sample;
pub mod stages;
pub mod workspace;

pub use models::*;
pub use stages::{DealStage, ProjectKind, ProjectStage};
pub use workspace::{DealConversion, Workspace};
