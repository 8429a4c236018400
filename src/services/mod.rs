//! Services module
//!
//! Business logic services that coordinate between the host UI, the
//! pipeline engine and the repository:
//! - `auth`: account registration and login
//! - `workspace`: the signed-in user's collections, mirrored to storage
//! - `exchange`: export/import of the collections as a byte blob
//! - `script`: best-effort video-script generation

pub mod auth;
pub mod exchange;
pub mod script;
pub mod workspace;

pub use auth::AuthService;
pub use script::{GeminiScriptGenerator, ScriptGenerator};
pub use workspace::WorkspaceService;
