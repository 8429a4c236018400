//! Workspace export and import
//!
//! Moves a user's collections in and out of a transferable JSON blob.
//! Import validates the blob's shape before anything is accepted: a
//! rejected blob leaves the current data untouched, and an accepted
//! one replaces the collections wholesale. There is no merging.

use crate::engine::Workspace;
use crate::error::{AppError, Result};

/// Serialize the collections to a transferable byte blob.
pub fn export_bytes(workspace: &Workspace) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(workspace)?)
}

/// Decode and validate a byte blob into a workspace.
///
/// The blob must be a JSON object carrying at least `deals` and
/// `projects` arrays. Missing secondary collections default to empty;
/// unknown extra fields are ignored.
pub fn import_bytes(bytes: &[u8]) -> Result<Workspace> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| AppError::ImportFormat(format!("not valid JSON: {e}")))?;

    let object = value
        .as_object()
        .ok_or_else(|| AppError::ImportFormat("top level must be an object".to_string()))?;

    for field in ["deals", "projects"] {
        match object.get(field) {
            Some(member) if member.is_array() => {}
            Some(_) => {
                return Err(AppError::ImportFormat(format!(
                    "\"{field}\" must be an array"
                )))
            }
            None => {
                return Err(AppError::ImportFormat(format!(
                    "missing \"{field}\" collection"
                )))
            }
        }
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::ImportFormat(format!("malformed collection data: {e}")))
}
