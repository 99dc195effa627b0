use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("failed to serialize object: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Computes the JSON patch that transforms `before` into `after`.
///
/// Both objects are compared in full so fields that are equal in both are left
/// untouched. Object keys serialize in sorted order, so the same inputs always
/// produce the same operations; equal inputs produce an empty patch.
pub fn diff<T: Serialize>(before: &T, after: &T) -> Result<json_patch::Patch, PatchError> {
    let before = serde_json::to_value(before)?;
    let after = serde_json::to_value(after)?;
    Ok(json_patch::diff(&before, &after))
}
