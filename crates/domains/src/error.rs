//! # BlogError
//!
//! Centralized error handling for the blog core. Absence ("not found") is
//! not an error here: the service signals it as `Ok(None)` and leaves the
//! transport mapping to the boundary layer.

use thiserror::Error;

/// The primary error type for all core operations.
#[derive(Error, Debug)]
pub enum BlogError {
    /// Input rejected before any storage mutation (missing field,
    /// content over length).
    #[error("validation error: {0}")]
    Validation(String),

    /// A patch path that names no known post field.
    #[error("unknown patch path: {0}")]
    UnknownPatchPath(String),

    /// A patch value whose shape does not fit the addressed field.
    #[error("patch value for '{path}' is not {expected}")]
    PatchValueMismatch {
        path: String,
        expected: &'static str,
    },

    /// An operation kind other than "replace".
    #[error("unsupported patch op: {0}")]
    UnsupportedPatchOp(String),

    /// Opaque failure from the persistence layer; never retried here.
    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl BlogError {
    /// True for the patch-structural family of failures, which reject the
    /// whole patch without partial application.
    pub fn is_patch_structural(&self) -> bool {
        matches!(
            self,
            BlogError::UnknownPatchPath(_)
                | BlogError::PatchValueMismatch { .. }
                | BlogError::UnsupportedPatchOp(_)
        )
    }
}

/// A specialized Result type for blog core logic.
pub type Result<T> = std::result::Result<T, BlogError>;
