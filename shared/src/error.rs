//! Error types for controller construction and loadout bookkeeping.
//!
//! Per-frame simulation never returns errors: degenerate frames are skipped
//! in place. Errors only surface when a profile is authored wrong or a data
//! store operation names something that isn't there.

use std::path::PathBuf;

use thiserror::Error;

pub type ControllerResult<T> = Result<T, ControllerError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControllerError {
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },

    #[error("failed to read profile {}: {message}", path.display())]
    ProfileIo { path: PathBuf, message: String },

    #[error("failed to parse profile {}: {message}", path.display())]
    ProfileParse { path: PathBuf, message: String },

    #[error("unknown item `{0}`")]
    UnknownItem(String),
}

impl ControllerError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}
