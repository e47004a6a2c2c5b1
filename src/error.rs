use thiserror::Error;

use crate::models::SessionStatus;

pub type CoreResult<T> = Result<T, CoreError>;

/// Failure taxonomy for the session and analytics core.
///
/// `InvalidLabel` and `Validation` mark a single bad sample: the affected
/// reading is dropped and processing continues. `Transport` is retried at the
/// next poll tick (or skips one session during aggregation) and only surfaces
/// directly for one-shot calls. `InvalidTransition` and `SessionStart` are
/// always returned to the caller.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unrecognized emotion label `{0}`")]
    InvalidLabel(String),

    #[error("snapshot failed validation: {0}")]
    Validation(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("cannot {action} while {from}")]
    InvalidTransition {
        action: &'static str,
        from: SessionStatus,
    },

    #[error("session start failed: {0}")]
    SessionStart(String),
}
