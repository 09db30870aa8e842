use thiserror::Error;

/// Every recoverable puzzle failure is a configuration problem caught at
/// construction time (or a slot lookup that the registry cannot satisfy).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PuzzleError {
    #[error("invalid board spec: {reason}")]
    InvalidBoardSpec { reason: String },
}

impl PuzzleError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidBoardSpec {
            reason: reason.into(),
        }
    }
}

pub type PuzzleResult<T> = Result<T, PuzzleError>;
