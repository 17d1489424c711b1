use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Phase list is empty")]
    NoPhases,

    #[error("Duplicate phase label: {0}")]
    DuplicatePhase(String),

    #[error("Invalid phase '{phase}': {reason}")]
    InvalidPhase { phase: String, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    pub fn invalid_phase(phase: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPhase {
            phase: phase.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
