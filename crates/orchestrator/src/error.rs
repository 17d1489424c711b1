use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("No targets given: supply a single target or a target-list file")]
    NoTargets,

    #[error("Target is empty after trimming whitespace")]
    EmptyTarget,

    #[error("Target list not found: {}", .0.display())]
    TargetListNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] phasescan_core::CoreError),

    #[error("Failed to create run directory {}: {source}", path.display())]
    RunDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrchestratorError {
    pub fn report_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReportWrite {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OrchestratorError::TargetListNotFound(PathBuf::from("missing.txt"));
        assert_eq!(err.to_string(), "Target list not found: missing.txt");

        let err = OrchestratorError::report_write(
            "out/report.html",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("out/report.html"));
    }
}
