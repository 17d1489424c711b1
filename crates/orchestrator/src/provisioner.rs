//! Materializes the canonical target list inside the run directory.

use phasescan_core::TargetInput;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::error::{OrchestratorError, Result};

pub struct TargetProvisioner;

impl TargetProvisioner {
    /// Reject inputs that `provision` would reject, without touching the
    /// filesystem beyond a metadata lookup.
    pub async fn preflight(input: &TargetInput) -> Result<()> {
        match input {
            TargetInput::Single(value) if value.trim().is_empty() => {
                Err(OrchestratorError::EmptyTarget)
            }
            TargetInput::Single(_) => Ok(()),
            TargetInput::List(source) => {
                if is_file(source).await {
                    Ok(())
                } else {
                    Err(OrchestratorError::TargetListNotFound(source.clone()))
                }
            }
        }
    }

    /// Write the target list for `input` to `targets_path`.
    ///
    /// A missing list file fails with [`OrchestratorError::TargetListNotFound`]
    /// and leaves no artifact behind. Copied lists are not checked for
    /// well-formedness.
    pub async fn provision(input: &TargetInput, targets_path: &Path) -> Result<PathBuf> {
        match input {
            TargetInput::Single(value) => {
                let target = value.trim();
                if target.is_empty() {
                    return Err(OrchestratorError::EmptyTarget);
                }
                fs::write(targets_path, format!("{}\n", target)).await?;
                info!(target = %target, path = %targets_path.display(), "Single target saved");
            }
            TargetInput::List(source) => {
                if !is_file(source).await {
                    return Err(OrchestratorError::TargetListNotFound(source.clone()));
                }
                let bytes = fs::copy(source, targets_path).await?;
                if bytes == 0 {
                    warn!(source = %source.display(), "Target list is empty");
                }
                info!(
                    source = %source.display(),
                    path = %targets_path.display(),
                    bytes,
                    "Target list copied"
                );
            }
        }
        Ok(targets_path.to_path_buf())
    }
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
