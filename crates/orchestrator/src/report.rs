//! Consolidates per-phase scanner output into one HTML report.

use chrono::{DateTime, Local};
use phasescan_core::{PhaseDefinition, ReportDocument, RunContext};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{OrchestratorError, Result};

/// Builds the report from whichever phase artifacts exist.
///
/// Sections follow a fixed label order chosen at construction, independent
/// of how the phases actually went. Labels whose artifact is missing or
/// unreadable are left out.
#[derive(Debug, Clone)]
pub struct ReportAggregator {
    order: Vec<String>,
}

impl ReportAggregator {
    pub fn new<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order: order.into_iter().map(Into::into).collect(),
        }
    }

    /// Report sections in declared phase order.
    pub fn from_phases(phases: &[PhaseDefinition]) -> Self {
        Self::new(phases.iter().map(|p| p.name()))
    }

    pub async fn collect(&self, ctx: &RunContext, generated_at: DateTime<Local>) -> ReportDocument {
        let mut document = ReportDocument::new(generated_at);

        for label in &self.order {
            let Some(phase) = ctx.phase(label) else {
                debug!(label = %label, "No phase with this label, skipping");
                continue;
            };
            let artifact = ctx.artifact_path(phase);
            match fs::read(&artifact).await {
                Ok(bytes) => {
                    document.push_section(label.as_str(), bytes);
                }
                Err(e) => {
                    debug!(
                        label = %label,
                        path = %artifact.display(),
                        error = %e,
                        "No readable output, leaving section out"
                    );
                }
            }
        }

        document
    }

    /// Render and write `report.html`, replacing any earlier report.
    pub async fn write(&self, ctx: &RunContext, generated_at: DateTime<Local>) -> Result<PathBuf> {
        let document = self.collect(ctx, generated_at).await;
        let path = ctx.report_path();

        fs::write(&path, document.render_html())
            .await
            .map_err(|e| OrchestratorError::report_write(&path, e))?;

        info!(
            path = %path.display(),
            sections = document.sections.len(),
            "Report generated"
        );
        Ok(path)
    }
}
