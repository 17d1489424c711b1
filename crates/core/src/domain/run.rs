use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use super::phase::PhaseDefinition;

/// File name of the canonical target list inside a run directory.
pub const TARGETS_FILE: &str = "targets.txt";
/// File name of the aggregated report inside a run directory.
pub const REPORT_FILE: &str = "report.html";

/// Directory name for a run started at `started_at`, e.g. `scan_20250101_093000`.
pub fn run_dir_name(started_at: &DateTime<Local>) -> String {
    format!("scan_{}", started_at.format("%Y%m%d_%H%M%S"))
}

/// Per-run state. Owns every artifact of the run by directory containment.
#[derive(Debug, Clone)]
pub struct RunContext {
    output_dir: PathBuf,
    phases: Vec<PhaseDefinition>,
    started_at: DateTime<Local>,
}

impl RunContext {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        phases: Vec<PhaseDefinition>,
        started_at: DateTime<Local>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            phases,
            started_at,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn phases(&self) -> &[PhaseDefinition] {
        &self.phases
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn targets_path(&self) -> PathBuf {
        self.output_dir.join(TARGETS_FILE)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILE)
    }

    pub fn artifact_path(&self, phase: &PhaseDefinition) -> PathBuf {
        self.output_dir.join(phase.output_file())
    }

    pub fn phase(&self, label: &str) -> Option<&PhaseDefinition> {
        self.phases.iter().find(|p| p.name() == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::phase::default_phases;
    use chrono::TimeZone;

    #[test]
    fn test_run_dir_name() {
        let started = Local.with_ymd_and_hms(2025, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(run_dir_name(&started), "scan_20250307_090501");
    }

    #[test]
    fn test_paths_are_inside_output_dir() {
        let ctx = RunContext::new("/tmp/out/scan_1", default_phases(), Local::now());
        assert_eq!(ctx.targets_path(), PathBuf::from("/tmp/out/scan_1/targets.txt"));
        assert_eq!(ctx.report_path(), PathBuf::from("/tmp/out/scan_1/report.html"));

        let low = ctx.phase("low").unwrap();
        assert_eq!(ctx.artifact_path(low), PathBuf::from("/tmp/out/scan_1/low.txt"));
        assert!(ctx.phase("critical").is_none());
    }
}
