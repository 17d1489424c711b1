mod outcome;
mod phase;
mod report;
mod run;
mod target;

pub use outcome::{PhaseOutcome, PhaseStatus};
pub use phase::{
    default_phases, validate_phases, PhaseDefinition, Selector, DEFAULT_CONCURRENCY,
    DEFAULT_RATE_LIMIT,
};
pub use report::{ReportDocument, ReportSection};
pub use run::{run_dir_name, RunContext, REPORT_FILE, TARGETS_FILE};
pub use target::TargetInput;
