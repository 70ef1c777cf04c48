//! Text-to-schedule pipeline: parse, resolve, validate, schedule.

use tracing::debug;

use crate::models::{ParseResult, ScheduleResult, SchedulingConfig};
use crate::parser::parse_plan;
use crate::scheduler::schedule;
use crate::validator::{DurationPolicy, ValidationReport, resolve_durations, validate};

#[derive(Debug, Clone)]
pub struct PlannedSchedule {
    pub parsed: ParseResult,
    pub schedule: ScheduleResult,
}

/// Run the whole pipeline over raw plan text.
///
/// Returns the validation report instead of a schedule when the plan may not
/// be scheduled (no tasks, or unresolved durations under `policy`).
pub fn plan_schedule(
    text: &str,
    config: &SchedulingConfig,
    policy: DurationPolicy,
) -> Result<PlannedSchedule, ValidationReport> {
    let parsed = parse_plan(text);
    let tasks = resolve_durations(&parsed.tasks, policy);

    let report = validate(&tasks);
    if !report.is_valid {
        debug!(errors = report.errors.len(), "plan failed validation");
        return Err(report);
    }

    let schedule = schedule(&tasks, config);
    Ok(PlannedSchedule { parsed, schedule })
}
