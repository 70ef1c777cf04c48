// --------------------------------------------------
// Stateless plan preview endpoints.
//
// Responsibilities:
// - Parse plan text (called on every edit by the UI)
// - Validate a plan before scheduling
// - Build a schedule preview without saving anything
// -------------------------------------------------

use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::AppState;
use crate::error::AppError;
use crate::format::{DayEstimate, estimate_days, format_duration};
use crate::models::{ParseResult, ScheduleResult, SchedulingConfig, SchedulingDefaults};
use crate::parser::parse_plan;
use crate::pipeline::plan_schedule;
use crate::validator::{DurationPolicy, resolve_durations, validate};

// Every config field is optional; missing ones come from the stored settings.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigInput {
    pub start_date: Option<NaiveDate>,
    pub working_hours_start: Option<String>,
    pub working_hours_end: Option<String>,
    pub max_minutes_per_day: Option<u32>,
    pub skip_weekends: Option<bool>,
    pub allow_task_splitting: Option<bool>,
}

impl ConfigInput {
    pub fn resolve(self, defaults: &SchedulingDefaults, today: NaiveDate) -> SchedulingConfig {
        SchedulingConfig {
            start_date: self.start_date.unwrap_or(today),
            working_hours_start: self
                .working_hours_start
                .unwrap_or_else(|| defaults.working_hours_start.clone()),
            working_hours_end: self
                .working_hours_end
                .unwrap_or_else(|| defaults.working_hours_end.clone()),
            max_minutes_per_day: self
                .max_minutes_per_day
                .unwrap_or(defaults.max_minutes_per_day),
            skip_weekends: self.skip_weekends.unwrap_or(defaults.skip_weekends),
            allow_task_splitting: self
                .allow_task_splitting
                .unwrap_or(defaults.allow_task_splitting),
        }
    }
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// Request default wins over the stored one
pub fn duration_policy(request: Option<u32>, defaults: &SchedulingDefaults) -> DurationPolicy {
    DurationPolicy::from_default_minutes(request.or(defaults.default_duration_min))
}

#[derive(Debug, Deserialize)]
pub struct ParseInput {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    #[serde(flatten)]
    pub result: ParseResult,
    pub total_formatted: String,
    pub estimate: Option<DayEstimate>,
}

// -----------------------------
// POST /api/plan/parse
// Parses plan text into tasks with durations
// -----------------------------
pub async fn parse(
    State(state): State<AppState>,
    Json(input): Json<ParseInput>,
) -> Result<Json<ParseResponse>, AppError> {
    let settings = state.store.read().await?.settings;
    let result = parse_plan(&input.text);

    Ok(Json(ParseResponse {
        total_formatted: format_duration(result.total_duration_minutes),
        estimate: estimate_days(result.total_duration_minutes, settings.max_minutes_per_day),
        result,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ValidateInput {
    pub text: String,
    pub default_duration_min: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

// -----------------------------
// POST /api/plan/validate
// Reports whether the plan may be scheduled
// -----------------------------
pub async fn validate_plan(
    State(state): State<AppState>,
    Json(input): Json<ValidateInput>,
) -> Result<Json<ValidateResponse>, AppError> {
    let settings = state.store.read().await?.settings;
    let policy = duration_policy(input.default_duration_min, &settings);

    let parsed = parse_plan(&input.text);
    let report = validate(&resolve_durations(&parsed.tasks, policy));

    Ok(Json(ValidateResponse {
        is_valid: report.is_valid,
        errors: report.messages(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ScheduleInput {
    pub text: String,
    #[serde(default)]
    pub config: ConfigInput,
    pub default_duration_min: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub config: SchedulingConfig,
    pub total_duration_minutes: u32,
    #[serde(flatten)]
    pub schedule: ScheduleResult,
}

// -----------------------------
// POST /api/plan/schedule
// Builds a day-by-day schedule preview
// -----------------------------
pub async fn schedule(
    State(state): State<AppState>,
    Json(input): Json<ScheduleInput>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let settings = state.store.read().await?.settings;
    let policy = duration_policy(input.default_duration_min, &settings);
    let config = input.config.resolve(&settings, today());

    let planned = plan_schedule(&input.text, &config, policy)
        .map_err(|report| AppError::unprocessable("plan cannot be scheduled", report.messages()))?;

    info!(
        days = planned.schedule.total_days,
        unscheduled = planned.schedule.unscheduled_tasks.len(),
        "schedule preview"
    );

    Ok(Json(ScheduleResponse {
        config,
        total_duration_minutes: planned.parsed.total_duration_minutes,
        schedule: planned.schedule,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_fields_fall_back_to_settings() {
        let defaults = SchedulingDefaults::default();
        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let input = ConfigInput {
            max_minutes_per_day: Some(120),
            ..ConfigInput::default()
        };

        let config = input.resolve(&defaults, today);
        assert_eq!(config.start_date, today);
        assert_eq!(config.max_minutes_per_day, 120);
        assert_eq!(config.working_hours_start, defaults.working_hours_start);
        assert_eq!(config.skip_weekends, defaults.skip_weekends);
    }

    #[test]
    fn request_default_duration_wins() {
        let defaults = SchedulingDefaults {
            default_duration_min: Some(30),
            ..SchedulingDefaults::default()
        };
        assert_eq!(
            duration_policy(Some(5), &defaults),
            DurationPolicy::Default { minutes: 5 }
        );
        assert_eq!(
            duration_policy(None, &defaults),
            DurationPolicy::Default { minutes: 30 }
        );
        assert_eq!(
            duration_policy(None, &SchedulingDefaults::default()),
            DurationPolicy::Reject
        );
    }
}
