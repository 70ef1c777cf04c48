use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Parsed plan
// ---------------------------------------------------------------------------

/// One unit of work extracted from plan text.
///
/// `user_defined_duration_minutes` is `None` when no duration tag was found,
/// which is distinct from an explicit `Some(0)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,          // "task-<n>", encounter order
    pub title: String,       // tag stripped
    pub description: String, // may be empty
    pub user_defined_duration_minutes: Option<u32>,
}

// Advisory note for a task whose duration tag could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub task_id: String,
    pub index: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub tasks: Vec<Task>,
    pub total_duration_minutes: u32,
    pub warnings: Vec<ParseWarning>,
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    pub start_date: NaiveDate,
    pub working_hours_start: String, // "HH:MM"
    pub working_hours_end: String,   // "HH:MM"
    pub max_minutes_per_day: u32,
    pub skip_weekends: bool,
    pub allow_task_splitting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitInfo {
    pub part: u32,
    pub total_parts: u32,
}

// Contiguous slice of a day assigned to (a portion of) one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub task_id: String,
    pub title: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_info: Option<SplitInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub blocks: Vec<TimeBlock>,
    pub total_minutes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub days: Vec<DaySchedule>,
    pub scheduled_blocks: Vec<TimeBlock>,
    pub unscheduled_tasks: Vec<Task>,
    pub warnings: Vec<String>,
    pub total_days: usize,
}

// ---------------------------------------------------------------------------
// Persistence records
// ---------------------------------------------------------------------------

// Defaults applied when a schedule request leaves a config field out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingDefaults {
    pub working_hours_start: String, // "HH:MM"
    pub working_hours_end: String,   // "HH:MM"
    pub max_minutes_per_day: u32,
    pub skip_weekends: bool,
    pub allow_task_splitting: bool,
    pub default_duration_min: Option<u32>, // None = untagged tasks block scheduling
}

impl Default for SchedulingDefaults {
    fn default() -> Self {
        Self {
            working_hours_start: "09:00".to_string(),
            working_hours_end: "17:00".to_string(),
            max_minutes_per_day: 360,
            skip_weekends: true,
            allow_task_splitting: true,
            default_duration_min: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRecord {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub total_duration_minutes: u32,
    pub task_count: usize,
    pub created_at: DateTime<FixedOffset>,
}

// One calendar entry written per TimeBlock when a plan is applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineItem {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub task_id: String,
    pub title: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_info: Option<SplitInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Db {
    #[serde(default)]
    pub settings: SchedulingDefaults,
    #[serde(default)]
    pub plans: Vec<PlanRecord>,
    #[serde(default)]
    pub timeline: Vec<TimelineItem>,
}
