// --------------------------------------------------
// Handles stored plans, the timeline they are applied to,
// and the scheduling defaults.
//
// Responsibilities:
// - Save / list / read plan records
// - Apply a plan: schedule it and write one timeline item per block
// - Read the timeline, optionally for a single day
// - Get / update scheduling defaults
// -------------------------------------------------

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::AppError;
use crate::models::{PlanRecord, ScheduleResult, SchedulingDefaults, TimelineItem};
use crate::parser::parse_plan;
use crate::pipeline::plan_schedule;
use crate::routes_plan::{ConfigInput, duration_policy, today};
use crate::scheduler::check_config;

fn now_fixed_offset() -> DateTime<FixedOffset> {
    chrono::Local::now().fixed_offset()
}

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::bad_request("invalid id"))
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanInput {
    pub title: String,
    pub text: String,
}

// -----------------------------
// POST /api/plans
// Stores the plan text with its parsed totals
// -----------------------------
pub async fn create_plan(
    State(state): State<AppState>,
    Json(input): Json<CreatePlanInput>,
) -> Result<Json<PlanRecord>, AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::bad_request("title required"));
    }

    let parsed = parse_plan(&input.text);
    let record = PlanRecord {
        id: Uuid::new_v4(),
        title: input.title,
        text: input.text,
        total_duration_minutes: parsed.total_duration_minutes,
        task_count: parsed.tasks.len(),
        created_at: now_fixed_offset(),
    };

    let saved = record.clone();
    state
        .store
        .update(move |db| {
            db.plans.push(saved);
            Ok::<_, AppError>(())
        })
        .await?;

    info!(plan_id = %record.id, tasks = record.task_count, "created plan");
    Ok(Json(record))
}

// -----------------------------
// GET /api/plans
// -----------------------------
pub async fn list_plans(State(state): State<AppState>) -> Result<Json<Vec<PlanRecord>>, AppError> {
    Ok(Json(state.store.read().await?.plans))
}

// -----------------------------
// GET /api/plans/:id
// -----------------------------
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlanRecord>, AppError> {
    let id = parse_id(&id)?;
    let db = state.store.read().await?;
    db.plans
        .into_iter()
        .find(|p| p.id == id)
        .map(Json)
        .ok_or_else(|| AppError::not_found("plan not found"))
}

#[derive(Debug, Default, Deserialize)]
pub struct ApplyInput {
    #[serde(default)]
    pub config: ConfigInput,
    pub default_duration_min: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub plan_id: Uuid,
    pub items_created: usize,
    pub schedule: ScheduleResult,
}

// -----------------------------
// POST /api/plans/:id/apply
// Schedules a stored plan and writes its blocks to the timeline.
// Items from an earlier apply of the same plan are replaced.
// -----------------------------
pub async fn apply_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ApplyInput>,
) -> Result<Json<ApplyResponse>, AppError> {
    let plan_id = parse_id(&id)?;

    let schedule = state
        .store
        .update(|db| {
            let plan = db
                .plans
                .iter()
                .find(|p| p.id == plan_id)
                .ok_or_else(|| AppError::not_found("plan not found"))?;

            let policy = duration_policy(input.default_duration_min, &db.settings);
            let config = input.config.resolve(&db.settings, today());
            let planned = plan_schedule(&plan.text, &config, policy).map_err(|report| {
                AppError::unprocessable("plan cannot be scheduled", report.messages())
            })?;

            db.timeline.retain(|item| item.plan_id != plan_id);
            db.timeline
                .extend(planned.schedule.scheduled_blocks.iter().map(|b| TimelineItem {
                    id: Uuid::new_v4(),
                    plan_id,
                    task_id: b.task_id.clone(),
                    title: b.title.clone(),
                    start_time: b.start_time,
                    end_time: b.end_time,
                    duration_minutes: b.duration_minutes,
                    split_info: b.split_info,
                }));

            Ok::<_, AppError>(planned.schedule)
        })
        .await?;

    info!(
        %plan_id,
        items = schedule.scheduled_blocks.len(),
        unscheduled = schedule.unscheduled_tasks.len(),
        "applied plan to timeline"
    );

    Ok(Json(ApplyResponse {
        plan_id,
        items_created: schedule.scheduled_blocks.len(),
        schedule,
    }))
}

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    pub date: Option<String>, // "YYYY-MM-DD"
}

// -----------------------------
// GET /api/timeline
// Timeline items in start order, optionally for one day
// -----------------------------
pub async fn get_timeline(
    State(state): State<AppState>,
    Query(q): Query<TimelineQuery>,
) -> Result<Json<Vec<TimelineItem>>, AppError> {
    let date = match q.date.as_deref() {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::bad_request("invalid date"))?,
        ),
        None => None,
    };

    let mut items: Vec<TimelineItem> = state
        .store
        .read()
        .await?
        .timeline
        .into_iter()
        .filter(|item| date.is_none_or(|d| item.start_time.date() == d))
        .collect();
    items.sort_by_key(|item| item.start_time);

    Ok(Json(items))
}

// -----------------------------
// GET /api/settings
// -----------------------------
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<SchedulingDefaults>, AppError> {
    Ok(Json(state.store.read().await?.settings))
}

// -----------------------------
// PUT /api/settings
// Rejects defaults that could never produce a schedule
// -----------------------------
pub async fn put_settings(
    State(state): State<AppState>,
    Json(settings): Json<SchedulingDefaults>,
) -> Result<Json<SchedulingDefaults>, AppError> {
    let probe = ConfigInput::default().resolve(&settings, today());
    check_config(&probe).map_err(|e| AppError::bad_request(e.to_string()))?;

    let saved = settings.clone();
    state
        .store
        .update(move |db| {
            db.settings = saved;
            Ok::<_, AppError>(())
        })
        .await?;

    Ok(Json(settings))
}
