/*
Day-by-day scheduling logic.
Module was independently written from HTTP / Axum for testing.

Tasks are placed greedily in the order they were written: no scoring,
no reordering. Each day is bounded both by the working-hours window and
by the daily minute budget, whichever is tighter.
*/

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike, Weekday};
use thiserror::Error;
use tracing::{debug, warn};

use crate::format::format_duration;
use crate::models::{DaySchedule, ScheduleResult, SchedulingConfig, SplitInfo, Task, TimeBlock};

// Upper bound on days opened per request
pub const MAX_SCHEDULED_DAYS: usize = 3660;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleConfigError {
    #[error("{field} {value:?} is not a valid HH:MM time")]
    InvalidTime { field: &'static str, value: String },

    #[error("working hours start {start} must be before end {end}")]
    EmptyWindow { start: String, end: String },

    #[error("max minutes per day must be greater than zero")]
    ZeroBudget,
}

// Parse a "HH:MM" string into a time of day.
fn parse_hhmm(hhmm: &str) -> Option<NaiveTime> {
    let parts: Vec<&str> = hhmm.trim().split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let h: u32 = parts[0].parse().ok()?;
    let m: u32 = parts[1].parse().ok()?;
    NaiveTime::from_hms_opt(h, m, 0)
}

// Validated working window
#[derive(Debug, Clone, Copy)]
struct WorkWindow {
    start: NaiveTime,
    width: u32,  // minutes between start and end
    budget: u32, // max minutes per day
}

impl WorkWindow {
    fn from_config(config: &SchedulingConfig) -> Result<Self, ScheduleConfigError> {
        let start = parse_hhmm(&config.working_hours_start).ok_or_else(|| {
            ScheduleConfigError::InvalidTime {
                field: "working_hours_start",
                value: config.working_hours_start.clone(),
            }
        })?;
        let end = parse_hhmm(&config.working_hours_end).ok_or_else(|| {
            ScheduleConfigError::InvalidTime {
                field: "working_hours_end",
                value: config.working_hours_end.clone(),
            }
        })?;

        if start >= end {
            return Err(ScheduleConfigError::EmptyWindow {
                start: config.working_hours_start.clone(),
                end: config.working_hours_end.clone(),
            });
        }
        if config.max_minutes_per_day == 0 {
            return Err(ScheduleConfigError::ZeroBudget);
        }

        let minute_of_day = |t: NaiveTime| t.hour() * 60 + t.minute();
        Ok(Self {
            start,
            width: minute_of_day(end) - minute_of_day(start),
            budget: config.max_minutes_per_day,
        })
    }

    // Most a single task can get on one fresh day
    fn day_limit(&self) -> u32 {
        self.budget.min(self.width)
    }
}

/// Check a config without scheduling anything.
pub fn check_config(config: &SchedulingConfig) -> Result<(), ScheduleConfigError> {
    WorkWindow::from_config(config).map(|_| ())
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

// Hands out eligible dates one at a time
struct Calendar {
    next: Option<NaiveDate>,
    skip_weekends: bool,
}

impl Calendar {
    fn next_day(&mut self) -> Option<NaiveDate> {
        loop {
            let date = self.next?;
            self.next = date.succ_opt();
            if self.skip_weekends && is_weekend(date) {
                continue;
            }
            return Some(date);
        }
    }
}

// Days built so far; the last one is the open day.
struct DayBuilder {
    window: WorkWindow,
    calendar: Calendar,
    days: Vec<DaySchedule>,
    offset: u32, // minutes past window start on the open day
}

impl DayBuilder {
    fn new(window: WorkWindow, config: &SchedulingConfig) -> Self {
        Self {
            window,
            calendar: Calendar {
                next: Some(config.start_date),
                skip_weekends: config.skip_weekends,
            },
            days: Vec::new(),
            offset: 0,
        }
    }

    fn capacity(&self) -> u32 {
        match self.days.last() {
            Some(day) => {
                let budget_left = self.window.budget.saturating_sub(day.total_minutes);
                let window_left = self.window.width.saturating_sub(self.offset);
                budget_left.min(window_left)
            }
            None => 0,
        }
    }

    // false once the horizon or the end of the calendar is reached
    fn open_next_day(&mut self) -> bool {
        if self.days.len() >= MAX_SCHEDULED_DAYS {
            return false;
        }
        let Some(date) = self.calendar.next_day() else {
            return false;
        };
        self.days.push(DaySchedule {
            date,
            blocks: Vec::new(),
            total_minutes: 0,
        });
        self.offset = 0;
        true
    }

    // Append a block at the cursor; returns (day index, block index).
    fn push_block(&mut self, task: &Task, minutes: u32) -> Option<(usize, usize)> {
        let day_index = self.days.len().checked_sub(1)?;
        let day = &mut self.days[day_index];

        let start_time =
            day.date.and_time(self.window.start) + Duration::minutes(i64::from(self.offset));
        let end_time = start_time + Duration::minutes(i64::from(minutes));

        day.blocks.push(TimeBlock {
            task_id: task.id.clone(),
            title: task.title.clone(),
            start_time,
            end_time,
            duration_minutes: minutes,
            split_info: None,
        });
        day.total_minutes += minutes;
        self.offset += minutes;

        Some((day_index, day.blocks.len() - 1))
    }

    /// Place `duration` minutes of `task`.
    ///
    /// Returns `Err(placed)` when the horizon ran out before the task was
    /// fully placed; `placed` is how much of it did land.
    fn place_task(&mut self, task: &Task, duration: u32, allow_split: bool) -> Result<(), u32> {
        if duration == 0 {
            if self.days.is_empty() && !self.open_next_day() {
                return Err(0);
            }
            self.push_block(task, 0);
            return Ok(());
        }

        let mut remaining = duration;
        let mut slices: Vec<(usize, usize)> = Vec::new();

        while remaining > 0 {
            let capacity = self.capacity();
            if capacity == 0 {
                if !self.open_next_day() {
                    break;
                }
                continue;
            }

            if remaining <= capacity {
                slices.extend(self.push_block(task, remaining));
                remaining = 0;
            } else if allow_split {
                slices.extend(self.push_block(task, capacity));
                remaining -= capacity;
            } else if !self.open_next_day() {
                // whole task moves on; what is left of today stays unused
                break;
            }
        }

        // part numbers are only final once the last slice is down
        if slices.len() > 1 {
            let total_parts = slices.len() as u32;
            for (i, (d, b)) in slices.iter().enumerate() {
                self.days[*d].blocks[*b].split_info = Some(SplitInfo {
                    part: i as u32 + 1,
                    total_parts,
                });
            }
        }

        if remaining == 0 {
            Ok(())
        } else {
            Err(duration - remaining)
        }
    }
}

fn unscheduled_warning(task: &Task, minutes: u32, reason: &str) -> String {
    format!(
        "Task \"{}\" ({}) could not be scheduled: {}",
        task.title,
        format_duration(minutes),
        reason
    )
}

/// Allocate `tasks` to calendar days under `config`.
///
/// Process:
/// - Walk eligible days from `start_date`, skipping weekends if asked
/// - Place tasks in their original order at a per-day cursor
/// - A task that does not fit what is left of a day either moves whole to
///   the next day or, with splitting on, fills the day and continues
/// - Tasks that can never fit are reported in `unscheduled_tasks`
///
/// An invalid config yields an empty result with a single warning.
pub fn schedule(tasks: &[Task], config: &SchedulingConfig) -> ScheduleResult {
    let window = match WorkWindow::from_config(config) {
        Ok(w) => w,
        Err(e) => {
            warn!(error = %e, "rejected scheduling config");
            return ScheduleResult {
                warnings: vec![format!("Invalid scheduling configuration: {e}")],
                ..ScheduleResult::default()
            };
        }
    };

    let mut warnings = Vec::new();
    if window.budget > window.width {
        warnings.push(format!(
            "Daily budget of {} exceeds the {} working window; the window limits each day",
            format_duration(window.budget),
            format_duration(window.width)
        ));
    }

    let mut builder = DayBuilder::new(window, config);
    let mut unscheduled = Vec::new();

    for task in tasks {
        let Some(duration) = task.user_defined_duration_minutes else {
            warnings.push(format!(
                "Task \"{}\" has no duration and could not be scheduled",
                task.title
            ));
            unscheduled.push(task.clone());
            continue;
        };

        if !config.allow_task_splitting && duration > window.day_limit() {
            warnings.push(unscheduled_warning(
                task,
                duration,
                &format!(
                    "longer than the {} available per day and splitting is off",
                    format_duration(window.day_limit())
                ),
            ));
            unscheduled.push(task.clone());
            continue;
        }

        if let Err(placed) = builder.place_task(task, duration, config.allow_task_splitting) {
            let reason = if placed > 0 {
                format!(
                    "scheduling horizon reached after placing {}",
                    format_duration(placed)
                )
            } else {
                "scheduling horizon reached".to_string()
            };
            warnings.push(unscheduled_warning(task, duration, &reason));
            unscheduled.push(task.clone());
        }
    }

    let days = builder.days;
    let scheduled_blocks: Vec<TimeBlock> =
        days.iter().flat_map(|d| d.blocks.iter().cloned()).collect();

    debug!(
        tasks = tasks.len(),
        days = days.len(),
        blocks = scheduled_blocks.len(),
        unscheduled = unscheduled.len(),
        "built schedule"
    );

    ScheduleResult {
        total_days: days.len(),
        days,
        scheduled_blocks,
        unscheduled_tasks: unscheduled,
        warnings,
    }
}
