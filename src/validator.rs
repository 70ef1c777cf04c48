//! Plan validation and duration resolution.
//!
//! The parser keeps "no tag found" (`None`) apart from an explicit zero so
//! the caller can pick a policy. [`resolve_durations`] applies that policy and
//! [`validate`] is the gate that decides whether scheduling may proceed.

use thiserror::Error;

use crate::models::Task;

/// Blocking problems found in a parsed plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("plan must contain at least one task")]
    EmptyPlan,

    #[error("task {task_id} ({title:?}) has no duration")]
    UnresolvedDuration { task_id: String, title: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Human-readable messages, one per error.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// What to do with tasks whose duration tag was not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationPolicy {
    /// Leave them unresolved; [`validate`] reports them as errors.
    #[default]
    Reject,
    /// Fill them with a fixed number of minutes.
    Default { minutes: u32 },
}

impl DurationPolicy {
    pub fn from_default_minutes(minutes: Option<u32>) -> Self {
        match minutes {
            Some(minutes) => DurationPolicy::Default { minutes },
            None => DurationPolicy::Reject,
        }
    }
}

/// Apply `policy` to unresolved tasks, returning a new task list.
pub fn resolve_durations(tasks: &[Task], policy: DurationPolicy) -> Vec<Task> {
    tasks
        .iter()
        .map(|t| match (t.user_defined_duration_minutes, policy) {
            (None, DurationPolicy::Default { minutes }) => Task {
                user_defined_duration_minutes: Some(minutes),
                ..t.clone()
            },
            _ => t.clone(),
        })
        .collect()
}

/// Check that `tasks` can be handed to the scheduler.
///
/// Valid iff there is at least one task and every task has a resolved
/// duration. Tasks are not modified.
pub fn validate(tasks: &[Task]) -> ValidationReport {
    let mut errors = Vec::new();

    if tasks.is_empty() {
        errors.push(ValidationError::EmptyPlan);
    }

    errors.extend(
        tasks
            .iter()
            .filter(|t| t.user_defined_duration_minutes.is_none())
            .map(|t| ValidationError::UnresolvedDuration {
                task_id: t.id.clone(),
                title: t.title.clone(),
            }),
    );

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, minutes: Option<u32>) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Title {id}"),
            description: String::new(),
            user_defined_duration_minutes: minutes,
        }
    }

    #[test]
    fn empty_plan_is_invalid() {
        let report = validate(&[]);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec![ValidationError::EmptyPlan]);
        assert_eq!(report.messages(), vec!["plan must contain at least one task"]);
    }

    #[test]
    fn unresolved_duration_is_blocking() {
        let tasks = vec![task("task-1", Some(30)), task("task-2", None)];
        let report = validate(&tasks);
        assert!(!report.is_valid);
        assert!(matches!(
            &report.errors[..],
            [ValidationError::UnresolvedDuration { task_id, .. }] if task_id == "task-2"
        ));
    }

    #[test]
    fn zero_duration_is_valid() {
        let report = validate(&[task("task-1", Some(0))]);
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn default_policy_fills_only_missing() {
        let tasks = vec![task("task-1", Some(0)), task("task-2", None)];
        let resolved = resolve_durations(&tasks, DurationPolicy::Default { minutes: 30 });
        assert_eq!(resolved[0].user_defined_duration_minutes, Some(0));
        assert_eq!(resolved[1].user_defined_duration_minutes, Some(30));
        assert!(validate(&resolved).is_valid);
        // input untouched
        assert_eq!(tasks[1].user_defined_duration_minutes, None);
    }

    #[test]
    fn reject_policy_leaves_tasks_unresolved() {
        let tasks = vec![task("task-1", None)];
        let resolved = resolve_durations(&tasks, DurationPolicy::Reject);
        assert_eq!(resolved, tasks);
        assert!(!validate(&resolved).is_valid);
    }

    #[test]
    fn policy_from_optional_minutes() {
        assert_eq!(DurationPolicy::from_default_minutes(None), DurationPolicy::Reject);
        assert_eq!(
            DurationPolicy::from_default_minutes(Some(15)),
            DurationPolicy::Default { minutes: 15 }
        );
    }
}
