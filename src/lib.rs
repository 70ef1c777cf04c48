//! Plan-to-schedule pipeline.
//!
//! Turns a free-form plan annotated with duration tags into a day-by-day
//! calendar allocation. The core ([`duration`], [`parser`], [`validator`],
//! [`scheduler`], [`format`]) is pure and synchronous; the rest is the HTTP
//! and JSON-store shell around it.

// Core
pub mod duration; // Duration tag matching
pub mod format; // Minute formatting and day estimates
pub mod models; // Data structures (Task, ScheduleResult, Db, etc.)
pub mod parser; // Plan text -> tasks
pub mod pipeline; // parse -> validate -> schedule
pub mod scheduler; // Day-by-day allocation
pub mod validator; // Scheduling gate and duration policy

// Service shell
pub mod app; // Router and shared state
pub mod config; // Server configuration
pub mod error; // Store and HTTP errors
pub mod routes_plan; // Stateless preview endpoints
pub mod routes_plans; // Stored plans, timeline, settings
pub mod store; // Persistent storage (load/save db.json)

pub use parser::parse_plan;
pub use pipeline::plan_schedule;
pub use scheduler::schedule;
pub use validator::{DurationPolicy, resolve_durations, validate};
