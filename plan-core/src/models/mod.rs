//! Domain models for plan consolidation.
//!
//! # Core Concepts
//!
//! ## Source Records
//!
//! - [`Requirement`]: A row of the gap register, a required capability with effort estimates.
//! - [`SprintTask`]: A task found in a sprint plan, carrying the sprint's schedule window.
//!
//! ## Produced Records
//!
//! - [`Activity`]: A row of the consolidated plan. Each requirement expands into one,
//!   two or four activities depending on how it is covered and whether it was scheduled.
//! - [`MatchRecord`]: Audit entry describing which sprint task a requirement was matched to.

mod activity;
mod match_record;
mod requirement;
mod sprint_task;

pub use activity::*;
pub use match_record::*;
pub use requirement::*;
pub use sprint_task::*;
