//! Core of the plan consolidator.
//!
//! Turns a requirements gap register and a set of sprint plans into activity
//! rows, and corrects those rows as time passes:
//!
//! 1. [`index::TaskIndex`] collects sprint tasks by name.
//! 2. [`matcher::Matcher`] finds the best task for each requirement using
//!    [`similarity`] scores.
//! 3. [`expand`] splits each requirement into dated stages, or a backlog row.
//! 4. [`reconcile`] recomputes statuses from planned dates.
//! 5. [`overrides`] applies curated corrections and expands leftover backlog.
//!
//! The crate does no file I/O; reading and writing tables is the caller's job.

pub mod dates;
pub mod expand;
pub mod index;
pub mod matcher;
pub mod models;
pub mod numbers;
pub mod overrides;
pub mod reconcile;
pub mod similarity;

pub use index::TaskIndex;
pub use matcher::{MatchResult, Matcher};
pub use overrides::{OverrideTable, OverrideTableError};
pub use similarity::ScoringMode;
