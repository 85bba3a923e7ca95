//! Consolidates a requirements gap register with sprint plans into a project plan,
//! then keeps that plan's statuses current.
//!
//! The matching, expansion and reconciliation rules live in [`plan_core`]; this
//! crate adds configuration, tabular file I/O and the file-to-file passes.

pub mod config;
pub mod error;
pub mod passes;
pub mod tables;

pub use config::PlanConfig;
pub use error::PlanError;
pub use plan_core;
