//! Command execution and change planning.
//!
//! The executor is the only thing that sends configuration commands to a
//! switch; the planner decides which ones.

mod executor;
mod plan;

pub use executor::{CommandExecutor, RunMode};
pub use plan::{ChangePlan, PlannedCommand, apply, plan};
