//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`ExecutionParams`]: per-phase call budgets and the schema retry limit
//! - [`PhaseBudgets`]: how long a single worker call may take in each phase

pub mod execution_params;

pub use execution_params::{ExecutionParams, PhaseBudgets};
