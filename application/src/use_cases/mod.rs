//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod resolve_providers;
pub mod run_debate;
pub mod run_socratic;
pub(crate) mod shared;

#[cfg(test)]
mod test_support;
