//! Decision adapters for unresolved debate points

pub mod interactive;

pub use interactive::InteractiveDecision;
