//! Core domain concepts shared across all subdomains.
//!
//! - [`participant::ParticipantId`]: opaque, session-stable worker identifier
//! - [`participant::Viewpoint`]: the stance bound to a debater at session start
//! - [`topic::Topic`]: a validated debate topic or Socratic question
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod participant;
pub mod string;
pub mod topic;
