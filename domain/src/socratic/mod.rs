//! Socratic domain
//!
//! A thinker answers a question; a questioner scores the answer on five
//! dimensions and asks a follow-up. The loop
//! `evaluate → (continue ? refine : stop)` ends when the quality evaluator
//! reports the answer satisfied, stagnated, or out of rounds.

pub mod evaluation;
pub mod evaluator;
pub mod session;

pub use evaluation::{Dimension, Evaluation, ScoreOutOfRange};
pub use evaluator::{Decision, MAX_SOCRATIC_ROUNDS, QualityPolicy, Verdict, decide};
pub use session::{Answer, BestAnswer, QaEntry, SocraticSession};
