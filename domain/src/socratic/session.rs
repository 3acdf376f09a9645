//! Socratic session state (Entity)

use super::evaluation::Evaluation;
use super::evaluator::Verdict;
use crate::core::error::DomainError;
use crate::core::participant::ParticipantId;
use crate::core::topic::Topic;
use crate::session::{Phase, PhaseFailure, TerminationState};
use serde::{Deserialize, Serialize};

/// The thinker's answer to the question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    /// One or two sentence digest used in the QA history
    #[serde(default)]
    pub summary: String,
}

impl Answer {
    pub fn new(answer: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            summary: summary.into(),
        }
    }

    /// The summary, or a shortened answer when the worker gave none
    pub fn digest(&self) -> String {
        if self.summary.trim().is_empty() {
            crate::core::string::truncate(&self.answer, 200)
        } else {
            self.summary.clone()
        }
    }
}

/// One evaluate step of the loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaEntry {
    pub round: u32,
    /// The follow-up question the questioner raised
    pub question: String,
    pub answer_summary: String,
    pub evaluation: Evaluation,
}

/// The highest-scoring answer seen so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestAnswer {
    pub round: u32,
    pub average: f64,
    pub answer: Answer,
}

/// The state of one Socratic run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocraticSession {
    question: Topic,
    thinker: ParticipantId,
    questioner: ParticipantId,
    phase: Option<Phase>,
    round: u32,
    current_answer: Option<Answer>,
    qa_history: Vec<QaEntry>,
    score_history: Vec<f64>,
    verdicts: Vec<Verdict>,
    best: Option<BestAnswer>,
    failures: Vec<PhaseFailure>,
    termination: TerminationState,
}

impl SocraticSession {
    pub fn new(
        question: Topic,
        thinker: ParticipantId,
        questioner: ParticipantId,
    ) -> Result<Self, DomainError> {
        if thinker == questioner {
            return Err(DomainError::DuplicateParticipant(thinker));
        }
        Ok(Self {
            question,
            thinker,
            questioner,
            phase: None,
            round: 0,
            current_answer: None,
            qa_history: Vec::new(),
            score_history: Vec::new(),
            verdicts: Vec::new(),
            best: None,
            failures: Vec::new(),
            termination: TerminationState::Running,
        })
    }

    pub fn question(&self) -> &Topic {
        &self.question
    }

    pub fn thinker(&self) -> &ParticipantId {
        &self.thinker
    }

    pub fn questioner(&self) -> &ParticipantId {
        &self.questioner
    }

    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn current_answer(&self) -> Option<&Answer> {
        self.current_answer.as_ref()
    }

    pub fn qa_history(&self) -> &[QaEntry] {
        &self.qa_history
    }

    /// Averages of every recorded evaluation, oldest first
    pub fn score_history(&self) -> &[f64] {
        &self.score_history
    }

    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    pub fn best_answer(&self) -> Option<&BestAnswer> {
        self.best.as_ref()
    }

    /// The newest follow-up question, if any evaluation produced one
    pub fn latest_follow_up(&self) -> Option<&str> {
        self.qa_history
            .last()
            .map(|e| e.question.as_str())
            .filter(|q| !q.trim().is_empty())
    }

    pub fn failures(&self) -> &[PhaseFailure] {
        &self.failures
    }

    pub fn termination(&self) -> TerminationState {
        self.termination
    }

    pub fn begin_phase(&mut self, phase: Phase) -> Result<(), DomainError> {
        self.ensure_running()?;
        self.phase = Some(phase);
        Ok(())
    }

    /// Advance to the next loop round
    pub fn next_round(&mut self) -> Result<u32, DomainError> {
        self.ensure_running()?;
        self.round += 1;
        Ok(self.round)
    }

    pub fn record_answer(&mut self, answer: Answer) -> Result<(), DomainError> {
        self.ensure_running()?;
        self.current_answer = Some(answer);
        Ok(())
    }

    /// Record the evaluation of the current answer in the current round.
    ///
    /// The best answer only moves on a strictly higher average, so the
    /// earliest of equally good answers is kept.
    pub fn record_evaluation(
        &mut self,
        evaluation: Evaluation,
        follow_up: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.ensure_running()?;
        let Some(answer) = self.current_answer.clone() else {
            return Err(DomainError::CorruptSession(
                "evaluation recorded before any answer".into(),
            ));
        };
        if self.qa_history.last().is_some_and(|e| e.round == self.round) {
            return Err(DomainError::CorruptSession(format!(
                "round {} evaluated twice",
                self.round
            )));
        }

        let average = evaluation.average();
        self.qa_history.push(QaEntry {
            round: self.round,
            question: follow_up.into(),
            answer_summary: answer.digest(),
            evaluation,
        });
        self.score_history.push(average);

        if self.best.as_ref().is_none_or(|b| average > b.average) {
            self.best = Some(BestAnswer {
                round: self.round,
                average,
                answer,
            });
        }
        Ok(())
    }

    pub fn record_verdict(&mut self, verdict: Verdict) {
        self.verdicts.push(verdict);
    }

    pub fn record_failure(&mut self, failure: PhaseFailure) {
        self.failures.push(failure);
    }

    /// Leave the running state. A second call is a corruption.
    pub fn terminate(&mut self, state: TerminationState) -> Result<(), DomainError> {
        if state.is_running() {
            return Err(DomainError::CorruptSession(
                "cannot terminate into the running state".into(),
            ));
        }
        self.ensure_running()?;
        self.termination = state;
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), DomainError> {
        if self.termination.is_running() {
            Ok(())
        } else {
            Err(DomainError::SessionTerminated(self.termination))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SocraticSession {
        SocraticSession::new(
            Topic::new("What makes an API easy to misuse?").unwrap(),
            ParticipantId::thinker(),
            ParticipantId::questioner(),
        )
        .unwrap()
    }

    #[test]
    fn test_thinker_and_questioner_must_differ() {
        let result = SocraticSession::new(
            Topic::new("q").unwrap(),
            ParticipantId::thinker(),
            ParticipantId::thinker(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_evaluation_requires_answer() {
        let mut s = session();
        s.next_round().unwrap();
        let err = s.record_evaluation(Evaluation::uniform(0.5).unwrap(), "why?");
        assert!(matches!(err, Err(DomainError::CorruptSession(_))));
    }

    #[test]
    fn test_best_answer_tracks_highest_average() {
        let mut s = session();
        s.record_answer(Answer::new("first", "v1")).unwrap();
        s.next_round().unwrap();
        s.record_evaluation(Evaluation::uniform(0.6).unwrap(), "q1").unwrap();

        s.record_answer(Answer::new("second", "v2")).unwrap();
        s.next_round().unwrap();
        s.record_evaluation(Evaluation::uniform(0.4).unwrap(), "q2").unwrap();

        s.record_answer(Answer::new("third", "v3")).unwrap();
        s.next_round().unwrap();
        s.record_evaluation(Evaluation::uniform(0.6).unwrap(), "q3").unwrap();

        let best = s.best_answer().unwrap();
        assert_eq!(best.answer.answer, "first");
        assert_eq!(best.round, 1);
        assert_eq!(s.score_history().len(), 3);
        assert_eq!(s.latest_follow_up(), Some("q3"));
    }

    #[test]
    fn test_round_evaluated_once() {
        let mut s = session();
        s.record_answer(Answer::new("a", "")).unwrap();
        s.next_round().unwrap();
        s.record_evaluation(Evaluation::uniform(0.5).unwrap(), "q").unwrap();
        assert!(s.record_evaluation(Evaluation::uniform(0.5).unwrap(), "q").is_err());
    }

    #[test]
    fn test_digest_falls_back_to_answer() {
        let answer = Answer::new("a long answer", " ");
        assert_eq!(answer.digest(), "a long answer");
    }

    #[test]
    fn test_terminated_session_rejects_answers() {
        let mut s = session();
        s.terminate(TerminationState::Stagnated).unwrap();
        assert!(s.record_answer(Answer::new("late", "")).is_err());
        assert!(s.terminate(TerminationState::Satisfied).is_err());
    }
}
