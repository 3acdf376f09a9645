//! Context broker: builds the exact request each worker call receives.
//!
//! Every function here is a pure function of the session and the call
//! position. Visibility rules:
//!
//! | Call | Sees |
//! |------|------|
//! | research | topic, own viewpoint |
//! | preparation | own research, every *other* debater's research |
//! | debate round r, turn k | own research and preparation, utterances before `(r, k)` |
//! | initial analysis | the question |
//! | evaluate | question, current answer, QA history |
//! | refine | question, previous answer, newest follow-up, QA history |
//!
//! A worker never sees another worker's preparation, and never sees another
//! worker's research outside preparation.

use crate::core::error::DomainError;
use crate::core::participant::{ParticipantId, Role};
use crate::debate::schedule::{TurnSlot, allowed_actions, round_has_prior};
use crate::debate::{DebateSession, Participant};
use crate::session::Phase;
use crate::socratic::{Dimension, SocraticSession};
use crate::worker::{
    Constraints, OwnArtifacts, PeerResearch, ResponseSchema, VisibleContext, WorkerRequest,
};

fn member<'a>(
    session: &'a DebateSession,
    participant: &ParticipantId,
) -> Result<&'a Participant, DomainError> {
    session
        .participant(participant)
        .ok_or_else(|| DomainError::UnknownParticipant(participant.clone()))
}

fn debate_request(p: &Participant, session: &DebateSession, phase: Phase) -> WorkerRequest {
    WorkerRequest {
        participant: p.id.clone(),
        role: Role::Debater,
        phase,
        round: None,
        turn: None,
        topic: session.topic().content().to_string(),
        viewpoint: Some(p.viewpoint.as_str().to_string()),
        expected_schema: schema_for(phase),
        constraints: Constraints {
            allow_search: phase.allows_search(),
            ..Default::default()
        },
        own_artifacts: OwnArtifacts::default(),
        visible: VisibleContext::Nothing,
        clarification: None,
    }
}

fn schema_for(phase: Phase) -> ResponseSchema {
    ResponseSchema::for_phase(phase).unwrap_or(ResponseSchema::Answer)
}

/// Research: topic and own viewpoint only
pub fn research_request(
    session: &DebateSession,
    participant: &ParticipantId,
) -> Result<WorkerRequest, DomainError> {
    let p = member(session, participant)?;
    Ok(debate_request(p, session, Phase::Research))
}

/// Preparation: own research plus the verbatim research of every other debater
pub fn preparation_request(
    session: &DebateSession,
    participant: &ParticipantId,
) -> Result<WorkerRequest, DomainError> {
    let p = member(session, participant)?;
    let peers = session
        .participants()
        .iter()
        .filter(|other| other.id != p.id)
        .filter_map(|other| {
            session.research(&other.id).map(|research| PeerResearch {
                participant: other.id.clone(),
                viewpoint: other.viewpoint.as_str().to_string(),
                research: research.clone(),
            })
        })
        .collect();

    let mut request = debate_request(p, session, Phase::Preparation);
    request.own_artifacts.research = session.research(&p.id).cloned();
    request.visible = VisibleContext::PeerResearch { peers };
    Ok(request)
}

/// Debate turn: own artifacts plus every utterance emitted before the slot.
///
/// Later utterances are filtered out even if the session already holds them.
pub fn turn_request(session: &DebateSession, slot: &TurnSlot) -> Result<WorkerRequest, DomainError> {
    let p = member(session, &slot.speaker)?;
    let utterances = session
        .history()
        .iter()
        .filter(|u| u.precedes(slot.round, slot.turn))
        .cloned()
        .collect();
    let has_prior = round_has_prior(session.history(), slot.round, slot.turn);

    let mut request = debate_request(p, session, Phase::Debate);
    request.round = Some(slot.round);
    request.turn = Some(slot.turn);
    request.constraints = Constraints {
        allowed_actions: allowed_actions(has_prior).to_vec(),
        is_final: slot.is_final,
        propose_consensus: slot.is_final,
        allow_search: false,
        target_dimension: None,
    };
    request.own_artifacts = OwnArtifacts {
        research: session.research(&p.id).cloned(),
        preparation: session.preparation(&p.id).cloned(),
    };
    request.visible = VisibleContext::DebateHistory { utterances };
    Ok(request)
}

fn socratic_request(
    session: &SocraticSession,
    participant: &ParticipantId,
    role: Role,
    phase: Phase,
) -> WorkerRequest {
    WorkerRequest {
        participant: participant.clone(),
        role,
        phase,
        round: (session.round() > 0).then_some(session.round()),
        turn: None,
        topic: session.question().content().to_string(),
        viewpoint: None,
        expected_schema: schema_for(phase),
        constraints: Constraints::default(),
        own_artifacts: OwnArtifacts::default(),
        visible: VisibleContext::Nothing,
        clarification: None,
    }
}

/// Initial analysis: the question alone
pub fn initial_analysis_request(session: &SocraticSession, allow_search: bool) -> WorkerRequest {
    let mut request = socratic_request(
        session,
        session.thinker(),
        Role::Thinker,
        Phase::InitialAnalysis,
    );
    request.constraints.allow_search = allow_search;
    request
}

/// Evaluate: question, current answer and the full QA history
pub fn evaluate_request(session: &SocraticSession) -> Result<WorkerRequest, DomainError> {
    let answer = session
        .current_answer()
        .ok_or_else(|| DomainError::CorruptSession("evaluate requested before any answer".into()))?;

    let mut request = socratic_request(session, session.questioner(), Role::Questioner, Phase::Evaluate);
    request.visible = VisibleContext::QaLoop {
        answer: Some(answer.clone()),
        follow_up: None,
        qa_history: session.qa_history().to_vec(),
    };
    Ok(request)
}

/// Refine: question, previous answer, newest follow-up and the full QA history
pub fn refine_request(
    session: &SocraticSession,
    target: Dimension,
    allow_search: bool,
) -> Result<WorkerRequest, DomainError> {
    let answer = session
        .current_answer()
        .ok_or_else(|| DomainError::CorruptSession("refine requested before any answer".into()))?;

    let mut request = socratic_request(session, session.thinker(), Role::Thinker, Phase::Refine);
    request.constraints.target_dimension = Some(target);
    request.constraints.allow_search = allow_search;
    request.visible = VisibleContext::QaLoop {
        answer: Some(answer.clone()),
        follow_up: session.latest_follow_up().map(str::to_string),
        qa_history: session.qa_history().to_vec(),
    };
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::topic::Topic;
    use crate::debate::schedule::round_slots;
    use crate::debate::{ActionKind, PlannedAttack, PreparationRecord, ResearchRecord, Utterance};
    use crate::socratic::{Answer, Evaluation};

    fn id(s: &str) -> ParticipantId {
        s.parse().unwrap()
    }

    fn debate() -> DebateSession {
        let mut s = DebateSession::new(
            Topic::new("Monolith vs microservices").unwrap(),
            vec![
                Participant::new(id("A"), "Monolith first"),
                Participant::new(id("B"), "Microservices"),
                Participant::new(id("C"), "Modular monolith"),
            ],
        )
        .unwrap();
        for name in ["A", "B", "C"] {
            s.record_research(&id(name), ResearchRecord::new(format!("{} thesis", name)))
                .unwrap();
            s.record_preparation(
                &id(name),
                PreparationRecord {
                    attacks: vec![PlannedAttack {
                        target: "X".into(),
                        point: format!("{} secret plan", name),
                        strategy: String::new(),
                    }],
                    ..Default::default()
                },
            )
            .unwrap();
        }
        s
    }

    #[test]
    fn test_research_sees_only_topic_and_viewpoint() {
        let s = debate();
        let request = research_request(&s, &id("B")).unwrap();
        assert_eq!(request.viewpoint.as_deref(), Some("Microservices"));
        assert_eq!(request.own_artifacts, OwnArtifacts::default());
        assert_eq!(request.visible, VisibleContext::Nothing);
        assert!(request.constraints.allow_search);
    }

    #[test]
    fn test_preparation_sees_peer_research_not_own() {
        let s = debate();
        let request = preparation_request(&s, &id("A")).unwrap();
        let VisibleContext::PeerResearch { peers } = &request.visible else {
            panic!("expected peer research");
        };
        let names: Vec<_> = peers.iter().map(|p| p.participant.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
        assert_eq!(
            request.own_artifacts.research.as_ref().unwrap().core_thesis,
            "A thesis"
        );
        assert!(request.own_artifacts.preparation.is_none());
    }

    #[test]
    fn test_turn_hides_later_utterances() {
        let mut s = debate();
        s.begin_phase(Phase::Debate, 1).unwrap();
        for (turn, name) in ["A", "B", "C"].iter().enumerate() {
            s.append_utterance(Utterance::new(
                1,
                turn as u32,
                id(name),
                ActionKind::Support,
                "c",
                "k",
            ))
            .unwrap();
        }

        let slots = round_slots(&s.canonical_order(), 1);
        let request = turn_request(&s, &slots[1]).unwrap();
        let seen: Vec<_> = request
            .visible
            .utterances()
            .iter()
            .map(|u| u.speaker.as_str())
            .collect();
        assert_eq!(seen, vec!["A"]);
        assert!(request.constraints.allowed_actions.contains(&ActionKind::Defend));

        let first = turn_request(&s, &slots[0]).unwrap();
        assert!(first.visible.utterances().is_empty());
        assert!(!first.constraints.allowed_actions.contains(&ActionKind::Defend));
    }

    #[test]
    fn test_turn_never_leaks_other_preparation() {
        let s = debate();
        let slot = &round_slots(&s.canonical_order(), 1)[0];
        let json = turn_request(&s, slot).unwrap().to_json().unwrap();
        assert!(json.contains("A secret plan"));
        assert!(!json.contains("B secret plan"));
        assert!(!json.contains("B thesis"));
    }

    #[test]
    fn test_final_round_invites_consensus() {
        let s = debate();
        let slot = &round_slots(&s.canonical_order(), 3)[0];
        let request = turn_request(&s, slot).unwrap();
        assert!(request.constraints.is_final);
        assert!(request.constraints.propose_consensus);
    }

    #[test]
    fn test_refine_carries_latest_follow_up() {
        let mut s = SocraticSession::new(
            Topic::new("Is TDD worth it?").unwrap(),
            ParticipantId::thinker(),
            ParticipantId::questioner(),
        )
        .unwrap();
        assert!(evaluate_request(&s).is_err());

        s.record_answer(Answer::new("Mostly yes", "yes")).unwrap();
        s.next_round().unwrap();
        let evaluate = evaluate_request(&s).unwrap();
        assert_eq!(evaluate.participant, ParticipantId::questioner());
        assert_eq!(evaluate.round, Some(1));

        s.record_evaluation(Evaluation::uniform(0.5).unwrap(), "What about legacy code?")
            .unwrap();
        let refine = refine_request(&s, Dimension::Depth, false).unwrap();
        let VisibleContext::QaLoop {
            answer,
            follow_up,
            qa_history,
        } = &refine.visible
        else {
            panic!("expected QA view");
        };
        assert_eq!(answer.as_ref().unwrap().answer, "Mostly yes");
        assert_eq!(follow_up.as_deref(), Some("What about legacy code?"));
        assert_eq!(qa_history.len(), 1);
        assert_eq!(refine.constraints.target_dimension, Some(Dimension::Depth));
    }
}
