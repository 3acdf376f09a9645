//! Round scheduling rules.
//!
//! Pure functions deciding who speaks when and which actions a speaker may
//! take. The async driver in the application layer only sequences calls;
//! every ordering and admission rule lives here so it can be tested without
//! a worker.

use super::utterance::{ActionKind, Utterance};
use crate::core::participant::ParticipantId;
use crate::session::Phase;
use crate::worker::TurnAction;
use serde::{Deserialize, Serialize};

/// Number of debate rounds; also the loop's hard ceiling
pub const DEBATE_ROUNDS: u32 = 3;

/// Phase sequence of a debate
pub const DEBATE_PHASES: [Phase; 4] = [
    Phase::Research,
    Phase::Preparation,
    Phase::Debate,
    Phase::Conclusion,
];

/// Speaking order of `round` (1-indexed).
///
/// The canonical order left-rotated by `round - 1` positions, so with
/// `[A, B, C]` the rounds are `[A, B, C]`, `[B, C, A]`, `[C, A, B]` and every
/// participant opens one round and closes one round.
pub fn speaker_order(canonical: &[ParticipantId], round: u32) -> Vec<ParticipantId> {
    let mut order = canonical.to_vec();
    if order.is_empty() || round == 0 {
        return order;
    }
    let shift = (round as usize - 1) % order.len();
    order.rotate_left(shift);
    order
}

pub fn is_final_round(round: u32) -> bool {
    round == DEBATE_ROUNDS
}

/// Actions a speaker may take.
///
/// Nothing can be defended before somebody else has spoken in the round.
pub fn allowed_actions(round_has_prior: bool) -> &'static [ActionKind] {
    if round_has_prior {
        &[ActionKind::Attack, ActionKind::Support, ActionKind::Defend]
    } else {
        &[ActionKind::Attack, ActionKind::Support]
    }
}

/// Whether anyone spoke before `turn` in `round`
pub fn round_has_prior(history: &[Utterance], round: u32, turn: u32) -> bool {
    history.iter().any(|u| u.round == round && u.turn < turn)
}

/// One scheduled turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSlot {
    pub round: u32,
    /// 0-based position in the round's speaking order
    pub turn: u32,
    pub speaker: ParticipantId,
    pub is_final: bool,
}

/// The turns of `round` in dispatch order
pub fn round_slots(canonical: &[ParticipantId], round: u32) -> Vec<TurnSlot> {
    speaker_order(canonical, round)
        .into_iter()
        .enumerate()
        .map(|(turn, speaker)| TurnSlot {
            round,
            turn: turn as u32,
            speaker,
            is_final: is_final_round(round),
        })
        .collect()
}

/// A scheduler-enforced change to a worker's chosen action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coercion {
    pub round: u32,
    pub turn: u32,
    pub speaker: ParticipantId,
    pub from: ActionKind,
    pub to: ActionKind,
    pub reason: String,
}

/// A worker's turn after admission: legal utterances plus what was changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdmittedTurn {
    pub utterances: Vec<Utterance>,
    pub coercions: Vec<Coercion>,
    /// Targets that named an unknown participant or the speaker itself
    pub dropped_targets: Vec<String>,
}

/// Turn the raw actions of one turn into legal utterances.
///
/// * Targets naming the speaker or a non-member are dropped.
/// * A `defend` with nothing earlier in the round to defend against becomes
///   an `attack`. `round_has_prior` covers every action of the turn, so the
///   speaker's own earlier actions never make a `defend` legal. The coerced attack keeps its target when valid, otherwise
///   it aims at the next speaker in `order`.
pub fn admit_turn(
    slot: &TurnSlot,
    actions: &[TurnAction],
    order: &[ParticipantId],
    round_has_prior: bool,
) -> AdmittedTurn {
    let mut admitted = AdmittedTurn::default();
    let allowed = allowed_actions(round_has_prior);

    for action in actions {
        let mut target = None;
        if let Some(raw) = action.target.as_deref() {
            match order.iter().find(|p| p.as_str() == raw.trim()) {
                Some(p) if *p != slot.speaker => target = Some(p.clone()),
                _ => admitted.dropped_targets.push(raw.to_string()),
            }
        }

        let mut kind = action.kind;
        if !allowed.contains(&kind) {
            kind = ActionKind::Attack;
            if target.is_none() {
                target = next_speaker(order, &slot.speaker);
            }
            admitted.coercions.push(Coercion {
                round: slot.round,
                turn: slot.turn,
                speaker: slot.speaker.clone(),
                from: action.kind,
                to: kind,
                reason: "no earlier utterance in this round to defend against".into(),
            });
        }

        let mut utterance = Utterance::new(
            slot.round,
            slot.turn,
            slot.speaker.clone(),
            kind,
            action.content.clone(),
            action.key_point.clone(),
        );
        utterance.target = target;
        utterance.target_point = action
            .target_point
            .as_ref()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        admitted.utterances.push(utterance);
    }

    admitted
}

fn next_speaker(order: &[ParticipantId], speaker: &ParticipantId) -> Option<ParticipantId> {
    let pos = order.iter().position(|p| p == speaker)?;
    let next = &order[(pos + 1) % order.len()];
    (next != speaker).then(|| next.clone())
}
