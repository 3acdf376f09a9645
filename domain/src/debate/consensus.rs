//! Consensus extraction over a finished debate.
//!
//! Derived, never stored: running [`extract_consensus`] twice over the same
//! history yields the same report.

use super::utterance::{ActionKind, StanceSummary, Utterance};
use crate::core::participant::ParticipantId;
use crate::core::string::normalize_claim;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A point nobody attacked and at least two participants stood behind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusPoint {
    /// First spelling seen in the history
    pub point: String,
    /// Participants who asserted or supported it
    pub backers: Vec<ParticipantId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// Attacked and never defended by the attacked participant
    UnansweredAttack,
    /// One final stance endorses it while another rejects it
    DivergentStances,
}

/// A point the debate left open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedPoint {
    pub point: String,
    pub reasons: Vec<UnresolvedReason>,
    /// Participants who asserted it as a key point
    pub owners: Vec<ParticipantId>,
    /// Participants with an unanswered attack on it
    pub attackers: Vec<ParticipantId>,
}

/// Outcome of the conclusion phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusReport {
    pub agreed: Vec<ConsensusPoint>,
    pub unresolved: Vec<UnresolvedPoint>,
    /// Single-owner or successfully defended points
    pub standing: Vec<ConsensusPoint>,
}

impl ConsensusReport {
    pub fn has_unresolved(&self) -> bool {
        !self.unresolved.is_empty()
    }
}

struct Attack {
    index: usize,
    attacker: ParticipantId,
    attacked: Vec<ParticipantId>,
}

#[derive(Default)]
struct PointState {
    display: String,
    owners: BTreeSet<ParticipantId>,
    supporters: BTreeSet<ParticipantId>,
    attacks: Vec<Attack>,
}

impl PointState {
    /// Record `u`, spoken at `index`, as a reaction to this point
    fn react(&mut self, index: usize, u: &Utterance) {
        match u.action {
            ActionKind::Support => {
                self.supporters.insert(u.speaker.clone());
            }
            ActionKind::Attack => {
                let attacked = match &u.target {
                    Some(t) => vec![t.clone()],
                    None => self
                        .owners
                        .iter()
                        .filter(|o| **o != u.speaker)
                        .cloned()
                        .collect(),
                };
                self.attacks.push(Attack {
                    index,
                    attacker: u.speaker.clone(),
                    attacked,
                });
            }
            ActionKind::Defend => {}
        }
    }
}

/// Key point `target` raises first after `index`, within the same round
fn upcoming_key(history: &[Utterance], index: usize, target: &ParticipantId) -> Option<String> {
    let round = history[index].round;
    history[index + 1..]
        .iter()
        .take_while(|later| later.round == round)
        .find(|later| later.speaker == *target)
        .map(|later| normalize_claim(&later.key_point))
        .filter(|key| !key.is_empty())
}

/// Points in order of first appearance, keyed by normalised text
#[derive(Default)]
struct PointTable {
    order: Vec<String>,
    points: HashMap<String, PointState>,
}

impl PointTable {
    /// Register a point and return its key (None for blank text)
    fn touch(&mut self, text: &str) -> Option<String> {
        let key = normalize_claim(text);
        if key.is_empty() {
            return None;
        }
        if !self.points.contains_key(&key) {
            self.order.push(key.clone());
            self.points.insert(
                key.clone(),
                PointState {
                    display: text.trim().to_string(),
                    ..Default::default()
                },
            );
        }
        Some(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut PointState> {
        self.points.get_mut(key)
    }
}

/// Classify every point raised in `history` as agreed, unresolved or standing.
pub fn extract_consensus(history: &[Utterance], stances: &[StanceSummary]) -> ConsensusReport {
    let mut table = PointTable::default();
    let mut latest_key: HashMap<&ParticipantId, String> = HashMap::new();
    let mut forward: Vec<(usize, String)> = Vec::new();

    for (index, u) in history.iter().enumerate() {
        let own_key = table.touch(&u.key_point);
        if let Some(key) = &own_key
            && let Some(state) = table.get_mut(key)
        {
            state.owners.insert(u.speaker.clone());
        }

        let target_key = match (&u.target_point, &u.target) {
            (Some(point), _) => table.touch(point),
            (None, Some(target)) => match latest_key.get(target) {
                Some(key) => Some(key.clone()),
                None => {
                    // Target speaks later this round: resolve once the loop has seen it
                    if let Some(key) = upcoming_key(history, index, target) {
                        forward.push((index, key));
                    }
                    None
                }
            },
            (None, None) => None,
        };

        if let Some(key) = target_key
            && let Some(state) = table.get_mut(&key)
        {
            state.react(index, u);
        }

        if let Some(key) = own_key {
            latest_key.insert(&u.speaker, key);
        }
    }

    for (index, key) in forward {
        if let Some(state) = table.get_mut(&key) {
            state.react(index, &history[index]);
        }
    }

    let mut endorsed: HashMap<String, BTreeSet<&ParticipantId>> = HashMap::new();
    let mut rejected: HashMap<String, BTreeSet<&ParticipantId>> = HashMap::new();
    for stance in stances {
        for text in &stance.endorsed_points {
            if let Some(key) = table.touch(text) {
                endorsed.entry(key).or_default().insert(&stance.participant);
            }
        }
        for text in &stance.rejected_points {
            if let Some(key) = table.touch(text) {
                rejected.entry(key).or_default().insert(&stance.participant);
            }
        }
    }

    let mut report = ConsensusReport::default();
    for key in &table.order {
        let Some(state) = table.points.get(key) else {
            continue;
        };

        let unanswered: BTreeSet<ParticipantId> = state
            .attacks
            .iter()
            .filter(|attack| !is_answered(attack, key, history))
            .map(|attack| attack.attacker.clone())
            .collect();

        let diverges = match (endorsed.get(key), rejected.get(key)) {
            (Some(yes), Some(no)) => yes.iter().any(|p| no.iter().any(|q| p != q)),
            _ => false,
        };

        let mut reasons = Vec::new();
        if !unanswered.is_empty() {
            reasons.push(UnresolvedReason::UnansweredAttack);
        }
        if diverges {
            reasons.push(UnresolvedReason::DivergentStances);
        }

        if !reasons.is_empty() {
            report.unresolved.push(UnresolvedPoint {
                point: state.display.clone(),
                reasons,
                owners: state.owners.iter().cloned().collect(),
                attackers: unanswered.into_iter().collect(),
            });
            continue;
        }

        let backers: Vec<ParticipantId> = state
            .owners
            .union(&state.supporters)
            .cloned()
            .collect();
        let point = ConsensusPoint {
            point: state.display.clone(),
            backers,
        };
        if state.attacks.is_empty() && point.backers.len() >= 2 {
            report.agreed.push(point);
        } else if !point.backers.is_empty() || !state.attacks.is_empty() {
            report.standing.push(point);
        }
    }

    report
}

/// An attack counts as answered once an attacked participant defends
/// afterwards, aimed at the attacker, at this point, or at nothing in
/// particular.
fn is_answered(attack: &Attack, key: &str, history: &[Utterance]) -> bool {
    history[attack.index + 1..].iter().any(|later| {
        later.action == ActionKind::Defend
            && attack.attacked.contains(&later.speaker)
            && match (&later.target, &later.target_point) {
                (_, Some(point)) => normalize_claim(point) == key,
                (Some(target), None) => *target == attack.attacker,
                (None, None) => true,
            }
    })
}
