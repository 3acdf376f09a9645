//! Scripted in-memory gateway shared by the use case tests.

use crate::ports::worker_gateway::{GatewayError, WorkerGateway};
use async_trait::async_trait;
use philosopher_domain::{Phase, WorkerRequest};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Text(String),
    Error(GatewayError),
    /// Never answers
    Hang,
}

pub(crate) fn text(s: impl Into<String>) -> Scripted {
    Scripted::Text(s.into())
}

/// Responses queued per (participant, phase); every request is recorded.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    queues: Mutex<HashMap<(String, Phase), VecDeque<Scripted>>>,
    requests: Mutex<Vec<WorkerRequest>>,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn script(&self, participant: &str, phase: Phase, responses: Vec<Scripted>) {
        self.queues
            .lock()
            .unwrap()
            .entry((participant.to_string(), phase))
            .or_default()
            .extend(responses);
    }

    pub(crate) fn requests(&self) -> Vec<WorkerRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn requests_for(&self, participant: &str, phase: Phase) -> Vec<WorkerRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.participant.as_str() == participant && r.phase == phase)
            .collect()
    }

    fn next(&self, request: &WorkerRequest) -> Scripted {
        self.queues
            .lock()
            .unwrap()
            .get_mut(&(request.participant.to_string(), request.phase))
            .and_then(|q| q.pop_front())
            .unwrap_or(Scripted::Error(GatewayError::Other("(no more responses)".into())))
    }
}

#[async_trait]
impl WorkerGateway for ScriptedGateway {
    async fn invoke(&self, request: &WorkerRequest) -> Result<String, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.next(request) {
            Scripted::Text(t) => Ok(t),
            Scripted::Error(e) => Err(e),
            Scripted::Hang => {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                Err(GatewayError::Timeout)
            }
        }
    }
}

pub(crate) fn research_json(thesis: &str) -> Scripted {
    text(serde_json::json!({ "core_thesis": thesis, "evidence": [] }).to_string())
}

pub(crate) fn preparation_json() -> Scripted {
    text(r#"{"attacks": [], "supports": [], "defense_prep": []}"#)
}

pub(crate) fn turn_json(kind: &str, target: &str, key_point: &str) -> Scripted {
    text(
        serde_json::json!({
            "actions": [{
                "type": kind,
                "target": target,
                "content": format!("{} {}", kind, target),
                "key_point": key_point,
            }]
        })
        .to_string(),
    )
}

pub(crate) fn answer_json(answer: &str) -> Scripted {
    text(serde_json::json!({ "answer": answer, "summary": answer }).to_string())
}

/// Scores in the order depth, coherence, completeness, practicality, humility
pub(crate) fn evaluation_json(scores: [f64; 5], follow_up: &str) -> Scripted {
    let [depth, coherence, completeness, practicality, humility] = scores;
    text(
        serde_json::json!({
            "scores": {
                "depth": depth,
                "coherence": coherence,
                "completeness": completeness,
                "practicality": practicality,
                "humility": humility,
            },
            "follow_up_question": follow_up,
        })
        .to_string(),
    )
}

pub(crate) fn uniform_evaluation_json(score: f64) -> Scripted {
    evaluation_json([score; 5], "What about failure modes?")
}
