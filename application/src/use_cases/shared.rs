//! Shared worker-call helpers for the debate and Socratic use cases.
//!
//! - [`invoke_validated`]: one call under a time budget, with a single
//!   clarifying retry after a schema failure
//! - [`fan_out`]: a parallel phase: every call spawned, joined behind one
//!   deadline

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::progress::ProgressNotifier;
use crate::ports::worker_gateway::WorkerGateway;
use philosopher_domain::{
    FailureKind, ParticipantId, PhaseFailure, WorkerRequest, WorkerResponse, parse_response,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Confidence below which a response is flagged in the logs
const LOW_CONFIDENCE: f64 = 0.3;

/// Result of one participant's call in a phase
pub(crate) type CallResult = Result<WorkerResponse, PhaseFailure>;

fn failure(request: &WorkerRequest, kind: FailureKind, message: impl Into<String>) -> PhaseFailure {
    PhaseFailure::new(
        request.participant.clone(),
        request.phase,
        request.round,
        kind,
        message,
    )
}

/// Send one request and validate the answer against the phase schema.
///
/// Every attempt gets the full `budget`. A schema failure is retried up to
/// `max_retries` times with a clarification attached; gateway errors and
/// timeouts are not retried.
pub(crate) async fn invoke_validated<G: WorkerGateway + ?Sized>(
    gateway: &G,
    logger: &dyn ConversationLogger,
    mut request: WorkerRequest,
    budget: Duration,
    max_retries: u32,
) -> CallResult {
    let schema = request.expected_schema;
    let mut attempt = 0;

    loop {
        logger.log(ConversationEvent::new(
            "worker_request",
            serde_json::json!({
                "participant": request.participant,
                "phase": request.phase,
                "round": request.round,
                "turn": request.turn,
                "attempt": attempt + 1,
                "request": request,
            }),
        ));

        let text = match tokio::time::timeout(budget, gateway.invoke(&request)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("{} failed in {}: {}", request.participant, request.phase, e);
                return Err(failure(&request, FailureKind::WorkerFailure, e.to_string()));
            }
            Err(_) => {
                warn!(
                    "{} timed out in {} after {}s",
                    request.participant,
                    request.phase,
                    budget.as_secs()
                );
                return Err(failure(
                    &request,
                    FailureKind::WorkerTimeout,
                    format!("no response within {}s", budget.as_secs()),
                ));
            }
        };

        logger.log(ConversationEvent::new(
            "worker_response",
            serde_json::json!({
                "participant": request.participant,
                "phase": request.phase,
                "round": request.round,
                "bytes": text.len(),
                "text": text,
            }),
        ));

        match parse_response(schema, &text) {
            Ok(parsed) => {
                if let Some(confidence) = parsed.confidence
                    && confidence < LOW_CONFIDENCE
                {
                    warn!(
                        "{} reported low confidence ({:.2}) in {}",
                        request.participant, confidence, request.phase
                    );
                }
                debug!("{} answered {} ({})", request.participant, request.phase, schema);
                return Ok(parsed.response);
            }
            Err(e) if attempt < max_retries => {
                attempt += 1;
                info!(
                    "{} sent an invalid {} response, asking again: {}",
                    request.participant, schema, e
                );
                logger.log(ConversationEvent::new(
                    "schema_retry",
                    serde_json::json!({
                        "participant": request.participant,
                        "phase": request.phase,
                        "round": request.round,
                        "error": e.to_string(),
                    }),
                ));
                request = request.with_clarification(e.clarification());
            }
            Err(e) => {
                warn!(
                    "{} sent an invalid {} response again: {}",
                    request.participant, schema, e
                );
                return Err(failure(&request, FailureKind::SchemaValidation, e.to_string()));
            }
        }
    }
}

/// Run a parallel phase.
///
/// Every request is spawned at once and joined behind a single `deadline`.
/// When it expires the barrier stops waiting, aborts the stragglers and
/// reports a `WorkerTimeout` for each participant still missing. Results
/// come back in request order.
pub(crate) async fn fan_out<G: WorkerGateway + 'static>(
    gateway: &Arc<G>,
    logger: &Arc<dyn ConversationLogger>,
    requests: Vec<WorkerRequest>,
    budget: Duration,
    max_retries: u32,
    deadline: Duration,
    progress: &dyn ProgressNotifier,
) -> Vec<(ParticipantId, CallResult)> {
    let order: Vec<ParticipantId> = requests.iter().map(|r| r.participant.clone()).collect();
    let phase = requests.first().map(|r| r.phase);
    let round = requests.first().and_then(|r| r.round);

    let mut join_set = JoinSet::new();
    for request in requests {
        let gateway = Arc::clone(gateway);
        let logger = Arc::clone(logger);
        join_set.spawn(async move {
            let participant = request.participant.clone();
            let result =
                invoke_validated(gateway.as_ref(), logger.as_ref(), request, budget, max_retries)
                    .await;
            (participant, result)
        });
    }

    let mut pending: BTreeSet<ParticipantId> = order.iter().cloned().collect();
    let mut collected: Vec<(ParticipantId, CallResult)> = Vec::new();
    let expires_at = tokio::time::Instant::now() + deadline;
    let mut timed_out = false;

    loop {
        match tokio::time::timeout_at(expires_at, join_set.join_next()).await {
            Ok(Some(Ok((participant, result)))) => {
                if let Some(phase) = phase {
                    progress.on_task_complete(&phase, &participant, result.is_ok());
                }
                pending.remove(&participant);
                collected.push((participant, result));
            }
            Ok(Some(Err(e))) => {
                warn!("Task join error: {}", e);
            }
            Ok(None) => break,
            Err(_) => {
                warn!(
                    "Phase deadline of {}s expired with {} call(s) outstanding",
                    deadline.as_secs(),
                    pending.len()
                );
                join_set.abort_all();
                timed_out = true;
                break;
            }
        }
    }

    // Anything still pending either missed the deadline or its task died.
    for participant in pending {
        let Some(phase) = phase else { break };
        let (kind, message) = if timed_out {
            (
                FailureKind::WorkerTimeout,
                format!("phase deadline of {}s expired", deadline.as_secs()),
            )
        } else {
            (FailureKind::WorkerFailure, "worker task ended unexpectedly".to_string())
        };
        progress.on_task_complete(&phase, &participant, false);
        let failure = PhaseFailure::new(participant.clone(), phase, round, kind, message);
        collected.push((participant, Err(failure)));
    }

    collected.sort_by_key(|(participant, _)| order.iter().position(|p| p == participant));
    collected
}

/// Record a contained failure in the transcript
pub(crate) fn log_failure(logger: &dyn ConversationLogger, failure: &PhaseFailure) {
    logger.log(ConversationEvent::new(
        "phase_failure",
        serde_json::json!(failure),
    ));
}
