//! Worker response extraction and schema validation.
//!
//! Workers answer in free text that should contain one JSON object. The
//! object is looked for in this order:
//!
//! 1. the whole text
//! 2. a ` ```json ` fenced block
//! 3. a bare ` ``` ` fenced block
//! 4. the outermost `{ … }` span
//!
//! and then validated against the phase's [`ResponseSchema`].

use super::response::{DebateTurn, EvaluationReport, ParsedResponse, ResponseSchema, WorkerResponse};
use crate::debate::{PreparationRecord, ResearchRecord};
use crate::socratic::Answer;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Why a response does not match its schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("no JSON object found in the {schema} response")]
    NoJson { schema: ResponseSchema },

    #[error("{schema} response does not match the schema: {message}")]
    Malformed {
        schema: ResponseSchema,
        message: String,
    },

    #[error("{schema} response is missing required field `{field}`")]
    MissingField {
        schema: ResponseSchema,
        field: &'static str,
    },

    #[error("{schema} response has an invalid `{field}`: {reason}")]
    InvalidField {
        schema: ResponseSchema,
        field: String,
        reason: String,
    },
}

impl SchemaError {
    /// A short instruction telling the worker what to fix
    pub fn clarification(&self) -> String {
        format!(
            "Your previous response was rejected: {}. Reply with a single JSON object only.",
            self
        )
    }
}

/// Find the first JSON object in `text`
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Some(value) = parse_object(trimmed) {
        return Some(value);
    }
    if let Some(value) = fenced_block(trimmed, "```json").and_then(parse_object) {
        return Some(value);
    }
    if let Some(value) = fenced_block(trimmed, "```").and_then(parse_object) {
        return Some(value);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&trimmed[start..=end])
}

fn parse_object(candidate: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

/// Body of the first fenced block opened by `fence`
fn fenced_block<'a>(text: &'a str, fence: &str) -> Option<&'a str> {
    let open = text.find(fence)?;
    let after_fence = &text[open + fence.len()..];
    // The opening line may carry a language tag; the body starts on the next line.
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

/// Extract and validate a response against `schema`
pub fn parse_response(schema: ResponseSchema, text: &str) -> Result<ParsedResponse, SchemaError> {
    let value = extract_json(text).ok_or(SchemaError::NoJson { schema })?;
    let confidence = value.get("confidence").and_then(Value::as_f64);

    let response = match schema {
        ResponseSchema::Research => {
            require_text(schema, &value, "core_thesis")?;
            WorkerResponse::Research(decode::<ResearchRecord>(schema, value)?)
        }
        ResponseSchema::Preparation => {
            WorkerResponse::Preparation(decode::<PreparationRecord>(schema, value)?)
        }
        ResponseSchema::Turn => WorkerResponse::Turn(validate_turn(decode(schema, value)?)?),
        ResponseSchema::Answer => {
            require_text(schema, &value, "answer")?;
            WorkerResponse::Answer(decode::<Answer>(schema, value)?)
        }
        ResponseSchema::Evaluation => {
            if value.get("scores").is_none() {
                return Err(SchemaError::MissingField {
                    schema,
                    field: "scores",
                });
            }
            let report: EvaluationReport = decode(schema, value)?;
            report
                .scores
                .validate()
                .map_err(|e| SchemaError::InvalidField {
                    schema,
                    field: format!("scores.{}", e.dimension),
                    reason: e.to_string(),
                })?;
            WorkerResponse::Evaluation(report)
        }
    };

    Ok(ParsedResponse {
        response,
        confidence,
    })
}

fn decode<T: DeserializeOwned>(schema: ResponseSchema, value: Value) -> Result<T, SchemaError> {
    serde_json::from_value(value).map_err(|e| SchemaError::Malformed {
        schema,
        message: e.to_string(),
    })
}

fn require_text(schema: ResponseSchema, value: &Value, field: &'static str) -> Result<(), SchemaError> {
    match value.get(field).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(SchemaError::InvalidField {
            schema,
            field: field.to_string(),
            reason: "must not be empty".into(),
        }),
        None => Err(SchemaError::MissingField { schema, field }),
    }
}

fn validate_turn(turn: DebateTurn) -> Result<DebateTurn, SchemaError> {
    let schema = ResponseSchema::Turn;
    if turn.actions.is_empty() {
        return Err(SchemaError::InvalidField {
            schema,
            field: "actions".into(),
            reason: "at least one action is required".into(),
        });
    }
    for (i, action) in turn.actions.iter().enumerate() {
        if action.content.trim().is_empty() {
            return Err(SchemaError::InvalidField {
                schema,
                field: format!("actions[{}].content", i),
                reason: "must not be empty".into(),
            });
        }
        if action.key_point.trim().is_empty() {
            return Err(SchemaError::InvalidField {
                schema,
                field: format!("actions[{}].key_point", i),
                reason: "must not be empty".into(),
            });
        }
    }
    Ok(turn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::ActionKind;

    #[test]
    fn test_extract_bare_json() {
        let value = extract_json(r#"  {"answer": "42"}  "#).unwrap();
        assert_eq!(value["answer"], "42");
    }

    #[test]
    fn test_extract_json_fence() {
        let text = "Here you go:\n```json\n{\"answer\": \"fenced\"}\n```\nThanks";
        assert_eq!(extract_json(text).unwrap()["answer"], "fenced");
    }

    #[test]
    fn test_extract_plain_fence() {
        let text = "```\n{\"answer\": \"plain\"}\n```";
        assert_eq!(extract_json(text).unwrap()["answer"], "plain");
    }

    #[test]
    fn test_extract_embedded_object() {
        let text = "My view: {\"answer\": \"inline\", \"summary\": \"s\"} as requested.";
        assert_eq!(extract_json(text).unwrap()["answer"], "inline");
    }

    #[test]
    fn test_extract_rejects_non_objects() {
        assert!(extract_json("[1, 2, 3]").is_none());
        assert!(extract_json("no json here").is_none());
        assert!(extract_json("} backwards {").is_none());
    }

    #[test]
    fn test_research_requires_core_thesis() {
        let err = parse_response(ResponseSchema::Research, r#"{"evidence": []}"#).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MissingField {
                field: "core_thesis",
                ..
            }
        ));
    }

    #[test]
    fn test_turn_with_two_actions() {
        let text = r#"```json
{
  "actions": [
    {"type": "attack", "target": "B", "content": "Too costly", "key_point": "cost"},
    {"type": "support", "target": "C", "content": "Agree", "key_point": "modularity"}
  ],
  "confidence": 0.9
}
```"#;
        let parsed = parse_response(ResponseSchema::Turn, text).unwrap();
        let WorkerResponse::Turn(turn) = parsed.response else {
            panic!("expected a turn");
        };
        assert_eq!(turn.actions.len(), 2);
        assert_eq!(turn.actions[0].kind, ActionKind::Attack);
        assert_eq!(parsed.confidence, Some(0.9));
    }

    #[test]
    fn test_turn_rejects_unknown_action() {
        let text = r#"{"actions": [{"type": "concede", "content": "c", "key_point": "k"}]}"#;
        assert!(matches!(
            parse_response(ResponseSchema::Turn, text),
            Err(SchemaError::Malformed { .. })
        ));
    }

    #[test]
    fn test_turn_rejects_empty_key_point() {
        let text = r#"{"actions": [{"type": "attack", "content": "c", "key_point": " "}]}"#;
        let err = parse_response(ResponseSchema::Turn, text).unwrap_err();
        assert!(err.to_string().contains("key_point"));
    }

    #[test]
    fn test_turn_rejects_no_actions() {
        assert!(parse_response(ResponseSchema::Turn, r#"{"actions": []}"#).is_err());
    }

    #[test]
    fn test_evaluation_scores_in_range() {
        let ok = r#"{"scores": {"depth": 0.5, "coherence": 0.6, "completeness": 0.4,
                     "practicality": 0.7, "humility": 0.8}, "follow_up_question": "Why?"}"#;
        let parsed = parse_response(ResponseSchema::Evaluation, ok).unwrap();
        assert!(matches!(parsed.response, WorkerResponse::Evaluation(_)));

        let bad = r#"{"scores": {"depth": 1.5, "coherence": 0.6, "completeness": 0.4,
                      "practicality": 0.7, "humility": 0.8}}"#;
        let err = parse_response(ResponseSchema::Evaluation, bad).unwrap_err();
        assert!(err.to_string().contains("scores.depth"));
    }

    #[test]
    fn test_evaluation_missing_score() {
        let text = r#"{"scores": {"depth": 0.5}}"#;
        assert!(matches!(
            parse_response(ResponseSchema::Evaluation, text),
            Err(SchemaError::Malformed { .. })
        ));
    }

    #[test]
    fn test_clarification_mentions_problem() {
        let err = SchemaError::NoJson {
            schema: ResponseSchema::Answer,
        };
        assert!(err.clarification().contains("no JSON object"));
    }
}
