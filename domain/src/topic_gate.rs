//! Debate topic quality gate.
//!
//! Scores a topic on four dimensions before any worker is spent on it:
//!
//! | Dimension | Looks at |
//! |-----------|----------|
//! | clarity | length, vague pronouns |
//! | debatability | comparison form, factual "when/who" questions |
//! | specificity | word count, comparison form |
//! | actionability | technical subject, decision words, counterfactuals |
//!
//! Technical topics ("Rust vs Go for the ingest service") are judged more
//! leniently on length and weigh actionability higher.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const TECHNICAL_KEYWORDS: &[&str] = &[
    "react", "vue", "angular", "typescript", "javascript", "python", "rust", "go",
    "api", "rest", "graphql", "grpc", "microservice", "microservices", "monolith",
    "serverless", "docker", "kubernetes", "aws", "gcp", "azure", "cloud", "database",
    "sql", "nosql", "redis", "postgresql", "mongodb", "mysql", "frontend", "backend",
    "fullstack", "devops", "cicd", "ci/cd", "tdd", "bdd", "testing", "unit test",
    "integration", "agile", "scrum", "kanban", "waterfall", "architecture",
    "design pattern", "solid", "dry", "kiss", "framework", "library", "sdk", "cli", "gui",
    "ai", "ml", "llm", "gpt", "claude", "gemini", "model", "algorithm", "data structure",
    "optimization", "performance",
];

const ACTION_KEYWORDS: &[&str] = &[
    "implement", "use", "adopt", "choose", "build", "design", "should", "better", "best",
    "optimal", "recommend", "migrate", "replace",
];

static TECHNICAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = TECHNICAL_KEYWORDS
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).unwrap()
});

static COMPARISON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bvs\.?(?:\s|$)|\bversus\b|\bor\b|\bcompared to\b").unwrap());

static VAGUE_PRONOUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:this|that|it)\b|\b(?:this thing|that thing)\b").unwrap());

static FACTUAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:when|who)\s").unwrap());

static FOREGONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:obviously|of course|clearly)\s").unwrap());

static COUNTERFACTUAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bwhat if\b.*\b(?:had not|hadn't|never)\b").unwrap());

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").unwrap());

/// Lowest score any single dimension may have
pub const MIN_DIMENSION_SCORE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicDimension {
    Clarity,
    Debatability,
    Specificity,
    Actionability,
}

impl TopicDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicDimension::Clarity => "clarity",
            TopicDimension::Debatability => "debatability",
            TopicDimension::Specificity => "specificity",
            TopicDimension::Actionability => "actionability",
        }
    }
}

impl std::fmt::Display for TopicDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: TopicDimension,
    pub score: f64,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl DimensionScore {
    fn new(dimension: TopicDimension) -> Self {
        Self {
            dimension,
            score: 1.0,
            reason: String::new(),
            suggestion: None,
        }
    }

    fn cap(&mut self, max: f64, reason: &str, suggestion: Option<&str>) {
        self.score = self.score.min(max);
        if !self.reason.is_empty() {
            self.reason.push_str("; ");
        }
        self.reason.push_str(reason);
        if let Some(s) = suggestion {
            self.suggestion = Some(s.to_string());
        }
    }

    fn bonus(&mut self, amount: f64) {
        self.score = (self.score + amount).min(1.0);
    }

    fn or_reason(mut self, fallback: &str) -> Self {
        if self.reason.is_empty() {
            self.reason = fallback.to_string();
        }
        self
    }
}

/// Result of [`analyze_topic`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAnalysis {
    pub topic: String,
    pub is_technical: bool,
    pub dimensions: Vec<DimensionScore>,
    pub overall_score: f64,
    pub is_valid: bool,
    /// Set only for invalid topics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weakest_dimension: Option<TopicDimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_issue: Option<String>,
}

impl TopicAnalysis {
    pub fn score(&self, dimension: TopicDimension) -> f64 {
        self.dimensions
            .iter()
            .find(|d| d.dimension == dimension)
            .map(|d| d.score)
            .unwrap_or(0.0)
    }
}

pub fn is_technical_topic(topic: &str) -> bool {
    TECHNICAL_RE.is_match(topic) || COMPARISON_RE.is_match(topic)
}

fn analyze_clarity(topic: &str, is_technical: bool) -> DimensionScore {
    let mut d = DimensionScore::new(TopicDimension::Clarity);
    let len = topic.chars().count();

    if len < 4 {
        d.cap(
            0.2,
            "topic is too short",
            Some("add what is being compared or the context, e.g. 'AI' -> 'AI vs rules for triage'"),
        );
    } else if len < if is_technical { 6 } else { 10 } {
        d.cap(
            0.4,
            "topic lacks context",
            Some("add the project context or the alternatives being compared"),
        );
    }

    if VAGUE_PRONOUN_RE.is_match(topic) {
        d.cap(
            0.5,
            "the subject is a vague pronoun",
            Some("name the concrete technology or method"),
        );
    }

    d.or_reason("topic is clear")
}

fn analyze_debatability(topic: &str, is_technical: bool) -> DimensionScore {
    let mut d = DimensionScore::new(TopicDimension::Debatability);

    if is_technical && COMPARISON_RE.is_match(topic) {
        d.bonus(0.2);
    }
    if FACTUAL_RE.is_match(topic) {
        d.cap(
            0.5,
            "this is a factual question",
            Some("rephrase it as a decision or a comparison"),
        );
    }
    if !is_technical && FOREGONE_RE.is_match(topic) {
        d.cap(0.7, "the conclusion is presupposed", None);
    }

    d.or_reason("topic supports several viewpoints")
}

fn analyze_specificity(topic: &str, is_technical: bool) -> DimensionScore {
    let mut d = DimensionScore::new(TopicDimension::Specificity);
    let words = WORD_RE.find_iter(topic).count();
    let min_words = if is_technical { 2 } else { 3 };

    if words < min_words {
        d.cap(
            0.5,
            "too few keywords",
            Some("add the alternatives or the project context"),
        );
    } else if words > 40 {
        d.cap(
            0.7,
            "topic is too complex",
            Some("focus on a single decision"),
        );
    }
    if is_technical && COMPARISON_RE.is_match(topic) {
        d.bonus(0.1);
    }

    d.or_reason("topic is specific enough")
}

fn analyze_actionability(topic: &str, is_technical: bool) -> DimensionScore {
    let mut d = DimensionScore::new(TopicDimension::Actionability);

    if is_technical {
        d.bonus(0.2);
    }
    let lower = topic.to_lowercase();
    if ACTION_KEYWORDS.iter().any(|k| lower.contains(k)) {
        d.bonus(0.1);
    }
    if COUNTERFACTUAL_RE.is_match(topic) {
        d.cap(
            0.6,
            "topic is counterfactual",
            Some("focus on a decision that can be made now"),
        );
    }

    d.or_reason("debate can reach an actionable conclusion")
}

/// Score a debate topic and decide whether it is worth debating
pub fn analyze_topic(topic: &str) -> TopicAnalysis {
    let topic = topic.trim();
    let is_technical = is_technical_topic(topic);

    let dimensions = vec![
        analyze_clarity(topic, is_technical),
        analyze_debatability(topic, is_technical),
        analyze_specificity(topic, is_technical),
        analyze_actionability(topic, is_technical),
    ];

    let weights: [f64; 4] = if is_technical {
        [0.25, 0.25, 0.2, 0.3]
    } else {
        [0.3, 0.3, 0.2, 0.2]
    };
    let overall_score: f64 = dimensions.iter().zip(weights).map(|(d, w)| d.score * w).sum();
    let threshold = if is_technical { 0.55 } else { 0.6 };
    let is_valid = overall_score >= threshold
        && dimensions.iter().all(|d| d.score >= MIN_DIMENSION_SCORE);

    let (weakest_dimension, primary_issue) = if is_valid {
        (None, None)
    } else {
        // The first of equally low dimensions wins.
        let weakest = dimensions
            .iter()
            .fold(None::<&DimensionScore>, |lowest, d| match lowest {
                Some(l) if l.score <= d.score => Some(l),
                _ => Some(d),
            });
        (
            weakest.map(|d| d.dimension),
            weakest.map(|d| format!("{}: {}", d.dimension, d.reason)),
        )
    };

    TopicAnalysis {
        topic: topic.to_string(),
        is_technical,
        dimensions,
        overall_score,
        is_valid,
        weakest_dimension,
        primary_issue,
    }
}
