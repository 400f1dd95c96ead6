use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::bayes::InferenceError;
use super::severity::{IsiInterpretation, RiskAssessment};

/// Conditions the registry knows how to assess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Screening,
    Anxiety,
    Insomnia,
    Depression,
    Stress,
}

impl Condition {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Screening,
            Self::Anxiety,
            Self::Insomnia,
            Self::Depression,
            Self::Stress,
        ]
    }

    /// Conditions backed by a stage chain and a risk network.
    pub const fn specific() -> [Self; 4] {
        [Self::Anxiety, Self::Insomnia, Self::Depression, Self::Stress]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Screening => "screening",
            Self::Anxiety => "anxiety",
            Self::Insomnia => "insomnia",
            Self::Depression => "depression",
            Self::Stress => "stress",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Screening => "Cribado general",
            Self::Anxiety => "Ansiedad",
            Self::Insomnia => "Insomnio",
            Self::Depression => "Depresión",
            Self::Stress => "Estrés",
        }
    }

    pub const fn is_specific(self) -> bool {
        !matches!(self, Self::Screening)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Condition {
    type Err = DiagnosticError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|condition| condition.key() == raw)
            .ok_or_else(|| DiagnosticError::UnknownCondition(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerMode {
    Single,
    Multi,
    /// Item scores summed into one index (0..=4 per listed item).
    Scale,
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    #[serde(rename = "fact")]
    pub fact_key: &'static str,
    pub statement: &'static str,
    pub options: &'static [&'static str],
    pub answer_mode: AnswerMode,
}

impl Question {
    pub const fn single(
        fact_key: &'static str,
        statement: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            fact_key,
            statement,
            options,
            answer_mode: AnswerMode::Single,
        }
    }

    pub const fn multi(
        fact_key: &'static str,
        statement: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            fact_key,
            statement,
            options,
            answer_mode: AnswerMode::Multi,
        }
    }

    pub const fn scale(
        fact_key: &'static str,
        statement: &'static str,
        items: &'static [&'static str],
    ) -> Self {
        Self {
            fact_key,
            statement,
            options: items,
            answer_mode: AnswerMode::Scale,
        }
    }

    /// Option text for a 1-based answer code.
    pub fn option_label(&self, code: u8) -> Option<&'static str> {
        usize::from(code)
            .checked_sub(1)
            .and_then(|index| self.options.get(index))
            .copied()
    }

    pub fn describe(&self, codes: &[u8]) -> String {
        codes
            .iter()
            .map(|code| match self.option_label(*code) {
                Some(label) => label.to_string(),
                None => code.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Ordered, immutable questionnaire owned by one module.
#[derive(Debug, Clone, Serialize)]
pub struct Quiz {
    pub questions: &'static [Question],
}

impl Quiz {
    pub const fn new(questions: &'static [Question]) -> Self {
        Self { questions }
    }

    pub fn question(&self, fact_key: &str) -> Option<&'static Question> {
        self.questions
            .iter()
            .find(|question| question.fact_key == fact_key)
    }

    pub fn fact_keys(&self) -> impl Iterator<Item = &'static str> {
        self.questions.iter().map(|question| question.fact_key)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Raw answer payload keyed by fact key.
pub type Answers = BTreeMap<String, AnswerValue>;

/// A single raw answer as sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(i64),
    Text(String),
    List(Vec<AnswerValue>),
}

impl AnswerValue {
    /// Flattened answer tokens; comma-separated text is split.
    pub(crate) fn tokens(&self) -> Vec<String> {
        match self {
            AnswerValue::Number(value) => vec![value.to_string()],
            AnswerValue::Text(text) => text
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect(),
            AnswerValue::List(items) => items.iter().flat_map(AnswerValue::tokens).collect(),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Number(value) => write!(f, "{value}"),
            AnswerValue::Text(text) => write!(f, "'{text}'"),
            AnswerValue::List(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// Findings accumulated by one run, in stage order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiagnosisResult {
    pub diagnosis: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isi: Option<IsiInterpretation>,
}

#[derive(Debug, thiserror::Error)]
pub enum DiagnosticError {
    #[error("unknown condition '{0}'")]
    UnknownCondition(String),
    #[error("missing answer '{key}' required by the {condition} module")]
    MissingEvidence {
        condition: Condition,
        key: &'static str,
    },
    #[error("invalid answer for '{key}': {reason}")]
    InvalidAnswer { key: &'static str, reason: String },
    #[error("answer code {code} for '{key}' has no mapping onto network node '{node}'")]
    UnmappedEvidenceCode {
        node: &'static str,
        key: &'static str,
        code: u8,
    },
    #[error("fact '{0}' was already declared in this run")]
    FactAlreadyDeclared(&'static str),
    #[error("fact '{key}' does not hold {expected}")]
    FactKind {
        key: &'static str,
        expected: &'static str,
    },
    #[error("the {0} module has no input; call input_data before run")]
    NotPrimed(Condition),
    #[error("cannot redirect to the {0} module")]
    NotRedirectable(Condition),
    #[error("stage '{0}' is not reachable from the current position of the chain")]
    StageOutOfOrder(String),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}
