use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::assessment::ConditionProfile;
use super::bayes::RiskModel;
use super::domain::{DiagnosisResult, DiagnosticError};
use super::evidence::EvidencePolicy;
use super::facts::WorkingMemory;

/// Token asserted after the last stage of a chain.
pub const DONE: &str = "done";

pub type StageHandler =
    fn(&WorkingMemory, &mut StageContext<'_>) -> Result<(), DiagnosticError>;

/// A rule that fires when its token is asserted and its facts are present.
#[derive(Clone, Copy)]
pub struct Stage {
    pub token: &'static str,
    pub requires: &'static [&'static str],
    pub handler: StageHandler,
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("token", &self.token)
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}

/// What a stage handler may read and append to.
pub struct StageContext<'a> {
    pub profile: &'static ConditionProfile,
    pub model: &'a RiskModel,
    pub policy: EvidencePolicy,
    pub result: &'a mut DiagnosisResult,
}

impl StageContext<'_> {
    pub fn diagnose(&mut self, finding: impl Into<String>) {
        self.result.diagnosis.push(finding.into());
    }

    pub fn recommend(&mut self, advice: impl Into<String>) {
        self.result.recommendations.push(advice.into());
    }

    /// Option text for the codes answered on `key`.
    pub fn describe(&self, key: &str, codes: &[u8]) -> String {
        match self.profile.quiz.question(key) {
            Some(question) => question.describe(codes),
            None => codes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Stage tokens in the order they fired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageTrace {
    pub fired: Vec<&'static str>,
}

impl StageTrace {
    pub fn len(&self) -> usize {
        self.fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

/// Linear chain of stages. After a stage fires, its successor's token is
/// asserted; a stage can never fire twice or out of order.
#[derive(Debug, Clone, Copy)]
pub struct StageChain {
    stages: &'static [Stage],
}

impl StageChain {
    pub const fn new(stages: &'static [Stage]) -> Self {
        Self { stages }
    }

    pub fn start(&self) -> &'static str {
        self.stages.first().map_or(DONE, |stage| stage.token)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &'static str> {
        self.stages.iter().map(|stage| stage.token)
    }

    pub fn run(
        &self,
        memory: &mut WorkingMemory,
        context: &mut StageContext<'_>,
    ) -> Result<StageTrace, DiagnosticError> {
        let mut trace = StageTrace::default();
        let mut next_allowed = 0;

        while let Some(token) = memory.stage() {
            if token == DONE {
                break;
            }
            let position = self
                .stages
                .iter()
                .position(|stage| stage.token == token)
                .filter(|position| *position >= next_allowed)
                .ok_or_else(|| DiagnosticError::StageOutOfOrder(token.to_string()))?;
            let stage = &self.stages[position];

            for key in stage.requires {
                memory.fact(*key)?;
            }
            debug!(condition = %memory.condition(), stage = stage.token, "firing stage");
            (stage.handler)(memory, context)?;
            trace.fired.push(stage.token);

            next_allowed = position + 1;
            let successor = self
                .stages
                .get(next_allowed)
                .map_or(DONE, |stage| stage.token);
            memory.assert_stage(successor);
        }

        Ok(trace)
    }
}
