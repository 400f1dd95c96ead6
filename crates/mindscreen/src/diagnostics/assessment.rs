use std::fmt;
use std::sync::Arc;
use tracing::info;

use super::bayes::{BayesianNetwork, ModelValidationError, RiskModel};
use super::domain::{Answers, Condition, DiagnosisResult, DiagnosticError, Quiz};
use super::evidence::{EvidenceMapper, EvidencePolicy};
use super::facts::{facts_from_answers, WorkingMemory};
use super::sequencer::{StageChain, StageContext, StageTrace};
use super::severity::{display_probability, BandGuidance, RiskAssessment, SeverityBand};

/// Static description of one condition-specific module.
pub struct ConditionProfile {
    pub condition: Condition,
    /// Noun used in the probability line, e.g. "ansiedad".
    pub subject: &'static str,
    pub quiz: &'static Quiz,
    pub chain: StageChain,
    pub evidence: EvidenceMapper,
    pub outcome: &'static str,
    pub network: fn() -> Result<BayesianNetwork, ModelValidationError>,
    pub bands: BandGuidance,
}

impl ConditionProfile {
    pub fn risk_model(&self) -> Result<RiskModel, ModelValidationError> {
        let nodes: Vec<&str> = self.evidence.nodes().collect();
        RiskModel::new((self.network)()?, self.outcome, &nodes)
    }
}

impl fmt::Debug for ConditionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionProfile")
            .field("condition", &self.condition)
            .field("outcome", &self.outcome)
            .field("stages", &self.chain.len())
            .finish_non_exhaustive()
    }
}

/// Lifecycle shared by every module: reset, input_data, run, then read.
pub trait Assessment {
    fn condition(&self) -> Condition;

    /// Clears facts and results so the module can be reused.
    fn reset(&mut self);

    fn input_data(&mut self, answers: &Answers) -> Result<(), DiagnosticError>;

    fn run(&mut self) -> Result<StageTrace, DiagnosticError>;

    fn result(&self) -> &DiagnosisResult;

    fn diagnosis(&self) -> &[String] {
        &self.result().diagnosis
    }

    fn recommendations(&self) -> &[String] {
        &self.result().recommendations
    }
}

/// Runs a condition profile's stage chain against its shared risk model.
#[derive(Debug)]
pub struct DiagnosticModule {
    profile: &'static ConditionProfile,
    model: Arc<RiskModel>,
    policy: EvidencePolicy,
    memory: WorkingMemory,
    result: DiagnosisResult,
}

impl DiagnosticModule {
    pub fn new(
        profile: &'static ConditionProfile,
        model: Arc<RiskModel>,
        policy: EvidencePolicy,
    ) -> Self {
        Self {
            profile,
            model,
            policy,
            memory: WorkingMemory::new(profile.condition),
            result: DiagnosisResult::default(),
        }
    }

    pub fn profile(&self) -> &'static ConditionProfile {
        self.profile
    }

    pub fn memory(&self) -> &WorkingMemory {
        &self.memory
    }

    pub fn into_result(self) -> DiagnosisResult {
        self.result
    }
}

impl Assessment for DiagnosticModule {
    fn condition(&self) -> Condition {
        self.profile.condition
    }

    fn reset(&mut self) {
        self.memory.clear();
        self.result = DiagnosisResult::default();
    }

    fn input_data(&mut self, answers: &Answers) -> Result<(), DiagnosticError> {
        let facts = facts_from_answers(self.profile.quiz, self.profile.condition, answers)?;
        for fact in facts {
            self.memory.declare(fact)?;
        }
        self.memory.assert_stage(self.profile.chain.start());
        Ok(())
    }

    fn run(&mut self) -> Result<StageTrace, DiagnosticError> {
        if self.memory.stage().is_none() {
            return Err(DiagnosticError::NotPrimed(self.profile.condition));
        }
        let mut context = StageContext {
            profile: self.profile,
            model: &self.model,
            policy: self.policy,
            result: &mut self.result,
        };
        let trace = self.profile.chain.run(&mut self.memory, &mut context)?;
        info!(
            condition = %self.profile.condition,
            stages = trace.len(),
            recommendations = self.result.recommendations.len(),
            "diagnostic run completed"
        );
        Ok(trace)
    }

    fn result(&self) -> &DiagnosisResult {
        &self.result
    }
}

/// Stage shared by every condition: map facts to evidence, query the
/// network, and append the probability line plus band guidance.
pub(crate) fn evaluate_risk(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    let profile = context.profile;
    let evidence = profile.evidence.map(memory, context.policy)?;
    let probability = context.model.probability(&evidence)?;
    let band = SeverityBand::from_probability(probability);
    info!(
        condition = %profile.condition,
        probability,
        band = band.label(),
        "risk posterior computed"
    );

    context.recommend(format!(
        "Probabilidad calculada de {}: {}",
        profile.subject,
        display_probability(probability)
    ));
    if let Some(text) = profile.bands.for_band(band) {
        context.diagnose(text.diagnosis);
        for advice in text.recommendations {
            context.recommend(*advice);
        }
    }
    context.result.risk = Some(RiskAssessment { probability, band });
    Ok(())
}
